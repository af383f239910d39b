//! Concurrent filing digests for several carriers.

use contrail_data::{InsightProvider, InsightRequest, insight_or_warning};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar for `len` carriers.
pub(crate) fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Fetch an insight for every request, at most `concurrency` at a time.
///
/// Failures become warning strings. Results keep the order of `requests`.
pub(crate) async fn collect_insights<P: InsightProvider + Sync>(
    provider: &P,
    requests: Vec<InsightRequest>,
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Vec<(InsightRequest, String)> {
    let mut results: Vec<(usize, InsightRequest, String)> = stream::iter(requests.into_iter().enumerate())
        .map(|(index, request)| async move {
            let text = insight_or_warning(provider, &request).await;
            (index, request, text)
        })
        .buffer_unordered(concurrency.max(1))
        .inspect(|(_, request, _)| {
            if let Some(pb) = progress {
                pb.inc(1);
                pb.set_message(request.entity.clone());
            }
        })
        .collect()
        .await;

    results.sort_by_key(|(index, _, _)| *index);
    results
        .into_iter()
        .map(|(_, request, text)| (request, text))
        .collect()
}
