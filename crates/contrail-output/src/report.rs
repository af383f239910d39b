//! Text reports for comparison tables.
//!
//! Two views are rendered, each as an ASCII table for terminals or as
//! Markdown:
//!
//! - the period view: one table per metric, one row per period and one
//!   column per entity, followed by a `vs BASE` column for every non-base
//!   entity
//! - the snapshot view: a single period with one row per metric
//!
//! Percent-difference columns are left out when only one entity is compared
//! or when comparison is switched off.

use chrono::{DateTime, Utc};
use contrail_compare::{ComparisonRow, ComparisonTable};
use contrail_metrics::{Metric, Period};

use crate::format::{EMPTY, format_percent_difference, format_row_value};

/// A rendered grid of cells. The first column is left-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn ascii(&self) -> String {
        let widths = self.widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, width))| {
                    let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
                    if i == 0 {
                        format!("{cell}{pad}")
                    } else {
                        format!("{pad}{cell}")
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
        };
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

        let mut output = line(self.headers.as_slice());
        output.push('\n');
        output.push_str(&"-".repeat(rule_width));
        output.push('\n');
        for row in &self.rows {
            output.push_str(line(row.as_slice()).trim_end());
            output.push('\n');
        }
        output
    }

    fn markdown(&self) -> String {
        let mut output = format!("| {} |\n", self.headers.join(" | "));
        output.push_str(&format!(
            "|{}\n",
            self.headers
                .iter()
                .enumerate()
                .map(|(i, _)| if i == 0 { "---|" } else { "---:|" })
                .collect::<String>()
        ));
        for row in &self.rows {
            output.push_str(&format!("| {} |\n", row.join(" | ")));
        }
        output
    }
}

/// Report over a comparison table.
#[derive(Debug, Clone)]
pub struct ComparisonReport<'a> {
    table: &'a ComparisonTable,
    title: String,
    generated_at: DateTime<Utc>,
    placeholder: String,
    compare: bool,
}

impl<'a> ComparisonReport<'a> {
    /// Create a report with percent differences shown and empty cells for
    /// missing values.
    pub fn new(table: &'a ComparisonTable) -> Self {
        Self {
            table,
            title: format!("Airline Comparison vs {}", table.base()),
            generated_at: Utc::now(),
            placeholder: EMPTY.to_string(),
            compare: true,
        }
    }

    /// Set the report title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the text shown for missing values.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Show or hide percent-difference columns.
    pub const fn compare(mut self, compare: bool) -> Self {
        self.compare = compare;
        self
    }

    /// Whether percent-difference columns are rendered.
    pub const fn shows_difference(&self) -> bool {
        self.compare && !self.table.is_self_comparison()
    }

    fn difference_header(&self, entity: &str) -> String {
        format!("{entity} vs {}", self.table.base())
    }

    fn value_columns(&self) -> Vec<String> {
        let mut headers = Vec::new();
        for entity in self.table.entities() {
            headers.push(entity.clone());
            if self.shows_difference() && entity != self.table.base() {
                headers.push(self.difference_header(entity));
            }
        }
        headers
    }

    fn value_cells(&self, row_for: impl Fn(&str) -> Option<&'a ComparisonRow>) -> Vec<String> {
        let mut cells = Vec::new();
        for entity in self.table.entities() {
            let row = row_for(entity.as_str());
            cells.push(
                row.map(|r| format_row_value(r, &self.placeholder))
                    .unwrap_or_else(|| self.placeholder.clone()),
            );
            if self.shows_difference() && entity != self.table.base() {
                cells.push(
                    row.map(|r| format_percent_difference(r.percent_difference, &self.placeholder))
                        .unwrap_or_else(|| self.placeholder.clone()),
                );
            }
        }
        cells
    }

    fn metric_label(&self, metric: Metric) -> String {
        self.table
            .for_metric(metric)
            .next()
            .map_or_else(|| metric.name().to_string(), |row| row.label.clone())
    }

    fn metric_grid(&self, metric: Metric) -> Grid {
        let mut headers = vec!["Period".to_string()];
        headers.extend(self.value_columns());

        let table = self.table;
        let rows = table
            .periods()
            .iter()
            .map(|&period| {
                let mut cells = vec![period.label()];
                cells.extend(self.value_cells(|entity| table.get(period, entity, metric)));
                cells
            })
            .collect();

        Grid { headers, rows }
    }

    fn snapshot_grid(&self, period: Period) -> Grid {
        let mut headers = vec!["Metric".to_string()];
        headers.extend(self.value_columns());

        let table = self.table;
        let rows = table
            .metrics()
            .iter()
            .map(|&metric| {
                let mut cells = vec![self.metric_label(metric)];
                cells.extend(self.value_cells(|entity| table.get(period, entity, metric)));
                cells
            })
            .collect();

        Grid { headers, rows }
    }

    fn header_lines(&self) -> String {
        format!(
            "Base: {}  Entities: {}  Periods: {}\nGenerated: {}\n",
            self.table.base(),
            self.table.entities().join(", "),
            self.table.periods().len(),
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }

    /// Period view as an ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = format!("\n{}\n", self.title);
        output.push_str(&self.header_lines());
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.table.is_empty() {
            output.push_str("\nNo periods matched the selection.\n");
        } else {
            for &metric in self.table.metrics() {
                output.push_str(&format!("\n{}:\n", self.metric_label(metric)));
                output.push_str(&self.metric_grid(metric).ascii());
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');
        output
    }

    /// Period view as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = format!("# {}\n\n", self.title);
        output.push_str(&format!(
            "**Base:** {} | **Entities:** {}\n\n",
            self.table.base(),
            self.table.entities().join(", ")
        ));

        if self.table.is_empty() {
            output.push_str("No periods matched the selection.\n");
            return output;
        }
        for &metric in self.table.metrics() {
            output.push_str(&format!("## {}\n\n", self.metric_label(metric)));
            output.push_str(&self.metric_grid(metric).markdown());
            output.push('\n');
        }
        output
    }

    /// Single-period view as an ASCII table.
    pub fn snapshot_ascii(&self, period: Period) -> String {
        let mut output = format!("\n{} ({period})\n", self.title);
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&self.snapshot_grid(period).ascii());
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output
    }

    /// Single-period view as Markdown.
    pub fn snapshot_markdown(&self, period: Period) -> String {
        let mut output = format!("# Summary of {period} Metrics\n\n");
        output.push_str(&self.snapshot_grid(period).markdown());
        output
    }
}
