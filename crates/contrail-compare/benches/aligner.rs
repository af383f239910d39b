//! Aligner throughput over a synthetic quarterly dataset.

use contrail_compare::{Selection, align};
use contrail_metrics::{
    Dataset, Metric, MetricDeriver, MetricGroup, Observation, Partition, PartitionData, Quarter,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CARRIERS: [&str; 8] = ["AAL", "DAL", "UAL", "ALK", "LUV", "JBLU", "HA", "SAVE"];

fn synthetic(years: i32) -> PartitionData {
    let mut rng = StdRng::seed_from_u64(7);
    let mut observations = Vec::new();

    for carrier in CARRIERS {
        for year in 2000..2000 + years {
            for quarter in Quarter::QUARTERS {
                // Leave gaps so reindexing has work to do
                if rng.gen_bool(0.1) {
                    continue;
                }
                let revenue = rng.gen_range(1.0e9..15.0e9);
                let asm = rng.gen_range(20.0e9..70.0e9);
                observations.push(
                    Observation::new(carrier, year, quarter)
                        .with(Metric::TotalRevenue, revenue)
                        .with(Metric::PassengerRevenue, revenue * rng.gen_range(0.8..0.95))
                        .with(Metric::TotalExpenses, revenue * rng.gen_range(0.85..1.05))
                        .with(Metric::NetIncome, revenue * rng.gen_range(-0.1..0.1))
                        .with(Metric::Rpm, asm * rng.gen_range(0.7..0.9))
                        .with(Metric::Asm, asm),
                );
            }
        }
    }

    let dataset = Dataset::new(observations).unwrap_or_default();
    MetricDeriver::new()
        .derive(&dataset)
        .partition(Partition::Quarterly)
}

fn bench_align(c: &mut Criterion) {
    let data = synthetic(20);
    let years: Vec<i32> = data.years();

    let selection = Selection::builder()
        .entities(data.entities())
        .base("AAL")
        .years(years)
        .quarters(Quarter::QUARTERS)
        .metric_group(MetricGroup::All, &data)
        .build();
    let Ok(selection) = selection else {
        return;
    };

    c.bench_function("align_all_metrics", |b| {
        b.iter(|| {
            let table = align(black_box(&data), black_box(&selection));
            black_box(table.map(|t| t.len()).unwrap_or_default())
        })
    });

    c.bench_function("align_latest", |b| {
        b.iter(|| {
            let latest = Selection::latest(black_box(&data), "AAL");
            let table = latest.and_then(|s| align(&data, &s));
            black_box(table.map(|t| t.len()).unwrap_or_default())
        })
    });
}

criterion_group!(benches, bench_align);
criterion_main!(benches);
