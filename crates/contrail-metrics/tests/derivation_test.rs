//! Integration tests for metric derivation and partitioning

use approx::assert_relative_eq;
use contrail_metrics::{
    Dataset, Metric, MetricDeriver, MetricGroup, Observation, Partition, Period, Quarter,
};

fn dataset() -> Dataset {
    Dataset::new(vec![
        Observation::new("AAL", 2023, Quarter::FullYear)
            .with(Metric::TotalRevenue, 100.0)
            .with(Metric::NetIncome, 10.0),
        Observation::new("UAL", 2023, Quarter::FullYear)
            .with(Metric::TotalRevenue, 200.0)
            .with(Metric::NetIncome, 30.0),
        Observation::new("AAL", 2023, Quarter::Q1)
            .with(Metric::TotalRevenue, 25.0),
        Observation::new("AAL", 2023, Quarter::Q2)
            .with(Metric::TotalRevenue, 30.0)
            .with(Metric::NetIncome, 3.0),
    ])
    .unwrap()
}

#[test]
fn test_net_margin_from_reported_values() {
    let derived = MetricDeriver::new().derive(&dataset());
    let full_year = derived.partition(Partition::FullYear);
    let period = Period::full_year(2023);

    let aal = full_year.get("AAL", period).unwrap();
    let ual = full_year.get("UAL", period).unwrap();
    assert_relative_eq!(aal.value(Metric::NetMargin).unwrap(), 10.0);
    assert_relative_eq!(ual.value(Metric::NetMargin).unwrap(), 15.0);
}

#[test]
fn test_partitions_are_disjoint() {
    let derived = MetricDeriver::new().derive(&dataset());
    let (full_year, quarterly) = derived.split();

    assert_eq!(full_year.len() + quarterly.len(), derived.len());
    assert!(
        full_year
            .observations()
            .iter()
            .all(|obs| obs.quarter() == Quarter::FullYear)
    );
    assert!(
        quarterly
            .observations()
            .iter()
            .all(|obs| obs.quarter() != Quarter::FullYear)
    );
    assert_eq!(full_year.entities(), ["AAL", "UAL"]);
    assert_eq!(quarterly.entities(), ["AAL"]);
}

#[test]
fn test_missing_input_in_one_period_only() {
    let derived = MetricDeriver::new().derive(&dataset());
    let quarterly = derived.partition(Partition::Quarterly);

    let q1 = quarterly.get("AAL", Period::new(2023, Quarter::Q1)).unwrap();
    let q2 = quarterly.get("AAL", Period::new(2023, Quarter::Q2)).unwrap();
    assert_eq!(q1.value(Metric::NetMargin), None);
    assert_relative_eq!(q2.value(Metric::NetMargin).unwrap(), 10.0);
    assert_eq!(quarterly.latest_period(), Some(Period::new(2023, Quarter::Q2)));
}

#[test]
fn test_available_metrics_follow_registry_order() {
    let derived = MetricDeriver::new().derive(&dataset());
    let full_year = derived.partition(Partition::FullYear);

    assert_eq!(
        full_year.available_metrics(),
        [Metric::TotalRevenue, Metric::NetIncome, Metric::NetMargin]
    );
}

#[test]
fn test_earnings_group_members() {
    let members = MetricGroup::Earnings.members().unwrap();
    assert!(members.contains(&Metric::NetMargin));
    assert!(!members.contains(&Metric::Casm));
    assert!(MetricGroup::All.members().is_none());
}
