use std::time::Duration;

use crate::demo::build_two_node;
use crate::error::StatsError;
use crate::rng::DEFAULT_SEED;
use crate::runner::Runner;
use crate::sim::{NodeStats, RunResult};
use crate::stats::{
    AggregateResult, ConfidenceIndices, ResultSummary, STAT_COUNT, Stat, Summary, inv_norm_cdf,
    t_cdf, t_critical, t_quantile,
};

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

fn sample_runs(n: usize) -> Vec<RunResult> {
    Runner::new(build_two_node(500).expect("net"))
        .run_results(DEFAULT_SEED, n, &[], false)
        .expect("runs")
}

#[test]
fn student_t_quantiles_match_tables() {
    let cases = [
        (0.975, 1.0, 12.706_204_7),
        (0.975, 9.0, 2.262_157_2),
        (0.975, 30.0, 2.042_272_5),
        (0.95, 4.0, 2.131_846_8),
        (0.995, 2.0, 9.924_843_2),
    ];
    for (p, df, want) in cases {
        let got = t_quantile(p, df);
        assert!(close(got, want, 1e-6), "t({p}, {df}) = {got}, want {want}");
        assert!(close(t_cdf(got, df), p, 1e-9));
    }
    assert!(close(t_critical(0.95, 4.0), 2.776_445_1, 1e-6));
    assert!(close(t_quantile(0.025, 9.0), -2.262_157_2, 1e-6));
    assert_eq!(t_quantile(0.5, 3.0), 0.0);
    assert!(close(inv_norm_cdf(0.975), 1.959_964, 1e-6));
    assert!(close(inv_norm_cdf(0.001), -3.090_232_3, 1e-6));
}

#[test]
fn summary_of_small_sample() {
    let mut s = Summary::new();
    for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
        s.add(x);
    }
    assert_eq!(s.count(), 5);
    assert_eq!(s.mean(), 3.0);
    assert!(close(s.variance(), 2.5, 1e-12));
    assert_eq!(s.min(), 1.0);
    assert_eq!(s.max(), 5.0);
    let e = s.error(0.95).expect("error");
    assert!(close(e, 1.963_243, 1e-6), "error {e}");
    let (lo, hi) = s.bounds(0.95).expect("bounds");
    assert!(lo < s.mean() && s.mean() < hi);
    assert!(close(s.relative_error(0.95).expect("rel"), e / 3.0, 1e-12));
}

#[test]
fn summary_needs_two_samples_and_valid_confidence() {
    let mut s = Summary::new();
    assert_eq!(s.error(0.95), Err(StatsError::NotEnoughRuns(0)));
    s.add(4.0);
    assert_eq!(s.variance(), 0.0);
    assert_eq!(s.error(0.95), Err(StatsError::NotEnoughRuns(1)));
    s.add(6.0);
    assert_eq!(s.error(1.0), Err(StatsError::InvalidConfidence(1.0)));
    assert_eq!(s.error(0.0), Err(StatsError::InvalidConfidence(0.0)));
}

#[test]
fn zero_mean_relative_error() {
    let mut s = Summary::new();
    s.add(0.0);
    s.add(0.0);
    assert_eq!(s.relative_error(0.95).expect("rel"), 0.0);

    let mut spread = Summary::new();
    spread.add(2.0);
    spread.add(-2.0);
    assert_eq!(spread.mean(), 0.0);
    assert_eq!(spread.relative_error(0.95).expect("rel"), f64::INFINITY);
}

#[test]
fn incremental_and_batch_aggregates_agree() {
    let runs = sample_runs(6);
    let batch = AggregateResult::from_runs(&runs, 0.9).expect("batch");
    let mut summary = ResultSummary::new();
    for r in &runs {
        summary.add(r);
    }
    let online = summary.aggregate(0.9).expect("online");

    assert_eq!(batch.runs, online.runs);
    assert_eq!(summary.wall_clock(), runs.iter().map(|r| r.elapsed).sum::<Duration>());
    assert!(close(batch.average.time, online.average.time, 1e-9));
    for (b, o) in batch.average.nodes.iter().zip(&online.average.nodes) {
        assert_eq!(b.name, o.name);
    }
    for name in ["Source", "Queue"] {
        for stat in Stat::ALL {
            let bm = batch.mean(name, stat).expect("mean");
            let om = online.mean(name, stat).expect("mean");
            assert!(close(bm, om, 1e-9), "{name}.{stat}: {bm} vs {om}");
            let bs = batch.std_dev(name, stat).expect("sd");
            let os = online.std_dev(name, stat).expect("sd");
            assert!(close(bs, os, 1e-6), "{name}.{stat}: {bs} vs {os}");
        }
    }
}

#[test]
fn aggregate_bounds_contain_mean_and_elapsed_is_zero() {
    let runs = sample_runs(4);
    let agg = AggregateResult::from_runs(&runs, 0.95).expect("agg");
    assert_eq!(agg.runs, 4);
    assert!(agg.average.elapsed.is_zero());
    assert!(agg.error.elapsed.is_zero());
    let (lo, hi) = agg.bounds("Queue", Stat::AvgResponse).expect("bounds");
    let m = agg.mean("Queue", Stat::AvgResponse).expect("mean");
    assert!(lo <= m && m <= hi);
    assert!(hi > lo);
    assert_eq!(agg.mean("Source", Stat::AvgQueueLength).expect("mean"), 1.0);
    assert_eq!(agg.std_dev("Source", Stat::AvgQueueLength).expect("sd"), 0.0);
    assert_eq!(
        agg.mean("Nowhere", Stat::AvgResponse),
        Err(StatsError::UnknownNode("Nowhere".to_string()))
    );
}

#[test]
fn aggregate_needs_two_runs() {
    let runs = sample_runs(1);
    assert_eq!(
        AggregateResult::from_runs(&runs, 0.95).err(),
        Some(StatsError::NotEnoughRuns(1))
    );
    let mut summary = ResultSummary::new();
    summary.add(&runs[0]);
    assert_eq!(summary.aggregate(0.95).err(), Some(StatsError::NotEnoughRuns(1)));
    assert_eq!(
        AggregateResult::from_runs(&[], 0.95).err(),
        Some(StatsError::NotEnoughRuns(0))
    );
}

#[test]
fn stat_names_round_trip_and_unknown_is_error() {
    assert_eq!(Stat::ALL.len(), STAT_COUNT);
    for (i, stat) in Stat::ALL.into_iter().enumerate() {
        assert_eq!(stat.index(), i);
        assert_eq!(stat.name().parse::<Stat>(), Ok(stat));
        assert_eq!(stat.to_string(), stat.name());
    }
    assert_eq!(Stat::ALL[0].name(), "num_arrivals");
    assert_eq!(Stat::ALL[STAT_COUNT - 1].name(), "avg_response");
    assert_eq!(
        "mean_queue".parse::<Stat>(),
        Err(StatsError::UnknownStat("mean_queue".to_string()))
    );
}

#[test]
fn stat_values_follow_fixed_order() {
    let mut s = NodeStats::default();
    for (i, stat) in Stat::ALL.into_iter().enumerate() {
        stat.set(&mut s, i as f64 + 0.5);
    }
    let values = Stat::values(&s);
    assert_eq!(values[2], s.avg_queue_length);
    assert_eq!(values[13], s.avg_response);
    assert_eq!(Stat::from_values(&values), s);
}

#[test]
fn confidence_targets_validate_and_report() {
    let mut targets = ConfidenceIndices::new();
    assert_eq!(
        targets.add("Queue", Stat::AvgResponse, 1.5, 0.05).err(),
        Some(StatsError::InvalidConfidence(1.5))
    );
    assert!(targets.is_empty());
    targets
        .add("Queue", Stat::AvgResponse, 0.95, 0.05)
        .expect("target")
        .add("Source", Stat::Throughput, 0.9, 1.0)
        .expect("target");
    assert_eq!(targets.targets().len(), 2);

    let runs = sample_runs(3);
    let mut summary = ResultSummary::new();
    assert!(!targets.is_satisfied(&summary).expect("empty summary"));
    summary.add(&runs[0]);
    assert_eq!(targets.relative_errors(&summary).expect("errors"), vec![None, None]);
    assert!(!targets.is_satisfied(&summary).expect("one run"));
    summary.add(&runs[1]);
    summary.add(&runs[2]);
    let errors = targets.relative_errors(&summary).expect("errors");
    assert!(errors.iter().all(Option::is_some));

    let mut unknown = ConfidenceIndices::new();
    unknown
        .add("Ghost", Stat::AvgResponse, 0.95, 0.05)
        .expect("target");
    assert_eq!(
        unknown.is_satisfied(&summary),
        Err(StatsError::UnknownNode("Ghost".to_string()))
    );
}
