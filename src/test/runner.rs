use crate::demo::{build_three_node, build_two_node};
use crate::dist::Distribution;
use crate::error::{ConfigError, SimError, StatsError};
use crate::net::{Net, NodeConfig};
use crate::rng::{self, DEFAULT_SEED};
use crate::runner::Runner;
use crate::sim::{EndCriteria, RunResult, Simulator};
use crate::stats::{ConfidenceIndices, ResultSummary, Stat};
use std::time::Duration;

fn same_outcome(a: &RunResult, b: &RunResult) {
    assert_eq!(a.seed, b.seed);
    assert_eq!(a.time, b.time);
    assert_eq!(a.nodes, b.nodes);
}

#[test]
fn run_i_uses_stream_i() {
    let net = build_two_node(300).expect("net");
    let runner = Runner::new(net.clone());
    let results = runner.run_results(DEFAULT_SEED, 3, &[], false).expect("runs");
    assert_eq!(results.len(), 3);
    for (i, r) in results.iter().enumerate() {
        let direct = Simulator::new(&net, rng::stream(DEFAULT_SEED, i), &[])
            .expect("sim")
            .run()
            .expect("run");
        same_outcome(r, &direct);
    }
    assert_ne!(results[0].time, results[1].time);
}

#[test]
fn run_outcome_does_not_depend_on_batch_size() {
    let runner = Runner::new(build_three_node(300).expect("net"));
    let small = runner.run_results(DEFAULT_SEED, 3, &[], false).expect("small");
    let large = runner.run_results(DEFAULT_SEED, 6, &[], false).expect("large");
    for i in 0..3 {
        same_outcome(&small[i], &large[i]);
    }
}

#[test]
fn parallel_matches_sequential() {
    let runner = Runner::new(build_two_node(1_000).expect("net"));
    let seq = runner.run(DEFAULT_SEED, 6, &[]).expect("sequential");
    let par = runner.run_parallel(DEFAULT_SEED, 6, &[]).expect("parallel");
    assert_eq!(seq, par);

    let a = runner.run_results(99, 5, &[], false).expect("seq raw");
    let b = runner.run_results(99, 5, &[], true).expect("par raw");
    for (x, y) in a.iter().zip(&b) {
        same_outcome(x, y);
    }
}

#[test]
fn confidence_level_is_carried_into_aggregate() {
    let runner = Runner::new(build_two_node(200).expect("net")).with_confidence(0.9);
    let agg = runner.run(DEFAULT_SEED, 3, &[]).expect("agg");
    assert_eq!(agg.confidence, 0.9);
    assert_eq!(runner.net().len(), 2);
}

#[test]
fn fewer_than_two_runs_is_rejected() {
    let runner = Runner::new(build_two_node(100).expect("net"));
    let err = runner.run(DEFAULT_SEED, 1, &[]).expect_err("one run");
    assert!(matches!(err, SimError::Stats(StatsError::NotEnoughRuns(1))));
}

#[test]
fn configuration_error_precedes_any_run() {
    let mut net = Net::new();
    net.add_node(NodeConfig::source("Gen", Distribution::exponential(1.0)))
        .expect("gen");
    let runner = Runner::new(net);
    for parallel in [false, true] {
        let err = runner
            .run_results(DEFAULT_SEED, 4, &[], parallel)
            .expect_err("no termination");
        assert!(matches!(
            err,
            SimError::Config(ConfigError::NoTermination(_))
        ));
    }
}

#[test]
fn failing_run_aborts_the_batch() {
    let mut net = Net::new();
    net.add_node(NodeConfig::limited_source(
        "Source",
        Distribution::exponential(1.0),
        3,
    ))
    .expect("source");
    net.add_node(NodeConfig::queue("Bad", 1, Distribution::uniform(-2.0, -1.0)))
        .expect("bad");
    net.connect("Source", "Bad", 1.0).expect("connect");
    let runner = Runner::new(net);

    for parallel in [false, true] {
        let err = runner
            .run_results(DEFAULT_SEED, 4, &[], parallel)
            .expect_err("must fail");
        match err {
            SimError::RunFailed { source, .. } => {
                assert!(matches!(*source, SimError::NonPositiveSample { ref node, .. } if node == "Bad"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn end_criteria_apply_to_every_run() {
    let mut net = Net::new();
    net.add_node(NodeConfig::source("Source", Distribution::exponential(1.0)))
        .expect("source");
    net.add_node(NodeConfig::queue("Queue", 2, Distribution::exponential(0.8)))
        .expect("queue");
    net.connect("Source", "Queue", 1.0).expect("connect");
    let criteria = EndCriteria::parse_all("MaxDepartures:Queue,50").expect("criteria");
    let results = Runner::new(net)
        .run_results(DEFAULT_SEED, 3, &criteria, true)
        .expect("runs");
    for r in results {
        assert_eq!(r.node("Queue").expect("Queue").num_departures, 50.0);
    }
}

#[test]
fn early_stopping_reaches_target() {
    let runner = Runner::new(build_two_node(2_000).expect("net"));
    let mut targets = ConfidenceIndices::new();
    targets
        .add("Queue", Stat::AvgResponse, 0.95, 0.05)
        .expect("target");

    let one = runner
        .run_until_confident(DEFAULT_SEED, &[], &targets, 1, 1, false)
        .expect("one run");
    assert_eq!(one.summary.runs(), 1);
    assert!(!one.satisfied);

    let done = runner
        .run_until_confident(DEFAULT_SEED, &[], &targets, 2, 40, true)
        .expect("confident");
    assert!(done.satisfied);
    assert!((2..=40).contains(&done.summary.runs()));
    let rel = done
        .summary
        .get("Queue", Stat::AvgResponse)
        .expect("summary")
        .relative_error(0.95)
        .expect("relative error");
    assert!(rel <= 0.05, "relative error {rel}");
}

#[test]
fn early_stopping_gives_up_at_max_runs() {
    let runner = Runner::new(build_two_node(200).expect("net"));
    let mut targets = ConfidenceIndices::new();
    targets
        .add("Queue", Stat::AvgResponse, 0.99, 1e-9)
        .expect("target");
    let out = runner
        .run_until_confident(DEFAULT_SEED, &[], &targets, 3, 7, false)
        .expect("run");
    assert!(!out.satisfied);
    assert_eq!(out.summary.runs(), 7);

    // 分批取子流与一次取完结果相同
    let mut whole = ResultSummary::new();
    let results = runner
        .run_results(DEFAULT_SEED, 7, &[], false)
        .expect("runs");
    for r in &results {
        whole.add(r);
    }
    assert_eq!(
        out.summary.aggregate(0.95).expect("batched"),
        whole.aggregate(0.95).expect("whole")
    );
    let total: Duration = results.iter().map(|r| r.elapsed).sum();
    assert_eq!(whole.wall_clock(), total);
}

#[test]
fn confidence_targets_reject_bad_thresholds() {
    let mut targets = ConfidenceIndices::new();
    for bad in [-0.01, f64::NAN] {
        assert!(matches!(
            targets.add("Queue", Stat::AvgResponse, 0.95, bad),
            Err(StatsError::InvalidRelativeError(_))
        ));
    }
    assert!(targets.is_empty());
    targets
        .add("Queue", Stat::AvgResponse, 0.95, 0.0)
        .expect("zero threshold");
    assert_eq!(targets.targets().len(), 1);
}
