//! End-to-end tests of the single-server queueing system.

use dessim::{
    Config, Error, MemorySink, MultiStream, NullSink, QueueingConfig, QueueingSystem, StreamId,
    UnitSource,
};

use float_cmp::approx_eq;

fn mm1_config() -> QueueingConfig {
    let config = r#"{
        "system": "queueing",
        "interarrival_mean": 1.0,
        "service_mean": 0.5,
        "target_delays": 1000
    }"#;
    match serde_json::from_str(config).unwrap() {
        Config::Queueing(config) => config,
        Config::Inventory(_) => panic!("wrong system"),
    }
}

#[test]
fn test_mm1_terminates_at_exactly_the_delay_target() {
    let mut streams = MultiStream::new();
    let mut sink = MemorySink::new();
    let report = QueueingSystem::new(&mm1_config())
        .unwrap()
        .run(&mut streams, &mut sink)
        .unwrap();

    assert_eq!(report.customers_delayed, 1000);
    assert_eq!(report.arrivals, 1000);
    assert_eq!(report.departures, 999);
    assert!(report.mean_delay >= 0.0);
    assert_eq!(sink.records().len(), 1999);
}

#[test]
fn test_mm1_reproduces_reference_statistics() {
    let mut streams = MultiStream::new();
    let report = QueueingSystem::new(&mm1_config())
        .unwrap()
        .run(&mut streams, &mut NullSink)
        .unwrap();

    assert!(approx_eq!(
        f64,
        report.mean_delay,
        0.524_871_251_084_267_9,
        epsilon = 1e-6
    ));
    assert!(approx_eq!(
        f64,
        report.mean_queue_length,
        0.540_075_773_765_208_7,
        epsilon = 1e-6
    ));
    assert!(approx_eq!(
        f64,
        report.utilization,
        0.510_692_708_529_869_6,
        epsilon = 1e-6
    ));
    assert!(approx_eq!(
        f64,
        report.end_time,
        971.847_426_936_149_2,
        epsilon = 1e-6
    ));
}

#[test]
fn test_repeated_runs_are_identical() {
    let first = QueueingSystem::new(&mm1_config())
        .unwrap()
        .run(&mut MultiStream::new(), &mut NullSink)
        .unwrap();
    let second = QueueingSystem::new(&mm1_config())
        .unwrap()
        .run(&mut MultiStream::new(), &mut NullSink)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_clock_never_rewinds() {
    let mut streams = MultiStream::new();
    let mut sink = MemorySink::new();
    QueueingSystem::new(&mm1_config())
        .unwrap()
        .run(&mut streams, &mut sink)
        .unwrap();
    let records = sink.records();
    assert!(records
        .windows(2)
        .all(|pair| pair[0].clock <= pair[1].clock));
    assert!(records
        .windows(2)
        .all(|pair| pair[0].index + 1 == pair[1].index));
}

#[test]
fn test_untouched_streams_are_not_perturbed() {
    // The queueing run consumes streams 1 and 2; stream 5 must still be at
    // its initial seed afterwards.
    let mut streams = MultiStream::new();
    QueueingSystem::new(&mm1_config())
        .unwrap()
        .run(&mut streams, &mut NullSink)
        .unwrap();

    let mut fresh = MultiStream::new();
    let untouched = StreamId::from(5);
    assert_eq!(streams.seed(untouched), fresh.seed(untouched));
    for _ in 0..3 {
        assert_eq!(streams.unit(untouched), fresh.unit(untouched));
    }
}

#[test]
fn test_arbitrary_rng_still_satisfies_the_invariants() {
    use rand::SeedableRng;
    use testing::RngSource;

    let mut source = RngSource(rand::rngs::StdRng::seed_from_u64(17));
    let report = QueueingSystem::new(&mm1_config())
        .unwrap()
        .run(&mut source, &mut NullSink)
        .unwrap();
    assert_eq!(report.customers_delayed, 1000);
    assert!(report.mean_delay >= 0.0);
    assert!(report.utilization > 0.0 && report.utilization < 1.0);
    assert!(report.end_time > 0.0);
}

#[test]
fn test_overfull_queue_fails_the_run() {
    let mut config = mm1_config();
    config.capacity = Some(2);
    config.service_mean = 1_000_000.0;
    let result = QueueingSystem::new(&config)
        .unwrap()
        .run(&mut MultiStream::new(), &mut NullSink);
    assert!(matches!(
        result,
        Err(Error::CapacityExceeded { capacity: 2, .. })
    ));
}

#[test]
fn test_event_budget_fails_the_run() {
    let mut config = mm1_config();
    config.max_events = 100;
    let result = QueueingSystem::new(&config)
        .unwrap()
        .run(&mut MultiStream::new(), &mut NullSink);
    assert_eq!(result, Err(Error::EventLimitExceeded(100)));
}
