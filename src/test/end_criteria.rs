use crate::error::InputError;
use crate::sim::EndCriteria;

fn segment_of(err: InputError) -> String {
    match err {
        InputError::EndCriteria { segment, .. } => segment,
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn parses_all_kinds_and_skips_empty_segments() {
    let parsed = EndCriteria::parse_all(" MaxArrivals:Queue,100 ;; MaxDepartures: Sink , 7; MaxTime:50.5;")
        .expect("parse");
    assert_eq!(
        parsed,
        vec![
            EndCriteria::MaxArrivals {
                node: "Queue".to_string(),
                count: 100
            },
            EndCriteria::MaxDepartures {
                node: "Sink".to_string(),
                count: 7
            },
            EndCriteria::MaxTime { time: 50.5 },
        ]
    );
    assert!(EndCriteria::parse_all("").expect("empty").is_empty());
}

#[test]
fn join_is_inverse_of_parse_all() {
    let criteria = vec![
        EndCriteria::MaxTime { time: 1000.0 },
        EndCriteria::MaxArrivals {
            node: "Service2".to_string(),
            count: 42,
        },
    ];
    let text = EndCriteria::join(&criteria);
    assert_eq!(text, "MaxTime:1000;MaxArrivals:Service2,42");
    assert_eq!(EndCriteria::parse_all(&text).expect("parse"), criteria);
}

#[test]
fn malformed_segment_is_reported_by_itself() {
    let err = EndCriteria::parse_all("MaxTime:10;MaxArrivals:Queue;MaxTime:20").expect_err("bad");
    assert_eq!(segment_of(err), "MaxArrivals:Queue");
}

#[test]
fn rejects_each_kind_of_mistake() {
    for bad in [
        "MaxArrivals",
        "MinArrivals:Queue,3",
        "MaxArrivals:Queue,-1",
        "MaxArrivals:,5",
        "MaxDepartures:Queue,ten",
        "MaxDepartures:Queue,1,2",
        "MaxTime:abc",
        "MaxTime:-3",
        "MaxTime:inf",
        "MaxTime:1,2",
    ] {
        let err = bad.parse::<EndCriteria>().expect_err(bad);
        assert_eq!(segment_of(err), bad);
    }
}

#[test]
fn error_message_names_the_token() {
    let err = "MaxDepartures:Queue,ten".parse::<EndCriteria>().expect_err("bad count");
    let msg = err.to_string();
    assert!(msg.contains("'ten'"), "message: {msg}");
    assert!(msg.contains("MaxDepartures:Queue,ten"), "message: {msg}");
}
