use crate::rng::{self, A256, DEFAULT_SEED, MODULUS, Rng};

#[test]
fn lehmer_from_seed_one_reaches_known_state_after_10000_draws() {
    let mut r = Rng::new(1);
    for _ in 0..10_000 {
        r.random();
    }
    assert_eq!(r.seed(), 399_268_537);
}

#[test]
fn random_stays_strictly_inside_unit_interval() {
    let mut r = Rng::new(DEFAULT_SEED);
    for _ in 0..100_000 {
        let u = r.random();
        assert!(u > 0.0 && u < 1.0, "u = {u}");
    }
}

#[test]
fn seed_is_reduced_into_valid_range() {
    assert_eq!(Rng::new(0).seed(), 1);
    assert_eq!(Rng::new(MODULUS as u64).seed(), 1);
    assert_eq!(Rng::new(MODULUS as u64 + 5).seed(), 5);
    assert_eq!(Rng::default().seed(), DEFAULT_SEED);
}

#[test]
fn stream_zero_is_the_top_level_seed_and_next_uses_jump_multiplier() {
    let s = rng::streams(12_345, 2);
    assert_eq!(s[0].seed(), 12_345);
    assert_eq!(s[1].seed(), (12_345_u64 * A256 as u64) % MODULUS as u64);
}

#[test]
fn stream_k_does_not_depend_on_stream_count() {
    let few = rng::streams(DEFAULT_SEED, 10);
    let many = rng::streams(DEFAULT_SEED, 1000);
    assert_eq!(few[3], many[3]);
    assert_eq!(few[9], many[9]);
    assert_eq!(rng::stream(DEFAULT_SEED, 3), few[3]);
    assert_eq!(rng::stream(DEFAULT_SEED, 700), many[700]);
}

#[test]
fn different_streams_produce_different_sequences() {
    let mut s = rng::streams(DEFAULT_SEED, 4);
    let firsts: Vec<f64> = s.iter_mut().map(Rng::random).collect();
    for i in 0..firsts.len() {
        for j in (i + 1)..firsts.len() {
            assert_ne!(firsts[i], firsts[j]);
        }
    }
}

#[test]
fn stream_range_continues_the_same_chain() {
    let all = rng::streams(DEFAULT_SEED, 12);
    assert_eq!(rng::stream_range(DEFAULT_SEED, 5..12), all[5..].to_vec());
    assert_eq!(rng::stream_range(DEFAULT_SEED, 0..3), all[..3].to_vec());
    assert!(rng::stream_range(DEFAULT_SEED, 4..4).is_empty());
    assert_eq!(rng::stream_range(DEFAULT_SEED, 300..301)[0], rng::stream(DEFAULT_SEED, 300));
}
