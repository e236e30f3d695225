use byte_bloom::{BloomError, BloomFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_element(rng: &mut StdRng, tag: u8) -> Vec<u8> {
    let mut data = vec![0u8; 30];
    rng.fill(&mut data[..]);
    data[0] = tag;
    data
}

#[test]
fn test_add_to_filter() {
    let mut filter = BloomFilter::new(0.1, 10_000).unwrap();
    assert!(filter.add(b"rhinof is on the moo").is_ok());
    assert_eq!(filter.len(), 1);
}

#[test]
fn test_not_in_filter_returns_false() {
    let mut filter = BloomFilter::new(0.01, 10_000).unwrap();
    filter.add(b"A").unwrap();

    assert!(!filter.test(b"B").unwrap());
    for control in [&b"C"[..], b"AA", b"", b"a"] {
        assert!(!filter.test(control).unwrap());
    }
}

#[test]
fn test_data_is_in_filter_returns_true() {
    let mut filter = BloomFilter::new(0.1, 1_000_000).unwrap();
    filter.add(b"rhinof is on the moo").unwrap();
    assert!(filter.test(b"rhinof is on the moo").unwrap());
}

#[test]
fn test_no_false_negatives() {
    let mut filter = BloomFilter::new(0.01, 20_000).unwrap();
    let elements: Vec<Vec<u8>> = (0..20_000u32)
        .map(|i| format!("element-{}", i).into_bytes())
        .collect();

    for element in &elements {
        filter.add(element).unwrap();
    }
    for element in &elements {
        assert!(filter.test(element).unwrap());
    }
}

#[test]
fn test_sizing_bounds() {
    let filter = BloomFilter::new(0.1, 10_000).unwrap();
    assert!(filter.num_bits() > 0);
    assert!(filter.num_hashes() > 0);
    assert!(filter.estimated_false_positive_rate().is_finite());
}

#[test]
fn test_estimated_fpr_stays_below_target_at_half_load() {
    let n = 100_000;
    let p = 0.01;
    let mut filter = BloomFilter::new(p, n).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..n / 2 {
        filter.add(&random_element(&mut rng, b'i')).unwrap();
        assert!(filter.estimated_false_positive_rate() <= p);
    }
}

#[test]
fn test_pofp_in_range() {
    let n = 100_000;
    let p = 0.01;
    let mut filter = BloomFilter::new(p, n).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let mut inserted = 0usize;

    while filter.estimated_false_positive_rate() <= p {
        filter.add(&random_element(&mut rng, b'i')).unwrap();
        inserted += 1;
    }

    assert!(
        inserted as f64 >= n as f64 * 0.9,
        "estimate crossed the target after only {} insertions",
        inserted
    );
}

#[test]
fn test_observed_false_positive_rate() {
    let n = 10_000;
    let mut filter = BloomFilter::new(0.01, n).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..n {
        filter.add(&random_element(&mut rng, b'i')).unwrap();
    }

    let false_positives = (0..n)
        .filter(|_| filter.test(&random_element(&mut rng, b'c')).unwrap())
        .count();
    let observed = false_positives as f64 / n as f64;
    assert!(observed < 0.03, "observed false positive rate {}", observed);
}

#[test]
fn test_serialization_round_trip() {
    let mut filter = BloomFilter::new(0.01, 10_000).unwrap();
    let inserted = [&b"one"[..], b"two", b"three", b"rhinof is on the moo"];
    for element in inserted {
        filter.add(element).unwrap();
    }

    let restored = BloomFilter::deserialize(&filter.serialize()).unwrap();

    for element in inserted {
        assert!(restored.test(element).unwrap());
    }
    assert!(!restored.test(b"shama is the king").unwrap());
    assert_eq!(restored.test(b"zzz").unwrap(), filter.test(b"zzz").unwrap());
    assert_eq!(restored.len(), filter.len());
    assert_eq!(
        restored.estimated_false_positive_rate(),
        filter.estimated_false_positive_rate()
    );
}

#[test]
fn test_round_trip_keeps_accepting_adds() {
    let mut filter = BloomFilter::new(0.01, 1_000).unwrap();
    filter.add(b"before").unwrap();

    let mut restored = BloomFilter::deserialize(&filter.serialize()).unwrap();
    filter.add(b"after").unwrap();
    restored.add(b"after").unwrap();

    assert_eq!(restored, filter);
    assert_eq!(restored.serialize(), filter.serialize());
}

#[test]
fn test_stream_round_trip() {
    let mut filter = BloomFilter::new(0.05, 500).unwrap();
    filter.add_reader(&b"from a reader"[..]).unwrap();

    let mut buf = Vec::new();
    filter.write_to(&mut buf).unwrap();
    let restored = BloomFilter::read_from(&buf[..]).unwrap();

    assert!(restored.test(b"from a reader").unwrap());
}

#[test]
fn test_idempotent_bit_setting() {
    let mut once = BloomFilter::new(0.01, 1_000).unwrap();
    let mut twice = BloomFilter::new(0.01, 1_000).unwrap();

    once.add(b"same").unwrap();
    twice.add(b"same").unwrap();
    twice.add(b"same").unwrap();

    assert_eq!(once.test(b"same").unwrap(), twice.test(b"same").unwrap());
    assert_eq!(once.load_factor(), twice.load_factor());
    assert_eq!(once.len(), 1);
    assert_eq!(twice.len(), 2);
}

#[test]
fn test_allocation_failure_path() {
    match BloomFilter::new(0.01, usize::MAX) {
        Err(BloomError::Allocation(msg)) => assert!(msg.contains("false positive rate")),
        other => panic!("expected allocation error, got {:?}", other.map(|f| f.num_bits())),
    }

    assert!(matches!(
        BloomFilter::new(1e-300, usize::MAX / 2),
        Err(BloomError::Allocation(_))
    ));
}

#[test]
fn test_malformed_input_is_decode_error() {
    assert!(matches!(
        BloomFilter::deserialize(&[]),
        Err(BloomError::Decode(_))
    ));
    assert!(matches!(
        BloomFilter::deserialize(b"definitely not a bloom filter"),
        Err(BloomError::Decode(_))
    ));
}
