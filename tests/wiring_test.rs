use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use lattice_snn::core::population::Population;
use lattice_snn::core::space::{Position, Space};
use lattice_snn::error::SNNError;
use lattice_snn::sampler::connector::{connect, LatticeConnector, WiringRequest};

fn random_population(label: &str, first_id: usize, size: usize, rng: &mut StdRng) -> Population {
    let positions = (0..size)
        .map(|_| {
            Position::new(
                rng.gen_range(0.0..8.0),
                rng.gen_range(0.0..8.0),
                rng.gen_range(0.0..8.0),
            )
        })
        .collect();
    Population::contiguous(label, first_id, positions).unwrap()
}

fn lattice_request(n: i64) -> WiringRequest {
    WiringRequest {
        weight: 0.002,
        distance_factor: 0.25,
        noise_factor: 0.2,
        n,
        lim_delays: (0.1, 2.0),
    }
}

#[test]
fn test_wiring_count_and_delay_range() {
    let mut rng = StdRng::seed_from_u64(42);
    let targets = random_population("post", 0, 40, &mut rng);
    let sources = random_population("pre", 100, 60, &mut rng);

    let wiring = connect(&targets, &sources, lattice_request(25), 12345).unwrap();
    assert_eq!(wiring.connections.len(), 25 * 40);
    assert!(wiring
        .connections
        .iter()
        .all(|c| c.delay >= 0.1 && c.delay <= 2.0 && c.weight == 0.002));

    // with delays capped at 2 ms, distant pairs are clipped
    assert!(wiring.num_clipped > 0);
    assert!(wiring
        .clip_warnings
        .iter()
        .all(|w| w.num_clipped > 1 && w.num_total == 25));
}

#[test]
fn test_wiring_reproducible() {
    let mut rng = StdRng::seed_from_u64(0);
    let targets = random_population("post", 0, 30, &mut rng);
    let sources = random_population("pre", 30, 30, &mut rng);

    let first = connect(&targets, &sources, lattice_request(10), 7).unwrap();
    let second = connect(&targets, &sources, lattice_request(10), 7).unwrap();
    assert_eq!(first.connections, second.connections);
    assert_eq!(first.clip_warnings, second.clip_warnings);

    let other = connect(&targets, &sources, lattice_request(10), 8).unwrap();
    assert_ne!(first.connections, other.connections);
}

#[test]
fn test_wiring_injected_rng_matches_seed() {
    let mut rng = StdRng::seed_from_u64(3);
    let population = random_population("pop", 0, 20, &mut rng);
    let connector = LatticeConnector::build(lattice_request(5)).unwrap();

    let seeded = connector.connect_seeded(&population, &population, 99).unwrap();
    let injected = connector
        .connect(&population, &population, &mut ChaCha8Rng::seed_from_u64(99))
        .unwrap();
    assert_eq!(seeded.connections, injected.connections);
}

#[test]
fn test_wiring_distinct_sources_per_target() {
    let mut rng = StdRng::seed_from_u64(5);
    let targets = random_population("post", 0, 25, &mut rng);
    let sources = random_population("pre", 25, 40, &mut rng);

    let wiring = connect(&targets, &sources, lattice_request(40), 1).unwrap();
    for (chunk, target_id) in wiring.connections.chunks(40).zip(targets.ids()) {
        assert!(chunk.iter().all(|c| c.target_id == *target_id));
        let source_ids: HashSet<usize> = chunk.iter().map(|c| c.source_id).collect();
        assert_eq!(source_ids.len(), 40);
    }
}

#[test]
fn test_wiring_self_connections_permitted() {
    let mut rng = StdRng::seed_from_u64(11);
    let population = random_population("pop", 0, 12, &mut rng);

    let wiring = connect(&population, &population, lattice_request(12), 2).unwrap();
    let num_self = wiring
        .connections
        .iter()
        .filter(|c| c.source_id == c.target_id)
        .count();
    assert_eq!(num_self, 12);
}

#[test]
fn test_wiring_zero_connections() {
    let mut rng = StdRng::seed_from_u64(4);
    let targets = random_population("post", 0, 10, &mut rng);
    let sources = random_population("pre", 10, 5, &mut rng);

    let wiring = connect(&targets, &sources, lattice_request(0), 4).unwrap();
    assert!(wiring.connections.is_empty());
    assert_eq!(wiring.num_clipped, 0);
}

#[test]
fn test_wiring_negative_n_rejected() {
    let targets = Population::contiguous("post", 0, vec![Position::origin()]).unwrap();
    let sources = Population::contiguous("pre", 1, vec![Position::origin()]).unwrap();

    assert!(matches!(
        LatticeConnector::build(lattice_request(-1)),
        Err(SNNError::InvalidParameter(_))
    ));
    assert!(matches!(
        connect(&targets, &sources, lattice_request(-1), 0),
        Err(SNNError::InvalidParameter(_))
    ));

    assert!(matches!(
        lattice_request(-1).validate(),
        Err(SNNError::InvalidParameter(_))
    ));
}

#[test]
fn test_wiring_reference_example() {
    let targets = Population::contiguous(
        "post",
        0,
        vec![Position::new(0.0, 0.0, 0.0), Position::new(1.0, 0.0, 0.0)],
    ).unwrap();
    let sources = Population::contiguous(
        "pre",
        10,
        vec![
            Position::new(0.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
            Position::new(0.0, 1.0, 0.0),
        ],
    ).unwrap();
    let request = WiringRequest {
        weight: 0.002,
        distance_factor: 0.25,
        noise_factor: 0.0,
        n: 2,
        lim_delays: (0.1, 30.0),
    };

    let wiring = connect(&targets, &sources, request, 2024).unwrap();
    assert_eq!(wiring.connections.len(), 4);

    for c in wiring.connections.iter() {
        let expected = match (c.source_id, c.target_id) {
            (10, 0) => 0.1, // zero distance, clipped to the minimum delay
            (11, 0) => 0.5,
            (12, 0) => 0.25,
            (10, 1) => 0.25,
            (11, 1) => 0.25,
            (12, 1) => 0.25 * 2_f64.sqrt(),
            _ => panic!("unexpected connection {:?}", c),
        };
        assert!((c.delay - expected).abs() < 1e-12);
    }
}

#[test]
fn test_wiring_periodic_space() {
    let targets = Population::contiguous("post", 0, vec![Position::new(0.0, 0.0, 0.0)]).unwrap();
    let sources = Population::contiguous("pre", 1, vec![Position::new(7.0, 0.0, 0.0)]).unwrap();
    let request = WiringRequest {
        weight: 0.002,
        distance_factor: 0.25,
        noise_factor: 0.0,
        n: 1,
        lim_delays: (0.1, 30.0),
    };

    let connector = LatticeConnector::build(request)
        .unwrap()
        .with_space(Space::periodic([8.0, 8.0, 8.0]).unwrap());
    let wiring = connector.connect_seeded(&targets, &sources, 0).unwrap();
    assert!((wiring.connections[0].delay - 0.25).abs() < 1e-12);
}

#[test]
fn test_wiring_sharded_is_reproducible() {
    let mut rng = StdRng::seed_from_u64(8);
    let targets = random_population("post", 0, 300, &mut rng);
    let sources = random_population("pre", 300, 100, &mut rng);
    let connector = LatticeConnector::build(lattice_request(20)).unwrap();

    let first = connector.connect_par(&targets, &sources, 5, 4).unwrap();
    let second = connector.connect_par(&targets, &sources, 5, 4).unwrap();
    assert_eq!(first.connections.len(), 300 * 20);
    assert_eq!(first.connections, second.connections);

    let target_ids: Vec<usize> = first
        .connections
        .iter()
        .step_by(20)
        .map(|c| c.target_id)
        .collect();
    assert_eq!(target_ids, targets.ids());

    // a single shard draws from the default stream, i.e., like a plain seeded call
    let single = connector.connect_par(&targets, &sources, 5, 1).unwrap();
    let seeded = connector.connect_seeded(&targets, &sources, 5).unwrap();
    assert_eq!(single.connections, seeded.connections);
}
