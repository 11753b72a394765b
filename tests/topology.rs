use std::collections::HashMap;

use pastoral::error::{ConfigurationError, CountyError};
use pastoral::generate::{generate, CountyPlan, FlockPlan, GlenPlan, PathPlan, SheepPlan, Topology};
use pastoral::rng::{RngManager, GENERATION_STREAM};

fn plan(topology: Topology) -> CountyPlan {
    CountyPlan {
        topology,
        glen_count: 12,
        width: 4,
        connectivity: 1.0,
        scale: None,
        glens: GlenPlan::default(),
        paths: PathPlan::default(),
        flocks: FlockPlan {
            count: 0,
            ..FlockPlan::default()
        },
        sheep: SheepPlan::default(),
        limits: Default::default(),
    }
}

fn build(plan: &CountyPlan, seed: u64) -> pastoral::County {
    let mut rng = RngManager::new(seed);
    generate(plan, &mut rng.stream(GENERATION_STREAM)).unwrap()
}

#[test]
fn hex_rows_count_up_then_down() {
    let mut hex = plan(Topology::Hex);
    hex.width = 3;
    let county = build(&hex, 1);

    let mut rows: HashMap<u32, usize> = HashMap::new();
    for (_, glen) in county.graph().glens() {
        let (_, y) = glen.lattice().expect("lattice glens carry coordinates");
        *rows.entry(y).or_default() += 1;
    }
    let counts: Vec<usize> = (0..5).map(|y| rows[&y]).collect();
    assert_eq!(counts, vec![3, 4, 5, 4, 3]);
    assert_eq!(county.graph().glen_count(), 19);
}

#[test]
fn full_grid_links_every_lattice_neighbor() {
    let county = build(&plan(Topology::Grid), 1);
    assert_eq!(county.graph().glen_count(), 16);
    // 3 left-links per row times 4 rows, plus 3 up-links per column
    // times 4 columns.
    assert_eq!(county.graph().path_count(), 24);
}

#[test]
fn zero_connectivity_leaves_a_lattice_unlinked() {
    let mut sparse = plan(Topology::Grid);
    sparse.connectivity = 0.0;
    let county = build(&sparse, 1);
    assert_eq!(county.graph().glen_count(), 16);
    assert_eq!(county.graph().path_count(), 0);
}

#[test]
fn arbitrary_counties_attempt_a_link_per_glen() {
    let mut arbitrary = plan(Topology::Arbitrary);
    arbitrary.connectivity = 0.0;
    let county = build(&arbitrary, 5);
    // One attempt per glen always happens; every glen ends up with at
    // least one incident path because links are symmetrical.
    for id in county.graph().glen_ids() {
        assert!(
            !county.graph().exits(id).is_empty(),
            "glen {id:?} was left isolated"
        );
    }
}

#[test]
fn two_glen_county_saturates_without_error() {
    let mut tiny = plan(Topology::Arbitrary);
    tiny.glen_count = 2;
    tiny.connectivity = 1.0;
    let county = build(&tiny, 9);
    // After the first symmetrical path the pair is saturated; further
    // attempts find no candidates and quietly do nothing.
    assert_eq!(county.graph().path_count(), 1);
}

#[test]
fn grid_positions_shift_left_by_half_the_scale() {
    let mut grid = plan(Topology::Grid);
    grid.width = 2;
    let county = build(&grid, 1);
    for (_, glen) in county.graph().glens() {
        let (x, y) = glen.lattice().unwrap();
        let (px, py) = glen.position().unwrap();
        assert_eq!(px, x as f64 - 1.0);
        assert_eq!(py, y as f64);
    }
}

#[test]
fn degenerate_parameters_fail_before_generation() {
    let mut no_width = plan(Topology::Hex);
    no_width.width = 0;
    let mut rng = RngManager::new(1);
    let err = generate(&no_width, &mut rng.stream(GENERATION_STREAM)).unwrap_err();
    assert!(matches!(
        err,
        CountyError::Configuration(ConfigurationError::InvalidWidth(0))
    ));

    let mut overeager = plan(Topology::Grid);
    overeager.connectivity = 1.5;
    let err = generate(&overeager, &mut rng.stream(GENERATION_STREAM)).unwrap_err();
    assert!(matches!(
        err,
        CountyError::Configuration(ConfigurationError::InvalidConnectivity(_))
    ));

    let mut empty = plan(Topology::Arbitrary);
    empty.glen_count = 0;
    let err = generate(&empty, &mut rng.stream(GENERATION_STREAM)).unwrap_err();
    assert!(matches!(
        err,
        CountyError::Configuration(ConfigurationError::EmptyCounty)
    ));
}

#[test]
fn unknown_strategy_is_a_configuration_error() {
    let mut lost = plan(Topology::Grid);
    lost.flocks = FlockPlan {
        count: 1,
        min_sheep: 1,
        max_sheep: 1,
        strategy: "follow-the-moon".to_string(),
    };
    let mut rng = RngManager::new(1);
    let err = generate(&lost, &mut rng.stream(GENERATION_STREAM)).unwrap_err();
    assert!(matches!(
        err,
        CountyError::Configuration(ConfigurationError::UnknownStrategy(_))
    ));
}

#[test]
fn ceilings_bound_what_generation_hands_out() {
    let mut greedy = plan(Topology::Grid);
    greedy.sheep.greed = 40;
    let mut rng = RngManager::new(1);
    let err = generate(&greedy, &mut rng.stream(GENERATION_STREAM)).unwrap_err();
    assert!(matches!(
        err,
        CountyError::Configuration(ConfigurationError::AboveCeiling { .. })
    ));
}

#[test]
fn seeded_flocks_land_on_county_glens() {
    let mut seeded = plan(Topology::Hex);
    seeded.flocks = FlockPlan {
        count: 4,
        min_sheep: 2,
        max_sheep: 6,
        strategy: "weighted".to_string(),
    };
    let county = build(&seeded, 11);
    assert_eq!(county.flocks().len(), 4);
    for flock in county.flocks() {
        assert!(county.graph().contains(flock.current_glen()));
        let size = flock.members().len();
        assert!((2..=6).contains(&size), "flock size {size} out of range");
    }
}
