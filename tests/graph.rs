use pastoral::error::StructuralError;
use pastoral::graph::{CountyGraph, Grade};

fn pair() -> (CountyGraph, pastoral::graph::GlenId, pastoral::graph::GlenId) {
    let mut graph = CountyGraph::new();
    let a = graph.add_glen("a", 5, 1);
    let b = graph.add_glen("b", 5, 1);
    (graph, a, b)
}

#[test]
fn symmetrical_paths_mirror_into_all_four_lists() {
    let (mut graph, a, b) = pair();
    let path = graph.add_path(a, b, true, 1, Grade::default()).unwrap();

    let origin = graph.glen(a).unwrap();
    let destination = graph.glen(b).unwrap();
    assert!(origin.away().contains(&path));
    assert!(origin.toward().contains(&path));
    assert!(destination.away().contains(&path));
    assert!(destination.toward().contains(&path));
}

#[test]
fn directed_paths_register_one_way_only() {
    let (mut graph, a, b) = pair();
    let path = graph.add_path(a, b, false, 1, Grade::default()).unwrap();

    let origin = graph.glen(a).unwrap();
    let destination = graph.glen(b).unwrap();
    assert!(origin.away().contains(&path));
    assert!(!origin.toward().contains(&path));
    assert!(destination.toward().contains(&path));
    assert!(!destination.away().contains(&path));
    assert!(graph.exits(b).is_empty());
}

#[test]
fn self_loops_are_rejected() {
    let (mut graph, a, _) = pair();
    let err = graph.add_path(a, a, false, 1, Grade::default()).unwrap_err();
    assert!(matches!(err, StructuralError::SelfLoop(_)));
    assert_eq!(graph.path_count(), 0);
}

#[test]
fn ordered_duplicates_are_rejected() {
    let (mut graph, a, b) = pair();
    graph.add_path(a, b, false, 1, Grade::default()).unwrap();
    let err = graph.add_path(a, b, false, 2, Grade::default()).unwrap_err();
    assert!(matches!(err, StructuralError::DuplicatePath(_, _)));
}

#[test]
fn reverse_direction_is_allowed_between_directed_paths() {
    let (mut graph, a, b) = pair();
    graph.add_path(a, b, false, 1, Grade::default()).unwrap();
    graph.add_path(b, a, false, 1, Grade::default()).unwrap();
    assert_eq!(graph.path_count(), 2);
}

#[test]
fn symmetrical_paths_claim_the_unordered_pair() {
    let (mut graph, a, b) = pair();
    graph.add_path(a, b, true, 1, Grade::default()).unwrap();
    let err = graph.add_path(b, a, false, 1, Grade::default()).unwrap_err();
    assert!(matches!(err, StructuralError::DuplicatePath(_, _)));

    let (mut graph, a, b) = pair();
    graph.add_path(a, b, false, 1, Grade::default()).unwrap();
    let err = graph.add_path(b, a, true, 1, Grade::default()).unwrap_err();
    assert!(matches!(err, StructuralError::DuplicatePath(_, _)));
}

#[test]
fn increase_takes_growth_or_an_explicit_amount() {
    let (mut graph, a, _) = pair();
    let glen = graph.glen_mut(a).unwrap();
    assert_eq!(glen.increase(None), 6);
    assert_eq!(glen.increase(Some(4)), 10);
    // Negative amounts are an external debit, accepted verbatim.
    assert_eq!(glen.increase(Some(-10)), 0);
}

#[test]
fn enumerable_snapshots_use_identifiers() {
    let (mut graph, a, b) = pair();
    graph.add_path(a, b, true, 1, Grade::default()).unwrap();

    assert_eq!(graph.edge_list(), vec![("a".to_string(), "b".to_string())]);
    assert_eq!(
        graph.abundance_list(),
        vec![("a".to_string(), 5), ("b".to_string(), 5)]
    );
    // Hand-built glens carry no planar layout.
    assert!(graph.positions().iter().all(|(_, pos)| pos.is_none()));
}
