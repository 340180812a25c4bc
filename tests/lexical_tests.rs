mod common;

use common::{analyzer, leaf, node, weight, EPS};
use relevance_lens::analysis::GroupOrigin;

#[test]
fn test_direct_children_group() {
    let root = node(
        9.5,
        "max plus 0.5 times others of:",
        vec![
            weight("search_syns_brand_en", "sheba", 3.0),
            weight("search_syns_name_en", "sheba", 7.0),
            weight("search_syns_product_name", "sheba", 1.0),
        ],
    );
    let b = analyzer().analyze(&root);

    assert_eq!(b.lexical_groups.len(), 1);
    let g = &b.lexical_groups[0];
    assert_eq!(g.origin, GroupOrigin::DirectChildren);
    assert_eq!(g.multiplier, 0.5);
    assert_eq!(g.total_score, 9.5);
    assert_eq!(g.fields[0].field, "search_syns_name_en");
    assert!(g.fields[0].is_max);
    assert!((g.max_score - 7.0).abs() < EPS);
    assert!((g.others_sum - 4.0).abs() < EPS);
    assert!((g.weighted_others_sum - 2.0).abs() < EPS);
    assert!((g.calculated_total - 9.0).abs() < EPS);
    assert!((g.fields[1].weighted_score - 1.5).abs() < EPS);
    assert!((g.fields[0].contribution_percent - 100.0 * 7.0 / 9.0).abs() < 1e-6);
}

#[test]
fn test_marker_without_children_uses_parent_subtree() {
    let root = node(
        6.0,
        "sum of:",
        vec![
            leaf(0.0, "max plus 0.5 times others of:"),
            node(4.0, "sum of:", vec![weight("title", "cat", 4.0)]),
            weight("body", "cat", 2.0),
        ],
    );
    let b = analyzer().analyze(&root);
    let g = &b.lexical_groups[0];
    assert_eq!(g.origin, GroupOrigin::ParentSubtree);
    assert_eq!(g.fields.len(), 2);
    assert!((g.calculated_total - 5.0).abs() < EPS);
}

#[test]
fn test_same_level_peers_supply_fields() {
    // Nothing under the marker's parent; its cousin at depth 2 holds the weights.
    let root = node(
        8.0,
        "sum of:",
        vec![
            node(0.0, "sum of:", vec![leaf(0.0, "max plus 0.3 times others of:")]),
            node(8.0, "sum of:", vec![
                node(8.0, "sum of:", vec![weight("title", "cat", 6.0), weight("body", "cat", 2.0)]),
            ]),
        ],
    );
    let b = analyzer().analyze(&root);
    let g = &b.lexical_groups[0];
    assert_eq!(g.origin, GroupOrigin::SameLevel);
    assert_eq!(g.fields.len(), 2);
    assert!((g.calculated_total - (6.0 + 0.3 * 2.0)).abs() < EPS);
}

#[test]
fn test_group_inferred_when_no_marker() {
    let root = node(
        9.0,
        "sum of:",
        vec![
            weight("title", "cat", 5.0),
            weight("body", "cat", 3.0),
            weight("tags", "cat", 1.0),
        ],
    );
    let b = analyzer().analyze(&root);
    assert_eq!(b.lexical_groups.len(), 1);
    let g = &b.lexical_groups[0];
    assert_eq!(g.origin, GroupOrigin::Inferred);
    assert_eq!(g.multiplier, 0.5);
    assert_eq!(g.description, "Inferred lexical group from field weights");
    assert!((g.total_score - 9.0).abs() < EPS);
    assert!((g.calculated_total - 7.0).abs() < EPS);
}

#[test]
fn test_marker_with_nothing_nearby_is_backfilled() {
    // Weights sit at depth 1; the marker at depth 2 has no peers holding any.
    let root = node(
        10.0,
        "sum of:",
        vec![
            node(0.0, "sum of:", vec![leaf(0.0, "max plus 0.5 times others of:")]),
            weight("a", "x", 8.0),
            weight("b", "x", 4.0),
        ],
    );
    let b = analyzer().analyze(&root);
    assert_eq!(b.lexical_groups.len(), 1);
    let g = &b.lexical_groups[0];
    assert_eq!(g.origin, GroupOrigin::Backfilled);
    assert_eq!(g.fields.len(), 2);
    assert!((g.total_score - 10.0).abs() < EPS);
    assert!((g.calculated_total - 10.0).abs() < EPS);
}

#[test]
fn test_marker_without_any_weights_stays_empty() {
    let lonely = node(0.0, "max plus 0.5 times others of:", vec![]);
    let b = analyzer().analyze(&lonely);
    assert_eq!(b.lexical_groups.len(), 1);
    let g = &b.lexical_groups[0];
    assert_eq!(g.origin, GroupOrigin::Empty);
    assert!(g.fields.is_empty());
    assert_eq!(g.calculated_total, 0.0);
    assert_eq!(g.max_score, 0.0);
}

#[test]
fn test_group_multiplier_applies_to_non_max_only() {
    let root = node(
        4.0,
        "max plus 0.1 times others of:",
        vec![weight("a", "x", 2.0), weight("b", "x", 2.0), weight("c", "x", 1.0)],
    );
    let g = analyzer().analyze(&root).lexical_groups.remove(0);
    assert_eq!(g.fields.iter().filter(|f| f.is_max).count(), 1);
    assert_eq!(g.fields[0].field, "a");
    assert!((g.fields[1].weighted_score - 0.2).abs() < EPS);
    assert!((g.calculated_total - 2.3).abs() < EPS);
}
