use super::patterns::PatternTable;
use super::types::{FieldWeight, GroupOrigin};
use crate::tree::ExplanationNode;
use std::collections::HashSet;
use tracing::debug;

/// Where an aggregation marker sits in its document's tree.
#[derive(Clone, Copy)]
pub struct MarkerSite<'a> {
    pub node: &'a ExplanationNode,
    pub parent: Option<&'a ExplanationNode>,
    pub root: &'a ExplanationNode,
    pub depth: usize,
}

pub type FieldSearch = fn(&MarkerSite<'_>, &PatternTable) -> Vec<FieldWeight>;

/// Member searches, tried in order until one yields fields.
pub const FIELD_SEARCHES: [(GroupOrigin, FieldSearch); 3] = [
    (GroupOrigin::DirectChildren, direct_children),
    (GroupOrigin::ParentSubtree, parent_subtree),
    (GroupOrigin::SameLevel, same_level),
];

/// Collects the fields aggregated by the marker at `site`.
///
/// Returns `GroupOrigin::Empty` with no fields when every search came up dry;
/// the caller decides whether to backfill.
pub fn resolve_fields(site: &MarkerSite<'_>, table: &PatternTable) -> (GroupOrigin, Vec<FieldWeight>) {
    for (origin, search) in FIELD_SEARCHES {
        let fields = search(site, table);
        if !fields.is_empty() {
            debug!(
                "Lexical marker '{}' resolved {} fields via {}",
                site.node.description,
                fields.len(),
                origin
            );
            return (origin, fields);
        }
    }
    debug!(
        "Lexical marker '{}' has no field weights nearby",
        site.node.description
    );
    (GroupOrigin::Empty, Vec::new())
}

/// Field weights anywhere below the marker's children (the normal case).
pub fn direct_children(site: &MarkerSite<'_>, table: &PatternTable) -> Vec<FieldWeight> {
    site.node
        .children
        .iter()
        .flat_map(|child| child.walk())
        .filter_map(|(node, _)| table.field_weight(node))
        .collect()
}

/// Field weights anywhere under the marker's parent, unique per (field, term).
pub fn parent_subtree(site: &MarkerSite<'_>, table: &PatternTable) -> Vec<FieldWeight> {
    let scope = site.parent.unwrap_or(site.node);
    let mut seen = HashSet::new();
    scope
        .walk()
        .filter_map(|(node, _)| table.field_weight(node))
        .filter(|w| seen.insert((w.field.clone(), w.term.clone())))
        .collect()
}

/// Breadth-first over every other node at the marker's depth, and below them.
pub fn same_level(site: &MarkerSite<'_>, table: &PatternTable) -> Vec<FieldWeight> {
    let mut seen = HashSet::new();
    site.root
        .walk_breadth_first()
        .filter(|(node, depth)| *depth == site.depth && !std::ptr::eq(*node, site.node))
        .flat_map(|(peer, _)| peer.walk_breadth_first())
        .filter_map(|(node, _)| table.field_weight(node))
        .filter(|w| seen.insert((w.field.clone(), w.term.clone())))
        .collect()
}
