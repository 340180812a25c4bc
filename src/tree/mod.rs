pub mod decoder;

pub use self::decoder::{decode_forest, decode_node};

/// One node of a ranking engine's score explanation.
///
/// The description is the only semantic signal; whether `value` is a sum or a
/// max-plus-others of the children is only hinted at by that text.
#[derive(Debug, Default)]
pub struct ExplanationNode {
    pub matched: bool,
    pub value: f64,
    pub description: String,
    pub children: Vec<ExplanationNode>,
}

impl ExplanationNode {
    pub fn leaf(value: f64, description: impl Into<String>) -> Self {
        Self {
            matched: true,
            value,
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn aggregate(
        value: f64,
        description: impl Into<String>,
        children: Vec<ExplanationNode>,
    ) -> Self {
        Self {
            matched: true,
            value,
            description: description.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// No description, no children, no value: what a malformed entry decodes to.
    pub fn is_degenerate(&self) -> bool {
        self.description.is_empty() && self.children.is_empty() && self.value == 0.0
    }

    /// Pre-order walk yielding each node with its depth (root = 0).
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self, 0)],
        }
    }

    /// Breadth-first walk yielding each node with its depth.
    pub fn walk_breadth_first(&self) -> impl Iterator<Item = (&ExplanationNode, usize)> {
        let mut queue = std::collections::VecDeque::from([(self, 0usize)]);
        std::iter::from_fn(move || {
            let (node, depth) = queue.pop_front()?;
            queue.extend(node.children.iter().map(|c| (c, depth + 1)));
            Some((node, depth))
        })
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    pub fn depth(&self) -> usize {
        self.walk().map(|(_, d)| d).max().unwrap_or(0)
    }

    fn same_header(&self, other: &Self) -> bool {
        self.matched == other.matched
            && self.value.to_bits() == other.value.to_bits()
            && self.description == other.description
            && self.children.len() == other.children.len()
    }
}

pub struct Walk<'a> {
    stack: Vec<(&'a ExplanationNode, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a ExplanationNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        Some((node, depth))
    }
}

// Structural equality without recursion: same pre-order sequence of headers.
impl PartialEq for ExplanationNode {
    fn eq(&self, other: &Self) -> bool {
        let mut lhs = self.walk();
        let mut rhs = other.walk();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return true,
                (Some((a, da)), Some((b, db))) => {
                    if da != db || !a.same_header(b) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

// Deep trees must not overflow the stack when they go out of scope.
impl Drop for ExplanationNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Document id -> explanation root, in the order the engine emitted them.
#[derive(Debug, Default, PartialEq)]
pub struct ExplanationForest {
    entries: Vec<(String, ExplanationNode)>,
}

impl ExplanationForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, node: ExplanationNode) {
        self.entries.push((id.into(), node));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ExplanationNode> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, node)| node)
    }

    pub fn entry_at(&self, position: usize) -> Option<(&str, &ExplanationNode)> {
        self.entries
            .get(position)
            .map(|(key, node)| (key.as_str(), node))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExplanationNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExplanationNode {
        ExplanationNode::aggregate(
            3.0,
            "sum of:",
            vec![
                ExplanationNode::aggregate(2.0, "a", vec![ExplanationNode::leaf(2.0, "a1")]),
                ExplanationNode::leaf(1.0, "b"),
            ],
        )
    }

    #[test]
    fn walk_is_preorder_with_depths() {
        let root = sample();
        let seen: Vec<(&str, usize)> = root
            .walk()
            .map(|(n, d)| (n.description.as_str(), d))
            .collect();
        assert_eq!(seen, vec![("sum of:", 0), ("a", 1), ("a1", 2), ("b", 1)]);
    }

    #[test]
    fn breadth_first_visits_levels_in_order() {
        let root = sample();
        let seen: Vec<&str> = root
            .walk_breadth_first()
            .map(|(n, _)| n.description.as_str())
            .collect();
        assert_eq!(seen, vec!["sum of:", "a", "b", "a1"]);
    }

    #[test]
    fn deep_chain_drops_and_compares_without_overflow() {
        let build = || {
            let mut node = ExplanationNode::leaf(1.0, "bottom");
            for _ in 0..200_000 {
                node = ExplanationNode::aggregate(1.0, "wrap", vec![node]);
            }
            node
        };
        let a = build();
        let b = build();
        assert_eq!(a.depth(), 200_000);
        assert!(a == b);
    }
}
