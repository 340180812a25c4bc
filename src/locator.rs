use crate::config::LocatorOptions;
use crate::response::ResultDocument;
use crate::tree::{ExplanationForest, ExplanationNode};
use strum_macros::{Display, IntoStaticStr};

/// Which rule matched a document to its explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum LocateStrategy {
    /// Entry at the document's own position carries its id.
    PositionalId,
    /// Some other entry carries its id.
    IdScan,
    /// Entry at the document's position, id ignored.
    Positional,
    /// The forest has one entry and the first document was asked for.
    SingleEntry,
}

#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub id: &'a str,
    pub node: &'a ExplanationNode,
    pub strategy: LocateStrategy,
}

/// Finds the explanation subtree of `docs[index]`. `None` is a normal outcome.
pub fn locate<'a>(
    docs: &[ResultDocument],
    forest: &'a ExplanationForest,
    index: usize,
    options: &LocatorOptions,
) -> Option<Located<'a>> {
    let doc = docs.get(index)?;
    let found = |(id, node): (&'a str, &'a ExplanationNode), strategy| Located { id, node, strategy };

    if let Some(entry) = forest.entry_at(index).filter(|(id, _)| *id == doc.id) {
        return Some(found(entry, LocateStrategy::PositionalId));
    }

    if let Some(entry) = forest.iter().find(|(id, _)| *id == doc.id) {
        return Some(found(entry, LocateStrategy::IdScan));
    }

    if options.positional_fallback {
        if let Some(entry) = forest.entry_at(index) {
            return Some(found(entry, LocateStrategy::Positional));
        }
    }

    if options.single_entry_fallback && forest.len() == 1 && index == 0 {
        return forest
            .entry_at(0)
            .map(|entry| found(entry, LocateStrategy::SingleEntry));
    }

    None
}
