pub mod lexical;
pub mod patterns;
pub mod types;
pub mod weights;

use self::lexical::{resolve_fields, MarkerSite};
use self::patterns::{PassLabel, PatternTable};
pub use self::types::{
    AttributeKind, AttributeMatch, BrandBoost, CategoryBoost, Contribution, FieldWeight,
    FunctionQueryContribution, GroupOrigin, LexicalField, LexicalGroup, RangeQueryContribution,
    ScoreBreakdown,
};
use crate::config::{AnalysisConfig, Heuristics, LocatorOptions};
use crate::error::LensResult;
use crate::locator::locate;
use crate::response::{ResultDocument, SearchResponse};
use crate::tree::{decode_forest, ExplanationForest, ExplanationNode};
use strum_macros::IntoStaticStr;
use tracing::debug;

const INFERRED_GROUP_DESCRIPTION: &str = "Inferred lexical group from field weights";

/// Result of asking for one document's breakdown.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentExplanation {
    /// The response carried no debug object.
    NoDebugData,
    /// Debug data present, but no explain payload in it.
    NoExplainData,
    /// Explain payload present, but nothing for this document.
    NotFound,
    Analyzed(ScoreBreakdown),
}

impl DocumentExplanation {
    pub fn status(&self) -> &'static str {
        self.into()
    }

    pub fn breakdown(&self) -> Option<&ScoreBreakdown> {
        match self {
            Self::Analyzed(b) => Some(b),
            _ => None,
        }
    }
}

/// Turns explanation subtrees into `ScoreBreakdown`s.
///
/// Holds only compiled, read-only configuration; share it freely across threads.
pub struct Analyzer {
    table: PatternTable,
    heuristics: Heuristics,
    locator: LocatorOptions,
}

impl Analyzer {
    pub fn new(config: &AnalysisConfig) -> LensResult<Self> {
        let table = PatternTable::compile(&config.patterns, &config.heuristics.category_signature)?;
        Ok(Self {
            table,
            heuristics: config.heuristics.clone(),
            locator: config.locator.clone(),
        })
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.table
    }

    /// Full breakdown of one explanation tree. One walk, then group resolution.
    pub fn analyze(&self, root: &ExplanationNode) -> ScoreBreakdown {
        let mut out = ScoreBreakdown {
            total_score: root.value,
            ..Default::default()
        };

        let mut stack: Vec<(&ExplanationNode, Option<&ExplanationNode>, usize)> =
            vec![(root, None, 0)];

        while let Some((node, parent, depth)) = stack.pop() {
            let facts = self.table.classify(node);

            match facts.pass {
                Some(PassLabel::FirstPass) => out.first_pass_score = node.value,
                Some(PassLabel::SecondPass) => out.second_pass_score = node.value,
                Some(PassLabel::Threshold) => out.threshold_score = node.value,
                None => {}
            }

            for record in facts.contributions {
                collect(&mut out, record);
            }

            if let Some(multiplier) = facts.lexical_multiplier {
                let site = MarkerSite {
                    node,
                    parent,
                    root,
                    depth,
                };
                let (origin, fields) = resolve_fields(&site, &self.table);
                out.lexical_groups.push(LexicalGroup::new(
                    node.description.clone(),
                    origin,
                    multiplier,
                    node.value,
                    fields,
                ));
            }

            for child in node.children.iter().rev() {
                stack.push((child, Some(node), depth + 1));
            }
        }

        self.complete_groups(&mut out);
        for group in &mut out.lexical_groups {
            weights::finalize(group);
        }
        out
    }

    // Infer a group when no marker exists; backfill markers that found nothing.
    fn complete_groups(&self, out: &mut ScoreBreakdown) {
        if out.field_weights.is_empty() {
            return;
        }

        if out.lexical_groups.is_empty() {
            debug!(
                "No lexical marker; inferring one group from {} field weights",
                out.field_weights.len()
            );
            let total: f64 = out.field_weights.iter().map(|w| w.score).sum();
            out.lexical_groups.push(LexicalGroup::new(
                INFERRED_GROUP_DESCRIPTION,
                GroupOrigin::Inferred,
                self.heuristics.default_multiplier,
                total,
                out.field_weights.clone(),
            ));
            return;
        }

        let scores: Vec<f64> = out.field_weights.iter().map(|w| w.score).collect();
        for group in out.lexical_groups.iter_mut().filter(|g| g.fields.is_empty()) {
            debug!(
                "Backfilling empty lexical group '{}' with {} field weights",
                group.description,
                out.field_weights.len()
            );
            let filled = LexicalGroup::new(
                group.description.clone(),
                GroupOrigin::Backfilled,
                group.multiplier,
                weights::max_plus_others(&scores, group.multiplier),
                out.field_weights.clone(),
            );
            *group = filled;
        }
    }

    /// Breakdown for the document at `index`, located inside an already decoded forest.
    pub fn explain_in_forest(
        &self,
        docs: &[ResultDocument],
        forest: &ExplanationForest,
        index: usize,
    ) -> DocumentExplanation {
        match locate(docs, forest, index, &self.locator) {
            Some(found) => {
                debug!(
                    "Document #{} resolved to explain entry '{}' via {}",
                    index, found.id, found.strategy
                );
                DocumentExplanation::Analyzed(self.analyze(found.node))
            }
            None => DocumentExplanation::NotFound,
        }
    }

    /// Breakdown for the document at `index` straight from a search response.
    pub fn explain_document(&self, response: &SearchResponse, index: usize) -> DocumentExplanation {
        let Some(debug) = &response.debug else {
            return DocumentExplanation::NoDebugData;
        };
        let Some(raw) = debug.explain_payload() else {
            return DocumentExplanation::NoExplainData;
        };
        let forest = decode_forest(raw);
        self.explain_in_forest(&response.docs, &forest, index)
    }
}

fn collect(out: &mut ScoreBreakdown, record: Contribution) {
    match record {
        Contribution::FieldWeight(w) => out.field_weights.push(w),
        Contribution::ExactMatchAttribute(a) => out.exact_match_attributes.push(a),
        Contribution::StandardFieldAttribute(a) => out.standard_field_attributes.push(a),
        Contribution::RangeQuery(q) => out.range_queries.push(q),
        Contribution::FunctionQuery(f) => out.function_queries.push(f),
        Contribution::BrandBoost(b) => out.brand_boosts.push(b),
        Contribution::CategoryBoost(c) => out.category_boosts.push(c),
    }
}
