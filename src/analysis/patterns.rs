use super::types::{
    AttributeKind, AttributeMatch, BrandBoost, CategoryBoost, Contribution, FieldWeight,
    FunctionQueryContribution, RangeQueryContribution,
};
use crate::config::PatternVocabulary;
use crate::error::{LensError, LensResult};
use crate::tree::ExplanationNode;
use regex::{Captures, Regex};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Recognition rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Rule {
    RangeQuery,
    FunctionQuery,
    ExactMatch,
    StandardField,
    CategoryBoost,
    CategorySum,
    LexicalMarker,
    FieldWeight,
    BrandBoost,
}

/// Labels matched by exact equality rather than by pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PassLabel {
    FirstPass,
    SecondPass,
    Threshold,
}

/// Everything the table recognized on one node.
#[derive(Debug, Default)]
pub struct Classification {
    pub pass: Option<PassLabel>,
    pub lexical_multiplier: Option<f64>,
    pub contributions: Vec<Contribution>,
}

struct CompiledRule {
    rule: Rule,
    regex: Regex,
}

/// Compiled form of a `PatternVocabulary`.
///
/// Rules are data: each is a (regex, constructor) pair looked up by `Rule`, so a
/// different ranking engine only needs a different vocabulary.
pub struct PatternTable {
    first_pass_label: String,
    second_pass_label: String,
    threshold_label: String,
    category_signature: String,
    rules: Vec<CompiledRule>,
}

impl PatternTable {
    pub fn compile(vocab: &PatternVocabulary, category_signature: &str) -> LensResult<Self> {
        let sources = [
            (Rule::RangeQuery, &vocab.range_query),
            (Rule::FunctionQuery, &vocab.function_query),
            (Rule::ExactMatch, &vocab.exact_match),
            (Rule::StandardField, &vocab.standard_field),
            (Rule::CategoryBoost, &vocab.category_boost),
            (Rule::CategorySum, &vocab.category_sum),
            (Rule::LexicalMarker, &vocab.lexical_marker),
            (Rule::FieldWeight, &vocab.field_weight),
            (Rule::BrandBoost, &vocab.brand_boost),
        ];

        let mut rules = Vec::with_capacity(sources.len());
        for (rule, source) in sources {
            let regex = Regex::new(source).map_err(|e| LensError::Pattern {
                rule: rule.into(),
                source: e,
            })?;
            rules.push(CompiledRule { rule, regex });
        }

        Ok(Self {
            first_pass_label: vocab.first_pass_label.clone(),
            second_pass_label: vocab.second_pass_label.clone(),
            threshold_label: vocab.threshold_label.clone(),
            category_signature: category_signature.to_string(),
            rules,
        })
    }

    fn regex(&self, rule: Rule) -> Option<&Regex> {
        self.rules.iter().find(|r| r.rule == rule).map(|r| &r.regex)
    }

    /// Applies every rule to one node. A node may yield several records.
    pub fn classify(&self, node: &ExplanationNode) -> Classification {
        let desc = node.description.as_str();
        let mut out = Classification {
            pass: self.pass_label(desc),
            ..Default::default()
        };
        if desc.is_empty() {
            return out;
        }

        for compiled in &self.rules {
            match compiled.rule {
                Rule::CategorySum => {
                    for caps in compiled.regex.captures_iter(desc) {
                        if let Some(boost) = category_sum_boost(&caps, node) {
                            out.contributions.push(Contribution::CategoryBoost(boost));
                        }
                    }
                }
                Rule::LexicalMarker => {
                    if let Some(caps) = compiled.regex.captures(desc) {
                        out.lexical_multiplier = caps
                            .name("multiplier")
                            .and_then(|m| m.as_str().parse::<f64>().ok());
                    }
                }
                rule => {
                    if let Some(caps) = compiled.regex.captures(desc) {
                        if let Some(record) = self.construct(rule, &caps, node) {
                            out.contributions.push(record);
                        }
                    }
                }
            }
        }
        out
    }

    /// The generic field-weight rule alone; used to gather lexical group members.
    pub fn field_weight(&self, node: &ExplanationNode) -> Option<FieldWeight> {
        let caps = self.regex(Rule::FieldWeight)?.captures(&node.description)?;
        field_weight_record(&caps, node)
    }

    /// True when a function description is really a category boost: it carries the
    /// conditional signature, or a summed category term that actually scored.
    /// A summed form where every term is zero stays a plain function query.
    pub fn has_category_signature(&self, desc: &str) -> bool {
        (!self.category_signature.is_empty() && desc.contains(&self.category_signature))
            || self
                .regex(Rule::CategoryBoost)
                .is_some_and(|re| re.is_match(desc))
            || self.regex(Rule::CategorySum).is_some_and(|re| {
                re.captures_iter(desc)
                    .any(|caps| summed_term_value(&caps).is_some_and(|v| v > 0.0))
            })
    }

    fn pass_label(&self, desc: &str) -> Option<PassLabel> {
        if desc == self.first_pass_label {
            Some(PassLabel::FirstPass)
        } else if desc == self.second_pass_label {
            Some(PassLabel::SecondPass)
        } else if desc == self.threshold_label {
            Some(PassLabel::Threshold)
        } else {
            None
        }
    }

    fn construct(&self, rule: Rule, caps: &Captures, node: &ExplanationNode) -> Option<Contribution> {
        let desc = || node.description.clone();
        let record = match rule {
            Rule::RangeQuery => Contribution::RangeQuery(RangeQueryContribution {
                field: group(caps, "field")?,
                range_expression: group(caps, "range")?,
                boost: boost(caps),
                score: node.value,
                description: desc(),
            }),
            Rule::FunctionQuery => {
                if self.has_category_signature(&node.description) {
                    return None;
                }
                Contribution::FunctionQuery(FunctionQueryContribution {
                    function_expression: group(caps, "expr")?,
                    score: node.value,
                    description: desc(),
                })
            }
            Rule::ExactMatch => Contribution::ExactMatchAttribute(AttributeMatch {
                kind: AttributeKind::ExactMatch,
                attribute: group(caps, "attribute")?,
                value: group(caps, "value")?,
                boost: boost(caps),
                score: node.value,
                description: desc(),
            }),
            Rule::StandardField => Contribution::StandardFieldAttribute(AttributeMatch {
                kind: AttributeKind::StandardField,
                attribute: group(caps, "attribute")?,
                value: group(caps, "term")?,
                boost: 1.0,
                score: node.value,
                description: desc(),
            }),
            Rule::CategoryBoost => Contribution::CategoryBoost(CategoryBoost {
                category_id: group(caps, "category")?,
                boost_value: group(caps, "boost")?.parse().unwrap_or(0.0),
                applied: node.value > 0.0,
                score: node.value,
                description: desc(),
            }),
            Rule::FieldWeight => Contribution::FieldWeight(field_weight_record(caps, node)?),
            Rule::BrandBoost => {
                // Only boosts the engine actually applied.
                if node.value <= 0.0 {
                    return None;
                }
                Contribution::BrandBoost(BrandBoost {
                    brand: group(caps, "brand")?,
                    applied: true,
                    score: node.value,
                    description: desc(),
                })
            }
            Rule::CategorySum | Rule::LexicalMarker => return None,
        };
        Some(record)
    }
}

fn group(caps: &Captures, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().trim().to_string())
}

fn boost(caps: &Captures) -> f64 {
    caps.name("boost")
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1.0)
}

fn field_weight_record(caps: &Captures, node: &ExplanationNode) -> Option<FieldWeight> {
    Some(FieldWeight {
        field: group(caps, "field")?,
        term: group(caps, "term")?,
        score: node.value,
        description: node.description.clone(),
    })
}

// One term of a summed category function; only terms that scored are boosts.
fn summed_term_value(caps: &Captures) -> Option<f64> {
    caps.name("value")?.as_str().parse().ok()
}

fn category_sum_boost(caps: &Captures, node: &ExplanationNode) -> Option<CategoryBoost> {
    let value = summed_term_value(caps)?;
    if value <= 0.0 {
        return None;
    }
    Some(CategoryBoost {
        category_id: group(caps, "category")?,
        boost_value: group(caps, "boost")?.parse().unwrap_or(0.0),
        applied: true,
        score: value,
        description: node.description.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Heuristics;

    fn table() -> PatternTable {
        PatternTable::compile(
            &PatternVocabulary::default(),
            &Heuristics::default().category_signature,
        )
        .unwrap()
    }

    #[test]
    fn default_vocabulary_compiles_every_rule() {
        use strum::IntoEnumIterator;
        let t = table();
        for rule in Rule::iter() {
            assert!(t.regex(rule).is_some(), "missing rule {}", rule);
        }
    }

    #[test]
    fn invalid_user_pattern_names_the_rule() {
        let vocab = PatternVocabulary {
            brand_boost: "weight(".to_string(),
            ..Default::default()
        };
        match PatternTable::compile(&vocab, "") {
            Err(LensError::Pattern { rule, .. }) => assert_eq!(rule, "brand_boost"),
            other => panic!("expected pattern error, got {:?}", other.err()),
        }
    }
}
