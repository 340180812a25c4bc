use crate::config::round_to;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

// Every record keeps `score` at full precision; `ScoreBreakdown::rounded`
// produces the display copy.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldWeight {
    pub field: String,
    pub term: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    #[strum(serialize = "EXACT")]
    ExactMatch,
    #[strum(serialize = "FIELD")]
    StandardField,
}

/// A product attribute that contributed to the score, exact-match or plain field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeMatch {
    pub kind: AttributeKind,
    pub attribute: String,
    pub value: String,
    pub boost: f64,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQueryContribution {
    pub field: String,
    pub range_expression: String,
    pub boost: f64,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionQueryContribution {
    pub function_expression: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandBoost {
    pub brand: String,
    pub applied: bool,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBoost {
    pub category_id: String,
    pub boost_value: f64,
    pub applied: bool,
    pub score: f64,
    pub description: String,
}

/// One typed fact recognized in a node description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Contribution {
    FieldWeight(FieldWeight),
    ExactMatchAttribute(AttributeMatch),
    StandardFieldAttribute(AttributeMatch),
    RangeQuery(RangeQueryContribution),
    FunctionQuery(FunctionQueryContribution),
    BrandBoost(BrandBoost),
    CategoryBoost(CategoryBoost),
}

/// How a lexical group got its field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupOrigin {
    DirectChildren,
    ParentSubtree,
    SameLevel,
    /// Marker found, nothing under or around it; filled from all field weights.
    Backfilled,
    /// No marker anywhere; built from all field weights.
    Inferred,
    /// Marker found and no field weights anywhere to fill it with.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalField {
    pub field: String,
    pub term: String,
    pub description: String,
    pub raw_score: f64,
    pub weighted_score: f64,
    pub is_max: bool,
    pub contribution_percent: f64,
}

impl From<FieldWeight> for LexicalField {
    fn from(w: FieldWeight) -> Self {
        Self {
            field: w.field,
            term: w.term,
            description: w.description,
            raw_score: w.score,
            weighted_score: 0.0,
            is_max: false,
            contribution_percent: 0.0,
        }
    }
}

/// A "max plus k times others" aggregation and its per-field attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalGroup {
    pub description: String,
    pub origin: GroupOrigin,
    pub multiplier: f64,
    /// The engine's value for the marker node, or an estimate when inferred/backfilled.
    pub total_score: f64,
    pub fields: Vec<LexicalField>,
    pub calculated_total: f64,
    pub max_score: f64,
    pub others_sum: f64,
    pub weighted_others_sum: f64,
}

impl LexicalGroup {
    pub fn new(
        description: impl Into<String>,
        origin: GroupOrigin,
        multiplier: f64,
        total_score: f64,
        fields: Vec<FieldWeight>,
    ) -> Self {
        Self {
            description: description.into(),
            origin,
            multiplier,
            total_score,
            fields: fields.into_iter().map(LexicalField::from).collect(),
            calculated_total: 0.0,
            max_score: 0.0,
            others_sum: 0.0,
            weighted_others_sum: 0.0,
        }
    }

    pub fn max_field(&self) -> Option<&LexicalField> {
        self.fields.iter().find(|f| f.is_max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    // Top-line Scores
    pub total_score: f64,
    pub first_pass_score: f64,
    pub second_pass_score: f64,
    pub threshold_score: f64,

    pub field_weights: Vec<FieldWeight>,
    pub brand_boosts: Vec<BrandBoost>,
    pub category_boosts: Vec<CategoryBoost>,
    pub exact_match_attributes: Vec<AttributeMatch>,
    pub standard_field_attributes: Vec<AttributeMatch>,
    pub function_queries: Vec<FunctionQueryContribution>,
    pub range_queries: Vec<RangeQueryContribution>,
    pub lexical_groups: Vec<LexicalGroup>,
}

impl ScoreBreakdown {
    /// Exact-match attributes followed by standard field attributes.
    pub fn product_attributes(&self) -> impl Iterator<Item = &AttributeMatch> {
        self.exact_match_attributes
            .iter()
            .chain(self.standard_field_attributes.iter())
    }

    /// True when the explanation yielded no typed facts at all.
    pub fn is_empty(&self) -> bool {
        self.field_weights.is_empty()
            && self.brand_boosts.is_empty()
            && self.category_boosts.is_empty()
            && self.exact_match_attributes.is_empty()
            && self.standard_field_attributes.is_empty()
            && self.function_queries.is_empty()
            && self.range_queries.is_empty()
            && self.lexical_groups.is_empty()
    }

    pub fn lexical_field_count(&self) -> usize {
        self.lexical_groups.iter().map(|g| g.fields.len()).sum()
    }

    /// Copy with every numeric field rounded for presentation.
    pub fn rounded(&self, decimals: u32) -> ScoreBreakdown {
        let r = |v: f64| round_to(v, decimals);
        let mut out = self.clone();

        out.total_score = r(out.total_score);
        out.first_pass_score = r(out.first_pass_score);
        out.second_pass_score = r(out.second_pass_score);
        out.threshold_score = r(out.threshold_score);

        out.field_weights.iter_mut().for_each(|w| w.score = r(w.score));
        out.brand_boosts.iter_mut().for_each(|b| b.score = r(b.score));
        out.category_boosts
            .iter_mut()
            .for_each(|c| c.score = r(c.score));
        out.exact_match_attributes
            .iter_mut()
            .chain(out.standard_field_attributes.iter_mut())
            .for_each(|a| a.score = r(a.score));
        out.function_queries
            .iter_mut()
            .for_each(|f| f.score = r(f.score));
        out.range_queries.iter_mut().for_each(|q| q.score = r(q.score));

        for group in &mut out.lexical_groups {
            group.total_score = r(group.total_score);
            group.calculated_total = r(group.calculated_total);
            group.max_score = r(group.max_score);
            group.others_sum = r(group.others_sum);
            group.weighted_others_sum = r(group.weighted_others_sum);
            for field in &mut group.fields {
                field.raw_score = r(field.raw_score);
                field.weighted_score = r(field.weighted_score);
                field.contribution_percent = r(field.contribution_percent);
            }
        }
        out
    }
}
