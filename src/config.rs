use crate::error::{LensError, LensResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// === SOLR VOCABULARY ===
// Named groups are part of the contract: a replacement vocabulary must
// expose the same group names for the rule it replaces.
pub const FIRST_PASS_LABEL: &str = "first pass score";
pub const SECOND_PASS_LABEL: &str = "second pass score";
pub const THRESHOLD_LABEL: &str = "Score above threshold";
pub const RANGE_QUERY_PATTERN: &str =
    r"(?P<field>(?:ff|fl)_\w+):\[(?P<range>[^\]]+)\](?:\^(?P<boost>[\d.]+))?";
pub const FUNCTION_QUERY_PATTERN: &str = r"FunctionQuery\((?P<expr>.*)\)";
pub const EXACT_MATCH_PATTERN: &str = r"search_exact_(?P<attribute>\w+):(?P<value>[^)^]+?)(?:\s+in\s+\d+)?(?:\^(?P<boost>[\d.]+))?(?:[)^]|$)";
pub const STANDARD_FIELD_PATTERN: &str =
    r"weight\(fs_(?P<attribute>\w+):(?P<term>[^)]+?)\s+in\s+\d+\)";
pub const CATEGORY_BOOST_PATTERN: &str = r"FunctionQuery\(if\(query\(\+\(\+fms_product_category_external_id:(?P<category>\d+)\),def=0\.0\),const\(0\),const\((?P<boost>[\d.]+)\)\)\)";
pub const CATEGORY_SUM_PATTERN: &str = r"query\(\(fms_product_category_external_id:(?P<category>\d+)\)\^(?P<boost>[\d.]+),def=[^)]*\)=(?P<value>-?[\d.]+(?:[eE][-+]?\d+)?)";
pub const LEXICAL_MARKER_PATTERN: &str = r"max plus (?P<multiplier>[\d.]+) times others of:";
pub const FIELD_WEIGHT_PATTERN: &str = r"weight\((?P<field>[^:]+):(?P<term>[^)]+?)\s+in\s+\d+\)";
pub const BRAND_BOOST_PATTERN: &str = r"weight\(fs_product_brand:(?P<brand>[^)]+?)\s+in\s+\d+\)";

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[command(flatten)]
    #[serde(default)]
    pub patterns: PatternVocabulary,
    #[command(flatten)]
    #[serde(default)]
    pub heuristics: Heuristics,
    #[command(flatten)]
    #[serde(default)]
    pub locator: LocatorOptions,
}

/// The ranking engine's debug vocabulary, one entry per recognition rule.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternVocabulary {
    // === LITERAL LABELS ===
    #[arg(long, default_value = FIRST_PASS_LABEL)]
    pub first_pass_label: String,
    #[arg(long, default_value = SECOND_PASS_LABEL)]
    pub second_pass_label: String,
    #[arg(long, default_value = THRESHOLD_LABEL)]
    pub threshold_label: String,

    // === REGEX RULES ===
    #[arg(long, default_value = RANGE_QUERY_PATTERN)]
    pub range_query: String,
    #[arg(long, default_value = FUNCTION_QUERY_PATTERN)]
    pub function_query: String,
    #[arg(long, default_value = EXACT_MATCH_PATTERN)]
    pub exact_match: String,
    #[arg(long, default_value = STANDARD_FIELD_PATTERN)]
    pub standard_field: String,
    #[arg(long, default_value = CATEGORY_BOOST_PATTERN)]
    pub category_boost: String,
    #[arg(long, default_value = CATEGORY_SUM_PATTERN)]
    pub category_sum: String,
    #[arg(long, default_value = LEXICAL_MARKER_PATTERN)]
    pub lexical_marker: String,
    #[arg(long, default_value = FIELD_WEIGHT_PATTERN)]
    pub field_weight: String,
    #[arg(long, default_value = BRAND_BOOST_PATTERN)]
    pub brand_boost: String,
}

impl Default for PatternVocabulary {
    fn default() -> Self {
        Self {
            first_pass_label: FIRST_PASS_LABEL.to_string(),
            second_pass_label: SECOND_PASS_LABEL.to_string(),
            threshold_label: THRESHOLD_LABEL.to_string(),
            range_query: RANGE_QUERY_PATTERN.to_string(),
            function_query: FUNCTION_QUERY_PATTERN.to_string(),
            exact_match: EXACT_MATCH_PATTERN.to_string(),
            standard_field: STANDARD_FIELD_PATTERN.to_string(),
            category_boost: CATEGORY_BOOST_PATTERN.to_string(),
            category_sum: CATEGORY_SUM_PATTERN.to_string(),
            lexical_marker: LEXICAL_MARKER_PATTERN.to_string(),
            field_weight: FIELD_WEIGHT_PATTERN.to_string(),
            brand_boost: BRAND_BOOST_PATTERN.to_string(),
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    // Used when field weights exist but no aggregation marker was emitted.
    #[arg(long, default_value_t = 0.5)]
    pub default_multiplier: f64,

    // Function queries containing this are category boosts, not generic functions.
    #[arg(long, default_value = "if(query")]
    pub category_signature: String,

    #[arg(long, default_value_t = 2)]
    pub display_decimals: u32,

    // Display only; stored field names keep the prefix.
    #[arg(long, default_value = "search_syns_")]
    pub field_prefix_strip: String,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            default_multiplier: 0.5,
            category_signature: "if(query".to_string(),
            display_decimals: 2,
            field_prefix_strip: "search_syns_".to_string(),
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorOptions {
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub positional_fallback: bool,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub single_entry_fallback: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            positional_fallback: true,
            single_entry_fallback: true,
        }
    }
}

impl AnalysisConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LensResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LensError::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overlays only the flags the user actually typed onto `self`.
    pub fn merge_from_cli(&mut self, cli: &AnalysisConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(patterns.first_pass_label);
        update_if_present!(patterns.second_pass_label);
        update_if_present!(patterns.threshold_label);
        update_if_present!(patterns.range_query);
        update_if_present!(patterns.function_query);
        update_if_present!(patterns.exact_match);
        update_if_present!(patterns.standard_field);
        update_if_present!(patterns.category_boost);
        update_if_present!(patterns.category_sum);
        update_if_present!(patterns.lexical_marker);
        update_if_present!(patterns.field_weight);
        update_if_present!(patterns.brand_boost);

        update_if_present!(heuristics.default_multiplier);
        update_if_present!(heuristics.category_signature);
        update_if_present!(heuristics.display_decimals);
        update_if_present!(heuristics.field_prefix_strip);

        update_if_present!(locator.positional_fallback);
        update_if_present!(locator.single_entry_fallback);
    }
}

impl Heuristics {
    /// Rounds for presentation; stored values keep full precision.
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.display_decimals)
    }

    pub fn display_field_name<'a>(&self, field: &'a str) -> &'a str {
        if self.field_prefix_strip.is_empty() {
            return field;
        }
        field
            .strip_prefix(self.field_prefix_strip.as_str())
            .unwrap_or(field)
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
