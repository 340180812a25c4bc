mod common;

use common::{analyzer, docs_json, nv, sample_response, EPS};
use relevance_lens::analysis::{AttributeKind, DocumentExplanation, GroupOrigin};
use relevance_lens::api::ExplainSession;
use relevance_lens::config::AnalysisConfig;
use relevance_lens::error::LensError;
use relevance_lens::response::SearchResponse;
use serde_json::json;

fn session() -> ExplainSession {
    ExplainSession::new(sample_response(), &AnalysisConfig::default()).unwrap()
}

#[test]
fn test_sample_first_document_breakdown() {
    let explanation = session().explain(0);
    let b = explanation.breakdown().expect("document 0 is analyzed");

    assert!((b.total_score - 50.245537).abs() < EPS);
    assert!((b.first_pass_score - 50.245537).abs() < EPS);
    assert_eq!(b.second_pass_score, 0.0);
    assert!((b.threshold_score - 0.74553657).abs() < EPS);

    assert_eq!(b.lexical_groups.len(), 1);
    let g = &b.lexical_groups[0];
    assert_eq!(g.origin, GroupOrigin::DirectChildren);
    assert_eq!(g.multiplier, 0.5);
    assert_eq!(g.total_score, 9.5);
    assert_eq!(g.fields.len(), 3);
    assert_eq!(g.max_field().unwrap().field, "search_syns_name_en");
    assert!((g.max_score - 7.0).abs() < EPS);
    assert!((g.calculated_total - 9.0).abs() < EPS);

    assert_eq!(b.exact_match_attributes.len(), 2);
    let brand = &b.exact_match_attributes[1];
    assert_eq!(brand.kind, AttributeKind::ExactMatch);
    assert_eq!(brand.attribute, "brand_en");
    assert_eq!(brand.value, "sheba");
    assert_eq!(brand.score, 30.0);

    // Three grouped fields plus the two exact-match weights.
    assert_eq!(b.field_weights.len(), 5);
    // All category terms scored zero: no boost, but the function itself is kept.
    assert!(b.category_boosts.is_empty());
    assert_eq!(b.function_queries.len(), 1);
    let f = &b.function_queries[0];
    assert_eq!(f.score, 0.0);
    assert!(f
        .function_expression
        .starts_with("sum(query((fms_product_category_external_id:311)^2.0,def=0.0)=0.0"));
    assert!(b.brand_boosts.is_empty());
}

#[test]
fn test_sample_second_document_category_boost() {
    let explanation = session().explain(1);
    let b = explanation.breakdown().unwrap();

    assert!((b.total_score - 52.24143).abs() < EPS);
    assert!((b.first_pass_score - 50.24143).abs() < EPS);
    assert_eq!(b.second_pass_score, 2.0);

    assert_eq!(b.category_boosts.len(), 1);
    let c = &b.category_boosts[0];
    assert_eq!(c.category_id, "311");
    assert_eq!(c.boost_value, 2.0);
    assert_eq!(c.score, 2.0);
    assert!(c.applied);
    assert!(b.function_queries.is_empty());
    assert!(b.lexical_groups.is_empty());
}

#[test]
fn test_sample_third_document_is_bare() {
    let explanation = session().explain(2);
    let b = explanation.breakdown().unwrap();
    assert!((b.total_score - 50.23631).abs() < EPS);
    assert_eq!(b.first_pass_score, 0.0);
    assert!(b.is_empty());
}

#[test]
fn test_missing_debug_data() {
    let response = SearchResponse::from_json(json!({ "docs": docs_json(&["1"]) })).unwrap();
    assert_eq!(
        analyzer().explain_document(&response, 0),
        DocumentExplanation::NoDebugData
    );
    let s = ExplainSession::new(response, &AnalysisConfig::default()).unwrap();
    assert_eq!(s.explain(0), DocumentExplanation::NoDebugData);
    assert!(s.forest().is_none());
}

#[test]
fn test_missing_explain_payload() {
    let response = SearchResponse::from_json(json!({
        "docs": docs_json(&["1"]),
        "debug": { "searchServiceDebug": {}, "solrDebug": { "explain": null } }
    }))
    .unwrap();
    assert_eq!(
        analyzer().explain_document(&response, 0),
        DocumentExplanation::NoExplainData
    );
}

#[test]
fn test_document_absent_from_explain() {
    let response = SearchResponse::from_json(json!({
        "docs": docs_json(&["1", "2"]),
        "debug": { "solrDebug": { "explain": { "nvPairs": [
            "1", nv(1.0, "combined score", vec![])
        ] } } }
    }))
    .unwrap();
    let a = analyzer();
    assert!(matches!(a.explain_document(&response, 0), DocumentExplanation::Analyzed(_)));
    assert_eq!(a.explain_document(&response, 1), DocumentExplanation::NotFound);
    assert_eq!(a.explain_document(&response, 5), DocumentExplanation::NotFound);
}

#[test]
fn test_placement_envelope_matches_normalized_shape() {
    let normalized = sample_response();
    let raw = serde_json::to_value(&normalized).unwrap();
    let enveloped = SearchResponse::from_json(json!({ "placements": [raw] })).unwrap();

    assert_eq!(enveloped.docs.len(), 3);
    assert_eq!(enveloped.num_found, 16);
    assert_eq!(enveloped.facets.len(), 2);

    let a = analyzer();
    assert_eq!(
        a.explain_document(&enveloped, 1),
        a.explain_document(&normalized, 1)
    );
}

#[test]
fn test_empty_placements_is_an_error() {
    assert!(SearchResponse::from_json(json!({ "placements": [] })).is_err());
}

#[test]
fn test_explain_all_matches_one_by_one() {
    let s = session();
    let all = s.explain_all();
    assert_eq!(all.len(), 3);
    for (i, explanation) in all.iter().enumerate() {
        assert_eq!(explanation, &s.explain(i));
    }
}

#[test]
fn test_rounded_copy_keeps_stored_precision() {
    let explanation = session().explain(0);
    let b = explanation.breakdown().unwrap();
    let shown = b.rounded(2);
    assert_eq!(shown.total_score, 50.25);
    assert_eq!(shown.threshold_score, 0.75);
    assert!((b.total_score - 50.245537).abs() < EPS);
}

#[test]
fn test_bad_pattern_fails_before_the_response_is_read() {
    let mut config = AnalysisConfig::default();
    config.patterns.field_weight = "weight((".to_string();
    match ExplainSession::load("/no/such/response.json", &config) {
        Err(LensError::Pattern { rule, .. }) => assert_eq!(rule, "field_weight"),
        other => panic!("expected pattern error, got {:?}", other.err()),
    }
}
