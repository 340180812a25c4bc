use clap::{CommandFactory, FromArgMatches, Parser};
use relevance_lens::analysis::Analyzer;
use relevance_lens::config::{AnalysisConfig, LEXICAL_MARKER_PATTERN};
use relevance_lens::error::LensError;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: AnalysisConfig,
}

fn parse(args: &[&str]) -> (AnalysisConfig, clap::ArgMatches) {
    let matches = TestCli::command().get_matches_from(std::iter::once("test").chain(args.iter().copied()));
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_cli_defaults_match_struct_defaults() {
    let (cli, _) = parse(&[]);
    let defaults = AnalysisConfig::default();
    assert_eq!(cli.heuristics.default_multiplier, defaults.heuristics.default_multiplier);
    assert_eq!(cli.heuristics.category_signature, "if(query");
    assert_eq!(cli.patterns.lexical_marker, LEXICAL_MARKER_PATTERN);
    assert!(cli.locator.positional_fallback);
    assert!(cli.locator.single_entry_fallback);
}

#[test]
fn test_partial_file_fills_from_defaults() {
    let file = write_config(r#"{ "heuristics": { "default_multiplier": 0.3 } }"#);
    let config = AnalysisConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.heuristics.default_multiplier, 0.3);
    assert_eq!(config.heuristics.display_decimals, 2);
    assert_eq!(config.patterns.lexical_marker, LEXICAL_MARKER_PATTERN);
}

#[test]
fn test_only_typed_flags_override_file() {
    let file = write_config(
        r#"{ "heuristics": { "default_multiplier": 0.3, "display_decimals": 4 },
             "locator": { "positional_fallback": false } }"#,
    );
    let mut config = AnalysisConfig::load_from_file(file.path()).unwrap();

    let (cli, matches) = parse(&["--display-decimals", "1"]);
    config.merge_from_cli(&cli, &matches);

    assert_eq!(config.heuristics.display_decimals, 1);
    // Untyped flags keep the file's values, not clap's defaults.
    assert_eq!(config.heuristics.default_multiplier, 0.3);
    assert!(!config.locator.positional_fallback);
}

#[test]
fn test_bool_flags_take_explicit_values() {
    let (cli, _) = parse(&["--single-entry-fallback", "false"]);
    assert!(!cli.locator.single_entry_fallback);
}

#[test]
fn test_missing_file_is_config_error() {
    match AnalysisConfig::load_from_file("/definitely/not/here.json") {
        Err(LensError::Config(msg)) => assert!(msg.contains("not/here.json")),
        other => panic!("expected config error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_bad_vocabulary_fails_analyzer_construction() {
    let file = write_config(r#"{ "patterns": { "field_weight": "weight((" } }"#);
    let config = AnalysisConfig::load_from_file(file.path()).unwrap();
    match Analyzer::new(&config) {
        Err(LensError::Pattern { rule, .. }) => assert_eq!(rule, "field_weight"),
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("invalid regex accepted"),
    }
}
