use clap::Args;
use relevance_lens::api::ExplainSession;
use relevance_lens::config::AnalysisConfig;
use relevance_lens::error::LensResult;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    pub response: PathBuf,

    #[command(flatten)]
    pub config: AnalysisConfig,

    #[arg(short, long, default_value = "fields.csv")]
    pub out: PathBuf,
}

#[derive(Serialize)]
struct FieldRow<'a> {
    doc_index: usize,
    doc_id: &'a str,
    group: &'a str,
    origin: &'static str,
    multiplier: f64,
    field: &'a str,
    term: &'a str,
    raw_score: f64,
    weighted_score: f64,
    is_max: bool,
    contribution_percent: f64,
}

pub fn run(args: &ExportArgs, session: &ExplainSession) -> LensResult<()> {
    let heuristics = session.analyzer().heuristics();
    let explained = session.explain_all();
    let mut writer = csv::Writer::from_path(&args.out)?;
    let mut rows = 0;

    for (index, (doc, explanation)) in session.docs().iter().zip(&explained).enumerate() {
        let Some(breakdown) = explanation.breakdown() else {
            continue;
        };

        for group in &breakdown.lexical_groups {
            for field in &group.fields {
                writer.serialize(FieldRow {
                    doc_index: index,
                    doc_id: &doc.id,
                    group: &group.description,
                    origin: group.origin.into(),
                    multiplier: heuristics.round(group.multiplier),
                    field: heuristics.display_field_name(&field.field),
                    term: &field.term,
                    raw_score: heuristics.round(field.raw_score),
                    weighted_score: heuristics.round(field.weighted_score),
                    is_max: field.is_max,
                    contribution_percent: heuristics.round(field.contribution_percent),
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    info!("Wrote {} field rows to {}", rows, args.out.display());
    Ok(())
}
