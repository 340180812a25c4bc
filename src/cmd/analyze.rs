use crate::reports;
use clap::Args;
use relevance_lens::analysis::{DocumentExplanation, ScoreBreakdown};
use relevance_lens::api::ExplainSession;
use relevance_lens::config::AnalysisConfig;
use relevance_lens::error::LensResult;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Search response JSON, normalized or as the engine's placement envelope.
    pub response: PathBuf,

    #[command(flatten)]
    pub config: AnalysisConfig,

    /// Position of the document in the result list.
    #[arg(short, long, default_value_t = 0, conflicts_with = "all")]
    pub index: usize,

    #[arg(short, long, default_value_t = false)]
    pub all: bool,

    /// Print rounded breakdowns as JSON instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentReport<'a> {
    index: usize,
    id: Option<&'a str>,
    name: Option<&'a str>,
    status: &'static str,
    breakdown: Option<ScoreBreakdown>,
}

pub fn run(args: &AnalyzeArgs, session: &ExplainSession) -> LensResult<()> {
    let explained: Vec<(usize, DocumentExplanation)> = if args.all {
        session.explain_all().into_iter().enumerate().collect()
    } else {
        vec![(args.index, session.explain(args.index))]
    };

    let decimals = session.analyzer().heuristics().display_decimals;

    if args.json {
        let reports: Vec<DocumentReport> = explained
            .iter()
            .map(|(index, explanation)| {
                let doc = session.docs().get(*index);
                DocumentReport {
                    index: *index,
                    id: doc.map(|d| d.id.as_str()),
                    name: doc.map(|d| d.name.as_str()),
                    status: explanation.status(),
                    breakdown: explanation.breakdown().map(|b| b.rounded(decimals)),
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for (index, explanation) in &explained {
        reports::print_document(
            *index,
            session.docs().get(*index),
            explanation,
            session.analyzer().heuristics(),
        );
    }
    Ok(())
}
