use crate::reports;
use clap::Args;
use relevance_lens::api::ExplainSession;
use relevance_lens::config::AnalysisConfig;
use relevance_lens::error::LensResult;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    pub response: PathBuf,

    #[command(flatten)]
    pub config: AnalysisConfig,
}

pub fn run(session: &ExplainSession) -> LensResult<()> {
    reports::print_documents(session.response());

    match session.forest() {
        Some(forest) => reports::print_forest(&forest, session.docs()),
        None => {
            if let Some(missing) = session.unavailable() {
                reports::print_absence(&missing);
            }
        }
    }
    Ok(())
}
