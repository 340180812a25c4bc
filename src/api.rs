use crate::analysis::{Analyzer, DocumentExplanation};
use crate::config::AnalysisConfig;
use crate::error::LensResult;
use crate::response::{ResultDocument, SearchResponse};
use crate::tree::{decode_forest, ExplanationForest};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// Why the forest is missing, when it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Absence {
    NoDebugData,
    NoExplainData,
}

/// One loaded search response, ready to explain any of its documents.
///
/// The explain forest is decoded once at construction and shared read-only;
/// every breakdown request runs its own traversal.
pub struct ExplainSession {
    analyzer: Analyzer,
    response: SearchResponse,
    forest: Result<Arc<ExplanationForest>, Absence>,
}

impl ExplainSession {
    pub fn new(response: SearchResponse, config: &AnalysisConfig) -> LensResult<Self> {
        Ok(Self::with_analyzer(Analyzer::new(config)?, response))
    }

    /// Session over an already compiled analyzer.
    pub fn with_analyzer(analyzer: Analyzer, response: SearchResponse) -> Self {
        let forest = match &response.debug {
            None => Err(Absence::NoDebugData),
            Some(debug) => match debug.explain_payload() {
                None => Err(Absence::NoExplainData),
                Some(raw) => Ok(Arc::new(decode_forest(raw))),
            },
        };

        match &forest {
            Ok(f) => info!(
                "Loaded {} documents, {} explain entries",
                response.docs.len(),
                f.len()
            ),
            Err(absence) => warn!(
                "Loaded {} documents without explain data ({:?})",
                response.docs.len(),
                absence
            ),
        }

        Self {
            analyzer,
            response,
            forest,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> LensResult<Self> {
        Self::load_with(path, Analyzer::new(config)?)
    }

    pub fn load_with<P: AsRef<Path>>(path: P, analyzer: Analyzer) -> LensResult<Self> {
        let path = path.as_ref();
        info!("Reading search response: {}", path.display());
        let response = SearchResponse::load_from_file(path)?;
        Ok(Self::with_analyzer(analyzer, response))
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn response(&self) -> &SearchResponse {
        &self.response
    }

    pub fn docs(&self) -> &[ResultDocument] {
        &self.response.docs
    }

    pub fn forest(&self) -> Option<Arc<ExplanationForest>> {
        self.forest.as_ref().ok().cloned()
    }

    /// The answer every document would get when the response has nothing to explain.
    pub fn unavailable(&self) -> Option<DocumentExplanation> {
        match self.forest {
            Ok(_) => None,
            Err(Absence::NoDebugData) => Some(DocumentExplanation::NoDebugData),
            Err(Absence::NoExplainData) => Some(DocumentExplanation::NoExplainData),
        }
    }

    pub fn explain(&self, index: usize) -> DocumentExplanation {
        match &self.forest {
            Ok(forest) => self.analyzer.explain_in_forest(self.docs(), forest, index),
            Err(_) => self
                .unavailable()
                .unwrap_or(DocumentExplanation::NotFound),
        }
    }

    /// Every document, in response order. Documents are analyzed in parallel.
    pub fn explain_all(&self) -> Vec<DocumentExplanation> {
        (0..self.response.docs.len())
            .into_par_iter()
            .map(|index| self.explain(index))
            .collect()
    }
}
