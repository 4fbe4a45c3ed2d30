use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::repository::LineupRepository;

/// Shared server state: an immutable repository snapshot plus analysis
/// settings. Cloning shares the snapshot; per-request filtering copies,
/// never mutates.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<LineupRepository>,
    pub analysis: AnalysisConfig,
}

impl AppState {
    pub fn new(repository: LineupRepository, analysis: AnalysisConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            analysis,
        }
    }
}
