// ⚠️ Dashboard errors
// The dataset is valid by construction, so the only failures are wiring defects
// (a slot, control or chart surface the presenter doesn't have) and bad user input.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("display slot '{0}' not found")]
    MissingSlot(String),

    #[error("chart surface '{0}' not found")]
    MissingSurface(String),

    #[error("profile control '{0}' not found")]
    MissingControl(String),

    #[error("unknown profile '{0}' (expected 'single' or 'couple')")]
    UnknownProfile(String),
}

impl DashboardError {
    /// True for presenter wiring defects, false for rejected user input
    pub fn is_defect(&self) -> bool {
        !matches!(self, DashboardError::UnknownProfile(_))
    }
}
