//! Planning errors.
//!
//! Every error is detected while the plan is being built, before any
//! resource exists, so a failure always means "no plan at all".

/// Errors that abort topology planning
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),
}

impl PlanError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        PlanError::Configuration(message.into())
    }
}
