//! Assembly error types.
//!
//! Only degenerate generation requests are errors. Data-quality problems in
//! individual questions are handled by documented fallbacks and logged.

use thiserror::Error;

/// Errors that can occur when assembling exam models.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// The question pool is empty.
    #[error("question pool is empty")]
    EmptyPool,

    /// Zero exam models were requested.
    #[error("at least one exam model must be requested")]
    NoModels,
}

impl AssembleError {
    /// Returns `true` if the error is caused by the generation request rather
    /// than by the question pool.
    pub fn is_config_error(&self) -> bool {
        matches!(self, AssembleError::NoModels)
    }
}
