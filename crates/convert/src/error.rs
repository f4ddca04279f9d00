use csv2ofx_core::PeriodError;
use thiserror::Error;

/// Everything that can go wrong inside the conversion engine.
///
/// The row-level variants (`MalformedAmount`, `UnparseableDate`,
/// `MissingRequiredField`) are recovered locally by the orchestrator: the
/// offending row is excluded and counted, never aborting the run. The
/// remaining variants are configuration or output failures and fail the
/// whole conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),

    #[error("unparseable date: {0:?}")]
    UnparseableDate(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error(transparent)]
    InvertedRange(#[from] PeriodError),

    #[error("no transactions left to export after filtering")]
    EmptyTransactionSet,

    #[error("cannot write output: {0}")]
    NoOutputTarget(#[from] std::io::Error),
}

impl ConvertError {
    /// Row-level errors exclude one row; everything else fails the run.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            ConvertError::MalformedAmount(_)
                | ConvertError::UnparseableDate(_)
                | ConvertError::MissingRequiredField(_)
        )
    }
}
