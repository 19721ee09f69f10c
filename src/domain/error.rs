//! Domain error types.
//!
//! The indicator/chart core is total and never returns these; errors exist
//! only at the boundary (data files, configuration, CLI input).

/// Top-level error type for finchart.
#[derive(Debug, thiserror::Error)]
pub enum FinchartError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown chart style: {value} (expected candlestick, line, or bar)")]
    InvalidChartStyle { value: String },

    #[error("invalid ledger input: {reason}")]
    LedgerInvalid { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FinchartError> for std::process::ExitCode {
    fn from(err: &FinchartError) -> Self {
        let code: u8 = match err {
            FinchartError::Io(_) => 1,
            FinchartError::ConfigParse { .. }
            | FinchartError::ConfigMissing { .. }
            | FinchartError::ConfigInvalid { .. } => 2,
            FinchartError::Data { .. } => 3,
            FinchartError::InvalidChartStyle { .. } => 4,
            FinchartError::LedgerInvalid { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
