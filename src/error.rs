use thiserror::Error;

/// Severity classification used to route [`PipelineError::log`] to the right
/// `log` macro, mirroring the severity tiers the teacher project attaches to
/// its own error enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Critical,
    Low,
}

/// The four error kinds the evaluation pipeline can raise. Everything else
/// (missing sections, absent dates, empty skill lists) is represented as
/// empty/nil fields with a degraded confidence, never as an `Err`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("unsupported document format: {mime}")]
    UnsupportedFormat { mime: String },

    #[error("failed to extract text from document: {reason}")]
    ExtractionFailed { reason: String },

    #[error("weights must sum to 1.0 (±0.01), got {sum:.4}")]
    InvalidWeights { sum: f64 },

    #[error("backend '{backend}' unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub fn unsupported_format(mime: impl Into<String>) -> Self {
        Self::UnsupportedFormat { mime: mime.into() }
    }

    pub fn extraction_failed(reason: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            reason: reason.into(),
        }
    }

    pub fn invalid_weights(sum: f64) -> Self {
        Self::InvalidWeights { sum }
    }

    pub fn backend_unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// `InvalidWeights` and the two `C1` variants are fatal for the
    /// evaluation; `BackendUnavailable` is always recovered locally by the
    /// caller (the affected tier is skipped), so it is logged as a warning
    /// rather than an error regardless of where it originates.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnsupportedFormat { .. }
            | Self::ExtractionFailed { .. }
            | Self::InvalidWeights { .. } => ErrorSeverity::Critical,
            Self::BackendUnavailable { .. } => ErrorSeverity::Low,
        }
    }

    pub fn log(&self, context: &str) {
        match self.severity() {
            ErrorSeverity::Critical => log::error!("[{}] {}", context, self),
            ErrorSeverity::Low => log::warn!("[{}] {}", context, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_kinds_are_critical() {
        assert_eq!(
            PipelineError::unsupported_format("image/png").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            PipelineError::extraction_failed("no text recovered").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            PipelineError::invalid_weights(2.5).severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn backend_unavailable_is_low_severity() {
        assert_eq!(
            PipelineError::backend_unavailable("embedding", "model not loaded").severity(),
            ErrorSeverity::Low
        );
    }

    #[test]
    fn messages_are_human_readable() {
        let err = PipelineError::invalid_weights(1.5);
        assert!(err.to_string().contains("1.5000"));
    }
}
