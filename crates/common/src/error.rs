//! Error classification shared by both API surfaces
//!
//! Every surface defines its own error enum and implements
//! [`ClassifiedError`] for it. The pipeline stages only ever see
//! [`PipelineError`], which is either one of those classified values or an
//! unclassified fault that is never shown to the client.

use std::fmt;

use axum::http::StatusCode;

/// Boxed underlying cause carried by classified errors
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Log severity attached to a classified error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// An error that knows how it is logged and how it is rendered on the wire.
///
/// `Display` is for logs and includes the wrapped cause; [`body`](Self::body)
/// is what the client sees and must never include it.
pub trait ClassifiedError: std::error::Error + Send + Sync + 'static {
    /// HTTP status written by the translation stage
    fn status_code(&self) -> StatusCode;

    /// Severity used by the error logging stage
    fn severity(&self) -> Severity;

    /// Variant name, stable across releases
    fn kind(&self) -> &'static str;

    /// Client-visible JSON body in the surface's wire format
    fn body(&self) -> serde_json::Value;
}

/// Error outcome of a pipeline handler
#[derive(Debug, thiserror::Error)]
pub enum PipelineError<E> {
    #[error(transparent)]
    Classified(E),

    #[error("{0:#}")]
    Unclassified(anyhow::Error),
}

impl<E: ClassifiedError> PipelineError<E> {
    /// Wrap any fault that has no classification
    pub fn unclassified(err: impl Into<anyhow::Error>) -> Self {
        PipelineError::Unclassified(err.into())
    }

    /// Severity to log at; unclassified faults are always errors
    pub fn severity(&self) -> Severity {
        match self {
            PipelineError::Classified(err) => err.severity(),
            PipelineError::Unclassified(_) => Severity::Error,
        }
    }

    /// Dynamic kind of the error, e.g. `PublicApiError::InvalidToken`
    pub fn kind(&self) -> String {
        match self {
            PipelineError::Classified(err) => {
                format!("{}::{}", short_type_name::<E>(), err.kind())
            }
            PipelineError::Unclassified(_) => "Unclassified".to_string(),
        }
    }
}

impl<E: ClassifiedError> From<E> for PipelineError<E> {
    fn from(err: E) -> Self {
        PipelineError::Classified(err)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
