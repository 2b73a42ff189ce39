//! Per-node fetch error reporting
//!
//! A failed fetch ends only the task that hit it. Instead of discarding the
//! error the engine hands it to an [`ErrorSink`].

use crate::FetchError;

/// Receives the fetch error of every node whose expansion failed
pub trait ErrorSink: Send + Sync + 'static {
    fn report(&self, error: &FetchError);
}

/// Logs fetch errors as warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrors;

impl ErrorSink for LogErrors {
    fn report(&self, error: &FetchError) {
        tracing::warn!("Error: {}", error);
    }
}

/// Drops fetch errors
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreErrors;

impl ErrorSink for IgnoreErrors {
    fn report(&self, _error: &FetchError) {}
}

impl<F> ErrorSink for F
where
    F: Fn(&FetchError) + Send + Sync + 'static,
{
    fn report(&self, error: &FetchError) {
        self(error)
    }
}
