//! Reporter trait for dependency injection
//!
//! Core logic reports progress and status through this trait without being
//! coupled to a specific UI. Every method is fire-and-forget: implementations
//! must return promptly and never fail.

use bolt_schema::Provider;

pub trait Reporter: Send + Sync {
    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);

    /// Updates the progress of a download. `total` is `None` when the size is
    /// not known up front.
    fn progress(&self, label: &str, current: u64, total: Option<u64>);

    /// Status line returned by the launch endpoint.
    fn launch_status(&self, provider: Provider, status: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
    fn progress(&self, label: &str, current: u64, total: Option<u64>) {
        (**self).progress(label, current, total);
    }
    fn launch_status(&self, provider: Provider, status: &str) {
        (**self).launch_status(provider, status);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
    fn progress(&self, _: &str, _: u64, _: Option<u64>) {}
    fn launch_status(&self, _: Provider, _: &str) {}
}

/// Forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn warning(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn progress(&self, label: &str, current: u64, total: Option<u64>) {
        match total.filter(|t| *t > 0) {
            Some(total) => {
                let percent = (1000.0 * current as f64 / total as f64).round() / 10.0;
                tracing::info!("{label}... {percent:.1}%");
            }
            None => tracing::debug!("{label}... {current} bytes"),
        }
    }

    fn launch_status(&self, provider: Provider, status: &str) {
        tracing::info!(%provider, "Game launch status: '{status}'");
    }
}
