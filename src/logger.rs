//! Logging seam standing in for the host engine's `BotLib_Print`/`BotLib_LogWrite`.

/// Print severity, mirroring the host engine's `PRT_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Message,
}

/// A sink for the diagnostics the engine produces outside the console queue.
///
/// Implementors receive every diagnostic the engine emits, at its assigned
/// severity, in addition to (not instead of) whatever is separately queued
/// onto [`crate::console::ConsoleQueue`].
pub trait Logger {
    fn log(&self, severity: Severity, message: &str);
}

/// Default [`Logger`] forwarding to the `tracing` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Fatal | Severity::Error => tracing::error!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Message => tracing::info!("{message}"),
        }
    }
}
