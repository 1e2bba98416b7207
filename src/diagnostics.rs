//! Diagnostics
//!
//! Loader failures are reported here and nowhere else; the end user only
//! notices that a dropdown did not update.

/// Sink for diagnostic messages
pub trait Diagnostics {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes to the browser console
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleDiagnostics;

impl Diagnostics for ConsoleDiagnostics {
    fn info(&self, message: &str) {
        web_sys::console::log_1(&message.into());
    }

    fn error(&self, message: &str) {
        web_sys::console::error_1(&message.into());
    }
}
