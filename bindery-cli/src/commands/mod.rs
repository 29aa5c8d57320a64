//! CLI command implementations

mod build;
mod check;
mod info;
mod init;
mod rename;

pub use build::{build, BuildArgs};
pub use check::check;
pub use info::info;
pub use init::init;
pub use rename::rename;

use bindery_core::MarkupDiagnostic;

/// Summarize markup diagnostics; each one was already logged as it was found
fn report_diagnostics(diagnostics: &[MarkupDiagnostic]) {
    if !diagnostics.is_empty() {
        eprintln!(
            "warning: {} generated document(s) are not well-formed XML",
            diagnostics.len()
        );
    }
}
