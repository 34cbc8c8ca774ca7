//! Presentation seam
//!
//! The flows return values; a `Presenter` decides how they reach a person.

use secrecy::ExposeSecret;

use crate::create::CreateReport;
use crate::link::ShareLink;
use crate::reveal::RevealReport;

pub trait Presenter {
    fn display_result(&mut self, link: &ShareLink);
    fn display_error(&mut self, message: &str);
    fn display_secret(&mut self, text: &str);
}

/// Route a create outcome. Returns true on success.
pub fn present_create(report: &CreateReport, presenter: &mut dyn Presenter) -> bool {
    match &report.outcome {
        Ok(link) => {
            presenter.display_result(link);
            true
        }
        Err(failure) => {
            presenter.display_error(&failure.message());
            false
        }
    }
}

/// Route a reveal outcome. Returns true on success.
pub fn present_reveal(report: &RevealReport, presenter: &mut dyn Presenter) -> bool {
    match &report.outcome {
        Ok(secret) => {
            presenter.display_secret(secret.expose_secret());
            true
        }
        Err(failure) => {
            presenter.display_error(failure.message());
            false
        }
    }
}
