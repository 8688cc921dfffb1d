#![doc(test(attr(deny(warnings))))]

//! Formhub Display turns ticket form submissions of arbitrary shape into a
//! uniform display model: header, typed fields, tables, and a financial
//! summary, plus a terminal renderer for that model.
//!
//! ```
//! use formhub_display::{parse_ticket, DisplayEngine};
//!
//! let ticket = parse_ticket(r#"{"id": "1", "title": "Empty"}"#).unwrap();
//! let model = DisplayEngine::default().build_display(&ticket);
//! assert_eq!(model.fields.len(), 1);
//! ```

pub mod config;
pub mod currency;
pub mod display;
pub mod errors;
pub mod form;
pub mod render;
pub mod ticket;
pub mod utils;

use std::sync::Once;

pub use config::{ConfigManager, DisplayConfig};
pub use display::model::DisplayModel;
pub use display::DisplayEngine;
pub use errors::{DisplayError, DisplayResult};
pub use form::FormSubmission;
pub use ticket::{parse_ticket, Ticket};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Formhub display tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
