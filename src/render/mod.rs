//! Terminal rendering of display models.

pub mod display;
pub mod table;

pub use display::{render_display, render_table, RenderOptions};
