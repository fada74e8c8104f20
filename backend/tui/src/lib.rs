//! Terminal front-end for the receipt expense form.
//!
//! Exposes the ratatui state, key handling and drawing used by `receiptdesk ui`.

pub mod app;
pub mod input;
pub mod render;
pub mod runner;

pub use app::AppState;
pub use input::{handle_key_event, Action};
pub use render::draw_ui;
pub use runner::run;
