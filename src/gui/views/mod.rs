//! View modules for the GUI
//!
//! - `transactions` - Transaction list with refresh, refund and CSV export
//! - `settings` - Backend connection and session settings
//!
//! Each view is an `impl GuiApp` block exposing a `view_*` method that takes
//! `&mut egui::Ui`; they are called from `App::update` in `app.rs`.

pub mod settings;
pub mod transactions;

pub use settings::SettingsFormState;
