//! GUI module for TxDesk
//!
//! This module provides the graphical user interface built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - Main GuiApp struct; drives the transactions screen and its background jobs
//! - `async_job` - Generic async job polling for background tasks
//! - `theme` - Centralized theme and styling system (AppTheme)
//! - `helpers` - Display formatting for transaction rows
//! - `notifications` - Notification log fed by screen outcomes
//! - `views` - View rendering functions (transactions, settings)
//! - `widgets` - Reusable UI widgets (transaction card, pull-to-refresh)
//!
//! ## Usage
//!
//! ```no_run
//! use txdesk::config::Config;
//! use txdesk::gui;
//!
//! let config = Config::from_env();
//! gui::launch(config).expect("Failed to launch GUI");
//! ```

mod app;
pub mod async_job;
pub mod helpers;
pub mod notifications;
pub mod theme;
pub mod views;
pub mod widgets;

// Re-export main public API
pub use app::{launch, GuiApp, GuiSection};

pub use async_job::{spawn_job, AsyncJob};
pub use helpers::{build_rows, format_amount, format_display_date, TransactionRow};
pub use notifications::NotificationEntry;
pub use theme::{configure_style, AppTheme};
pub use widgets::{CardAction, PullToRefresh};
