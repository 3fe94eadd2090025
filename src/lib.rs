//! TxDesk: a desktop screen for reviewing a user's purchase transactions
//! and issuing refunds against a REST backend.

pub mod api;
pub mod config;
pub mod export;
pub mod gui;
pub mod operation_log;
pub mod screen;
pub mod session;
pub mod types;
pub mod user_settings;
