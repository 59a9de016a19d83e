//! Zotero Connector protocol endpoint
//!
//! Browser connectors look for a running Zotero on port 23119. This module
//! answers the handful of calls they need to save items: ping,
//! getSelectedCollection, saveItems and saveSnapshot. Everything is routed
//! into the import pipeline instead of Zotero.

mod error;
pub mod models;
mod server;
pub mod services;
pub mod state;

pub use error::ApiError;
pub use server::{router, run};
