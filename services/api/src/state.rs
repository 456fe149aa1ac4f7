//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources created once at startup.

use crate::config::Config;
use menuteller_core::dialog::DialogOrchestrator;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub skill: Arc<DialogOrchestrator>,
    pub config: Arc<Config>,
}
