//! MenuTeller API Library Crate
//!
//! This library contains all the logic for the MenuTeller web service:
//! the application state, configuration, request/response envelopes,
//! handlers, and routing. The `bin/api.rs` binary is a thin wrapper around
//! this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
