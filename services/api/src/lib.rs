//! Interview API Library Crate
//!
//! This library contains the web-facing pieces of the interview service:
//! configuration, the PostgreSQL session store, résumé extraction, API
//! handlers, and routing. The `api` binary is a thin wrapper around it.

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod pdf;
pub mod router;
pub mod state;
