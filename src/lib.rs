//! PROPEDGE — Contest Prop EV & Correlated Parlay Engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod markets;
pub mod odds;
pub mod correlation;
pub mod contest;
pub mod engine;
