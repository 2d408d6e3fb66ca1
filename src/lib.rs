//! Attendance ("frequência") tracking for recurring game sessions, backed by
//! the Frequentium REST API.
//!
//! The core is [`reconciler::Reconciler`], which makes a game's stored
//! attendance match a desired set of players with the fewest writes.

pub mod config;
pub mod diff;
pub mod error;
pub mod frequentium;
pub mod handler;
pub mod import;
pub mod model;
pub mod reconciler;
pub mod roster;
pub mod store;
