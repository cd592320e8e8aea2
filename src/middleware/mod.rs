//! Server middleware
//!
//! Provides connection logging.

pub mod logging;
