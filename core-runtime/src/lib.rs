//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the offline scripture core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//! - Connectivity tracking
//!
//! ## Overview
//!
//! Every other core crate depends on this one for its configuration types,
//! its event vocabulary and the logging conventions shared across the
//! workspace.

pub mod config;
pub mod connectivity;
pub mod error;
pub mod events;
pub mod logging;

pub use connectivity::ConnectivityMonitor;
pub use error::{Error, Result};
