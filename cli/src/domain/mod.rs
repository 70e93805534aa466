//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod prefix;
pub mod roster;
pub mod sanitize;
pub mod verdict;
pub mod workflow;

pub use config::{ClientConfig, validate_config_key, validate_config_value};
pub use error::{ApiError, ConfigError, WorkflowError};
pub use prefix::Prefix;
pub use roster::{Liveness, RosterEntry};
pub use verdict::{Rejection, Verdict};
pub use workflow::{Banner, BannerKind, Effect, Outcome, Phase, Workflow};
