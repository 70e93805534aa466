//! Unit tests for provctl
//!
//! These tests use scripted port implementations and run fast without
//! network I/O. Polling tests run on a paused tokio clock.

mod architecture;
mod config_store;
mod instance_roster;
mod prefix_validator;
mod property_tests;
