//! CLI module for the mattershift command-line interface
//!
//! Argument parsing lives in [`args`]; [`commands`] bridges parsed arguments
//! to the library's batch driver and operation decoder.

pub mod args;
pub mod commands;
