//! Core types and definitions for the WATERSHED simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, commands, state snapshots, events, constants and session
//! configuration. It has no dependency on a runtime or host framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
