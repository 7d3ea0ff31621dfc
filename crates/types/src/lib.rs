#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the gantry diagnostics subsystem
//!
//! This crate provides the plain data model shared across the workspace:
//! problem payloads, severities, and source locations. Types here carry no
//! validation logic and no behavior beyond construction and display.

pub mod problem;

pub use problem::{Problem, ProblemId, Severity, SourceLocation};
