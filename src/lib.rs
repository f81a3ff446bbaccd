//! provscan - registration index for Terraform provider sources
//!
//! provscan statically scans the Go service packages of a provider checkout
//! and writes a JSON index of every resource, data source and ephemeral
//! resource: its identifier, factory function, implementing struct and
//! lifecycle callbacks.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine, package scanning and index I/O
//! - `issues`: Issue type definitions
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
