//! Backends module - Filesystem operations behind the session
//!
//! Provides:
//! - structure: bounded, ignore-aware tree building
//! - reader: size- and line-bounded single-file reads

pub mod reader;
pub mod structure;
