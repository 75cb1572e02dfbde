//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Tree and read result model (FileStructure, FileContent)
//! - Error model (AccessError)
//! - Traversal and read limits
//! - Path containment and exclusion matching (PathGuard)
//! - Language detection
//! - Rendering functions for text and JSON output

pub mod config;
pub mod error;
pub mod language;
pub mod model;
pub mod paths;
pub mod render;
