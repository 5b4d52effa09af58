//! Core filter logic for Filterlink.
//!
//! This crate contains the native filter model with ZERO network dependencies.
//! Descriptors, filter values, and every value transition live here.
//!
//! # Modules
//!
//! - `filter` - Descriptors, default values, and per-kind transition engines

pub mod filter;
