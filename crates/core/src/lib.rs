//! Domain types for the resource catalog.
//!
//! Holds the resource descriptors, record and payload types, the
//! right-biased merge used by updates, and payload validation. Nothing in
//! this crate performs I/O.

pub mod error;
pub mod record;
pub mod resource;
pub mod types;
