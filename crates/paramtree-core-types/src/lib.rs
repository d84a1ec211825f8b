//! Core types shared across paramtree facilities
//!
//! This crate provides the canonical field keys and event names used by
//! both the error facility and the logging facility, so that every crate
//! in the workspace emits the same structured-log schema.

pub mod schema;
