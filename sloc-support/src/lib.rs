//! # Sloc Support
//!
//! Shared helpers for the sloc service locator.
//!
//! This crate provides text rendering for error messages: short type
//! names, key lists and "did you mean?" suggestions.

pub mod rendering;
