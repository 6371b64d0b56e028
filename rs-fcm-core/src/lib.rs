//! Finite-context model (order-k Markov) toolkit.
//!
//! This crate provides the modeling core of a byte-level statistical
//! language model, including:
//! - Order-k context-table training (`ContextModel`)
//! - Additive-smoothing probability estimation
//! - Average information content scoring (bits/symbol)
//! - A portable fixed-layout binary model format
//! - Stochastic sequence generation with edit-distance backoff
//!
//! File reading and argument handling live in the thin companion
//! binaries; the core only consumes validated parameters and byte
//! buffers, and never touches process-global state.

/// Core model types, scoring and generation logic.
///
/// This module exposes the full modeling pipeline: training, smoothing,
/// persistence, scoring, backoff resolution and generation.
pub mod model;

/// Typed failures of the modeling core.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;
