//! Top-level module for the finite-context modeling system.
//!
//! This module provides an order-k Markov model over bytes, including:
//! - Context-table training (`ContextModel`)
//! - Per-context follower counts (`FrequencyTable`)
//! - Additive smoothing and alphabet handling (`smoothing`)
//! - A portable binary model format (`codec`)
//! - Average information content scoring (`scorer`)
//! - Nearest-context resolution for unseen contexts (`backoff`)
//! - Stochastic sequence generation (`generator`)

/// Order-k context table learned from a training pass.
///
/// Handles transition counting, order validation and read-only lookup
/// for the scorer and the generator.
pub mod context_model;

/// Follower counts for a single context.
///
/// Tracks how often each symbol was observed immediately after one
/// context, and exposes totals for smoothing and weighted selection.
pub mod frequency_table;

/// Additive-smoothing probability estimation and alphabet extraction.
pub mod smoothing;

/// Fixed-layout binary persistence for trained models.
///
/// Covers the portable interchange format as well as the fast snapshot
/// cache used to skip retraining on unchanged inputs.
pub mod codec;

/// Average information content (bits/symbol) of a text under a model.
pub mod scorer;

/// Edit-distance resolution of contexts absent from the model.
///
/// Substitutes the nearest observed context, breaking ties by observed
/// frequency mass.
pub mod backoff;

/// Sequential stochastic sampling from a trained model.
pub mod generator;
