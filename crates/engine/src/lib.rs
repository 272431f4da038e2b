//! # Pair Analysis Engine
//!
//! Orchestrates the analysis stages into a single call. Given two bar series and
//! optional live prices, `PairAnalyzer::analyze` returns either an `AnalysisReport`
//! carrying the `Decision`, or an `EngineError`.
//!
//! `EngineError::InsufficientData` means "no decision this cycle" and is never
//! reported as a SKIP decision.

pub mod decision;
pub mod error;
pub mod pipeline;

pub use decision::DecisionEngine;
pub use error::EngineError;
pub use pipeline::{AnalysisReport, PairAnalyzer};
