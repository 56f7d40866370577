//! # sl-engine — one-round scratch-card game engine
//!
//! Evaluates a single round of a probability-driven grid game: fills a
//! board with symbols drawn from configured weighted distributions,
//! detects which configured win patterns the board satisfies, and
//! computes the payout including sequential modification by bonus
//! symbols.
//!
//! ## Architecture
//!
//! ```text
//! GameConfig (symbol catalog + weight tables + win patterns)
//!     │
//!     v
//! board::generate ──rng──> Grid
//!     │
//!     v
//! patterns::evaluate ──> MatchRecord
//!     │
//!     v
//! reward::aggregate ──> RoundResult
//! ```
//!
//! The stages form a strict sequential chain and run synchronously to
//! completion; the configuration is immutable after load and safely
//! shared across concurrently evaluated rounds. The rng draw order is
//! fixed (two draws per cell, row-major), so a seeded source reproduces
//! a round exactly.

pub mod board;
pub mod config;
pub mod error;
pub mod patterns;
pub mod reward;
pub mod round;
pub mod sampler;
pub mod symbols;

pub use board::Grid;
pub use config::{CellWeightTable, GameConfig, WeightTable};
pub use error::{SlError, SlResult};
pub use patterns::{BestWin, MatchRecord, PatternGroup, PatternKind, WinPattern};
pub use round::{RoundResult, evaluate_grid, play_round};
pub use symbols::{BonusImpact, Symbol, SymbolCatalog, SymbolId};
