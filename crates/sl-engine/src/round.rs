//! Round orchestration and the result snapshot

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::board::{self, Grid};
use crate::config::GameConfig;
use crate::error::SlResult;
use crate::patterns;
use crate::reward;

/// Immutable outcome of one evaluated round
///
/// Serializes with the reporting wire names; empty sections are omitted
/// entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    /// The board, row-major, as symbol names
    pub matrix: Vec<Vec<String>>,
    /// Total payout for the round
    pub reward: f64,
    /// Winning pattern names per symbol, sorted
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub applied_winning_combinations: BTreeMap<String, Vec<String>>,
    /// Bonus symbols on the board in row-major order; present only when
    /// at least one pattern matched
    #[serde(rename = "applied_bonus_symbol", skip_serializing_if = "Vec::is_empty")]
    pub applied_bonus_symbols: Vec<String>,
}

/// Play one full round: generate a grid, match patterns, aggregate the
/// reward
pub fn play_round<R: Rng + ?Sized>(
    config: &GameConfig,
    betting_amount: f64,
    rng: &mut R,
) -> SlResult<RoundResult> {
    let grid = board::generate(config, rng)?;
    evaluate_grid(config, &grid, betting_amount)
}

/// Evaluate an existing grid (forced outcomes, acceptance tests)
///
/// This is the deterministic tail of [`play_round`]: no randomness is
/// consumed past board generation.
pub fn evaluate_grid(
    config: &GameConfig,
    grid: &Grid,
    betting_amount: f64,
) -> SlResult<RoundResult> {
    let catalog = config.catalog();

    let record = patterns::evaluate(config.patterns(), grid, catalog)?;
    let reward = reward::aggregate(betting_amount, grid, &record, catalog)?;
    debug!("round reward: {reward}");

    let matrix = grid
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|&id| catalog.get(id).map(|symbol| symbol.name.clone()))
                .collect::<SlResult<Vec<_>>>()
        })
        .collect::<SlResult<Vec<_>>>()?;

    let mut applied_winning_combinations = BTreeMap::new();
    for (id, wins) in record.iter() {
        let mut names: Vec<String> = wins.values().map(|win| win.pattern.clone()).collect();
        names.sort();
        applied_winning_combinations.insert(catalog.get(id)?.name.clone(), names);
    }

    let applied_bonus_symbols = if applied_winning_combinations.is_empty() {
        Vec::new()
    } else {
        let mut names = Vec::new();
        for id in grid.cells() {
            let symbol = catalog.get(id)?;
            if symbol.is_bonus() {
                names.push(symbol.name.clone());
            }
        }
        names
    };

    Ok(RoundResult {
        matrix,
        reward,
        applied_winning_combinations,
        applied_bonus_symbols,
    })
}
