//! Win patterns and grid evaluation

use std::collections::{BTreeMap, HashSet, btree_map};

use serde::{Deserialize, Serialize};

use crate::board::Grid;
use crate::error::{SlError, SlResult};
use crate::symbols::{SymbolCatalog, SymbolId};

/// Mutually-exclusive pattern family
///
/// Within one group only the best-paying matched pattern per symbol
/// counts toward the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternGroup {
    SameSymbols,
    HorizontallyLinearSymbols,
    VerticallyLinearSymbols,
    LtrDiagonallyLinearSymbols,
    RtlDiagonallyLinearSymbols,
}

/// Matching rule variant
#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    /// A symbol occurs at least `count` times anywhere on the grid
    Count { count: usize },
    /// One of the covered lines holds the same symbol at every coordinate
    Linear {
        covered_areas: Vec<Vec<(usize, usize)>>,
    },
}

/// A named win rule
#[derive(Debug, Clone, PartialEq)]
pub struct WinPattern {
    pub name: String,
    pub reward_multiplier: f64,
    pub group: PatternGroup,
    pub kind: PatternKind,
}

/// The retained pattern for one `(symbol, group)` slot
#[derive(Debug, Clone, PartialEq)]
pub struct BestWin {
    pub pattern: String,
    pub reward_multiplier: f64,
}

/// Per-symbol winning patterns for one round
///
/// Holds at most one entry per pattern group per symbol: the candidate
/// with the strictly highest reward multiplier, first insert winning
/// exact ties. Round-scoped; discarded when the round ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRecord {
    by_symbol: BTreeMap<SymbolId, BTreeMap<PatternGroup, BestWin>>,
}

impl MatchRecord {
    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Iterate winning symbols with their per-group retained patterns
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (SymbolId, &BTreeMap<PatternGroup, BestWin>)> {
        self.by_symbol.iter().map(|(id, wins)| (*id, wins))
    }

    fn record(&mut self, symbol: SymbolId, pattern: &WinPattern) {
        let slot = self.by_symbol.entry(symbol).or_default();
        match slot.entry(pattern.group) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(BestWin {
                    pattern: pattern.name.clone(),
                    reward_multiplier: pattern.reward_multiplier,
                });
            }
            btree_map::Entry::Occupied(mut entry) => {
                // Strictly higher replaces; an exact tie keeps the
                // earlier pattern.
                if pattern.reward_multiplier > entry.get().reward_multiplier {
                    entry.insert(BestWin {
                        pattern: pattern.name.clone(),
                        reward_multiplier: pattern.reward_multiplier,
                    });
                }
            }
        }
    }
}

/// Evaluate every configured pattern against a grid
///
/// Patterns are independent of each other; the per-group merge makes the
/// outcome order-independent apart from the documented first-insert
/// tie-break.
pub fn evaluate(
    patterns: &[WinPattern],
    grid: &Grid,
    catalog: &SymbolCatalog,
) -> SlResult<MatchRecord> {
    let mut record = MatchRecord::default();
    for pattern in patterns {
        match &pattern.kind {
            PatternKind::Count { count } => {
                apply_count(pattern, *count, grid, catalog, &mut record)?;
            }
            PatternKind::Linear { covered_areas } => {
                apply_linear(pattern, covered_areas, grid, catalog, &mut record)?;
            }
        }
    }
    Ok(record)
}

fn apply_count(
    pattern: &WinPattern,
    count: usize,
    grid: &Grid,
    catalog: &SymbolCatalog,
    record: &mut MatchRecord,
) -> SlResult<()> {
    let mut tallies = vec![0usize; catalog.len()];
    for id in grid.cells() {
        let slot = tallies.get_mut(id).ok_or_else(|| {
            SlError::InputContract(format!("grid cell holds unknown symbol id {id}"))
        })?;
        *slot += 1;
    }

    for (id, tally) in tallies.into_iter().enumerate() {
        if tally >= count && !catalog.get(id)?.is_bonus() {
            record.record(id, pattern);
        }
    }
    Ok(())
}

fn apply_linear(
    pattern: &WinPattern,
    covered_areas: &[Vec<(usize, usize)>],
    grid: &Grid,
    catalog: &SymbolCatalog,
    record: &mut MatchRecord,
) -> SlResult<()> {
    // A symbol wins a given pattern at most once even when several of its
    // lines match; the first matching line claims it.
    let mut claimed: HashSet<SymbolId> = HashSet::new();

    for line in covered_areas {
        let mut symbols = Vec::with_capacity(line.len());
        for &(row, column) in line {
            let id = grid.get(row, column).ok_or_else(|| {
                SlError::Configuration(format!(
                    "covered area coordinate {row}:{column} is outside the {}x{} grid",
                    grid.rows(),
                    grid.columns()
                ))
            })?;
            symbols.push(id);
        }

        let Some((&first, rest)) = symbols.split_first() else {
            continue;
        };
        if rest.iter().any(|&id| id != first) {
            continue;
        }
        if catalog.get(first)?.is_bonus() || claimed.contains(&first) {
            continue;
        }

        record.record(first, pattern);
        claimed.insert(first);
    }
    Ok(())
}
