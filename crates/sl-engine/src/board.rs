//! Board grid and generation

use log::debug;
use rand::Rng;

use crate::config::GameConfig;
use crate::error::{SlError, SlResult};
use crate::sampler;
use crate::symbols::SymbolId;

/// Chance in percent that a cell draws from the bonus table
const BONUS_CELL_CHANCE: u8 = 10;

/// A fully populated `rows x columns` matrix of symbol ids
///
/// Owned by one round and read-only after generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<SymbolId>,
}

impl Grid {
    /// Build a grid from explicit rows (forced outcomes, tests)
    pub fn from_rows(rows: Vec<Vec<SymbolId>>) -> SlResult<Self> {
        let row_count = rows.len();
        let column_count = rows.first().map(Vec::len).unwrap_or(0);
        if row_count == 0 || column_count == 0 {
            return Err(SlError::BoardGeneration(
                "a grid needs at least one row and one column".into(),
            ));
        }
        if rows.iter().any(|row| row.len() != column_count) {
            return Err(SlError::BoardGeneration(
                "all grid rows must have the same length".into(),
            ));
        }
        Ok(Self {
            rows: row_count,
            columns: column_count,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Symbol id at a cell, `None` when out of bounds
    pub fn get(&self, row: usize, column: usize) -> Option<SymbolId> {
        if row < self.rows && column < self.columns {
            Some(self.cells[row * self.columns + column])
        } else {
            None
        }
    }

    /// Iterate all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.cells.iter().copied()
    }

    /// Iterate rows as id slices, top to bottom
    pub fn iter_rows(&self) -> impl Iterator<Item = &[SymbolId]> {
        self.cells.chunks(self.columns)
    }
}

/// Generate the round's grid from the configured weight tables
///
/// Cells are filled in row-major order. Each cell consumes exactly two
/// rng draws: a category draw in `[1, 100]` deciding bonus (`<= 10`)
/// versus standard, then one sampling draw from the matching weight
/// table. A whole round therefore consumes `2 * rows * columns` draws in
/// a fixed order — part of the reproducibility contract for seeded
/// sources, not an implementation detail.
pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> SlResult<Grid> {
    let rows = config.rows();
    let columns = config.columns();

    let mut cells = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        for column in 0..columns {
            let roll: u8 = rng.random_range(1..=100);
            let bonus_cell = roll <= BONUS_CELL_CHANCE;

            let table = config.table_for(row, column, bonus_cell).ok_or_else(|| {
                SlError::BoardGeneration(format!(
                    "no weight table matched board cell {row}:{column}"
                ))
            })?;
            cells.push(sampler::sample(table.weights(), rng)?);
        }
    }

    if rows == 0 || columns == 0 {
        return Err(SlError::BoardGeneration(
            "generated a grid without rows or columns".into(),
        ));
    }

    debug!("generated {rows}x{columns} grid: {cells:?}");
    Ok(Grid {
        rows,
        columns,
        cells,
    })
}
