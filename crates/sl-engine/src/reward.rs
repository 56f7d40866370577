//! Reward aggregation

use log::debug;

use crate::board::Grid;
use crate::error::{SlError, SlResult};
use crate::patterns::MatchRecord;
use crate::symbols::{SymbolCatalog, SymbolKind};

/// Combine matched patterns and bonus symbols into the round's payout
///
/// Each winning symbol contributes `betting_amount * its reward
/// multiplier * the product of its retained per-group pattern
/// multipliers`. A zero subtotal ends the round as a loss before any
/// bonus symbol is considered — a bonus symbol cannot create a win out of
/// nothing. Otherwise every bonus symbol on the grid modifies the running
/// total, in row-major encounter order.
///
/// Deterministic given the same grid and betting amount.
pub fn aggregate(
    betting_amount: f64,
    grid: &Grid,
    record: &MatchRecord,
    catalog: &SymbolCatalog,
) -> SlResult<f64> {
    if betting_amount <= 0.0 {
        return Err(SlError::RewardCalculation(format!(
            "the betting amount must be greater than 0, got {betting_amount}"
        )));
    }

    let mut subtotal = 0.0;
    for (id, wins) in record.iter() {
        let symbol = catalog.get(id)?;
        let SymbolKind::Standard { reward_multiplier } = symbol.kind else {
            // Bonus symbols never win patterns.
            continue;
        };
        let pattern_product: f64 = wins.values().map(|win| win.reward_multiplier).product();
        subtotal += betting_amount * reward_multiplier * pattern_product;
    }

    if subtotal == 0.0 {
        debug!("no pattern matched, round is a loss");
        return Ok(0.0);
    }

    let mut total = subtotal;
    for id in grid.cells() {
        let symbol = catalog.get(id)?;
        if symbol.is_bonus() {
            total = symbol.apply_bonus(total)?;
        }
    }

    debug!("subtotal {subtotal}, total after bonus symbols {total}");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{self, PatternGroup, PatternKind, WinPattern};
    use crate::symbols::{BonusImpact, Symbol};

    // Ids: 0 = A(x5), 1 = B(x3), 2 = 10x, 3 = +1000, 4 = MISS.
    fn catalog() -> SymbolCatalog {
        SymbolCatalog::new(vec![
            Symbol::standard("A", 5.0).unwrap(),
            Symbol::standard("B", 3.0).unwrap(),
            Symbol::bonus("10x", BonusImpact::MultiplyReward, 10.0, 0.0).unwrap(),
            Symbol::bonus("+1000", BonusImpact::ExtraBonus, 0.0, 1000.0).unwrap(),
            Symbol::bonus("MISS", BonusImpact::Miss, 0.0, 0.0).unwrap(),
        ])
        .unwrap()
    }

    fn count_pattern(name: &str, multiplier: f64, count: usize) -> WinPattern {
        WinPattern {
            name: name.into(),
            reward_multiplier: multiplier,
            group: PatternGroup::SameSymbols,
            kind: PatternKind::Count { count },
        }
    }

    #[test]
    fn test_betting_amount_must_be_positive() {
        let grid = Grid::from_rows(vec![vec![0]]).unwrap();
        let record = MatchRecord::default();
        assert!(aggregate(0.0, &grid, &record, &catalog()).is_err());
        assert!(aggregate(-5.0, &grid, &record, &catalog()).is_err());
    }

    #[test]
    fn test_zero_subtotal_short_circuits_bonus_symbols() {
        // A multiply bonus is on the grid but nothing matched.
        let grid = Grid::from_rows(vec![vec![0, 1], vec![2, 1]]).unwrap();
        let record = MatchRecord::default();
        let reward = aggregate(100.0, &grid, &record, &catalog()).unwrap();
        assert_eq!(reward, 0.0);
    }

    #[test]
    fn test_pattern_multipliers_compound_per_symbol() {
        // Four As; two patterns in distinct groups retained for A.
        let grid = Grid::from_rows(vec![vec![0, 0], vec![0, 0]]).unwrap();
        let catalog = catalog();
        let patterns = vec![
            count_pattern("four_of_a_kind", 2.0, 4),
            WinPattern {
                name: "top_row".into(),
                reward_multiplier: 3.0,
                group: PatternGroup::HorizontallyLinearSymbols,
                kind: PatternKind::Linear {
                    covered_areas: vec![vec![(0, 0), (0, 1)]],
                },
            },
        ];
        let record = patterns::evaluate(&patterns, &grid, &catalog).unwrap();

        // 10 * 5 * 2 * 3
        let reward = aggregate(10.0, &grid, &record, &catalog).unwrap();
        assert_eq!(reward, 300.0);
    }

    #[test]
    fn test_bonus_symbols_apply_in_scan_order() {
        // Three As win; the grid carries +1000 before 10x in row-major
        // order, so the extra amount is multiplied as well.
        let grid = Grid::from_rows(vec![vec![0, 3], vec![0, 2], vec![0, 4]]).unwrap();
        let catalog = catalog();
        let record = patterns::evaluate(
            &[count_pattern("three_of_a_kind", 2.0, 3)],
            &grid,
            &catalog,
        )
        .unwrap();

        // Subtotal 100 * 5 * 2 = 1000, then +1000, then x10, then miss.
        let reward = aggregate(100.0, &grid, &record, &catalog).unwrap();
        assert_eq!(reward, 20_000.0);
    }

    #[test]
    fn test_malformed_bonus_application_is_fatal() {
        let catalog = SymbolCatalog::new(vec![
            Symbol::standard("A", 5.0).unwrap(),
            Symbol::bonus("0x", BonusImpact::MultiplyReward, 0.0, 0.0).unwrap(),
        ])
        .unwrap();
        let grid = Grid::from_rows(vec![vec![0, 0], vec![0, 1]]).unwrap();
        let record = patterns::evaluate(
            &[count_pattern("three_of_a_kind", 1.0, 3)],
            &grid,
            &catalog,
        )
        .unwrap();

        assert!(aggregate(100.0, &grid, &record, &catalog).is_err());
    }
}
