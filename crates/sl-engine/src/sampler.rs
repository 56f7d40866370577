//! Weighted symbol sampling

use rand::Rng;

use crate::error::{SlError, SlResult};
use crate::symbols::SymbolId;

/// Draw one symbol id from a weighted table
///
/// Weights are relative; they need not sum to 1. Exactly one uniform draw
/// on `(0, 100]` is consumed per call. Entries are walked in ascending
/// weight order (equal weights keep table order) while accumulating each
/// entry's share of 100%, and the first entry whose cumulative percentage
/// strictly exceeds the draw is returned:
///
/// ```text
/// weight   share    cumulative
/// A: 1     4.76      4.76
/// B: 2     9.52     14.28
/// C: 3    14.29     28.57
/// D: 4    19.05     47.62
/// E: 5    23.81     71.43
/// F: 6    28.57    100.00
/// ```
///
/// If no cumulative value exceeds the draw (possible only through
/// floating-point effects with the draw very close to 100), the heaviest
/// entry wins, first one on ties.
///
/// Purely functional: deterministic given the same `rng` sequence.
pub fn sample<R: Rng + ?Sized>(weights: &[(SymbolId, f64)], rng: &mut R) -> SlResult<SymbolId> {
    if weights.is_empty() {
        return Err(SlError::Configuration("the weight table is empty".into()));
    }

    let x = 100.0 - rng.random_range(0.0..100.0);
    let total: f64 = weights.iter().map(|(_, weight)| weight).sum();

    // sort_by is stable: equal weights stay in table order.
    let mut ordered: Vec<&(SymbolId, f64)> = weights.iter().collect();
    ordered.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut cumulative = 0.0;
    for &(id, weight) in ordered {
        cumulative += 100.0 * weight / total;
        if cumulative > x {
            return Ok(id);
        }
    }

    let mut heaviest = &weights[0];
    for entry in &weights[1..] {
        if entry.1 > heaviest.1 {
            heaviest = entry;
        }
    }
    Ok(heaviest.0)
}
