//! Game configuration: wire format, conversion, validation
//!
//! The engine consumes a validated [`GameConfig`]; this module owns the
//! JSON wire format and every consistency check between its parts.
//! Parsing state is local to a single call — nothing here is shared or
//! mutable across loads.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{SlError, SlResult};
use crate::patterns::{PatternGroup, PatternKind, WinPattern};
use crate::symbols::{BonusImpact, Symbol, SymbolCatalog, SymbolId};

/// Symbol weights resolved against the catalog
///
/// Entry order is the configuration document order; the sampler's
/// tie-break depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    weights: Vec<(SymbolId, f64)>,
}

impl WeightTable {
    /// Create a table, rejecting empty tables, duplicate entries and
    /// negative weights
    pub fn new(weights: Vec<(SymbolId, f64)>) -> SlResult<Self> {
        if weights.is_empty() {
            return Err(SlError::Configuration(
                "a weight table must not be empty".into(),
            ));
        }
        for (i, (id, weight)) in weights.iter().enumerate() {
            if *weight < 0.0 {
                return Err(SlError::Configuration(format!(
                    "weight {weight} for symbol id {id} is negative"
                )));
            }
            if weights[..i].iter().any(|(other, _)| other == id) {
                return Err(SlError::Configuration(format!(
                    "symbol id {id} appears twice in one weight table"
                )));
            }
        }
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &[(SymbolId, f64)] {
        &self.weights
    }
}

/// A weight table scoped to a single standard-category cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellWeightTable {
    pub row: usize,
    pub column: usize,
    pub table: WeightTable,
}

/// Validated, immutable configuration for the whole game
///
/// Built once (from JSON or programmatically), then shared read-only by
/// every round.
#[derive(Debug, Clone)]
pub struct GameConfig {
    rows: usize,
    columns: usize,
    catalog: SymbolCatalog,
    cell_tables: Vec<CellWeightTable>,
    bonus_table: WeightTable,
    patterns: Vec<WinPattern>,
}

impl GameConfig {
    /// Assemble and validate a configuration
    pub fn new(
        rows: usize,
        columns: usize,
        catalog: SymbolCatalog,
        cell_tables: Vec<CellWeightTable>,
        bonus_table: WeightTable,
        patterns: Vec<WinPattern>,
    ) -> SlResult<Self> {
        if rows == 0 || columns == 0 {
            return Err(SlError::Configuration(format!(
                "the board must have positive dimensions, got {rows}x{columns}"
            )));
        }

        for table in &cell_tables {
            if table.row >= rows || table.column >= columns {
                return Err(SlError::Configuration(format!(
                    "cell weight table at {}:{} is outside the {rows}x{columns} board",
                    table.row, table.column
                )));
            }
        }
        for row in 0..rows {
            for column in 0..columns {
                let covering = cell_tables
                    .iter()
                    .filter(|t| t.row == row && t.column == column)
                    .count();
                if covering != 1 {
                    return Err(SlError::Configuration(format!(
                        "board cell {row}:{column} is covered by {covering} standard weight tables, expected exactly 1"
                    )));
                }
            }
        }

        let all_tables = cell_tables
            .iter()
            .map(|t| &t.table)
            .chain(std::iter::once(&bonus_table));
        for table in all_tables {
            for (id, _) in table.weights() {
                catalog.get(*id)?;
            }
        }

        if patterns.is_empty() {
            return Err(SlError::Configuration(
                "at least one win pattern is required".into(),
            ));
        }
        for pattern in &patterns {
            if patterns
                .iter()
                .filter(|other| other.name == pattern.name)
                .count()
                > 1
            {
                return Err(SlError::Configuration(format!(
                    "duplicate win pattern name '{}'",
                    pattern.name
                )));
            }
            match &pattern.kind {
                PatternKind::Count { count } => {
                    if *count == 0 {
                        return Err(SlError::Configuration(format!(
                            "win pattern '{}' needs a count of at least 1",
                            pattern.name
                        )));
                    }
                }
                PatternKind::Linear { covered_areas } => {
                    if covered_areas.is_empty() {
                        return Err(SlError::Configuration(format!(
                            "win pattern '{}' has no covered areas",
                            pattern.name
                        )));
                    }
                    for line in covered_areas {
                        if line.is_empty() {
                            return Err(SlError::Configuration(format!(
                                "win pattern '{}' has an empty covered area",
                                pattern.name
                            )));
                        }
                        for (row, column) in line {
                            if *row >= rows || *column >= columns {
                                return Err(SlError::Configuration(format!(
                                    "win pattern '{}' covers {row}:{column}, outside the {rows}x{columns} board",
                                    pattern.name
                                )));
                            }
                        }
                    }
                }
            }
        }

        Ok(Self {
            rows,
            columns,
            catalog,
            cell_tables,
            bonus_table,
            patterns,
        })
    }

    /// Parse and validate a configuration from its JSON wire format
    pub fn from_json(json: &str) -> SlResult<Self> {
        let raw: RawConfig = serde_json::from_str(json).map_err(|e| {
            SlError::Configuration(format!("failed to parse configuration: {e}"))
        })?;
        Self::from_raw(raw)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn patterns(&self) -> &[WinPattern] {
        &self.patterns
    }

    /// Resolve the weight table for a generated cell
    ///
    /// Bonus cells share the single board-wide table; standard cells use
    /// their cell-scoped one.
    pub fn table_for(&self, row: usize, column: usize, bonus: bool) -> Option<&WeightTable> {
        if bonus {
            Some(&self.bonus_table)
        } else {
            self.cell_tables
                .iter()
                .find(|t| t.row == row && t.column == column)
                .map(|t| &t.table)
        }
    }

    fn from_raw(raw: RawConfig) -> SlResult<Self> {
        let mut symbols = Vec::with_capacity(raw.symbols.len());
        for (name, symbol) in raw.symbols {
            symbols.push(match symbol {
                RawSymbol::Standard { reward_multiplier } => {
                    Symbol::standard(name, reward_multiplier)?
                }
                RawSymbol::Bonus {
                    impact,
                    reward_multiplier,
                    extra,
                } => Symbol::bonus(name, impact.into(), reward_multiplier, extra)?,
            });
        }
        let catalog = SymbolCatalog::new(symbols)?;

        let mut cell_tables = Vec::with_capacity(raw.probabilities.standard_symbols.len());
        for table in raw.probabilities.standard_symbols {
            cell_tables.push(CellWeightTable {
                row: table.row,
                column: table.column,
                table: resolve_weights(table.symbols, &catalog)?,
            });
        }
        let bonus_table = resolve_weights(raw.probabilities.bonus_symbols.symbols, &catalog)?;

        let mut patterns = Vec::with_capacity(raw.win_combinations.len());
        for (name, pattern) in raw.win_combinations {
            patterns.push(match pattern {
                RawPattern::SameSymbols {
                    reward_multiplier,
                    count,
                    group,
                } => WinPattern {
                    name,
                    reward_multiplier,
                    group,
                    kind: PatternKind::Count { count },
                },
                RawPattern::LinearSymbols {
                    reward_multiplier,
                    group,
                    covered_areas,
                } => {
                    let covered_areas = covered_areas
                        .iter()
                        .map(|line| line.iter().map(|c| parse_coordinate(c)).collect())
                        .collect::<SlResult<Vec<Vec<_>>>>()?;
                    WinPattern {
                        name,
                        reward_multiplier,
                        group,
                        kind: PatternKind::Linear { covered_areas },
                    }
                }
            });
        }

        Self::new(raw.rows, raw.columns, catalog, cell_tables, bonus_table, patterns)
    }
}

/// Turn name-keyed weights into id-keyed ones, document order preserved
fn resolve_weights(
    entries: Vec<(String, f64)>,
    catalog: &SymbolCatalog,
) -> SlResult<WeightTable> {
    let mut weights = Vec::with_capacity(entries.len());
    for (name, weight) in entries {
        let id = catalog.id_of(&name).ok_or_else(|| {
            SlError::Configuration(format!(
                "weight table references unknown symbol '{name}'"
            ))
        })?;
        weights.push((id, weight));
    }
    WeightTable::new(weights)
}

/// Parse a `"row:column"` covered-area coordinate
fn parse_coordinate(text: &str) -> SlResult<(usize, usize)> {
    let invalid = || {
        SlError::Configuration(format!(
            "invalid covered area coordinate '{text}', expected 'row:column'"
        ))
    };
    let (row, column) = text.split_once(':').ok_or_else(|| invalid())?;
    Ok((
        row.trim().parse().map_err(|_| invalid())?,
        column.trim().parse().map_err(|_| invalid())?,
    ))
}

// ---------------------------------------------------------------------------
// Wire format

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    rows: usize,
    columns: usize,
    #[serde(deserialize_with = "ordered_map")]
    symbols: Vec<(String, RawSymbol)>,
    probabilities: RawProbabilities,
    #[serde(deserialize_with = "ordered_map")]
    win_combinations: Vec<(String, RawPattern)>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawSymbol {
    Standard {
        reward_multiplier: f64,
    },
    Bonus {
        impact: RawImpact,
        #[serde(default)]
        reward_multiplier: f64,
        #[serde(default)]
        extra: f64,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawImpact {
    MultiplyReward,
    ExtraBonus,
    Miss,
}

impl From<RawImpact> for BonusImpact {
    fn from(impact: RawImpact) -> Self {
        match impact {
            RawImpact::MultiplyReward => BonusImpact::MultiplyReward,
            RawImpact::ExtraBonus => BonusImpact::ExtraBonus,
            RawImpact::Miss => BonusImpact::Miss,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProbabilities {
    standard_symbols: Vec<RawCellTable>,
    bonus_symbols: RawBonusTable,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCellTable {
    row: usize,
    column: usize,
    #[serde(deserialize_with = "ordered_map")]
    symbols: Vec<(String, f64)>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBonusTable {
    #[serde(deserialize_with = "ordered_map")]
    symbols: Vec<(String, f64)>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
enum RawPattern {
    SameSymbols {
        reward_multiplier: f64,
        count: usize,
        group: PatternGroup,
    },
    LinearSymbols {
        reward_multiplier: f64,
        group: PatternGroup,
        covered_areas: Vec<Vec<String>>,
    },
}

/// Deserialize a JSON object into key/value pairs, document order kept
///
/// `serde_json` maps would reorder keys; the sampler tie-break and the
/// first-registered pattern tie-break both depend on document order.
fn ordered_map<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OrderedMapVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "rows": 2,
        "columns": 2,
        "symbols": {
            "A": { "reward_multiplier": 5, "type": "standard" },
            "B": { "reward_multiplier": 3, "type": "standard" },
            "10x": { "reward_multiplier": 10, "type": "bonus", "impact": "multiply_reward" },
            "MISS": { "type": "bonus", "impact": "miss" }
        },
        "probabilities": {
            "standard_symbols": [
                { "row": 0, "column": 0, "symbols": { "A": 1, "B": 2 } },
                { "row": 0, "column": 1, "symbols": { "A": 1, "B": 2 } },
                { "row": 1, "column": 0, "symbols": { "A": 1, "B": 2 } },
                { "row": 1, "column": 1, "symbols": { "B": 2, "A": 1 } }
            ],
            "bonus_symbols": { "symbols": { "10x": 1, "MISS": 5 } }
        },
        "win_combinations": {
            "same_symbol_3_times": {
                "reward_multiplier": 1,
                "when": "same_symbols",
                "count": 3,
                "group": "same_symbols"
            },
            "same_symbols_horizontally": {
                "reward_multiplier": 2,
                "when": "linear_symbols",
                "group": "horizontally_linear_symbols",
                "covered_areas": [ ["0:0", "0:1"], ["1:0", "1:1"] ]
            }
        }
    }"#;

    #[test]
    fn test_parse_reference_config() {
        let config = GameConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.rows(), 2);
        assert_eq!(config.columns(), 2);
        assert_eq!(config.catalog().len(), 4);
        assert_eq!(config.patterns().len(), 2);

        // Document order survives parsing.
        let cell = config.table_for(1, 1, false).unwrap();
        let names: Vec<_> = cell
            .weights()
            .iter()
            .map(|(id, _)| config.catalog().get(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);

        let bonus = config.table_for(0, 0, true).unwrap();
        assert_eq!(bonus.weights().len(), 2);

        match &config.patterns()[1].kind {
            PatternKind::Linear { covered_areas } => {
                assert_eq!(covered_areas[0], vec![(0, 0), (0, 1)]);
            }
            other => panic!("expected a linear pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_cell_table_is_rejected() {
        let broken = CONFIG.replace(
            r#"{ "row": 1, "column": 1, "symbols": { "B": 2, "A": 1 } }"#,
            r#"{ "row": 1, "column": 0, "symbols": { "B": 2, "A": 1 } }"#,
        );
        // Cell 1:1 now has no table and 1:0 has two.
        assert!(GameConfig::from_json(&broken).is_err());
    }

    #[test]
    fn test_unknown_symbol_reference_is_rejected() {
        let broken = CONFIG.replace(r#""10x": 1, "MISS": 5"#, r#""Z": 1"#);
        assert!(GameConfig::from_json(&broken).is_err());
    }

    #[test]
    fn test_unknown_discriminators_are_rejected() {
        let bad_when = CONFIG.replace(r#""when": "same_symbols""#, r#""when": "sometimes""#);
        assert!(GameConfig::from_json(&bad_when).is_err());

        let bad_group = CONFIG.replace(
            r#""group": "horizontally_linear_symbols""#,
            r#""group": "swirly_symbols""#,
        );
        assert!(GameConfig::from_json(&bad_group).is_err());

        let bad_impact = CONFIG.replace(r#""impact": "miss""#, r#""impact": "jackpot""#);
        assert!(GameConfig::from_json(&bad_impact).is_err());
    }

    #[test]
    fn test_out_of_bounds_covered_area_is_rejected() {
        let broken = CONFIG.replace(r#"["1:0", "1:1"]"#, r#"["1:0", "1:7"]"#);
        assert!(GameConfig::from_json(&broken).is_err());
    }

    #[test]
    fn test_malformed_coordinate_is_rejected() {
        let broken = CONFIG.replace(r#""0:0", "0:1""#, r#""0-0", "0:1""#);
        assert!(GameConfig::from_json(&broken).is_err());
    }

    #[test]
    fn test_zero_count_is_rejected() {
        let broken = CONFIG.replace(r#""count": 3"#, r#""count": 0"#);
        assert!(GameConfig::from_json(&broken).is_err());
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let broken = CONFIG.replace(r#"{ "A": 1, "B": 2 } }"#, r#"{ "A": -1, "B": 2 } }"#);
        assert!(GameConfig::from_json(&broken).is_err());
    }
}
