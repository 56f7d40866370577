//! Symbol definitions and the symbol catalog

use serde::Serialize;

use crate::error::{SlError, SlResult};

/// Index of a symbol in its catalog
///
/// Grids and weight tables refer to symbols by id; names only matter at
/// the configuration and reporting edges.
pub type SymbolId = usize;

/// Effect a bonus symbol has on the running reward total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusImpact {
    /// Multiply the running total by the symbol's reward multiplier
    MultiplyReward,
    /// Add the symbol's extra amount to the running total
    ExtraBonus,
    /// Leave the running total unchanged
    Miss,
}

/// Symbol behavior variant
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// Pays `reward_multiplier` times the bet when it wins a pattern
    Standard { reward_multiplier: f64 },
    /// Modifies the round total after pattern wins are summed
    Bonus {
        impact: BonusImpact,
        reward_multiplier: f64,
        extra: f64,
    },
}

/// A symbol definition
///
/// Constructed once at configuration load, immutable thereafter, and
/// shared read-only by every round. The name is the unique identifier and
/// doubles as the serialization token.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    /// Create a standard symbol
    pub fn standard(name: impl Into<String>, reward_multiplier: f64) -> SlResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SlError::Configuration(
                "the name of a standard symbol must not be blank".into(),
            ));
        }
        if reward_multiplier <= 0.0 {
            return Err(SlError::Configuration(format!(
                "the reward multiplier of standard symbol '{name}' must be greater than 0"
            )));
        }
        Ok(Self {
            name,
            kind: SymbolKind::Standard { reward_multiplier },
        })
    }

    /// Create a bonus symbol
    ///
    /// `reward_multiplier` and `extra` must both be non-negative, and may
    /// only both be strictly positive when the impact is [`BonusImpact::Miss`].
    pub fn bonus(
        name: impl Into<String>,
        impact: BonusImpact,
        reward_multiplier: f64,
        extra: f64,
    ) -> SlResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SlError::Configuration(
                "the name of a bonus symbol must not be blank".into(),
            ));
        }
        if reward_multiplier < 0.0 || extra < 0.0 {
            return Err(SlError::Configuration(format!(
                "the reward multiplier and extra of bonus symbol '{name}' cannot be negative"
            )));
        }
        if impact != BonusImpact::Miss && reward_multiplier > 0.0 && extra > 0.0 {
            return Err(SlError::Configuration(format!(
                "the reward multiplier and extra of bonus symbol '{name}' cannot both be positive"
            )));
        }
        Ok(Self {
            name,
            kind: SymbolKind::Bonus {
                impact,
                reward_multiplier,
                extra,
            },
        })
    }

    /// Check if this is a bonus symbol
    pub fn is_bonus(&self) -> bool {
        matches!(self.kind, SymbolKind::Bonus { .. })
    }

    /// Apply this bonus symbol's effect to a running total
    ///
    /// The result must stay strictly positive; anything else means the
    /// symbol definition is malformed.
    pub fn apply_bonus(&self, running_total: f64) -> SlResult<f64> {
        let SymbolKind::Bonus {
            impact,
            reward_multiplier,
            extra,
        } = &self.kind
        else {
            return Err(SlError::RewardCalculation(format!(
                "symbol '{}' is not a bonus symbol",
                self.name
            )));
        };

        let result = match impact {
            BonusImpact::MultiplyReward => running_total * reward_multiplier,
            BonusImpact::ExtraBonus => running_total + extra,
            BonusImpact::Miss => running_total,
        };

        if result <= 0.0 {
            return Err(SlError::RewardCalculation(format!(
                "bonus symbol '{}' left a non-positive reward ({result})",
                self.name
            )));
        }
        Ok(result)
    }
}

/// The full set of symbols usable on a board
///
/// Ids are positions in catalog order. Immutable after configuration
/// load; safely shared across concurrently evaluated rounds.
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    /// Create a catalog, rejecting empty sets and duplicate names
    pub fn new(symbols: Vec<Symbol>) -> SlResult<Self> {
        if symbols.is_empty() {
            return Err(SlError::Configuration(
                "the symbol catalog must not be empty".into(),
            ));
        }
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].iter().any(|s| s.name == symbol.name) {
                return Err(SlError::Configuration(format!(
                    "duplicate symbol name '{}'",
                    symbol.name
                )));
            }
        }
        Ok(Self { symbols })
    }

    /// Get a symbol by id
    pub fn get(&self, id: SymbolId) -> SlResult<&Symbol> {
        self.symbols.get(id).ok_or_else(|| {
            SlError::InputContract(format!("symbol id {id} is not in the catalog"))
        })
    }

    /// Look up a symbol id by name
    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.symbols.iter().position(|s| s.name == name)
    }

    /// Number of symbols in the catalog
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate symbols in id order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
