//! HETD weighting policy.
//!
//! Each teaching format is converted to "equivalent hours" with a fixed
//! multiplier. The table is built once (from defaults or the config file) and
//! passed by reference to whatever computes weighted totals.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::ConfigError;

/// Per-category hour multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    #[serde(default = "default_cm")]
    pub cm: f64,
    #[serde(default = "default_td")]
    pub td: f64,
    #[serde(default = "default_tp")]
    pub tp: f64,
}

fn default_cm() -> f64 {
    1.5
}
fn default_td() -> f64 {
    1.0
}
fn default_tp() -> f64 {
    2.0 / 3.0
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            cm: default_cm(),
            td: default_td(),
            tp: default_tp(),
        }
    }
}

impl CategoryWeights {
    /// Multiplier for `category`.
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Cm => self.cm,
            Category::Td => self.td,
            Category::Tp => self.tp,
        }
    }

    /// Weighted hours for `hours` spent in `category`.
    pub fn apply(&self, category: Category, hours: f64) -> f64 {
        hours * self.weight(category)
    }

    /// Reject weights that would make totals meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for negative or non-finite weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let w = self.weight(category);
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("weights.{}", category.marker().to_lowercase()),
                    message: format!("weight must be a finite, non-negative number (got {w})"),
                });
            }
        }
        Ok(())
    }
}
