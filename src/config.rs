use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LoanError, Result};

/// engine configuration
///
/// The defaults reproduce the servicing rules exactly; they only need
/// changing for what-if analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// balance at or below which a loan counts as retired
    pub payoff_tolerance: Money,
    /// extra-payment projections stop after `term_months * projection_horizon_factor` periods
    pub projection_horizon_factor: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            payoff_tolerance: Money::from_decimal(dec!(0.01)),
            projection_horizon_factor: 2,
        }
    }
}

impl EngineConfig {
    /// load from json, missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.payoff_tolerance.is_positive() {
            return Err(LoanError::InvalidConfiguration {
                message: format!("payoff tolerance must be positive, got {}", self.payoff_tolerance),
            });
        }

        if self.projection_horizon_factor == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "projection horizon factor must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// longest projection allowed for a loan of `term_months`
    pub fn projection_horizon(&self, term_months: u32) -> u32 {
        term_months.saturating_mul(self.projection_horizon_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.payoff_tolerance, Money::CENT);
        assert_eq!(config.projection_horizon(12), 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{ "projectionHorizonFactor": 3 }"#).unwrap();
        assert_eq!(config.projection_horizon_factor, 3);
        assert_eq!(config.payoff_tolerance, Money::CENT);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = EngineConfig::from_json(r#"{ "payoffTolerance": "0" }"#);
        assert!(matches!(err, Err(LoanError::InvalidConfiguration { .. })));

        let err = EngineConfig::from_json(r#"{ "projectionHorizonFactor": 0 }"#);
        assert!(matches!(err, Err(LoanError::InvalidConfiguration { .. })));

        let err = EngineConfig::from_json("not json");
        assert!(matches!(err, Err(LoanError::Serialization(_))));
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let value = serde_json::to_value(EngineConfig::default()).unwrap();
        assert_eq!(value["payoffTolerance"], serde_json::json!("0.01"));
        assert_eq!(value["projectionHorizonFactor"], serde_json::json!(2));
        assert!(value.get("payoff_tolerance").is_none());

        let config = EngineConfig::from_json(r#"{ "payoffTolerance": "1.00" }"#).unwrap();
        assert_eq!(config.payoff_tolerance, Money::from_major(1));
    }
}
