use crate::domain::{Decimal, ProductType};
use std::collections::HashMap;
use thiserror::Error;

/// Engine-level defaults, loaded from the environment by the host.
///
/// Densities are kg per liter and feed the liters-to-kg derivation when a
/// deal is entered in liters without a measured density.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub kerosene_density: Decimal,
    pub pvkj_density: Decimal,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

const DEFAULT_KEROSENE_DENSITY: &str = "0.78";
const DEFAULT_PVKJ_DENSITY: &str = "0.95";

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            kerosene_density: Decimal::from_str_canonical(DEFAULT_KEROSENE_DENSITY)
                .unwrap_or_else(|_| Decimal::one()),
            pvkj_density: Decimal::from_str_canonical(DEFAULT_PVKJ_DENSITY)
                .unwrap_or_else(|_| Decimal::one()),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let kerosene_density =
            parse_density(&env_map, "KEROSENE_DENSITY", DEFAULT_KEROSENE_DENSITY)?;
        let pvkj_density = parse_density(&env_map, "PVKJ_DENSITY", DEFAULT_PVKJ_DENSITY)?;

        Ok(EngineConfig {
            kerosene_density,
            pvkj_density,
        })
    }

    /// The default density for a product, kg per liter.
    pub fn default_density(&self, product: ProductType) -> Decimal {
        match product {
            ProductType::Kerosene => self.kerosene_density,
            ProductType::Pvkj => self.pvkj_density,
        }
    }
}

fn parse_density(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<Decimal, ConfigError> {
    let raw = env_map.get(key).map(|s| s.as_str()).unwrap_or(default);
    let value = Decimal::from_str_canonical(raw).map_err(|_| {
        ConfigError::InvalidValue(key.to_string(), "must be a decimal number".to_string())
    })?;
    if !value.is_positive() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be positive, got {}", value),
        ));
    }
    Ok(value)
}
