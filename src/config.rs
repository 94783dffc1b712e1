//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{AstrologyError, AstrologyResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub synastry: SynastryWeights,
    #[serde(default)]
    pub ranking: RankingWeights,
}

/// Weights of the three synastry components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynastryWeights {
    /// Moon sign element match
    #[serde(default = "default_moon_weight")]
    pub moon: f64,

    /// Ascendant sign element match
    #[serde(default = "default_ascendant_weight")]
    pub ascendant: f64,

    /// Venus (romantic) or Mercury (professional) sign element match
    #[serde(default = "default_affinity_weight")]
    pub affinity: f64,
}

impl Default for SynastryWeights {
    fn default() -> Self {
        Self {
            moon: default_moon_weight(),
            ascendant: default_ascendant_weight(),
            affinity: default_affinity_weight(),
        }
    }
}

/// Blend of individual merit and pairwise fit when a base chart is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    #[serde(default = "default_individual_weight")]
    pub individual: f64,

    #[serde(default = "default_compatibility_weight")]
    pub compatibility: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            individual: default_individual_weight(),
            compatibility: default_compatibility_weight(),
        }
    }
}

fn default_moon_weight() -> f64 { 0.4 }
fn default_ascendant_weight() -> f64 { 0.3 }
fn default_affinity_weight() -> f64 { 0.3 }
fn default_individual_weight() -> f64 { 0.6 }
fn default_compatibility_weight() -> f64 { 0.4 }

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> AstrologyResult<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AstrologyResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> AstrologyResult<()> {
        let weights = [
            ("synastry.moon", self.synastry.moon),
            ("synastry.ascendant", self.synastry.ascendant),
            ("synastry.affinity", self.synastry.affinity),
            ("ranking.individual", self.ranking.individual),
            ("ranking.compatibility", self.ranking.compatibility),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AstrologyError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}
