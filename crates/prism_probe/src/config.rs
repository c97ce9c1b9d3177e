//! Probe run configuration.

use anyhow::{Context, Result};
use prism_bvh::BvhConfig;
use prism_scene::RandomSceneParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one probe run, read from a JSON file.
///
/// Every field is optional. Without a `scene` path a random sphere scene is
/// generated from `random`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Scene description to load instead of generating one
    pub scene: Option<PathBuf>,
    pub random: RandomSceneParams,
    /// Number of probe rays
    pub rays: usize,
    /// Seed for the probe rays
    pub ray_seed: u64,
    /// Tree settings; a loaded scene file's own settings take precedence
    pub bvh: BvhConfig,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            scene: None,
            random: RandomSceneParams::default(),
            rays: 100_000,
            ray_seed: 1,
            bvh: BvhConfig::default(),
        }
    }
}

impl ProbeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read probe config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid probe config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ProbeConfig =
            serde_json::from_str(r#"{ "rays": 500, "random": { "count": 20 } }"#).unwrap();

        assert_eq!(config.rays, 500);
        assert_eq!(config.random.count, 20);
        assert_eq!(config.random.seed, RandomSceneParams::default().seed);
        assert_eq!(config.scene, None);
        assert_eq!(config.bvh, BvhConfig::default());
    }

    #[test]
    fn test_load_missing_config_has_context() {
        let err = ProbeConfig::load(Path::new("/nonexistent/probe.json")).unwrap_err();
        assert!(err.to_string().contains("probe.json"));
    }
}
