//! Configuration types for terrain generation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use terrain::{Genome, IndexFormat, MeshBuilder};

use crate::errors::DriverError;
use crate::settings::Setting;

/// Mesh extent used when none is configured.
pub const DEFAULT_WORLD_SIZE: f32 = 50.0;

/// Depth used when none is configured.
pub const DEFAULT_LEVEL_OF_DETAIL: u32 = 2;

/// Deepest generation accepted. Each level roughly quadruples memory use.
///
/// Twelve levels give a 4097×4097 grid, about 16.8M vertices or roughly
/// 540 MB of vertex data with 32-bit indices.
pub const MAX_LEVEL_OF_DETAIL: u32 = 12;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_PATH_VAR: &str = "TERRAIN_CONFIG";

/// Configuration for a generation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Per-octave noise controls.
    pub genome: Genome,

    /// Number of upsamples from the 2×2 base.
    pub level_of_detail: u32,

    /// Mesh extent along the longer grid side.
    pub world_size: f32,

    /// Random seed. Entropy seeded when absent.
    pub seed: Option<u64>,

    /// Index range of the consuming renderer.
    pub index_format: IndexFormat,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            genome: Genome::default(),
            level_of_detail: DEFAULT_LEVEL_OF_DETAIL,
            world_size: DEFAULT_WORLD_SIZE,
            seed: None,
            index_format: IndexFormat::default(),
        }
    }
}

impl TerrainConfig {
    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, DriverError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Loads the file named by `TERRAIN_CONFIG`, if any, then applies
    /// `TERRAIN_SEED`, `TERRAIN_LOD` and `TERRAIN_WORLD_SIZE` overrides.
    pub fn from_env() -> Result<Self, DriverError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`TerrainConfig::from_env`] with a custom variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, DriverError> {
        let mut config = match var(CONFIG_PATH_VAR) {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };

        if let Some(seed) = var("TERRAIN_SEED") {
            config.apply(Setting::Seed(parse_var("TERRAIN_SEED", &seed)?))?;
        }
        if let Some(lod) = var("TERRAIN_LOD") {
            config.apply(Setting::SampleDepth(parse_var("TERRAIN_LOD", &lod)?))?;
        }
        if let Some(size) = var("TERRAIN_WORLD_SIZE") {
            config.apply(Setting::WorldSize(parse_var("TERRAIN_WORLD_SIZE", &size)?))?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        check_level_of_detail(self.level_of_detail)?;
        check_world_size(self.world_size)?;
        Ok(())
    }

    /// Applies one setting, rejecting values that are invalid for it.
    pub fn apply(&mut self, setting: Setting) -> Result<(), DriverError> {
        match setting {
            Setting::SampleDepth(depth) => {
                check_level_of_detail(depth)?;
                self.level_of_detail = depth;
            }
            Setting::Gene { index, value } => {
                self.genome = self.genome.with_gene(index, value)?;
            }
            Setting::WorldSize(size) => {
                check_world_size(size)?;
                self.world_size = size;
            }
            Setting::Seed(seed) => {
                self.seed = Some(seed);
            }
        }
        Ok(())
    }

    pub fn mesh_builder(&self) -> MeshBuilder {
        MeshBuilder::new(self.world_size).with_index_format(self.index_format)
    }
}

fn check_level_of_detail(depth: u32) -> Result<(), DriverError> {
    if depth > MAX_LEVEL_OF_DETAIL {
        return Err(DriverError::InvalidSetting(format!(
            "level of detail {depth} exceeds maximum {MAX_LEVEL_OF_DETAIL}"
        )));
    }
    Ok(())
}

fn check_world_size(size: f32) -> Result<(), DriverError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(DriverError::InvalidSetting(format!(
            "world size must be positive and finite, got {size}"
        )));
    }
    Ok(())
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, DriverError> {
    raw.trim()
        .parse()
        .map_err(|_| DriverError::InvalidSetting(format!("{key}={raw} is not valid")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TerrainConfig::default();
        assert_eq!(config.genome.values(), &[0.6; 7]);
        assert_eq!(config.level_of_detail, 2);
        assert_eq!(config.world_size, 50.0);
        assert_eq!(config.seed, None);
        assert_eq!(config.index_format, IndexFormat::U16);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TerrainConfig::from_json_str(r#"{"level_of_detail": 6, "seed": 9}"#).unwrap();
        assert_eq!(config.level_of_detail, 6);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.world_size, DEFAULT_WORLD_SIZE);
    }

    #[test]
    fn test_json_round_trip() {
        let config = TerrainConfig {
            genome: Genome::new(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]).unwrap(),
            level_of_detail: 7,
            world_size: 120.0,
            seed: Some(1),
            index_format: IndexFormat::U32,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""index_format":"u32""#));
        assert_eq!(TerrainConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_rejects_bad_values() {
        assert!(matches!(
            TerrainConfig::from_json_str(r#"{"genome": [1.5]}"#),
            Err(DriverError::Parse(_))
        ));
        assert!(matches!(
            TerrainConfig::from_json_str(r#"{"world_size": -1.0}"#),
            Err(DriverError::InvalidSetting(_))
        ));
        assert!(matches!(
            TerrainConfig::from_json_str(r#"{"level_of_detail": 40}"#),
            Err(DriverError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_level_of_detail_ceiling() {
        assert!(TerrainConfig::from_json_str(r#"{"level_of_detail": 12}"#).is_ok());
        assert!(matches!(
            TerrainConfig::from_json_str(r#"{"level_of_detail": 13, "index_format": "u32"}"#),
            Err(DriverError::InvalidSetting(_))
        ));

        let mut config = TerrainConfig::default();
        assert!(config.apply(Setting::SampleDepth(MAX_LEVEL_OF_DETAIL + 1)).is_err());
        assert_eq!(config.level_of_detail, DEFAULT_LEVEL_OF_DETAIL);
    }

    #[test]
    fn test_apply_settings() {
        let mut config = TerrainConfig::default();
        config.apply(Setting::SampleDepth(5)).unwrap();
        config.apply(Setting::Gene { index: 6, value: 0.0 }).unwrap();
        config.apply(Setting::WorldSize(10.0)).unwrap();
        config.apply(Setting::Seed(3)).unwrap();

        assert_eq!(config.level_of_detail, 5);
        assert_eq!(config.genome.values()[6], 0.0);
        assert_eq!(config.world_size, 10.0);
        assert_eq!(config.seed, Some(3));

        assert!(matches!(
            config.apply(Setting::Gene { index: 9, value: 0.5 }),
            Err(DriverError::Genome(_))
        ));
        assert!(config.apply(Setting::WorldSize(f32::NAN)).is_err());
        assert_eq!(config.world_size, 10.0);
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = TerrainConfig::from_vars(|key| match key {
            "TERRAIN_SEED" => Some("42".into()),
            "TERRAIN_LOD" => Some(" 4 ".into()),
            "TERRAIN_WORLD_SIZE" => Some("80".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.level_of_detail, 4);
        assert_eq!(config.world_size, 80.0);
    }

    #[test]
    fn test_from_vars_rejects_garbage() {
        let result = TerrainConfig::from_vars(|key| (key == "TERRAIN_LOD").then(|| "deep".into()));
        assert!(matches!(result, Err(DriverError::InvalidSetting(_))));
    }

    #[test]
    fn test_from_vars_missing_file() {
        let result = TerrainConfig::from_vars(|key| {
            (key == CONFIG_PATH_VAR).then(|| "/nonexistent/terrain.json".into())
        });
        assert!(matches!(result, Err(DriverError::Io(_))));
    }
}
