#![allow(clippy::needless_return)]

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use strand_libs::{
    once_cell::sync::OnceCell,
    parking_lot,
    serde::{self, Deserialize, Serialize},
    serde_yaml,
    thiserror::{self, Error},
    tracing,
};

/// Number of slots a freshly constructed dynamic array starts with.
pub const DEFAULT_INITIAL_CAPACITY: usize = 5;

/// Multiplier applied to the slot count each time a dynamic array grows.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Largest accepted growth factor.
pub const MAX_GROWTH_FACTOR: usize = 16;

/// Environment variable holding the path of the global config file.
pub const STRAND_CONFIG_ENV: &str = "STRAND_CONFIG";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrandGlobalConfigError {
    #[error("global config not ready error")]
    NotReadyError,
    #[error("global config set error")]
    SetError,
    #[error("failed to open/read config file error: {0}")]
    ConfigFileError(String),
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
#[serde(default)]
pub struct DynamicArrayConfig {
    pub initial_capacity: usize,
    pub growth_factor: usize,
}

impl Default for DynamicArrayConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl DynamicArrayConfig {
    pub fn new(initial_capacity: usize, growth_factor: usize) -> Self {
        DynamicArrayConfig {
            initial_capacity,
            growth_factor,
        }
    }

    /// A growth factor below 2 would never make room for the pushed element,
    /// and a zero initial capacity would make the first growth a no-op.
    /// Growth factors above [`MAX_GROWTH_FACTOR`] are rejected.
    pub fn validate(&self) -> Result<(), StrandGlobalConfigError> {
        if self.initial_capacity == 0 {
            return Err(StrandGlobalConfigError::InvalidValue(String::from(
                "DynamicArrayConfig.initial_capacity must be at least 1",
            )));
        }
        if self.growth_factor < 2 || self.growth_factor > MAX_GROWTH_FACTOR {
            return Err(StrandGlobalConfigError::InvalidValue(format!(
                "DynamicArrayConfig.growth_factor must be within [2, {}], got {}",
                MAX_GROWTH_FACTOR, self.growth_factor
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(crate = "self::serde")]
#[serde(default)]
pub struct StrandGlobalConfig {
    #[serde(rename = "DynamicArrayConfig")]
    pub dynamic_array: DynamicArrayConfig,
}

static STRAND_GLOBAL_CONFIG: OnceCell<Arc<parking_lot::RwLock<StrandGlobalConfig>>> =
    OnceCell::new();

fn read_yaml(config_file: &Path) -> Result<String, StrandGlobalConfigError> {
    let content = std::fs::read_to_string(config_file);
    match content {
        Ok(content) => Ok(content),
        Err(e) => Err(StrandGlobalConfigError::ConfigFileError(format!(
            "{:?}: {:?}",
            config_file, e
        ))),
    }
}

impl StrandGlobalConfig {
    /// Parses a YAML document. Missing sections and keys fall back to their
    /// defaults, the result is validated before it is returned.
    pub fn from_yaml_str(content: &str) -> Result<Self, StrandGlobalConfigError> {
        if content.trim().is_empty() {
            let err_msg = String::from("yaml file not include a yaml");
            return Err(StrandGlobalConfigError::ConfigFileError(err_msg));
        }
        let conf: Self = serde_yaml::from_str(content)
            .map_err(|e| StrandGlobalConfigError::ConfigFileError(format!("{:?}", e)))?;
        conf.dynamic_array.validate()?;
        Ok(conf)
    }

    pub fn load(config_file: &Path) -> Result<Self, StrandGlobalConfigError> {
        let content = read_yaml(config_file)?;
        Self::from_yaml_str(&content)
    }

    pub fn get() -> Result<Arc<parking_lot::RwLock<Self>>, StrandGlobalConfigError> {
        let singleton = STRAND_GLOBAL_CONFIG.get();
        match singleton {
            Some(s) => Ok(s.clone()),
            None => Err(StrandGlobalConfigError::NotReadyError),
        }
    }

    pub fn set(config_file: &Path) -> Result<(), StrandGlobalConfigError> {
        let singleton = Self::load(config_file)?;
        Self::set_config(singleton)
    }

    /// Same as [`StrandGlobalConfig::set`] with the path taken from
    /// `STRAND_CONFIG`.
    pub fn set_from_env() -> Result<(), StrandGlobalConfigError> {
        let config_file = std::env::var(STRAND_CONFIG_ENV).map_err(|e| {
            StrandGlobalConfigError::ConfigFileError(format!("{}: {:?}", STRAND_CONFIG_ENV, e))
        })?;
        Self::set(&PathBuf::from(config_file))
    }

    pub fn set_config(singleton: Self) -> Result<(), StrandGlobalConfigError> {
        singleton.dynamic_array.validate()?;

        tracing::info!("StrandGlobalConfig parsed \n{:?}", singleton);

        let singleton = Arc::new(parking_lot::RwLock::new(singleton));
        let res = STRAND_GLOBAL_CONFIG.set(singleton);
        if res.is_err() {
            return Err(StrandGlobalConfigError::SetError);
        }
        Ok(())
    }
}

#[cfg(test)]
mod global_config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_section_missing() {
        let conf = StrandGlobalConfig::from_yaml_str("SomethingElse: 1\n").unwrap();
        assert_eq!(conf, StrandGlobalConfig::default());
        assert_eq!(conf.dynamic_array.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(conf.dynamic_array.growth_factor, DEFAULT_GROWTH_FACTOR);
    }

    #[test]
    fn test_partial_override() {
        let yaml = "DynamicArrayConfig:\n  initial_capacity: 16\n";
        let conf = StrandGlobalConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(conf.dynamic_array.initial_capacity, 16);
        assert_eq!(conf.dynamic_array.growth_factor, DEFAULT_GROWTH_FACTOR);
    }

    #[test]
    fn test_invalid_values() {
        let yaml = "DynamicArrayConfig:\n  growth_factor: 1\n";
        assert!(matches!(
            StrandGlobalConfig::from_yaml_str(yaml),
            Err(StrandGlobalConfigError::InvalidValue(_))
        ));

        let yaml = "DynamicArrayConfig:\n  initial_capacity: 0\n";
        assert!(matches!(
            StrandGlobalConfig::from_yaml_str(yaml),
            Err(StrandGlobalConfigError::InvalidValue(_))
        ));

        let yaml = "DynamicArrayConfig:\n  growth_factor: 17\n";
        assert!(matches!(
            StrandGlobalConfig::from_yaml_str(yaml),
            Err(StrandGlobalConfigError::InvalidValue(_))
        ));
        assert!(DynamicArrayConfig::new(1, MAX_GROWTH_FACTOR).validate().is_ok());

        let yaml = "DynamicArrayConfig:\n  growth_factor: -3\n";
        assert!(matches!(
            StrandGlobalConfig::from_yaml_str(yaml),
            Err(StrandGlobalConfigError::ConfigFileError(_))
        ));
    }

    #[test]
    fn test_empty_and_missing_file() {
        assert!(matches!(
            StrandGlobalConfig::from_yaml_str("  \n"),
            Err(StrandGlobalConfigError::ConfigFileError(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yml");
        assert!(matches!(
            StrandGlobalConfig::load(&missing),
            Err(StrandGlobalConfigError::ConfigFileError(_))
        ));
    }

    #[test]
    fn test_global_singleton() {
        assert_eq!(
            StrandGlobalConfig::get().unwrap_err(),
            StrandGlobalConfigError::NotReadyError
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DynamicArrayConfig:").unwrap();
        writeln!(file, "  initial_capacity: 8").unwrap();
        writeln!(file, "  growth_factor: 3").unwrap();

        StrandGlobalConfig::set(file.path()).unwrap();
        let conf = StrandGlobalConfig::get().unwrap();
        assert_eq!(
            conf.read().dynamic_array,
            DynamicArrayConfig::new(8, 3)
        );

        assert_eq!(
            StrandGlobalConfig::set(file.path()).unwrap_err(),
            StrandGlobalConfigError::SetError
        );
    }
}
