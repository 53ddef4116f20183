//! Optional TOML configuration for the console.
//!
//! Every field has a default, so an empty or partial file is valid and a
//! missing default file is not an error.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use palxel_core::RegionId;
use palxel_system_animation::Config as AnimationConfig;
use palxel_system_directory::Config as DirectoryConfig;
use palxel_system_interaction::{Config as PalxelConfig, DEFAULT_NAMESPACE, DEFAULT_NEAREST_LIMIT};
use palxel_system_lifecycle::Config as LifecycleConfig;
use serde::Deserialize;

/// File picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "palxel.toml";

/// Settings resolved from the configuration file.
#[derive(Clone, Debug)]
pub(crate) struct ConsoleConfig {
    /// Seed for the animation's random source, if fixed.
    pub(crate) seed: Option<u64>,
    /// Component configuration handed to the display.
    pub(crate) palxel: PalxelConfig,
}

// TOML schema

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    animation: TomlAnimation,
    #[serde(default)]
    menu: TomlMenu,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlGrid {
    #[serde(default = "default_regions")]
    regions: Vec<RegionId>,
    #[serde(default = "default_stagger")]
    stagger_ticks: u32,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlAnimation {
    #[serde(default = "default_frame_interval")]
    frame_interval: u32,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlMenu {
    #[serde(default = "default_namespace")]
    namespace: String,
    #[serde(default = "default_nearest_limit")]
    nearest_limit: usize,
}

fn default_regions() -> Vec<RegionId> {
    RegionId::ALL.to_vec()
}
fn default_stagger() -> u32 {
    1
}
fn default_frame_interval() -> u32 {
    1
}
fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_owned()
}
fn default_nearest_limit() -> usize {
    DEFAULT_NEAREST_LIMIT
}

impl Default for TomlGrid {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            stagger_ticks: default_stagger(),
        }
    }
}

impl Default for TomlAnimation {
    fn default() -> Self {
        Self {
            frame_interval: default_frame_interval(),
        }
    }
}

impl Default for TomlMenu {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            nearest_limit: default_nearest_limit(),
        }
    }
}

impl From<TomlConfig> for ConsoleConfig {
    fn from(toml: TomlConfig) -> Self {
        Self {
            seed: toml.seed,
            palxel: PalxelConfig {
                directory: DirectoryConfig::new(toml.grid.regions),
                lifecycle: LifecycleConfig::new(toml.grid.stagger_ticks),
                animation: AnimationConfig::new(toml.animation.frame_interval),
                namespace: toml.menu.namespace,
                nearest_limit: toml.menu.nearest_limit,
            },
        }
    }
}

/// Parses configuration from TOML text.
pub(crate) fn parse(contents: &str) -> Result<ConsoleConfig> {
    let toml: TomlConfig =
        toml::from_str(contents).context("failed to parse palxel configuration")?;
    Ok(toml.into())
}

/// Loads the explicit file when given, otherwise the default file when it
/// exists, otherwise built-in defaults.
pub(crate) fn load(explicit: Option<&Path>) -> Result<ConsoleConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                log::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(TomlConfig::default().into());
            }
            fallback
        }
    };
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    let config =
        parse(&contents).with_context(|| format!("invalid configuration in {}", path.display()))?;
    log::info!("loaded configuration from {}", path.display());
    Ok(config)
}
