// Copyright 2024 The ironic-drivers Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Support for the drivers configuration file.
//!
//! The file is looked up in the following locations (first found wins):
//!
//! 1. The path from the `IRONIC_DRIVERS_CONFIG` environment variable.
//! 2. `./ironic-drivers.yaml`
//! 3. `~/.config/ironic/drivers.yaml`
//! 4. `/etc/ironic/drivers.yaml`
//!
//! Example:
//!
//! ```yaml
//! enabled_drivers:
//!   - AgentAndIPMIToolDriver
//!   - AgentAndUcsDriver
//! inspector:
//!   enabled: true
//!   disabled_drivers: [AgentAndSSHDriver]
//! probe:
//!   search_paths: [/opt/cisco/lib]
//! ```

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_derive::Deserialize;

use crate::probe::SearchPathProbe;
use crate::{Error, ErrorKind, Result};

const CONFIG_ENV: &str = "IRONIC_DRIVERS_CONFIG";

/// Whether inspection is enabled for a driver.
///
/// Consulted on every driver construction.
pub trait InspectionPolicy {
    /// Whether inspection should be attached to the driver.
    fn is_enabled(&self, driver_name: &str) -> bool;
}

impl<F> InspectionPolicy for F
where
    F: Fn(&str) -> bool,
{
    fn is_enabled(&self, driver_name: &str) -> bool {
        self(driver_name)
    }
}

/// Inspection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InspectorConfig {
    /// Whether inspection is enabled at all.
    #[serde(default)]
    pub enabled: bool,
    /// Drivers that never get inspection, even when it is enabled.
    #[serde(default)]
    pub disabled_drivers: Vec<String>,
}

impl InspectorConfig {
    /// Configuration with inspection enabled for all drivers.
    pub fn enabled() -> InspectorConfig {
        InspectorConfig {
            enabled: true,
            disabled_drivers: Vec::new(),
        }
    }

    /// Configuration with inspection disabled.
    pub fn disabled() -> InspectorConfig {
        InspectorConfig::default()
    }
}

impl InspectionPolicy for InspectorConfig {
    fn is_enabled(&self, driver_name: &str) -> bool {
        self.enabled && !self.disabled_drivers.iter().any(|d| d == driver_name)
    }
}

/// Library probing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProbeConfig {
    /// Directories to look for vendor libraries in.
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

/// Drivers configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Drivers to load on start up.
    #[serde(default)]
    pub enabled_drivers: Vec<String>,
    /// Inspection settings.
    #[serde(default)]
    pub inspector: InspectorConfig,
    /// Library probing settings.
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl InspectionPolicy for Config {
    fn is_enabled(&self, driver_name: &str) -> bool {
        self.inspector.is_enabled(driver_name)
    }
}

fn find_config() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
        warn!("{} points to {:?} which is not a file", CONFIG_ENV, path);
    }

    let current = Path::new("./ironic-drivers.yaml");
    if current.is_file() {
        match current.canonicalize() {
            Ok(val) => return Some(val),
            Err(e) => warn!("Cannot canonicalize {:?}: {}", current, e),
        }
    }

    if let Some(mut home) = dirs::home_dir() {
        home.push(".config/ironic/drivers.yaml");
        if home.is_file() {
            return Some(home);
        }
    } else {
        warn!("Cannot find home directory");
    }

    let abs = PathBuf::from("/etc/ironic/drivers.yaml");
    if abs.is_file() {
        Some(abs)
    } else {
        None
    }
}

impl Config {
    /// Parse configuration from a YAML string.
    pub fn from_yaml<S: AsRef<str>>(value: S) -> Result<Config> {
        serde_yaml::from_str(value.as_ref()).map_err(From::from)
    }

    /// Read configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot read {:?}: {}", path, e),
            )
        })?;
        let config = serde_yaml::from_reader(file)?;
        debug!("Loaded drivers configuration from {:?}", path);
        Ok(config)
    }

    /// Find and read the configuration file.
    pub fn load() -> Result<Config> {
        let path = find_config().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidConfig,
                "drivers configuration was not found in any location",
            )
        })?;
        Config::from_file(path)
    }

    /// Probe for vendor libraries according to the configuration.
    pub fn probe(&self) -> SearchPathProbe {
        if self.probe.search_paths.is_empty() {
            SearchPathProbe::default()
        } else {
            SearchPathProbe::new(self.probe.search_paths.iter().cloned())
        }
    }
}
