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

//! Loading of enabled drivers.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::Config;
use crate::driver::Driver;
use crate::drivers::builtin_registry;
use crate::probe::LibraryProbe;
use crate::registry::DriverRegistry;
use crate::{Error, ErrorKind, Result};

/// Drivers enabled in the configuration, constructed once.
#[derive(Debug, Clone)]
pub struct DriverFactory {
    drivers: HashMap<String, Arc<Driver>>,
    names: Vec<String>,
}

impl DriverFactory {
    /// Construct all drivers enabled in the configuration.
    ///
    /// Fails if any of them cannot be loaded.
    pub fn new<P>(registry: &DriverRegistry, config: &Config, probe: &P) -> Result<DriverFactory>
    where
        P: LibraryProbe + ?Sized,
    {
        if config.enabled_drivers.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "No drivers are enabled in the configuration",
            ));
        }

        let mut drivers = HashMap::new();
        let mut names = Vec::with_capacity(config.enabled_drivers.len());
        // Canonical name to the name it was first enabled as
        let mut loaded: HashMap<&str, &str> = HashMap::new();
        for name in &config.enabled_drivers {
            let canonical = registry.canonical_name(name).unwrap_or(name.as_str());
            if let Some(first) = loaded.get(canonical) {
                warn!(
                    "The driver {} is specified more than once in enabled_drivers \
                     (first as {}), ignoring the duplicate",
                    name, first
                );
                continue;
            }

            let driver = registry.construct(name, probe, config)?;
            if !driver.is_supported() {
                warn!(
                    "Driver {} is not supported and is meant only for testing",
                    name
                );
            }

            debug!("Loaded driver {} as {}", driver.name(), name);
            let _ = drivers.insert(name.clone(), Arc::new(driver));
            let _ = loaded.insert(canonical, name.as_str());
            names.push(name.clone());
        }

        info!("Loaded the following drivers: {}", names.join(", "));
        Ok(DriverFactory { drivers, names })
    }

    /// Construct enabled built-in drivers, probing the configured paths.
    pub fn from_config(config: &Config) -> Result<DriverFactory> {
        let registry = builtin_registry()?;
        DriverFactory::new(&registry, config, &config.probe())
    }

    /// Get a loaded driver by the name it was enabled as.
    pub fn get(&self, name: &str) -> Result<Arc<Driver>> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::new_unknown_driver(name))
    }

    /// Names of the loaded drivers in the order they were enabled.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
