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

//! Driver registry and compatibility aliases.
//!
//! Descriptors and aliases are registered once through [RegistryBuilder]. The
//! resulting [DriverRegistry] is immutable and may be shared between threads
//! without locking.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{debug, warn};
use static_assertions::assert_impl_all;

use crate::config::InspectionPolicy;
use crate::descriptor::DriverDescriptor;
use crate::driver::Driver;
use crate::probe::LibraryProbe;
use crate::{Error, ErrorKind, Result};

/// Builder of a driver registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    drivers: HashMap<String, Arc<DriverDescriptor>>,
    aliases: BTreeMap<String, String>,
}

/// Immutable registry of driver descriptors.
#[derive(Debug, Clone)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<DriverDescriptor>>,
    aliases: BTreeMap<String, (String, Arc<DriverDescriptor>)>,
}

assert_impl_all!(DriverRegistry: Send, Sync);

impl RegistryBuilder {
    /// Start with an empty registry.
    pub fn new() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Register a driver descriptor.
    pub fn register(&mut self, descriptor: DriverDescriptor) -> Result<()> {
        let name = descriptor.name().to_string();
        if self.drivers.contains_key(&name) {
            return Err(Error::new_with_driver(
                ErrorKind::DuplicateDriver,
                name.clone(),
                format!("Driver {} is already registered", name),
            ));
        }

        debug!("Registering driver {}", name);
        let _ = self.drivers.insert(name, Arc::new(descriptor));
        Ok(())
    }

    /// Register a legacy name for a driver.
    ///
    /// The canonical driver does not have to be registered yet, aliases are
    /// checked in [build](RegistryBuilder::build).
    pub fn alias<L, C>(&mut self, legacy: L, canonical: C) -> Result<()>
    where
        L: Into<String>,
        C: Into<String>,
    {
        let legacy = legacy.into();
        if let Some(existing) = self.aliases.get(&legacy) {
            return Err(Error::new_with_driver(
                ErrorKind::AliasConfiguration,
                legacy.clone(),
                format!("Alias {} already points to driver {}", legacy, existing),
            ));
        }

        let _ = self.aliases.insert(legacy, canonical.into());
        Ok(())
    }

    /// Validate aliases and freeze the registry.
    pub fn build(self) -> Result<DriverRegistry> {
        let mut aliases = BTreeMap::new();
        for (legacy, canonical) in &self.aliases {
            let invalid = |msg: String| {
                Error::new_with_driver(ErrorKind::AliasConfiguration, legacy.clone(), msg)
            };

            if self.drivers.contains_key(legacy) {
                return Err(invalid(format!(
                    "Alias {} shadows a registered driver with the same name",
                    legacy
                )));
            }

            if self.aliases.contains_key(canonical) {
                return Err(invalid(format!(
                    "Alias {} points to another alias {}",
                    legacy, canonical
                )));
            }

            let descriptor = self.drivers.get(canonical).ok_or_else(|| {
                invalid(format!(
                    "Alias {} points to unknown driver {}",
                    legacy, canonical
                ))
            })?;

            debug!("Registering alias {} for driver {}", legacy, canonical);
            let _ = aliases.insert(legacy.clone(), (canonical.clone(), Arc::clone(descriptor)));
        }

        Ok(DriverRegistry {
            drivers: self.drivers,
            aliases,
        })
    }
}

impl DriverRegistry {
    /// Find a driver by its canonical name.
    pub fn lookup(&self, name: &str) -> Result<Arc<DriverDescriptor>> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::new_unknown_driver(name))
    }

    /// Find a driver by its legacy name.
    ///
    /// The result is the same object that [lookup](DriverRegistry::lookup)
    /// returns for the canonical name.
    pub fn resolve_alias(&self, name: &str) -> Option<Arc<DriverDescriptor>> {
        self.aliases
            .get(name)
            .map(|(_, descriptor)| Arc::clone(descriptor))
    }

    /// Canonical name behind a legacy name.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.aliases
            .get(name)
            .map(|(canonical, _)| canonical.as_str())
    }

    /// Find a driver by either its canonical or its legacy name.
    pub fn resolve(&self, name: &str) -> Result<Arc<DriverDescriptor>> {
        if let Some((canonical, descriptor)) = self.aliases.get(name) {
            warn!(
                "Driver name {} is deprecated, use {} instead",
                name, canonical
            );
            return Ok(Arc::clone(descriptor));
        }

        self.lookup(name)
    }

    /// Resolve a name and construct the driver.
    pub fn construct<P, I>(&self, name: &str, probe: &P, inspection: &I) -> Result<Driver>
    where
        P: LibraryProbe + ?Sized,
        I: InspectionPolicy + ?Sized,
    {
        self.resolve(name)?.construct(probe, inspection)
    }

    /// Whether the name is a driver or an alias.
    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Canonical names of all drivers, sorted.
    pub fn driver_names(&self) -> Vec<&str> {
        let mut result: Vec<_> = self.drivers.keys().map(String::as_str).collect();
        result.sort_unstable();
        result
    }

    /// Legacy names with their canonical names.
    pub fn aliases(&self) -> BTreeMap<&str, &str> {
        self.aliases
            .iter()
            .map(|(legacy, (canonical, _))| (legacy.as_str(), canonical.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use std::sync::Arc;

    use super::{DriverRegistry, RegistryBuilder};
    use crate::descriptor::{Binding, DriverDescriptor};
    use crate::modules::{agent, pxe};
    use crate::probe::StaticProbe;
    use crate::ErrorKind;

    #[cfg(feature = "ucs")]
    fn descriptor(name: &str) -> DriverDescriptor {
        use crate::modules::ucs;
        DriverDescriptor::new(
            name,
            Binding::new("ucs", ucs::power).with_prerequisite(ucs::SDK),
            Binding::new("pxe", pxe::boot),
            Binding::new("agent", agent::deploy),
            Binding::new("ucs", ucs::management).with_prerequisite(ucs::SDK),
        )
    }

    #[cfg(not(feature = "ucs"))]
    fn descriptor(name: &str) -> DriverDescriptor {
        use crate::interfaces::{ManagementInterface, PowerInterface};
        use crate::modules::{BmcManagement, BmcPower, Protocol};

        static PROTOCOL: Protocol = Protocol {
            name: "Fake",
            required: &[],
            optional: &[],
            ports: &[],
            choices: &[],
            exactly_one_of: &[],
            terminal_port: None,
            boot_devices: &[],
            sensors: false,
        };

        fn power() -> Box<dyn PowerInterface> {
            Box::new(BmcPower::new(&PROTOCOL))
        }

        fn management() -> Box<dyn ManagementInterface> {
            Box::new(BmcManagement::new(&PROTOCOL))
        }

        DriverDescriptor::new(
            name,
            Binding::new("fake", power).with_prerequisite("UcsSdk"),
            Binding::new("pxe", pxe::boot),
            Binding::new("agent", agent::deploy),
            Binding::new("fake", management),
        )
    }

    fn registry() -> DriverRegistry {
        let mut builder = RegistryBuilder::new();
        builder.register(descriptor("new.Driver")).unwrap();
        builder.register(descriptor("Other")).unwrap();
        builder.alias("OldDriver", "new.Driver").unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_duplicate() {
        let mut builder = RegistryBuilder::new();
        builder.register(descriptor("Driver")).unwrap();
        let err = builder.register(descriptor("Driver")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateDriver);
        assert_eq!(err.driver(), Some("Driver"));
    }

    #[test]
    fn test_lookup() {
        let registry = registry();
        assert_eq!(registry.lookup("Other").unwrap().name(), "Other");
        let err = registry.lookup("Missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownDriver);
        assert_eq!(err.driver(), Some("Missing"));
        // Lookup does not follow aliases
        let err = registry.lookup("OldDriver").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownDriver);
    }

    #[test]
    fn test_resolve_alias() {
        let registry = registry();
        let via_alias = registry.resolve_alias("OldDriver").unwrap();
        let canonical = registry.lookup("new.Driver").unwrap();
        assert!(Arc::ptr_eq(&via_alias, &canonical));
        assert!(registry.resolve_alias("new.Driver").is_none());
        assert!(registry.resolve_alias("Missing").is_none());
        assert_eq!(registry.canonical_name("OldDriver"), Some("new.Driver"));
    }

    #[test]
    fn test_resolve() {
        let registry = registry();
        assert!(Arc::ptr_eq(
            &registry.resolve("OldDriver").unwrap(),
            &registry.resolve("new.Driver").unwrap()
        ));
        assert_eq!(
            registry.resolve("Missing").unwrap_err().kind(),
            ErrorKind::UnknownDriver
        );
    }

    #[test]
    fn test_introspection() {
        let registry = registry();
        assert_eq!(registry.driver_names(), vec!["Other", "new.Driver"]);
        assert_eq!(
            registry.aliases().into_iter().collect::<Vec<_>>(),
            vec![("OldDriver", "new.Driver")]
        );
        assert!(registry.contains("OldDriver"));
        assert!(!registry.contains("Missing"));
    }

    #[test]
    fn test_alias_twice() {
        let mut builder = RegistryBuilder::new();
        builder.alias("Old", "A").unwrap();
        let err = builder.alias("Old", "B").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AliasConfiguration);
    }

    #[test]
    fn test_alias_chain() {
        let mut builder = RegistryBuilder::new();
        builder.register(descriptor("Driver")).unwrap();
        builder.alias("A", "Driver").unwrap();
        builder.alias("B", "A").unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AliasConfiguration);
        assert_eq!(err.driver(), Some("B"));
    }

    #[test]
    fn test_alias_chain_reverse_order() {
        let mut builder = RegistryBuilder::new();
        builder.register(descriptor("Driver")).unwrap();
        builder.alias("Z", "Driver").unwrap();
        builder.alias("A", "Z").unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AliasConfiguration);
        assert!(err.to_string().contains("another alias"));
    }

    #[test]
    fn test_alias_to_itself() {
        let mut builder = RegistryBuilder::new();
        builder.alias("Loop", "Loop").unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AliasConfiguration);
    }

    #[test]
    fn test_alias_unknown_target() {
        let mut builder = RegistryBuilder::new();
        builder.alias("Old", "Missing").unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AliasConfiguration);
        assert!(err.to_string().contains("unknown driver Missing"));
    }

    #[test]
    fn test_alias_shadows_driver() {
        let mut builder = RegistryBuilder::new();
        builder.register(descriptor("Driver")).unwrap();
        builder.register(descriptor("Other")).unwrap();
        builder.alias("Driver", "Other").unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AliasConfiguration);
    }

    #[test]
    fn test_construct_missing_sdk() {
        let registry = registry();
        let err = registry
            .construct("OldDriver", &StaticProbe::default(), &|_: &str| false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DriverLoadFailed);
        assert_eq!(err.driver(), Some("new.Driver"));
        assert!(err.to_string().contains("UcsSdk"));

        let driver = registry
            .construct("OldDriver", &StaticProbe::new(["UcsSdk"]), &|_: &str| false)
            .unwrap();
        assert_eq!(driver.name(), "new.Driver");
    }
}
