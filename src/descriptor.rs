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

//! Driver descriptors and driver construction.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, error, info};
use static_assertions::assert_impl_all;

use crate::config::InspectionPolicy;
use crate::driver::Driver;
use crate::interfaces::{
    BootInterface, ConsoleInterface, DeployInterface, InspectInterface, InterfaceType,
    ManagementInterface, PowerInterface, RaidInterface, VendorInterface,
};
use crate::probe::LibraryProbe;
use crate::utils;
use crate::{Error, Result};

/// Binding of an implementation to an interface.
pub struct Binding<T: ?Sized> {
    implementation: &'static str,
    prerequisite: Option<&'static str>,
    factory: fn() -> Box<T>,
}

impl<T: ?Sized> Binding<T> {
    /// Create a binding from an implementation name and its factory.
    pub fn new(implementation: &'static str, factory: fn() -> Box<T>) -> Binding<T> {
        Binding {
            implementation,
            prerequisite: None,
            factory,
        }
    }

    /// Require an external library to be available.
    pub fn with_prerequisite(mut self, library: &'static str) -> Binding<T> {
        self.prerequisite = Some(library);
        self
    }

    /// Implementation name.
    #[inline]
    pub fn implementation(&self) -> &'static str {
        self.implementation
    }

    /// External library the implementation needs, if any.
    #[inline]
    pub fn prerequisite(&self) -> Option<&'static str> {
        self.prerequisite
    }

    fn instantiate(&self) -> Box<T> {
        debug!("Instantiating {}", self.implementation);
        (self.factory)()
    }
}

impl<T: ?Sized> Clone for Binding<T> {
    fn clone(&self) -> Binding<T> {
        Binding {
            implementation: self.implementation,
            prerequisite: self.prerequisite,
            factory: self.factory,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("implementation", &self.implementation)
            .field("prerequisite", &self.prerequisite)
            .finish()
    }
}

/// Binding of an inspection implementation.
///
/// The factory receives the name of the driver the inspector is attached to.
/// Drivers that were renamed keep inspecting under their historical name, see
/// [with_driver_name](InspectBinding::with_driver_name).
#[derive(Clone)]
pub struct InspectBinding {
    implementation: &'static str,
    driver_name: Option<&'static str>,
    factory: fn(&str) -> Box<dyn InspectInterface>,
}

impl InspectBinding {
    /// Create an inspect binding.
    pub fn new(
        implementation: &'static str,
        factory: fn(&str) -> Box<dyn InspectInterface>,
    ) -> InspectBinding {
        InspectBinding {
            implementation,
            driver_name: None,
            factory,
        }
    }

    /// Attach the inspector under a name other than the driver name.
    ///
    /// The inspection policy is consulted for this name and the inspector
    /// is created with it.
    pub fn with_driver_name(mut self, driver_name: &'static str) -> InspectBinding {
        self.driver_name = Some(driver_name);
        self
    }

    /// Implementation name.
    #[inline]
    pub fn implementation(&self) -> &'static str {
        self.implementation
    }

    /// Name the inspector is attached under, if it differs from the driver name.
    #[inline]
    pub fn driver_name(&self) -> Option<&'static str> {
        self.driver_name
    }
}

impl fmt::Debug for InspectBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectBinding")
            .field("implementation", &self.implementation)
            .field("driver_name", &self.driver_name)
            .finish()
    }
}

/// A named bundle of interface bindings.
#[derive(Debug, Clone)]
pub struct DriverDescriptor {
    name: String,
    supported: bool,
    power: Binding<dyn PowerInterface>,
    boot: Binding<dyn BootInterface>,
    deploy: Binding<dyn DeployInterface>,
    management: Binding<dyn ManagementInterface>,
    console: Option<Binding<dyn ConsoleInterface>>,
    vendor: Option<Binding<dyn VendorInterface>>,
    raid: Option<Binding<dyn RaidInterface>>,
    inspect: Option<InspectBinding>,
}

assert_impl_all!(DriverDescriptor: Send, Sync);

impl DriverDescriptor {
    /// Create a supported descriptor with the required interfaces.
    pub fn new<S: Into<String>>(
        name: S,
        power: Binding<dyn PowerInterface>,
        boot: Binding<dyn BootInterface>,
        deploy: Binding<dyn DeployInterface>,
        management: Binding<dyn ManagementInterface>,
    ) -> DriverDescriptor {
        DriverDescriptor {
            name: name.into(),
            supported: true,
            power,
            boot,
            deploy,
            management,
            console: None,
            vendor: None,
            raid: None,
            inspect: None,
        }
    }

    /// Add a console interface.
    pub fn with_console(mut self, binding: Binding<dyn ConsoleInterface>) -> DriverDescriptor {
        self.console = Some(binding);
        self
    }

    /// Add a vendor passthru interface.
    pub fn with_vendor(mut self, binding: Binding<dyn VendorInterface>) -> DriverDescriptor {
        self.vendor = Some(binding);
        self
    }

    /// Add a RAID interface.
    pub fn with_raid(mut self, binding: Binding<dyn RaidInterface>) -> DriverDescriptor {
        self.raid = Some(binding);
        self
    }

    /// Add an inspect interface, attached only when inspection is enabled.
    pub fn with_inspect(mut self, binding: InspectBinding) -> DriverDescriptor {
        self.inspect = Some(binding);
        self
    }

    /// Mark the driver as meant for testing only.
    pub fn unsupported(mut self) -> DriverDescriptor {
        self.supported = false;
        self
    }

    /// Driver name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the driver is supported in production.
    #[inline]
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Implementation names and prerequisites of the bound interfaces.
    ///
    /// Inspect is included if it is bound, regardless of whether it will be
    /// attached.
    pub fn bindings(&self) -> Vec<(InterfaceType, &'static str, Option<&'static str>)> {
        let mut result = vec![
            (
                InterfaceType::Power,
                self.power.implementation,
                self.power.prerequisite,
            ),
            (
                InterfaceType::Boot,
                self.boot.implementation,
                self.boot.prerequisite,
            ),
            (
                InterfaceType::Deploy,
                self.deploy.implementation,
                self.deploy.prerequisite,
            ),
            (
                InterfaceType::Management,
                self.management.implementation,
                self.management.prerequisite,
            ),
        ];
        if let Some(ref b) = self.console {
            result.push((InterfaceType::Console, b.implementation, b.prerequisite));
        }
        if let Some(ref b) = self.vendor {
            result.push((InterfaceType::Vendor, b.implementation, b.prerequisite));
        }
        if let Some(ref b) = self.raid {
            result.push((InterfaceType::Raid, b.implementation, b.prerequisite));
        }
        if let Some(ref b) = self.inspect {
            result.push((InterfaceType::Inspect, b.implementation, None));
        }
        result
    }

    /// External libraries required by the bound implementations.
    pub fn prerequisites(&self) -> Vec<&'static str> {
        utils::unique(self.bindings().into_iter().filter_map(|(_, _, lib)| lib))
    }

    /// Check that every external library is available.
    fn check_prerequisites<P>(&self, probe: &P) -> Result<()>
    where
        P: LibraryProbe + ?Sized,
    {
        for library in self.prerequisites() {
            if !probe.is_available(library) {
                error!(
                    "Driver {} requires library {} which is not available",
                    self.name, library
                );
                return Err(Error::new_driver_load(
                    self.name.clone(),
                    format!("Unable to import {} library", library),
                ));
            }
        }
        Ok(())
    }

    /// Create the inspect interface if inspection is enabled for this driver.
    ///
    /// Returns `None` when the descriptor has no inspect binding or when the
    /// policy disables inspection for the driver. The policy sees the
    /// binding's driver name when one is set.
    pub fn attach_inspect<I>(&self, inspection: &I) -> Option<Box<dyn InspectInterface>>
    where
        I: InspectionPolicy + ?Sized,
    {
        let binding = self.inspect.as_ref()?;
        let driver_name = binding.driver_name.unwrap_or(&self.name);
        if inspection.is_enabled(driver_name) {
            debug!(
                "Attaching inspector {} to driver {} as {}",
                binding.implementation, self.name, driver_name
            );
            Some((binding.factory)(driver_name))
        } else {
            info!(
                "Inspection is disabled, driver {} will not support inspect",
                driver_name
            );
            None
        }
    }

    /// Construct a driver.
    ///
    /// All prerequisites are probed before any implementation is
    /// instantiated. Inspect attachment is evaluated anew on every call.
    pub fn construct<P, I>(&self, probe: &P, inspection: &I) -> Result<Driver>
    where
        P: LibraryProbe + ?Sized,
        I: InspectionPolicy + ?Sized,
    {
        debug!("Constructing driver {}", self.name);
        self.check_prerequisites(probe)?;

        let inspect = self.attach_inspect(inspection);
        let implementations: BTreeMap<_, _> = self
            .bindings()
            .into_iter()
            .filter(|(kind, ..)| *kind != InterfaceType::Inspect || inspect.is_some())
            .map(|(kind, implementation, _)| (kind, implementation))
            .collect();

        Ok(Driver {
            name: self.name.clone(),
            supported: self.supported,
            power: self.power.instantiate(),
            boot: self.boot.instantiate(),
            deploy: self.deploy.instantiate(),
            management: self.management.instantiate(),
            console: self.console.as_ref().map(Binding::instantiate),
            vendor: self.vendor.as_ref().map(Binding::instantiate),
            raid: self.raid.as_ref().map(Binding::instantiate),
            inspect,
            implementations,
        })
    }
}
