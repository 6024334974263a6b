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

//! Composed driver.

use std::collections::BTreeMap;

use static_assertions::assert_impl_all;

use crate::interfaces::{
    BaseInterface, BootInterface, ConsoleInterface, DeployInterface, InspectInterface,
    InterfaceType, ManagementInterface, PowerInterface, Properties, RaidInterface,
    VendorInterface,
};
use crate::task::Task;
use crate::Result;

/// A driver with all its interfaces instantiated.
///
/// Produced by [DriverDescriptor::construct](crate::DriverDescriptor::construct). Required
/// interfaces are always present, optional ones may be absent.
#[derive(Debug)]
pub struct Driver {
    pub(crate) name: String,
    pub(crate) supported: bool,
    pub(crate) power: Box<dyn PowerInterface>,
    pub(crate) boot: Box<dyn BootInterface>,
    pub(crate) deploy: Box<dyn DeployInterface>,
    pub(crate) management: Box<dyn ManagementInterface>,
    pub(crate) console: Option<Box<dyn ConsoleInterface>>,
    pub(crate) vendor: Option<Box<dyn VendorInterface>>,
    pub(crate) raid: Option<Box<dyn RaidInterface>>,
    pub(crate) inspect: Option<Box<dyn InspectInterface>>,
    pub(crate) implementations: BTreeMap<InterfaceType, &'static str>,
}

assert_impl_all!(Driver: Send, Sync);

impl Driver {
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

    /// Power interface.
    #[inline]
    pub fn power(&self) -> &dyn PowerInterface {
        self.power.as_ref()
    }

    /// Boot interface.
    #[inline]
    pub fn boot(&self) -> &dyn BootInterface {
        self.boot.as_ref()
    }

    /// Deploy interface.
    #[inline]
    pub fn deploy(&self) -> &dyn DeployInterface {
        self.deploy.as_ref()
    }

    /// Management interface.
    #[inline]
    pub fn management(&self) -> &dyn ManagementInterface {
        self.management.as_ref()
    }

    /// Console interface (if any).
    #[inline]
    pub fn console(&self) -> Option<&dyn ConsoleInterface> {
        self.console.as_deref()
    }

    /// Vendor passthru interface (if any).
    #[inline]
    pub fn vendor(&self) -> Option<&dyn VendorInterface> {
        self.vendor.as_deref()
    }

    /// RAID interface (if any).
    #[inline]
    pub fn raid(&self) -> Option<&dyn RaidInterface> {
        self.raid.as_deref()
    }

    /// Inspect interface (if attached).
    #[inline]
    pub fn inspect(&self) -> Option<&dyn InspectInterface> {
        self.inspect.as_deref()
    }

    /// Whether the interface is bound.
    pub fn has_interface(&self, interface: InterfaceType) -> bool {
        self.implementations.contains_key(&interface)
    }

    /// Bound interfaces in their canonical order.
    pub fn interfaces(&self) -> Vec<InterfaceType> {
        self.implementations.keys().copied().collect()
    }

    /// Names of the implementations behind each bound interface.
    #[inline]
    pub fn implementation_names(&self) -> &BTreeMap<InterfaceType, &'static str> {
        &self.implementations
    }

    /// Driver information properties consumed by all bound interfaces.
    pub fn get_properties(&self) -> Properties {
        let mut result = self.power.get_properties();
        result.extend(self.boot.get_properties());
        result.extend(self.deploy.get_properties());
        result.extend(self.management.get_properties());
        if let Some(ref console) = self.console {
            result.extend(console.get_properties());
        }
        if let Some(ref vendor) = self.vendor {
            result.extend(vendor.get_properties());
        }
        if let Some(ref raid) = self.raid {
            result.extend(raid.get_properties());
        }
        if let Some(ref inspect) = self.inspect {
            result.extend(inspect.get_properties());
        }
        result
    }

    /// Validate the node against every bound interface.
    ///
    /// Failures are reported per interface, validation does not stop on the
    /// first one.
    pub fn validate(&self, task: &Task) -> BTreeMap<InterfaceType, Result<()>> {
        let mut result = BTreeMap::new();
        let _ = result.insert(InterfaceType::Power, self.power.validate(task));
        let _ = result.insert(InterfaceType::Boot, self.boot.validate(task));
        let _ = result.insert(InterfaceType::Deploy, self.deploy.validate(task));
        let _ = result.insert(InterfaceType::Management, self.management.validate(task));
        if let Some(ref console) = self.console {
            let _ = result.insert(InterfaceType::Console, console.validate(task));
        }
        if let Some(ref vendor) = self.vendor {
            let _ = result.insert(InterfaceType::Vendor, vendor.validate(task));
        }
        if let Some(ref raid) = self.raid {
            let _ = result.insert(InterfaceType::Raid, raid.validate(task));
        }
        if let Some(ref inspect) = self.inspect {
            let _ = result.insert(InterfaceType::Inspect, inspect.validate(task));
        }
        result
    }
}
