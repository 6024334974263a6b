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

//! Capability interfaces.
//!
//! A driver is composed of one implementation of each of the required
//! interfaces (power, boot, deploy and management) and, optionally, of
//! console, vendor passthru, RAID and inspect implementations. None of the
//! interfaces knows anything about the driver registry.

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::task::Task;
use crate::types::{BootDevice, ConsoleInfo, PowerState, ProvisionState, SensorsData};
use crate::Result;

/// Driver information properties: key to human-readable description.
pub type Properties = BTreeMap<&'static str, &'static str>;

protocol_enum! {
    /// Name of a capability interface.
    enum InterfaceType {
        /// Power control.
        Power = "power",
        /// Network or virtual media boot.
        Boot = "boot",
        /// Operating system deployment.
        Deploy = "deploy",
        /// Chassis management.
        Management = "management",
        /// Serial console.
        Console = "console",
        /// Vendor-specific passthru methods.
        Vendor = "vendor",
        /// RAID configuration.
        Raid = "raid",
        /// Hardware inspection.
        Inspect = "inspect"
    }
}

impl InterfaceType {
    /// All interface types in their canonical order.
    pub const ALL: [InterfaceType; 8] = [
        InterfaceType::Power,
        InterfaceType::Boot,
        InterfaceType::Deploy,
        InterfaceType::Management,
        InterfaceType::Console,
        InterfaceType::Vendor,
        InterfaceType::Raid,
        InterfaceType::Inspect,
    ];

    /// Whether every driver must implement this interface.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            InterfaceType::Power
                | InterfaceType::Boot
                | InterfaceType::Deploy
                | InterfaceType::Management
        )
    }
}

/// Calls common to all interfaces.
pub trait BaseInterface: Debug + Send + Sync {
    /// Driver information properties this interface consumes.
    fn get_properties(&self) -> Properties;

    /// Validate that the node has everything this interface needs.
    ///
    /// Does not contact the hardware.
    fn validate(&self, task: &Task) -> Result<()>;
}

/// Power control.
#[async_trait]
pub trait PowerInterface: BaseInterface {
    /// Current power state of the node.
    async fn get_power_state(&self, task: &Task) -> Result<PowerState>;

    /// Power the node on.
    async fn power_on(&self, task: &mut Task) -> Result<()>;

    /// Power the node off.
    async fn power_off(&self, task: &mut Task) -> Result<()>;

    /// Hard reboot the node.
    async fn reboot(&self, task: &mut Task) -> Result<()>;
}

/// Boot configuration.
#[async_trait]
pub trait BootInterface: BaseInterface {
    /// Prepare the node to boot the deployed instance.
    async fn prepare_instance(&self, task: &mut Task) -> Result<()>;

    /// Remove anything that `prepare_instance` has set up.
    async fn clean_up_instance(&self, task: &mut Task) -> Result<()>;
}

/// Operating system deployment.
#[async_trait]
pub trait DeployInterface: BaseInterface {
    /// Prepare the node for deployment.
    async fn prepare(&self, task: &mut Task) -> Result<()>;

    /// Start deployment, returning the resulting provision state.
    async fn deploy(&self, task: &mut Task) -> Result<ProvisionState>;

    /// Tear down a deployed instance, returning the resulting provision state.
    async fn tear_down(&self, task: &mut Task) -> Result<ProvisionState>;
}

/// Chassis management.
#[async_trait]
pub trait ManagementInterface: BaseInterface {
    /// Boot devices this implementation can set.
    fn get_supported_boot_devices(&self, task: &Task) -> Vec<BootDevice>;

    /// Current boot device (if known).
    async fn get_boot_device(&self, task: &Task) -> Result<Option<BootDevice>>;

    /// Set the boot device for the next boot (or permanently).
    async fn set_boot_device(
        &self,
        task: &mut Task,
        device: BootDevice,
        persistent: bool,
    ) -> Result<()>;

    /// Sensor readings of the node.
    async fn get_sensors_data(&self, task: &Task) -> Result<SensorsData>;
}

/// Serial console.
#[async_trait]
pub trait ConsoleInterface: BaseInterface {
    /// Start the console.
    async fn start_console(&self, task: &mut Task) -> Result<()>;

    /// Stop the console.
    async fn stop_console(&self, task: &mut Task) -> Result<()>;

    /// Console connection information.
    async fn get_console(&self, task: &Task) -> Result<ConsoleInfo>;
}

/// Vendor-specific passthru methods.
#[async_trait]
pub trait VendorInterface: BaseInterface {
    /// Names of the supported methods.
    fn methods(&self) -> Vec<&'static str>;

    /// Validate a method call without executing it.
    fn validate_method(&self, task: &Task, method: &str, params: &Value) -> Result<()>;

    /// Execute a method.
    async fn call(&self, task: &mut Task, method: &str, params: Value) -> Result<Value>;
}

/// RAID configuration.
#[async_trait]
pub trait RaidInterface: BaseInterface {
    /// Apply the node's target RAID configuration.
    async fn create_configuration(&self, task: &mut Task) -> Result<ProvisionState>;

    /// Remove the RAID configuration.
    async fn delete_configuration(&self, task: &mut Task) -> Result<ProvisionState>;
}

/// Hardware inspection.
#[async_trait]
pub trait InspectInterface: BaseInterface {
    /// Start inspection, returning the resulting provision state.
    async fn inspect_hardware(&self, task: &mut Task) -> Result<ProvisionState>;
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::InterfaceType;

    #[test]
    fn test_required_interfaces() {
        let required: Vec<_> = InterfaceType::ALL
            .iter()
            .filter(|i| i.is_required())
            .map(|i| i.as_str())
            .collect();
        assert_eq!(required, vec!["power", "boot", "deploy", "management"]);
    }
}
