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

//! Power and management shared by BMC-based protocols.

use async_trait::async_trait;
use log::{debug, info};

use crate::interfaces::{BaseInterface, ManagementInterface, PowerInterface, Properties};
use crate::task::{DriverInfo, Task};
use crate::types::{BootDevice, PowerState, SensorsData};
use crate::{Error, ErrorKind, Result};

/// Parameters of a vendor protocol as stored in the node's driver_info.
#[derive(Debug, Clone, Copy)]
pub struct Protocol {
    /// Human-readable protocol name.
    pub name: &'static str,
    /// Required fields with their descriptions.
    pub required: &'static [(&'static str, &'static str)],
    /// Optional fields with their descriptions.
    pub optional: &'static [(&'static str, &'static str)],
    /// Fields that must be valid port numbers when present.
    pub ports: &'static [&'static str],
    /// Fields restricted to a fixed set of values when present.
    pub choices: &'static [(&'static str, &'static [&'static str])],
    /// Fields of which exactly one must be set (ignored when empty).
    pub exactly_one_of: &'static [&'static str],
    /// Field holding the serial console port (if consoles are supported).
    pub terminal_port: Option<(&'static str, &'static str)>,
    /// Boot devices the BMC can set.
    pub boot_devices: &'static [BootDevice],
    /// Whether the BMC reports sensor data.
    pub sensors: bool,
}

impl Protocol {
    /// Properties consumed by power and management interfaces.
    pub fn properties(&self) -> Properties {
        self.required
            .iter()
            .chain(self.optional.iter())
            .copied()
            .collect()
    }

    /// Validate the driver information.
    pub fn validate(&self, info: &DriverInfo) -> Result<()> {
        let missing: Vec<_> = self
            .required
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| !info.is_set(key))
            .collect();
        if !missing.is_empty() {
            return Err(Error::new(
                ErrorKind::MissingParameter,
                format!(
                    "Missing the following {} credentials in node's driver_info: {}",
                    self.name,
                    missing.join(", ")
                ),
            ));
        }

        for key in self.ports {
            let _ = info.port(key)?;
        }

        for (key, allowed) in self.choices {
            if let Some(value) = info.string(key) {
                if !allowed.contains(&value) {
                    return Err(Error::new(
                        ErrorKind::InvalidParameter,
                        format!(
                            "Invalid value {} for {}, supported values are: {}",
                            value,
                            key,
                            allowed.join(", ")
                        ),
                    ));
                }
            }
        }

        if !self.exactly_one_of.is_empty() {
            let given = self
                .exactly_one_of
                .iter()
                .filter(|key| info.is_set(key))
                .count();
            if given != 1 {
                return Err(Error::new(
                    ErrorKind::InvalidParameter,
                    format!(
                        "{} requires one and only one of {} to be passed",
                        self.name,
                        self.exactly_one_of.join(", ")
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Serial console port.
    pub fn terminal_port(&self, info: &DriverInfo) -> Result<u16> {
        let (key, _) = self.terminal_port.ok_or_else(|| {
            Error::new(
                ErrorKind::UnsupportedOperation,
                format!("{} does not provide a serial console", self.name),
            )
        })?;
        info.port(key)?.ok_or_else(|| {
            Error::new(
                ErrorKind::MissingParameter,
                format!("Missing '{}' parameter in node's driver_info", key),
            )
        })
    }
}

/// Power interface for a BMC protocol.
#[derive(Debug, Clone, Copy)]
pub struct BmcPower {
    protocol: &'static Protocol,
}

impl BmcPower {
    /// Create power interface for the protocol.
    pub fn new(protocol: &'static Protocol) -> BmcPower {
        BmcPower { protocol }
    }

    fn set_power_state(&self, task: &mut Task, state: PowerState, action: &str) -> Result<()> {
        self.validate(task)?;
        let node = task.node_mut(action)?;
        node.power_state = Some(state);
        debug!(
            "{} of node {} via {}: recorded power state {}",
            action, node.uuid, self.protocol.name, state
        );
        Ok(())
    }
}

impl BaseInterface for BmcPower {
    fn get_properties(&self) -> Properties {
        self.protocol.properties()
    }

    fn validate(&self, task: &Task) -> Result<()> {
        self.protocol.validate(&task.node().driver_info)
    }
}

#[async_trait]
impl PowerInterface for BmcPower {
    async fn get_power_state(&self, task: &Task) -> Result<PowerState> {
        self.validate(task)?;
        Ok(task.node().power_state.unwrap_or(PowerState::Error))
    }

    async fn power_on(&self, task: &mut Task) -> Result<()> {
        self.set_power_state(task, PowerState::On, "Power on")
    }

    async fn power_off(&self, task: &mut Task) -> Result<()> {
        self.set_power_state(task, PowerState::Off, "Power off")
    }

    async fn reboot(&self, task: &mut Task) -> Result<()> {
        self.set_power_state(task, PowerState::On, "Reboot")?;
        let node = task.node_mut("Reboot")?;
        if !node.boot_device_persistent && node.boot_device.take().is_some() {
            info!(
                "One-time boot device of node {} was consumed by reboot",
                node.uuid
            );
        }
        Ok(())
    }
}

/// Management interface for a BMC protocol.
#[derive(Debug, Clone, Copy)]
pub struct BmcManagement {
    protocol: &'static Protocol,
}

impl BmcManagement {
    /// Create management interface for the protocol.
    pub fn new(protocol: &'static Protocol) -> BmcManagement {
        BmcManagement { protocol }
    }
}

impl BaseInterface for BmcManagement {
    fn get_properties(&self) -> Properties {
        self.protocol.properties()
    }

    fn validate(&self, task: &Task) -> Result<()> {
        self.protocol.validate(&task.node().driver_info)
    }
}

#[async_trait]
impl ManagementInterface for BmcManagement {
    fn get_supported_boot_devices(&self, _task: &Task) -> Vec<BootDevice> {
        self.protocol.boot_devices.to_vec()
    }

    async fn get_boot_device(&self, task: &Task) -> Result<Option<BootDevice>> {
        self.validate(task)?;
        Ok(task.node().boot_device)
    }

    async fn set_boot_device(
        &self,
        task: &mut Task,
        device: BootDevice,
        persistent: bool,
    ) -> Result<()> {
        if !self.protocol.boot_devices.contains(&device) {
            return Err(Error::new(
                ErrorKind::InvalidParameter,
                format!(
                    "Invalid boot device {} specified for {}",
                    device, self.protocol.name
                ),
            ));
        }

        self.validate(task)?;
        let node = task.node_mut("Setting boot device")?;
        node.boot_device = Some(device);
        node.boot_device_persistent = persistent;
        debug!(
            "Boot device of node {} set to {} (persistent: {})",
            node.uuid, device, persistent
        );
        Ok(())
    }

    async fn get_sensors_data(&self, task: &Task) -> Result<SensorsData> {
        if !self.protocol.sensors {
            return Err(Error::new(
                ErrorKind::UnsupportedOperation,
                format!("{} management does not provide sensor data", self.protocol.name),
            ));
        }

        self.validate(task)?;
        Ok(task.node().sensors.clone())
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use serde_json::json;

    use super::*;
    use crate::task::Node;

    const MODES: &[&str] = &["fast", "slow"];

    pub static TEST_PROTOCOL: Protocol = Protocol {
        name: "TEST",
        required: &[("test_address", "Address. Required.")],
        optional: &[
            ("test_port", "Port. Optional."),
            ("test_mode", "Mode. Optional."),
            ("test_terminal_port", "Console port. Optional."),
        ],
        ports: &["test_port", "test_terminal_port"],
        choices: &[("test_mode", MODES)],
        exactly_one_of: &[],
        terminal_port: Some(("test_terminal_port", "Console port. Optional.")),
        boot_devices: &[BootDevice::Pxe, BootDevice::Disk],
        sensors: true,
    };

    static KEYED_PROTOCOL: Protocol = Protocol {
        name: "KEYED",
        required: &[],
        optional: &[],
        ports: &[],
        choices: &[],
        exactly_one_of: &["key_password", "key_contents"],
        terminal_port: None,
        boot_devices: &[],
        sensors: false,
    };

    pub fn node(info: DriverInfo) -> Node {
        Node::new("1be26c0b-03f2-4d2e-ae87-c02d7f33c123", "fake").with_driver_info(info)
    }

    #[test]
    fn test_properties() {
        let props = TEST_PROTOCOL.properties();
        assert_eq!(props.len(), 4);
        assert_eq!(props["test_address"], "Address. Required.");
    }

    #[test]
    fn test_validate_missing() {
        let err = TEST_PROTOCOL.validate(&DriverInfo::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
        assert!(err.to_string().contains("test_address"));
    }

    #[test]
    fn test_validate_choices_and_ports() {
        let good = DriverInfo::default()
            .with("test_address", "1.2.3.4")
            .with("test_mode", "fast")
            .with("test_port", 623);
        TEST_PROTOCOL.validate(&good).unwrap();

        let bad_mode = good.clone().with("test_mode", "medium");
        let err = TEST_PROTOCOL.validate(&bad_mode).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);

        let bad_port = good.with("test_port", "http");
        let err = TEST_PROTOCOL.validate(&bad_port).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_validate_exactly_one() {
        let none = DriverInfo::default();
        assert!(KEYED_PROTOCOL.validate(&none).is_err());
        let both = DriverInfo::default()
            .with("key_password", "p")
            .with("key_contents", "c");
        assert!(KEYED_PROTOCOL.validate(&both).is_err());
        let one = DriverInfo::default().with("key_contents", "c");
        KEYED_PROTOCOL.validate(&one).unwrap();
    }

    #[test]
    fn test_terminal_port() {
        let info = DriverInfo::default().with("test_terminal_port", "8023");
        assert_eq!(TEST_PROTOCOL.terminal_port(&info).unwrap(), 8023);
        let err = TEST_PROTOCOL.terminal_port(&DriverInfo::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
        let err = KEYED_PROTOCOL.terminal_port(&info).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[tokio::test]
    async fn test_power_cycle() {
        let power = BmcPower::new(&TEST_PROTOCOL);
        let mut task = Task::exclusive(node(DriverInfo::default().with("test_address", "a")));
        assert_eq!(power.get_power_state(&task).await.unwrap(), PowerState::Error);
        power.power_on(&mut task).await.unwrap();
        assert_eq!(power.get_power_state(&task).await.unwrap(), PowerState::On);
        power.power_off(&mut task).await.unwrap();
        assert_eq!(power.get_power_state(&task).await.unwrap(), PowerState::Off);
    }

    #[tokio::test]
    async fn test_power_requires_exclusive_lock() {
        let power = BmcPower::new(&TEST_PROTOCOL);
        let mut task = Task::shared(node(DriverInfo::default().with("test_address", "a")));
        let err = power.power_on(&mut task).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExclusiveLockRequired);
        assert!(task.node().power_state.is_none());
    }

    #[tokio::test]
    async fn test_reboot_consumes_one_time_boot_device() {
        let power = BmcPower::new(&TEST_PROTOCOL);
        let mgmt = BmcManagement::new(&TEST_PROTOCOL);
        let mut task = Task::exclusive(node(DriverInfo::default().with("test_address", "a")));

        mgmt.set_boot_device(&mut task, BootDevice::Pxe, false)
            .await
            .unwrap();
        power.reboot(&mut task).await.unwrap();
        assert!(mgmt.get_boot_device(&task).await.unwrap().is_none());

        mgmt.set_boot_device(&mut task, BootDevice::Disk, true)
            .await
            .unwrap();
        power.reboot(&mut task).await.unwrap();
        assert_eq!(
            mgmt.get_boot_device(&task).await.unwrap(),
            Some(BootDevice::Disk)
        );
    }

    #[tokio::test]
    async fn test_unsupported_boot_device() {
        let mgmt = BmcManagement::new(&TEST_PROTOCOL);
        let mut task = Task::exclusive(node(DriverInfo::default().with("test_address", "a")));
        let err = mgmt
            .set_boot_device(&mut task, BootDevice::Bios, false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(
            mgmt.get_supported_boot_devices(&task),
            vec![BootDevice::Pxe, BootDevice::Disk]
        );
    }

    #[tokio::test]
    async fn test_sensors() {
        let mgmt = BmcManagement::new(&TEST_PROTOCOL);
        let mut n = node(DriverInfo::default().with("test_address", "a"));
        let _ = n
            .sensors
            .entry("Temperature".into())
            .or_default()
            .insert("CPU1".into(), json!({"Sensor Reading": "42 degrees C"}));
        let task = Task::shared(n);
        let data = mgmt.get_sensors_data(&task).await.unwrap();
        assert_eq!(data["Temperature"]["CPU1"]["Sensor Reading"], "42 degrees C");

        let mgmt = BmcManagement::new(&KEYED_PROTOCOL);
        let err = mgmt.get_sensors_data(&task).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }
}
