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

//! Node and task context passed to interface calls.
//!
//! A [Task](struct.Task.html) wraps a [Node](struct.Node.html) together with
//! the kind of lock held on it. Calls that change the node require an
//! exclusive task.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{BootDevice, PowerState, ProvisionState, SensorsData};
use crate::{Error, ErrorKind, Result};

macro_rules! info_string_field {
    ($(#[$attr:meta])* $func:ident, $with_func:ident -> $const:expr) => {
        $(#[$attr])*
        pub fn $func(&self) -> Option<&str> {
            self.string($const)
        }

        $(#[$attr])*
        pub fn $with_func<S: Into<String>>(mut self, value: S) -> Self {
            let _ = self.0.insert($const.into(), Value::String(value.into()));
            self
        }
    };
}

/// Driver-specific information: BMC addresses, credentials, ports.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DriverInfo(pub HashMap<String, Value>);

impl Deref for DriverInfo {
    type Target = HashMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DriverInfo {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DriverInfo {
    /// A non-empty string field (if any).
    pub fn string(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Whether the field is set to a non-empty value.
    pub fn is_set(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// A port number, accepting both numbers and numeric strings.
    ///
    /// Returns `Ok(None)` when the field is not set.
    pub fn port(&self, key: &str) -> Result<Option<u16>> {
        let invalid = || {
            Error::new(
                ErrorKind::InvalidParameter,
                format!("Parameter {} must be a valid port number", key),
            )
        };

        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u16::try_from(n).ok())
                .map(Some)
                .ok_or_else(invalid),
            Some(Value::String(s)) => s.parse::<u16>().map(Some).map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    /// Add a string field.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let _ = self.0.insert(key.into(), value.into());
        self
    }

    info_string_field! {
        #[doc = "Kernel of the deployment ramdisk"]
        deploy_kernel, with_deploy_kernel -> "deploy_kernel"
    }

    info_string_field! {
        #[doc = "Initramfs of the deployment ramdisk"]
        deploy_ramdisk, with_deploy_ramdisk -> "deploy_ramdisk"
    }
}

/// Common image checksums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChecksum<'s> {
    /// MD5 checksum (the default, but not recommended).
    MD5(Cow<'s, str>),
    /// SHA256 checksum.
    SHA256(Cow<'s, str>),
    /// SHA512 checksum.
    SHA512(Cow<'s, str>),
}

/// Instance-specific information.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InstanceInfo(pub HashMap<String, Value>);

impl Deref for InstanceInfo {
    type Target = HashMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for InstanceInfo {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl InstanceInfo {
    #[inline]
    fn string(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    info_string_field! {
        #[doc = "Image to write to disk"]
        image_source, with_image_source -> "image_source"
    }

    info_string_field! {
        #[doc = "Boot option after deployment: `local` or `netboot`"]
        boot_option, with_boot_option -> "boot_option"
    }

    /// Checksum of the image (if the algorithm is supported)
    pub fn image_checksum(&self) -> Option<ImageChecksum<'_>> {
        match self.string("image_os_hash_algo") {
            Some(algo) => {
                let value = Cow::Borrowed(self.string("image_os_hash_value")?);
                match algo {
                    "md5" => Some(ImageChecksum::MD5(value)),
                    "sha256" => Some(ImageChecksum::SHA256(value)),
                    "sha512" => Some(ImageChecksum::SHA512(value)),
                    _ => None,
                }
            }
            None => self
                .string("image_checksum")
                .map(|value| ImageChecksum::MD5(Cow::Borrowed(value))),
        }
    }

    /// Add an MD5 image checksum.
    pub fn with_image_checksum<S: Into<String>>(mut self, value: S) -> Self {
        let _ = self
            .0
            .insert("image_checksum".into(), Value::String(value.into()));
        self
    }
}

/// A bare metal node as seen by its driver.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Node {
    /// Unique ID of the node.
    pub uuid: String,
    /// Name of the driver managing the node.
    pub driver: String,
    /// Driver-specific information.
    #[serde(default)]
    pub driver_info: DriverInfo,
    /// Instance-specific information.
    #[serde(default)]
    pub instance_info: InstanceInfo,
    /// Last known power state (if any).
    #[serde(default)]
    pub power_state: Option<PowerState>,
    /// Current provision state.
    pub provision_state: ProvisionState,
    /// Boot device set on the node (if known).
    #[serde(default)]
    pub boot_device: Option<BootDevice>,
    /// Whether the boot device setting persists across reboots.
    #[serde(default)]
    pub boot_device_persistent: bool,
    /// Whether the serial console is running.
    #[serde(default)]
    pub console_enabled: bool,
    /// Requested RAID configuration (if any).
    #[serde(default)]
    pub target_raid_config: Option<Value>,
    /// Applied RAID configuration (if any).
    #[serde(default)]
    pub raid_config: Option<Value>,
    /// Latest sensor readings reported by the BMC.
    #[serde(default)]
    pub sensors: SensorsData,
}

impl Node {
    /// Create a freshly enrolled node.
    pub fn new<U, D>(uuid: U, driver: D) -> Node
    where
        U: Into<String>,
        D: Into<String>,
    {
        Node {
            uuid: uuid.into(),
            driver: driver.into(),
            driver_info: DriverInfo::default(),
            instance_info: InstanceInfo::default(),
            power_state: None,
            provision_state: ProvisionState::Enroll,
            boot_device: None,
            boot_device_persistent: false,
            console_enabled: false,
            target_raid_config: None,
            raid_config: None,
            sensors: SensorsData::new(),
        }
    }

    /// Set driver information.
    pub fn with_driver_info(mut self, value: DriverInfo) -> Node {
        self.driver_info = value;
        self
    }

    /// Set instance information.
    pub fn with_instance_info(mut self, value: InstanceInfo) -> Node {
        self.instance_info = value;
        self
    }

    /// Set provision state.
    pub fn with_provision_state(mut self, value: ProvisionState) -> Node {
        self.provision_state = value;
        self
    }
}

/// A node together with the lock held on it.
#[derive(Debug, Clone)]
pub struct Task {
    node: Node,
    shared: bool,
}

impl Task {
    /// Task holding an exclusive lock.
    pub fn exclusive(node: Node) -> Task {
        Task {
            node,
            shared: false,
        }
    }

    /// Task holding a shared (read-only) lock.
    pub fn shared(node: Node) -> Task {
        Task { node, shared: true }
    }

    /// Whether the lock is shared.
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// The node.
    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The node for modification.
    ///
    /// Fails for shared tasks.
    pub fn node_mut(&mut self, operation: &str) -> Result<&mut Node> {
        if self.shared {
            Err(Error::new(
                ErrorKind::ExclusiveLockRequired,
                format!(
                    "{} on node {} requires an exclusive lock",
                    operation, self.node.uuid
                ),
            ))
        } else {
            Ok(&mut self.node)
        }
    }

    /// Release the node.
    pub fn into_node(self) -> Node {
        self.node
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn test_driver_info_string() {
        let di = DriverInfo::default()
            .with("ipmi_address", "1.2.3.4")
            .with("ipmi_username", "");
        assert_eq!(di.string("ipmi_address"), Some("1.2.3.4"));
        assert!(di.string("ipmi_username").is_none());
        assert!(!di.is_set("ipmi_username"));
        assert!(di.string("ipmi_password").is_none());
    }

    #[test]
    fn test_driver_info_port() {
        let di = DriverInfo::default()
            .with("a", 623)
            .with("b", "8023")
            .with("c", "nope")
            .with("d", 100_000);
        assert_eq!(di.port("a").unwrap(), Some(623));
        assert_eq!(di.port("b").unwrap(), Some(8023));
        assert_eq!(di.port("missing").unwrap(), None);
        assert_eq!(di.port("c").unwrap_err().kind(), ErrorKind::InvalidParameter);
        assert_eq!(di.port("d").unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_instance_info_checksum() {
        let ii = InstanceInfo::default()
            .with_image_source("http://url")
            .with_image_checksum("abcd");
        assert_eq!(ii.image_source(), Some("http://url"));
        assert_eq!(ii.image_checksum(), Some(ImageChecksum::MD5("abcd".into())));

        let mut ii = InstanceInfo::default();
        let _ = ii.insert("image_os_hash_algo".into(), Value::String("sha512".into()));
        let _ = ii.insert("image_os_hash_value".into(), Value::String("ef".into()));
        assert_eq!(ii.image_checksum(), Some(ImageChecksum::SHA512("ef".into())));

        let _ = ii.insert("image_os_hash_algo".into(), Value::String("crc32".into()));
        assert!(ii.image_checksum().is_none());
    }

    #[test]
    fn test_node_deserialize() {
        let node: Node = serde_json::from_value(json!({
            "uuid": "1be26c0b-03f2-4d2e-ae87-c02d7f33c123",
            "driver": "AgentAndSSHDriver",
            "driver_info": {"ssh_address": "10.0.0.1"},
            "provision_state": "available",
            "power_state": "power off"
        }))
        .unwrap();
        assert_eq!(node.provision_state, ProvisionState::Available);
        assert_eq!(node.power_state, Some(PowerState::Off));
        assert_eq!(node.driver_info.string("ssh_address"), Some("10.0.0.1"));
        assert!(!node.console_enabled);
    }

    #[test]
    fn test_shared_task_is_read_only() {
        let mut task = Task::shared(Node::new("uuid", "fake"));
        assert!(task.is_shared());
        let err = task.node_mut("Power on").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExclusiveLockRequired);

        let mut task = Task::exclusive(Node::new("uuid", "fake"));
        task.node_mut("Power on").unwrap().power_state = Some(PowerState::On);
        assert_eq!(task.into_node().power_state, Some(PowerState::On));
    }
}
