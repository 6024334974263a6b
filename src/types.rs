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

//! Types shared by interfaces and their implementations.

use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

protocol_enum! {
    /// Power state of the node.
    enum PowerState {
        /// Node is powered off.
        Off = "power off",
        /// Node is powered on.
        On = "power on",
        /// Error when getting power state.
        Error = "error"
    }
}

protocol_enum! {
    /// Provision state of the node.
    enum ProvisionState {
        /// Node is freshly enrolled.
        Enroll = "enroll",
        /// Node is enrolled and manageable.
        Manageable = "manageable",
        /// Node is available for deployment.
        Available = "available",
        /// A synchronous deployment action is running.
        Deploying = "deploying",
        /// Waiting for an asynchronous deployment action.
        DeployWait = "wait call-back",
        /// Node is deployed.
        Active = "active",
        /// Node is being undeployed (instance deletion).
        Deleting = "deleting",
        /// Instance was removed from the node.
        Deleted = "deleted",
        /// Waiting for an asynchronous cleaning action.
        CleanWait = "clean wait",
        /// Waiting for inspection data from the ramdisk.
        InspectWait = "inspect wait",
        /// Last operation failed.
        Error = "error"
    }
}

protocol_enum! {
    /// Boot device of the node.
    enum BootDevice {
        /// Network boot.
        Pxe = "pxe",
        /// Local disk.
        Disk = "disk",
        /// Virtual or physical CD-ROM.
        Cdrom = "cdrom",
        /// Firmware setup.
        Bios = "bios",
        /// Local disk in safe mode.
        Safe = "safe"
    }
}

protocol_enum! {
    /// Type of a serial console.
    enum ConsoleType {
        /// Web console served by shellinabox.
        Shellinabox = "shellinabox",
        /// Raw TCP console served by socat.
        Socat = "socat"
    }
}

/// Sensor readings grouped by sensor type, then by sensor ID.
pub type SensorsData = BTreeMap<String, BTreeMap<String, Value>>;

/// State of a serial console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleInfo {
    /// Whether the console is running.
    pub enabled: bool,
    /// Console type.
    #[serde(rename = "type")]
    pub console_type: ConsoleType,
    /// URL to connect to (only when enabled).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
