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
//! Cisco Integrated Management Controller power and management.
//!
//! Requires the ImcSdk library at run time.

use super::bmc::{BmcManagement, BmcPower, Protocol};
use crate::interfaces::{ManagementInterface, PowerInterface};
use crate::types::BootDevice;

/// External library the CIMC implementations depend on.
pub const SDK: &str = "ImcSdk";

/// CIMC driver information.
pub static PROTOCOL: Protocol = Protocol {
    name: "CIMC",
    required: &[
        ("cimc_address", "IP or Hostname of the CIMC. Required."),
        ("cimc_username", "CIMC Manager admin username. Required."),
        ("cimc_password", "CIMC Manager password. Required."),
    ],
    optional: &[],
    ports: &[],
    choices: &[],
    exactly_one_of: &[],
    terminal_port: None,
    boot_devices: &[BootDevice::Pxe, BootDevice::Disk, BootDevice::Cdrom],
    sensors: false,
};

/// CIMC power.
pub fn power() -> Box<dyn PowerInterface> {
    Box::new(BmcPower::new(&PROTOCOL))
}

/// CIMC management.
pub fn management() -> Box<dyn ManagementInterface> {
    Box::new(BmcManagement::new(&PROTOCOL))
}
