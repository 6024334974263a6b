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
//! Cisco UCS Manager power and management.
//!
//! Requires the UcsSdk library at run time.

use super::bmc::{BmcManagement, BmcPower, Protocol};
use crate::interfaces::{ManagementInterface, PowerInterface};
use crate::types::BootDevice;

/// External library the UCS implementations depend on.
pub const SDK: &str = "UcsSdk";

/// UCS driver information.
pub static PROTOCOL: Protocol = Protocol {
    name: "UCS",
    required: &[
        ("ucs_address", "IP or Hostname of the UCS Manager. Required."),
        ("ucs_username", "UCS Manager admin/server-profile username. Required."),
        ("ucs_password", "UCS Manager password. Required."),
        ("ucs_service_profile", "UCS Manager service-profile name. Required."),
    ],
    optional: &[],
    ports: &[],
    choices: &[],
    exactly_one_of: &[],
    terminal_port: None,
    boot_devices: &[BootDevice::Pxe, BootDevice::Disk, BootDevice::Cdrom],
    sensors: false,
};

/// UCS power.
pub fn power() -> Box<dyn PowerInterface> {
    Box::new(BmcPower::new(&PROTOCOL))
}

/// UCS management.
pub fn management() -> Box<dyn ManagementInterface> {
    Box::new(BmcManagement::new(&PROTOCOL))
}
