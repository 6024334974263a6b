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
//! Native IPMI: power, management, console and vendor passthru.

use super::bmc::{BmcManagement, BmcPower, Protocol};
use super::console::TerminalConsole;
use super::passthru::IpmiVendorPassthru;
use crate::interfaces::{ConsoleInterface, ManagementInterface, PowerInterface, VendorInterface};
use crate::types::{BootDevice, ConsoleType};

const BOOLEANS: &[&str] = &["true", "false"];

/// Native IPMI driver information.
pub static PROTOCOL: Protocol = Protocol {
    name: "IPMI",
    required: &[
        ("ipmi_address", "IP of the node's BMC. Required."),
        ("ipmi_username", "username to use for IPMI connection. Required."),
        ("ipmi_password", "password to use for IPMI connection. Required."),
    ],
    optional: &[(
        "ipmi_force_boot_device",
        "Whether the boot device should be forced on every boot. Optional.",
    )],
    ports: &["ipmi_terminal_port"],
    choices: &[("ipmi_force_boot_device", BOOLEANS)],
    exactly_one_of: &[],
    terminal_port: Some((
        "ipmi_terminal_port",
        "node's UDP port to connect to. Only required for console access.",
    )),
    boot_devices: &[
        BootDevice::Pxe,
        BootDevice::Disk,
        BootDevice::Cdrom,
        BootDevice::Bios,
        BootDevice::Safe,
    ],
    sensors: true,
};

/// Native IPMI power.
pub fn power() -> Box<dyn PowerInterface> {
    Box::new(BmcPower::new(&PROTOCOL))
}

/// Native IPMI management.
pub fn management() -> Box<dyn ManagementInterface> {
    Box::new(BmcManagement::new(&PROTOCOL))
}

/// Native IPMI serial console through shellinabox.
pub fn shellinabox_console() -> Box<dyn ConsoleInterface> {
    Box::new(TerminalConsole::new(&PROTOCOL, ConsoleType::Shellinabox))
}

/// Native IPMI vendor passthru.
pub fn vendor() -> Box<dyn VendorInterface> {
    Box::new(IpmiVendorPassthru::new(&PROTOCOL))
}
