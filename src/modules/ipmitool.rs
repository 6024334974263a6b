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
//! IPMI through the ipmitool utility.

use super::bmc::{BmcManagement, BmcPower, Protocol};
use super::console::TerminalConsole;
use super::passthru::IpmiVendorPassthru;
use crate::interfaces::{ConsoleInterface, ManagementInterface, PowerInterface, VendorInterface};
use crate::types::{BootDevice, ConsoleType};

const PRIV_LEVELS: &[&str] = &["ADMINISTRATOR", "CALLBACK", "OPERATOR", "USER"];
const PROTOCOL_VERSIONS: &[&str] = &["1.5", "2.0"];

/// ipmitool driver information.
pub static PROTOCOL: Protocol = Protocol {
    name: "IPMI",
    required: &[("ipmi_address", "IP address or hostname of the node. Required.")],
    optional: &[
        ("ipmi_username", "username; default is NULL user. Optional."),
        ("ipmi_password", "password. Optional."),
        ("ipmi_port", "remote IPMI RMCP port. Optional."),
        (
            "ipmi_priv_level",
            "privilege level; default is ADMINISTRATOR. One of ADMINISTRATOR, \
             CALLBACK, OPERATOR, USER. Optional.",
        ),
        (
            "ipmi_protocol_version",
            "the version of the IPMI protocol; default is \"2.0\". One of \
             \"1.5\", \"2.0\". Optional.",
        ),
    ],
    ports: &["ipmi_port", "ipmi_terminal_port"],
    choices: &[
        ("ipmi_priv_level", PRIV_LEVELS),
        ("ipmi_protocol_version", PROTOCOL_VERSIONS),
    ],
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

/// ipmitool power.
pub fn power() -> Box<dyn PowerInterface> {
    Box::new(BmcPower::new(&PROTOCOL))
}

/// ipmitool management.
pub fn management() -> Box<dyn ManagementInterface> {
    Box::new(BmcManagement::new(&PROTOCOL))
}

/// Serial-over-LAN console through shellinabox.
pub fn shellinabox_console() -> Box<dyn ConsoleInterface> {
    Box::new(TerminalConsole::new(&PROTOCOL, ConsoleType::Shellinabox))
}

/// Serial-over-LAN console through socat.
pub fn socat_console() -> Box<dyn ConsoleInterface> {
    Box::new(TerminalConsole::new(&PROTOCOL, ConsoleType::Socat))
}

/// ipmitool vendor passthru.
pub fn vendor() -> Box<dyn VendorInterface> {
    Box::new(IpmiVendorPassthru::new(&PROTOCOL))
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::PROTOCOL;
    use crate::task::DriverInfo;
    use crate::ErrorKind;

    #[test]
    fn test_only_address_required() {
        let info = DriverInfo::default().with("ipmi_address", "10.1.0.1");
        PROTOCOL.validate(&info).unwrap();
    }

    #[test]
    fn test_invalid_priv_level() {
        let info = DriverInfo::default()
            .with("ipmi_address", "10.1.0.1")
            .with("ipmi_priv_level", "ROOT");
        let err = PROTOCOL.validate(&info).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
