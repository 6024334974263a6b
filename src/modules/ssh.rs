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
//! Virtual machines managed over SSH.
//!
//! Meant only for testing environments.

use super::bmc::{BmcManagement, BmcPower, Protocol};
use super::console::TerminalConsole;
use crate::interfaces::{ConsoleInterface, ManagementInterface, PowerInterface};
use crate::types::{BootDevice, ConsoleType};

const VIRT_TYPES: &[&str] = &["vbox", "virsh", "vmware", "parallels", "xenserver"];

/// SSH driver information.
pub static PROTOCOL: Protocol = Protocol {
    name: "SSH",
    required: &[
        ("ssh_address", "IP address or hostname of the node to ssh into. Required."),
        ("ssh_username", "username to authenticate as. Required."),
        (
            "ssh_virt_type",
            "virtualization software to use; one of vbox, virsh, vmware, \
             parallels, xenserver. Required.",
        ),
    ],
    optional: &[
        ("ssh_key_contents", "private key(s). One of this, ssh_key_filename, or \
          ssh_password must be specified."),
        ("ssh_key_filename", "(list of) filename(s) of optional private key(s) \
          for authentication. One of this, ssh_key_contents, or ssh_password \
          must be specified."),
        ("ssh_password", "password to use for authentication or for unlocking \
          a private key. One of this, ssh_key_contents, or ssh_key_filename \
          must be specified."),
        ("ssh_port", "port on the node to connect to; default is 22. Optional."),
    ],
    ports: &["ssh_port", "ssh_terminal_port"],
    choices: &[("ssh_virt_type", VIRT_TYPES)],
    exactly_one_of: &["ssh_password", "ssh_key_contents", "ssh_key_filename"],
    terminal_port: Some((
        "ssh_terminal_port",
        "node's UDP port to connect to. Only required for console access \
         and only applicable for 'virsh'.",
    )),
    boot_devices: &[BootDevice::Pxe, BootDevice::Disk],
    sensors: false,
};

/// SSH power.
pub fn power() -> Box<dyn PowerInterface> {
    Box::new(BmcPower::new(&PROTOCOL))
}

/// SSH management.
pub fn management() -> Box<dyn ManagementInterface> {
    Box::new(BmcManagement::new(&PROTOCOL))
}

/// Virtual serial console through shellinabox.
pub fn shellinabox_console() -> Box<dyn ConsoleInterface> {
    Box::new(TerminalConsole::new(&PROTOCOL, ConsoleType::Shellinabox))
}
