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

//! Drivers built on `ipmitool`.

use super::{agent_deploy, agent_raid, inspect, pxe_boot};
use crate::descriptor::{Binding, DriverDescriptor};
use crate::interfaces::ConsoleInterface;
use crate::modules::ipmitool;

/// Legacy names of the drivers in this module.
pub const ALIASES: &[(&str, &str)] = &[
    ("AgentAndIPMIToolDriver", "ipmi.AgentAndIPMIToolDriver"),
    (
        "AgentAndIPMIToolAndSocatDriver",
        "ipmi.AgentAndIPMIToolAndSocatDriver",
    ),
];

// Inspection keeps the names the drivers had before moving into `ipmi.`
fn agent_and_ipmitool_with(
    name: &str,
    inspect_name: &'static str,
    console: Binding<dyn ConsoleInterface>,
) -> DriverDescriptor {
    DriverDescriptor::new(
        name,
        Binding::new("ipmitool", ipmitool::power),
        pxe_boot(),
        agent_deploy(),
        Binding::new("ipmitool", ipmitool::management),
    )
    .with_console(console)
    .with_vendor(Binding::new("ipmitool", ipmitool::vendor))
    .with_raid(agent_raid())
    .with_inspect(inspect().with_driver_name(inspect_name))
}

/// `ipmitool` with the deploy agent and a shellinabox console.
pub fn agent_and_ipmitool() -> DriverDescriptor {
    agent_and_ipmitool_with(
        "ipmi.AgentAndIPMIToolDriver",
        "AgentAndIPMIToolDriver",
        Binding::new("ipmitool-shellinabox", ipmitool::shellinabox_console),
    )
}

/// `ipmitool` with the deploy agent and a socat console.
pub fn agent_and_ipmitool_and_socat() -> DriverDescriptor {
    agent_and_ipmitool_with(
        "ipmi.AgentAndIPMIToolAndSocatDriver",
        "AgentAndIPMIToolAndSocatDriver",
        Binding::new("ipmitool-socat", ipmitool::socat_console),
    )
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::{agent_and_ipmitool, agent_and_ipmitool_and_socat};
    use crate::descriptor::DriverDescriptor;
    use crate::interfaces::InterfaceType;

    #[test]
    fn test_console_differs() {
        let console = |desc: DriverDescriptor| {
            desc.bindings()
                .into_iter()
                .find(|(kind, ..)| *kind == InterfaceType::Console)
                .map(|(_, name, _)| name)
        };
        assert_eq!(console(agent_and_ipmitool()), Some("ipmitool-shellinabox"));
        assert_eq!(
            console(agent_and_ipmitool_and_socat()),
            Some("ipmitool-socat")
        );
    }

    #[test]
    fn test_inspect_uses_legacy_name() {
        let desc = agent_and_ipmitool();
        assert!(desc
            .attach_inspect(&|name: &str| name == "ipmi.AgentAndIPMIToolDriver")
            .is_none());
        assert!(desc
            .attach_inspect(&|name: &str| name == "AgentAndIPMIToolDriver")
            .is_some());
        assert!(agent_and_ipmitool_and_socat()
            .attach_inspect(&|name: &str| name == "AgentAndIPMIToolAndSocatDriver")
            .is_some());
    }
}
