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

//! Drivers combining a vendor power and management protocol with the
//! deploy agent.

#[cfg(any(feature = "cimc", feature = "ipmi", feature = "ssh", feature = "ucs"))]
use super::{agent_deploy, inspect, pxe_boot};
#[cfg(any(feature = "ipmi", feature = "ssh"))]
use super::agent_raid;
#[cfg(any(feature = "cimc", feature = "ipmi", feature = "ssh", feature = "ucs"))]
use crate::descriptor::{Binding, DriverDescriptor};
#[cfg(feature = "cimc")]
use crate::modules::cimc;
#[cfg(feature = "ipmi")]
use crate::modules::ipminative;
#[cfg(feature = "ssh")]
use crate::modules::ssh;
#[cfg(feature = "ucs")]
use crate::modules::ucs;

/// Native IPMI with the deploy agent.
///
/// Not supported in production.
#[cfg(feature = "ipmi")]
pub fn agent_and_ipmi_native() -> DriverDescriptor {
    DriverDescriptor::new(
        "AgentAndIPMINativeDriver",
        Binding::new("ipminative", ipminative::power),
        pxe_boot(),
        agent_deploy(),
        Binding::new("ipminative", ipminative::management),
    )
    .with_console(Binding::new(
        "ipminative-shellinabox",
        ipminative::shellinabox_console,
    ))
    .with_vendor(Binding::new("ipminative", ipminative::vendor))
    .with_raid(agent_raid())
    .with_inspect(inspect())
    .unsupported()
}

/// Virtual machines power controlled over SSH with the deploy agent.
///
/// Meant only for testing environments.
#[cfg(feature = "ssh")]
pub fn agent_and_ssh() -> DriverDescriptor {
    DriverDescriptor::new(
        "AgentAndSSHDriver",
        Binding::new("ssh", ssh::power),
        pxe_boot(),
        agent_deploy(),
        Binding::new("ssh", ssh::management),
    )
    .with_console(Binding::new("ssh-shellinabox", ssh::shellinabox_console))
    .with_raid(agent_raid())
    .with_inspect(inspect())
    .unsupported()
}

/// Cisco UCS Manager with the deploy agent.
#[cfg(feature = "ucs")]
pub fn agent_and_ucs() -> DriverDescriptor {
    DriverDescriptor::new(
        "AgentAndUcsDriver",
        Binding::new("ucs", ucs::power).with_prerequisite(ucs::SDK),
        pxe_boot(),
        agent_deploy(),
        Binding::new("ucs", ucs::management).with_prerequisite(ucs::SDK),
    )
    .with_inspect(inspect())
}

/// Cisco CIMC with the deploy agent.
#[cfg(feature = "cimc")]
pub fn agent_and_cimc() -> DriverDescriptor {
    DriverDescriptor::new(
        "AgentAndCIMCDriver",
        Binding::new("cimc", cimc::power).with_prerequisite(cimc::SDK),
        pxe_boot(),
        agent_deploy(),
        Binding::new("cimc", cimc::management).with_prerequisite(cimc::SDK),
    )
    .with_inspect(inspect())
}
