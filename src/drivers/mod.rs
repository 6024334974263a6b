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

//! Built-in drivers.
//!
//! Agent-based drivers are registered under their historical names, drivers
//! built on `ipmitool` live in the `ipmi.` namespace. The old top-level names
//! of the latter remain available as aliases.

use log::debug;

use crate::descriptor::{Binding, InspectBinding};
use crate::interfaces::{BootInterface, DeployInterface, RaidInterface};
use crate::modules::{agent as agent_module, inspector, pxe};
use crate::registry::{DriverRegistry, RegistryBuilder};
use crate::Result;

pub mod agent;
#[cfg(feature = "ipmi")]
pub mod ipmi;

fn pxe_boot() -> Binding<dyn BootInterface> {
    Binding::new("pxe", pxe::boot)
}

fn agent_deploy() -> Binding<dyn DeployInterface> {
    Binding::new("agent", agent_module::deploy)
}

fn agent_raid() -> Binding<dyn RaidInterface> {
    Binding::new("agent", agent_module::raid)
}

fn inspect() -> InspectBinding {
    InspectBinding::new("inspector", inspector::create)
}

/// Register all built-in drivers and their aliases.
pub fn register_builtin(builder: &mut RegistryBuilder) -> Result<()> {
    #[cfg(feature = "ipmi")]
    {
        builder.register(agent::agent_and_ipmi_native())?;
        builder.register(ipmi::agent_and_ipmitool())?;
        builder.register(ipmi::agent_and_ipmitool_and_socat())?;
        for (legacy, canonical) in ipmi::ALIASES {
            builder.alias(*legacy, *canonical)?;
        }
    }
    #[cfg(feature = "ssh")]
    builder.register(agent::agent_and_ssh())?;
    #[cfg(feature = "ucs")]
    builder.register(agent::agent_and_ucs())?;
    #[cfg(feature = "cimc")]
    builder.register(agent::agent_and_cimc())?;

    debug!("Built-in drivers registered");
    Ok(())
}

/// Registry with all built-in drivers.
pub fn builtin_registry() -> Result<DriverRegistry> {
    let mut builder = RegistryBuilder::new();
    register_builtin(&mut builder)?;
    builder.build()
}
