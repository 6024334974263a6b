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
//! Capability implementations.
//!
//! Implementations are grouped by the mechanism they use: a vendor protocol
//! (native IPMI, ipmitool, SSH, Cisco UCS, Cisco CIMC) or a generic mechanism
//! (PXE, the deploy agent, the inspection service). Each module exposes plain
//! factory functions suitable for driver descriptor bindings.
//!
//! # Limitations
//!
//! The exchange with the BMC or the agent is not part of this crate. The
//! implementations validate the node's parameters and track the requested
//! state on the task's node.

pub mod agent;
mod bmc;
#[cfg(feature = "cimc")]
pub mod cimc;
#[cfg(any(feature = "ipmi", feature = "ssh"))]
mod console;
pub mod inspector;
#[cfg(feature = "ipmi")]
pub mod ipminative;
#[cfg(feature = "ipmi")]
pub mod ipmitool;
#[cfg(feature = "ipmi")]
mod passthru;
pub mod pxe;
#[cfg(feature = "ssh")]
pub mod ssh;
#[cfg(feature = "ucs")]
pub mod ucs;

pub use self::agent::{AgentDeploy, AgentRaid};
pub use self::bmc::{BmcManagement, BmcPower, Protocol};
#[cfg(any(feature = "ipmi", feature = "ssh"))]
pub use self::console::{TerminalConsole, CONSOLE_ADDRESS};
pub use self::inspector::Inspector;
#[cfg(feature = "ipmi")]
pub use self::passthru::IpmiVendorPassthru;
pub use self::pxe::PxeBoot;
