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

//! Bare metal drivers composed from capability interfaces.
//!
//! A driver is a named bundle of implementations of the capability interfaces
//! ([power](interfaces::PowerInterface), [boot](interfaces::BootInterface),
//! [deploy](interfaces::DeployInterface), [management](interfaces::ManagementInterface)
//! and, optionally, console, vendor passthru, RAID and inspect). Drivers are
//! declared as [DriverDescriptor]s, collected in a [DriverRegistry] and
//! constructed into [Driver]s on demand.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ironic_drivers::{builtin_registry, Config};
//!
//! # fn main() -> ironic_drivers::Result<()> {
//! let config = Config::load()?;
//! let registry = builtin_registry()?;
//! let driver = registry.construct("AgentAndIPMIToolDriver", &config.probe(), &config)?;
//! println!("Interfaces of {}: {:?}", driver.name(), driver.interfaces());
//! # Ok(()) }
//! ```
//!
//! Construction fails with [ErrorKind::DriverLoadFailed] when a vendor
//! library required by the driver is not available. Inspection is attached
//! only when the [InspectionPolicy] allows it for the driver.
//!
//! # Features
//!
//! * `cimc` - Cisco CIMC drivers.
//! * `ipmi` - native IPMI and `ipmitool` drivers.
//! * `ssh` - SSH-controlled virtual machines (for testing).
//! * `ucs` - Cisco UCS Manager drivers.

#![crate_name = "ironic_drivers"]
#![crate_type = "lib"]
// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
// Taken from https://github.com/rust-unofficial/patterns/
#![deny(
    improper_ctypes,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_extern_crates,
    unused_import_braces,
    unused_parens,
    unused_results,
    while_true
)]

#[macro_use]
mod utils;

pub mod config;
pub mod descriptor;
mod driver;
pub mod drivers;
mod error;
mod factory;
pub mod interfaces;
pub mod modules;
pub mod probe;
mod registry;
pub mod task;
pub mod types;

pub use crate::config::{Config, InspectionPolicy};
pub use crate::descriptor::{Binding, DriverDescriptor, InspectBinding};
pub use crate::driver::Driver;
pub use crate::drivers::{builtin_registry, register_builtin};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::factory::DriverFactory;
pub use crate::interfaces::InterfaceType;
pub use crate::probe::{LibraryProbe, SearchPathProbe, StaticProbe};
pub use crate::registry::{DriverRegistry, RegistryBuilder};
