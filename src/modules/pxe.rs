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

//! PXE boot.

use async_trait::async_trait;
use log::debug;

use crate::interfaces::{BaseInterface, BootInterface, Properties};
use crate::task::Task;
use crate::types::BootDevice;
use crate::{Error, ErrorKind, Result};

const DEPLOY_KERNEL: &str = "deploy_kernel";
const DEPLOY_RAMDISK: &str = "deploy_ramdisk";

/// Network boot of the deploy ramdisk and, optionally, of the instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PxeBoot;

impl PxeBoot {
    /// Create PXE boot.
    pub fn new() -> PxeBoot {
        PxeBoot
    }
}

/// Factory suitable for a boot binding.
pub fn boot() -> Box<dyn BootInterface> {
    Box::new(PxeBoot::new())
}

/// Boot device an instance should boot from.
fn instance_boot_device(task: &Task) -> Result<BootDevice> {
    match task.node().instance_info.boot_option() {
        None | Some("netboot") => Ok(BootDevice::Pxe),
        Some("local") => Ok(BootDevice::Disk),
        Some(other) => Err(Error::new(
            ErrorKind::InvalidParameter,
            format!(
                "Invalid boot_option {} for node {}, supported are local and netboot",
                other,
                task.node().uuid
            ),
        )),
    }
}

impl BaseInterface for PxeBoot {
    fn get_properties(&self) -> Properties {
        vec![
            (
                DEPLOY_KERNEL,
                "UUID (from Glance) of the deployment kernel. Required.",
            ),
            (
                DEPLOY_RAMDISK,
                "UUID (from Glance) of the ramdisk that is mounted at boot time. Required.",
            ),
        ]
        .into_iter()
        .collect()
    }

    fn validate(&self, task: &Task) -> Result<()> {
        let info = &task.node().driver_info;
        let missing: Vec<_> = [DEPLOY_KERNEL, DEPLOY_RAMDISK]
            .into_iter()
            .filter(|key| !info.is_set(key))
            .collect();
        if !missing.is_empty() {
            return Err(Error::new(
                ErrorKind::MissingParameter,
                format!(
                    "Node {} is missing the following driver_info parameters: {}",
                    task.node().uuid,
                    missing.join(", ")
                ),
            ));
        }

        let _ = instance_boot_device(task)?;
        Ok(())
    }
}

#[async_trait]
impl BootInterface for PxeBoot {
    async fn prepare_instance(&self, task: &mut Task) -> Result<()> {
        self.validate(task)?;
        let device = instance_boot_device(task)?;
        let node = task.node_mut("Preparing instance boot")?;
        node.boot_device = Some(device);
        node.boot_device_persistent = true;
        debug!("Node {} will boot the instance from {}", node.uuid, device);
        Ok(())
    }

    async fn clean_up_instance(&self, task: &mut Task) -> Result<()> {
        let node = task.node_mut("Cleaning up instance boot")?;
        node.boot_device = None;
        node.boot_device_persistent = false;
        Ok(())
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::PxeBoot;
    use crate::interfaces::{BaseInterface, BootInterface};
    use crate::task::{DriverInfo, InstanceInfo, Node, Task};
    use crate::types::BootDevice;
    use crate::ErrorKind;

    fn node(boot_option: Option<&str>) -> Node {
        let mut ii = InstanceInfo::default().with_image_source("glance-image");
        if let Some(opt) = boot_option {
            ii = ii.with_boot_option(opt);
        }
        Node::new("uuid", "fake")
            .with_driver_info(
                DriverInfo::default()
                    .with_deploy_kernel("kernel")
                    .with_deploy_ramdisk("ramdisk"),
            )
            .with_instance_info(ii)
    }

    #[test]
    fn test_validate_missing_ramdisk() {
        let task = Task::shared(
            Node::new("uuid", "fake")
                .with_driver_info(DriverInfo::default().with_deploy_kernel("kernel")),
        );
        let err = PxeBoot::new().validate(&task).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
        assert!(err.to_string().contains("deploy_ramdisk"));
        assert!(!err.to_string().contains("deploy_kernel"));
    }

    #[test]
    fn test_validate_bad_boot_option() {
        let task = Task::shared(node(Some("floppy")));
        let err = PxeBoot::new().validate(&task).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[tokio::test]
    async fn test_prepare_instance_netboot() {
        let mut task = Task::exclusive(node(None));
        PxeBoot::new().prepare_instance(&mut task).await.unwrap();
        assert_eq!(task.node().boot_device, Some(BootDevice::Pxe));
        assert!(task.node().boot_device_persistent);

        PxeBoot::new().clean_up_instance(&mut task).await.unwrap();
        assert!(task.node().boot_device.is_none());
    }

    #[tokio::test]
    async fn test_prepare_instance_local() {
        let mut task = Task::exclusive(node(Some("local")));
        PxeBoot::new().prepare_instance(&mut task).await.unwrap();
        assert_eq!(task.node().boot_device, Some(BootDevice::Disk));
    }
}
