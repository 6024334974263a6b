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

//! Hardware inspection through the inspection service.

use async_trait::async_trait;
use log::info;

use crate::interfaces::{BaseInterface, InspectInterface, Properties};
use crate::task::Task;
use crate::types::ProvisionState;
use crate::Result;

/// Out-of-band inspection, attached to a specific driver.
#[derive(Debug, Clone)]
pub struct Inspector {
    driver_name: String,
}

impl Inspector {
    /// Create an inspector for the driver.
    pub fn new<S: Into<String>>(driver_name: S) -> Inspector {
        Inspector {
            driver_name: driver_name.into(),
        }
    }

    /// Name of the driver this inspector is attached to.
    #[inline]
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }
}

/// Factory suitable for an inspect binding.
pub fn create(driver_name: &str) -> Box<dyn InspectInterface> {
    Box::new(Inspector::new(driver_name))
}

impl BaseInterface for Inspector {
    fn get_properties(&self) -> Properties {
        Properties::new()
    }

    fn validate(&self, _task: &Task) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl InspectInterface for Inspector {
    async fn inspect_hardware(&self, task: &mut Task) -> Result<ProvisionState> {
        let node = task.node_mut("Inspection")?;
        node.provision_state = ProvisionState::InspectWait;
        info!(
            "Node {} inspection started through driver {}",
            node.uuid, self.driver_name
        );
        Ok(ProvisionState::InspectWait)
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::Inspector;
    use crate::interfaces::InspectInterface;
    use crate::task::{Node, Task};
    use crate::types::ProvisionState;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_inspect_hardware() {
        let inspector = Inspector::new("AgentAndSSHDriver");
        assert_eq!(inspector.driver_name(), "AgentAndSSHDriver");
        let mut task = Task::exclusive(
            Node::new("uuid", "AgentAndSSHDriver").with_provision_state(ProvisionState::Manageable),
        );
        let state = inspector.inspect_hardware(&mut task).await.unwrap();
        assert_eq!(state, ProvisionState::InspectWait);
        assert_eq!(task.node().provision_state, ProvisionState::InspectWait);
    }

    #[tokio::test]
    async fn test_inspect_hardware_shared() {
        let mut task = Task::shared(Node::new("uuid", "AgentAndSSHDriver"));
        let err = Inspector::new("x")
            .inspect_hardware(&mut task)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExclusiveLockRequired);
    }
}
