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

//! Deployment and RAID through the deploy agent.
//!
//! The agent itself runs inside the deploy ramdisk. These implementations only
//! validate the node and move it into the states in which the agent takes over.

use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

use crate::interfaces::{BaseInterface, DeployInterface, Properties, RaidInterface};
use crate::task::Task;
use crate::types::{PowerState, ProvisionState};
use crate::{Error, ErrorKind, Result};

const FORCE_OOB_REBOOT: &str = "deploy_forces_oob_reboot";

const RAID_LEVELS: &[&str] = &["0", "1", "2", "5", "6", "1+0", "5+0", "6+0", "JBOD"];

/// Image deployment performed by the agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentDeploy;

/// RAID configuration performed by the agent during cleaning.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentRaid;

impl AgentDeploy {
    /// Create agent deploy.
    pub fn new() -> AgentDeploy {
        AgentDeploy
    }
}

impl AgentRaid {
    /// Create agent RAID.
    pub fn new() -> AgentRaid {
        AgentRaid
    }
}

/// Factory suitable for a deploy binding.
pub fn deploy() -> Box<dyn DeployInterface> {
    Box::new(AgentDeploy::new())
}

/// Factory suitable for a RAID binding.
pub fn raid() -> Box<dyn RaidInterface> {
    Box::new(AgentRaid::new())
}

impl BaseInterface for AgentDeploy {
    fn get_properties(&self) -> Properties {
        let mut result = Properties::new();
        let _ = result.insert(
            FORCE_OOB_REBOOT,
            "Whether the node should be rebooted out-of-band after deployment \
             is complete. Optional.",
        );
        result
    }

    fn validate(&self, task: &Task) -> Result<()> {
        let node = task.node();
        let source = node.instance_info.image_source().ok_or_else(|| {
            Error::new(
                ErrorKind::MissingParameter,
                format!(
                    "Node {} failed to validate deploy image info: \
                     instance_info.image_source is missing",
                    node.uuid
                ),
            )
        })?;

        // Images served by URL must come with a checksum, Glance provides its own
        if source.contains("://") && node.instance_info.image_checksum().is_none() {
            return Err(Error::new(
                ErrorKind::MissingParameter,
                format!(
                    "Node {} uses image {} which requires instance_info.image_checksum",
                    node.uuid, source
                ),
            ));
        }

        match node.driver_info.get(FORCE_OOB_REBOOT) {
            None | Some(Value::Null) | Some(Value::Bool(_)) => Ok(()),
            Some(other) => Err(Error::new(
                ErrorKind::InvalidParameter,
                format!("{} must be a boolean, got {}", FORCE_OOB_REBOOT, other),
            )),
        }
    }
}

#[async_trait]
impl DeployInterface for AgentDeploy {
    async fn prepare(&self, task: &mut Task) -> Result<()> {
        let node = task.node_mut("Preparing deployment")?;
        if node.provision_state == ProvisionState::Available {
            node.provision_state = ProvisionState::Deploying;
        }
        debug!("Node {} is prepared for agent deployment", node.uuid);
        Ok(())
    }

    async fn deploy(&self, task: &mut Task) -> Result<ProvisionState> {
        self.validate(task)?;
        let node = task.node_mut("Deployment")?;
        // Booting into the ramdisk hands control over to the agent
        node.power_state = Some(PowerState::On);
        node.provision_state = ProvisionState::DeployWait;
        info!("Node {} is booting the deploy agent", node.uuid);
        Ok(ProvisionState::DeployWait)
    }

    async fn tear_down(&self, task: &mut Task) -> Result<ProvisionState> {
        let node = task.node_mut("Tear down")?;
        node.power_state = Some(PowerState::Off);
        node.provision_state = ProvisionState::Deleted;
        info!("Instance was removed from node {}", node.uuid);
        Ok(ProvisionState::Deleted)
    }
}

fn validate_raid_config(config: &Value) -> Result<()> {
    let invalid = |msg: String| Error::new(ErrorKind::InvalidParameter, msg);

    let disks = match config.get("logical_disks") {
        Some(Value::Array(disks)) if !disks.is_empty() => disks,
        _ => {
            return Err(invalid(
                "RAID configuration must contain a non-empty logical_disks list".into(),
            ))
        }
    };

    for (index, disk) in disks.iter().enumerate() {
        match disk.get("raid_level") {
            Some(Value::String(level)) if RAID_LEVELS.contains(&level.as_str()) => {}
            other => {
                return Err(invalid(format!(
                    "Logical disk {} has invalid raid_level {:?}",
                    index, other
                )))
            }
        }

        match disk.get("size_gb") {
            Some(Value::Number(n)) if n.as_u64().is_some() => {}
            Some(Value::String(s)) if s == "MAX" => {}
            other => {
                return Err(invalid(format!(
                    "Logical disk {} has invalid size_gb {:?}",
                    index, other
                )))
            }
        }
    }

    Ok(())
}

impl BaseInterface for AgentRaid {
    fn get_properties(&self) -> Properties {
        Properties::new()
    }

    fn validate(&self, task: &Task) -> Result<()> {
        match task.node().target_raid_config {
            Some(ref config) => validate_raid_config(config),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RaidInterface for AgentRaid {
    async fn create_configuration(&self, task: &mut Task) -> Result<ProvisionState> {
        let config = task.node().target_raid_config.as_ref().ok_or_else(|| {
            Error::new(
                ErrorKind::MissingParameter,
                format!(
                    "Node {} has no target RAID configuration",
                    task.node().uuid
                ),
            )
        })?;
        validate_raid_config(config)?;

        let node = task.node_mut("Creating RAID configuration")?;
        node.provision_state = ProvisionState::CleanWait;
        info!("Agent will create RAID configuration on node {}", node.uuid);
        Ok(ProvisionState::CleanWait)
    }

    async fn delete_configuration(&self, task: &mut Task) -> Result<ProvisionState> {
        let node = task.node_mut("Deleting RAID configuration")?;
        node.provision_state = ProvisionState::CleanWait;
        info!("Agent will delete RAID configuration on node {}", node.uuid);
        Ok(ProvisionState::CleanWait)
    }
}
