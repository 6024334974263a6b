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

//! Serial console served by shellinabox or socat.

use async_trait::async_trait;
use log::info;

use super::bmc::Protocol;
use crate::interfaces::{BaseInterface, ConsoleInterface, Properties};
use crate::task::Task;
use crate::types::{ConsoleInfo, ConsoleType};
use crate::Result;

/// Address the console proxy listens on.
pub const CONSOLE_ADDRESS: &str = "127.0.0.1";

/// Console exposing the BMC serial-over-LAN through a local proxy.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConsole {
    protocol: &'static Protocol,
    console_type: ConsoleType,
}

impl TerminalConsole {
    /// Create a console of the given type.
    pub fn new(protocol: &'static Protocol, console_type: ConsoleType) -> TerminalConsole {
        TerminalConsole {
            protocol,
            console_type,
        }
    }

    /// Console type.
    #[inline]
    pub fn console_type(&self) -> ConsoleType {
        self.console_type
    }

    fn url(&self, port: u16) -> String {
        match self.console_type {
            ConsoleType::Shellinabox => format!("http://{}:{}", CONSOLE_ADDRESS, port),
            ConsoleType::Socat => format!("tcp://{}:{}", CONSOLE_ADDRESS, port),
        }
    }
}

impl BaseInterface for TerminalConsole {
    fn get_properties(&self) -> Properties {
        let mut result = self.protocol.properties();
        if let Some((key, description)) = self.protocol.terminal_port {
            let _ = result.insert(key, description);
        }
        result
    }

    fn validate(&self, task: &Task) -> Result<()> {
        let info = &task.node().driver_info;
        self.protocol.validate(info)?;
        let _ = self.protocol.terminal_port(info)?;
        Ok(())
    }
}

#[async_trait]
impl ConsoleInterface for TerminalConsole {
    async fn start_console(&self, task: &mut Task) -> Result<()> {
        self.validate(task)?;
        let port = self.protocol.terminal_port(&task.node().driver_info)?;
        let node = task.node_mut("Starting console")?;
        node.console_enabled = true;
        info!(
            "Started {} console for node {} on port {}",
            self.console_type, node.uuid, port
        );
        Ok(())
    }

    async fn stop_console(&self, task: &mut Task) -> Result<()> {
        let node = task.node_mut("Stopping console")?;
        node.console_enabled = false;
        info!("Stopped {} console for node {}", self.console_type, node.uuid);
        Ok(())
    }

    async fn get_console(&self, task: &Task) -> Result<ConsoleInfo> {
        let enabled = task.node().console_enabled;
        let url = if enabled {
            Some(self.url(self.protocol.terminal_port(&task.node().driver_info)?))
        } else {
            None
        };

        Ok(ConsoleInfo {
            enabled,
            console_type: self.console_type,
            url,
        })
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::TerminalConsole;
    use crate::interfaces::{BaseInterface, ConsoleInterface};
    use crate::modules::bmc::test::{node, TEST_PROTOCOL};
    use crate::task::{DriverInfo, Task};
    use crate::types::ConsoleType;
    use crate::ErrorKind;

    fn info() -> DriverInfo {
        DriverInfo::default()
            .with("test_address", "1.2.3.4")
            .with("test_terminal_port", 8023)
    }

    #[test]
    fn test_properties_include_terminal_port() {
        let console = TerminalConsole::new(&TEST_PROTOCOL, ConsoleType::Socat);
        assert!(console.get_properties().contains_key("test_terminal_port"));
    }

    #[test]
    fn test_validate_requires_terminal_port() {
        let console = TerminalConsole::new(&TEST_PROTOCOL, ConsoleType::Shellinabox);
        let task = Task::shared(node(DriverInfo::default().with("test_address", "a")));
        let err = console.validate(&task).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
    }

    #[tokio::test]
    async fn test_shellinabox_lifecycle() {
        let console = TerminalConsole::new(&TEST_PROTOCOL, ConsoleType::Shellinabox);
        let mut task = Task::exclusive(node(info()));

        let before = console.get_console(&task).await.unwrap();
        assert!(!before.enabled);
        assert!(before.url.is_none());

        console.start_console(&mut task).await.unwrap();
        let started = console.get_console(&task).await.unwrap();
        assert!(started.enabled);
        assert_eq!(started.url.as_deref(), Some("http://127.0.0.1:8023"));

        console.stop_console(&mut task).await.unwrap();
        assert!(!console.get_console(&task).await.unwrap().enabled);
    }

    #[tokio::test]
    async fn test_socat_url() {
        let console = TerminalConsole::new(&TEST_PROTOCOL, ConsoleType::Socat);
        let mut task = Task::exclusive(node(info()));
        console.start_console(&mut task).await.unwrap();
        let started = console.get_console(&task).await.unwrap();
        assert_eq!(started.console_type, ConsoleType::Socat);
        assert_eq!(started.url.as_deref(), Some("tcp://127.0.0.1:8023"));
    }
}
