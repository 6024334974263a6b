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

//! IPMI vendor passthru: raw commands and BMC reset.

use async_trait::async_trait;
use log::info;
use serde_json::Value;

use super::bmc::Protocol;
use crate::interfaces::{BaseInterface, Properties, VendorInterface};
use crate::task::Task;
use crate::{Error, ErrorKind, Result};

const SEND_RAW: &str = "send_raw";
const BMC_RESET: &str = "bmc_reset";

/// Vendor passthru methods available on IPMI BMCs.
#[derive(Debug, Clone, Copy)]
pub struct IpmiVendorPassthru {
    protocol: &'static Protocol,
}

impl IpmiVendorPassthru {
    /// Create vendor passthru for the protocol.
    pub fn new(protocol: &'static Protocol) -> IpmiVendorPassthru {
        IpmiVendorPassthru { protocol }
    }
}

/// Parse a string like `0x06 0x01` into bytes.
fn parse_raw_bytes(params: &Value) -> Result<Vec<u8>> {
    let raw = match params.get("raw_bytes") {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => {
            return Err(Error::new(
                ErrorKind::MissingParameter,
                "Parameter raw_bytes (string of bytes) was not specified",
            ))
        }
    };

    let bytes = raw
        .split_whitespace()
        .map(|item| {
            let digits = item
                .strip_prefix("0x")
                .or_else(|| item.strip_prefix("0X"))
                .unwrap_or(item);
            u8::from_str_radix(digits, 16).map_err(|_| {
                Error::new(
                    ErrorKind::InvalidParameter,
                    format!("Invalid raw byte {} in {}", item, raw),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // Network function and command are mandatory
    if bytes.len() < 2 {
        return Err(Error::new(
            ErrorKind::InvalidParameter,
            format!("Raw command {} must contain at least two bytes", raw),
        ));
    }

    Ok(bytes)
}

fn parse_warm(params: &Value) -> Result<bool> {
    match params.get("warm") {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(Error::new(
                ErrorKind::InvalidParameter,
                format!("Parameter warm must be a boolean, got {}", s),
            )),
        },
        Some(other) => Err(Error::new(
            ErrorKind::InvalidParameter,
            format!("Parameter warm must be a boolean, got {}", other),
        )),
    }
}

impl BaseInterface for IpmiVendorPassthru {
    fn get_properties(&self) -> Properties {
        self.protocol.properties()
    }

    fn validate(&self, task: &Task) -> Result<()> {
        self.protocol.validate(&task.node().driver_info)
    }
}

#[async_trait]
impl VendorInterface for IpmiVendorPassthru {
    fn methods(&self) -> Vec<&'static str> {
        vec![SEND_RAW, BMC_RESET]
    }

    fn validate_method(&self, task: &Task, method: &str, params: &Value) -> Result<()> {
        match method {
            SEND_RAW => {
                let _ = parse_raw_bytes(params)?;
            }
            BMC_RESET => {
                let _ = parse_warm(params)?;
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidParameter,
                    format!(
                        "Unsupported method ({}) passed to {} vendor interface",
                        method, self.protocol.name
                    ),
                ))
            }
        }

        self.validate(task)
    }

    async fn call(&self, task: &mut Task, method: &str, params: Value) -> Result<Value> {
        self.validate_method(task, method, &params)?;
        let node = task.node_mut(method)?;
        if method == SEND_RAW {
            let bytes = parse_raw_bytes(&params)?;
            info!(
                "Sending raw command of {} byte(s) to node {}",
                bytes.len(),
                node.uuid
            );
        } else {
            let kind = if parse_warm(&params)? { "warm" } else { "cold" };
            info!("Performing {} BMC reset of node {}", kind, node.uuid);
        }
        Ok(Value::Null)
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use serde_json::{json, Value};

    use super::{parse_raw_bytes, parse_warm, IpmiVendorPassthru};
    use crate::interfaces::VendorInterface;
    use crate::modules::bmc::test::{node, TEST_PROTOCOL};
    use crate::task::{DriverInfo, Task};
    use crate::ErrorKind;

    #[test]
    fn test_parse_raw_bytes() {
        assert_eq!(
            parse_raw_bytes(&json!({"raw_bytes": "0x06 0x01 ff"})).unwrap(),
            vec![6, 1, 255]
        );
        let missing = parse_raw_bytes(&json!({})).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingParameter);
        let short = parse_raw_bytes(&json!({"raw_bytes": "0x06"})).unwrap_err();
        assert_eq!(short.kind(), ErrorKind::InvalidParameter);
        let garbage = parse_raw_bytes(&json!({"raw_bytes": "0x06 0xzz"})).unwrap_err();
        assert_eq!(garbage.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_parse_warm() {
        assert!(parse_warm(&json!({})).unwrap());
        assert!(!parse_warm(&json!({"warm": false})).unwrap());
        assert!(!parse_warm(&json!({"warm": "False"})).unwrap());
        assert!(parse_warm(&json!({"warm": 42})).is_err());
    }

    #[test]
    fn test_unknown_method() {
        let vendor = IpmiVendorPassthru::new(&TEST_PROTOCOL);
        let task = Task::shared(node(DriverInfo::default().with("test_address", "a")));
        let err = vendor
            .validate_method(&task, "format_disk", &Value::Null)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(vendor.methods(), vec!["send_raw", "bmc_reset"]);
    }

    #[tokio::test]
    async fn test_call() {
        let vendor = IpmiVendorPassthru::new(&TEST_PROTOCOL);
        let mut task = Task::exclusive(node(DriverInfo::default().with("test_address", "a")));
        let result = vendor
            .call(&mut task, "send_raw", json!({"raw_bytes": "0x00 0x01"}))
            .await
            .unwrap();
        assert_eq!(result, Value::Null);
        let _ = vendor
            .call(&mut task, "bmc_reset", json!({"warm": false}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_call_shared_lock() {
        let vendor = IpmiVendorPassthru::new(&TEST_PROTOCOL);
        let mut task = Task::shared(node(DriverInfo::default().with("test_address", "a")));
        let err = vendor
            .call(&mut task, "bmc_reset", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExclusiveLockRequired);
    }
}
