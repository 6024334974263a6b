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

//! Error and Result implementations.

use std::fmt;

/// Kind of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A driver could not be constructed.
    ///
    /// Usually means that an external library the driver depends on is not available.
    DriverLoadFailed,

    /// Requested driver is not registered.
    UnknownDriver,

    /// A driver with the same name is already registered.
    DuplicateDriver,

    /// Compatibility alias is misconfigured.
    ///
    /// Either points to another alias, to an unknown driver or shadows a driver.
    AliasConfiguration,

    /// Configuration file is missing or malformed.
    InvalidConfig,

    /// A required parameter is missing from the node.
    MissingParameter,

    /// Invalid value passed to one of parameters.
    InvalidParameter,

    /// The operation changes the node and cannot run under a shared lock.
    ExclusiveLockRequired,

    /// The interface implementation does not support the operation.
    UnsupportedOperation,
}

/// Error from a driver call.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    driver: Option<String>,
    message: Option<String>,
}

/// Result of a driver call.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Create a new error of the provided kind.
    #[inline]
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            driver: None,
            message: Some(message.into()),
        }
    }

    /// Create an error related to a specific driver.
    pub fn new_with_driver<D, S>(kind: ErrorKind, driver: D, message: S) -> Error
    where
        D: Into<String>,
        S: Into<String>,
    {
        Error {
            kind,
            driver: Some(driver.into()),
            message: Some(message.into()),
        }
    }

    /// Helper - error of kind DriverLoadFailed.
    pub(crate) fn new_driver_load<D, S>(driver: D, reason: S) -> Error
    where
        D: Into<String>,
        S: fmt::Display,
    {
        let driver = driver.into();
        let message = format!("Driver {} could not be loaded. Reason: {}", driver, reason);
        Error::new_with_driver(ErrorKind::DriverLoadFailed, driver, message)
    }

    /// Helper - error of kind UnknownDriver.
    pub(crate) fn new_unknown_driver<D: Into<String>>(driver: D) -> Error {
        let driver = driver.into();
        let message = format!("Could not find the following driver: {}", driver);
        Error::new_with_driver(ErrorKind::UnknownDriver, driver, message)
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Name of the driver this error relates to (if any).
    #[inline]
    pub fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }

    /// Error message (if any).
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::DriverLoadFailed => "Failed to load a driver",
            ErrorKind::UnknownDriver => "Requested driver was not found",
            ErrorKind::DuplicateDriver => "Driver is already registered",
            ErrorKind::AliasConfiguration => "Invalid driver alias configuration",
            ErrorKind::InvalidConfig => "Configuration is missing or invalid",
            ErrorKind::MissingParameter => "Required parameter is missing",
            ErrorKind::InvalidParameter => "Input value(s) are invalid",
            ErrorKind::ExclusiveLockRequired => "Operation requires an exclusive lock",
            ErrorKind::UnsupportedOperation => "Operation is not supported by the driver",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(ref msg) = self.message {
            write!(f, ": {}", msg)
        } else {
            Ok(())
        }
    }
}

impl ::std::error::Error for Error {}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Error {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot parse configuration: {}", value),
        )
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::{Error, ErrorKind};

    #[test]
    fn test_driver_load_message() {
        let err = Error::new_driver_load("AgentAndUcsDriver", "Unable to import UcsSdk library");
        assert_eq!(err.kind(), ErrorKind::DriverLoadFailed);
        assert_eq!(err.driver(), Some("AgentAndUcsDriver"));
        assert_eq!(
            err.to_string(),
            "Failed to load a driver: Driver AgentAndUcsDriver could not be loaded. \
             Reason: Unable to import UcsSdk library"
        );
    }

    #[test]
    fn test_unknown_driver_message() {
        let err = Error::new_unknown_driver("foo");
        assert_eq!(err.kind(), ErrorKind::UnknownDriver);
        assert!(err.message().unwrap().contains("foo"));
    }

    #[test]
    fn test_error_without_driver() {
        let err = Error::new(ErrorKind::InvalidConfig, "no file");
        assert!(err.driver().is_none());
        assert_eq!(
            err.to_string(),
            "Configuration is missing or invalid: no file"
        );
    }
}
