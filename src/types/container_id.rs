// ABOUTME: Validated container identifier.
// ABOUTME: Guarantees the ID is usable as a single state-directory path component.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Longest ID accepted, matching the limit most OCI runtimes enforce.
const MAX_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerIdError {
    #[error("missing container ID")]
    Empty,

    #[error("container ID exceeds maximum length of {MAX_LEN} bytes")]
    TooLong,

    #[error("container ID cannot be '.' or '..'")]
    Reserved,

    #[error("invalid character in container ID: {0:?}")]
    InvalidChar(char),
}

/// Identifier of a container in the runtime's managed set.
///
/// The ID doubles as the name of the container's directory in the sandbox
/// store, so anything that could escape that directory is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(value: &str) -> Result<Self, ContainerIdError> {
        if value.is_empty() {
            return Err(ContainerIdError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(ContainerIdError::TooLong);
        }

        if value == "." || value == ".." {
            return Err(ContainerIdError::Reserved);
        }

        if let Some(c) = value.chars().find(|c| *c == '/' || *c == '\0') {
            return Err(ContainerIdError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContainerId {
    type Err = ContainerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ContainerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContainerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}
