use std::{path::Path, time::Duration};

use derive_ex::derive_ex;
use serde::{Deserialize, Serialize};

use crate::{IdPolicy, LabError};


/// Settings shared by the stores and the mutability harness.
///
/// Missing fields take their default values when deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive_ex(Default)]
#[serde(default)]
pub struct LabConfig {
    /// How `add_todo` allocates ids in both todo stores.
    pub id_policy: IdPolicy,

    /// Simulated delay of the asynchronous transition, in milliseconds.
    #[default(1000)]
    pub async_delay_ms: u64,

    /// Serialize harness objects with two-space indentation.
    #[default(true)]
    pub pretty_json: bool,
}

impl LabConfig {
    pub fn async_delay(&self) -> Duration {
        Duration::from_millis(self.async_delay_ms)
    }

    pub fn from_json(s: &str) -> Result<Self, LabError> {
        serde_json::from_str(s).map_err(|e| LabError::InvalidConfig {
            message: e.to_string(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| LabError::ReadConfig {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&s)
    }
}
