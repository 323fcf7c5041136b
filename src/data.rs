//! Test data
//!
//! Credential records read from a JSON file of the form
//! `{"users": [{"username": "...", "password": "..."}]}` and consumed by index.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// One login
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Ordered credential records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestData {
    #[serde(default)]
    users: Vec<Credentials>,
}

impl TestData {
    pub fn new(users: Vec<Credentials>) -> Self {
        Self { users }
    }

    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::test_data(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let data = Self::from_json(&content)?;
        debug!("Loaded {} users from {}", data.users.len(), path.display());
        Ok(data)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::test_data(format!("Failed to parse test data: {}", e)))
    }

    /// Record at `index`
    pub fn credentials(&self, index: usize) -> Result<&Credentials> {
        self.users.get(index).ok_or_else(|| {
            Error::test_data(format!(
                "No user at index {} ({} available)",
                index,
                self.users.len()
            ))
        })
    }

    /// First record
    pub fn default_user(&self) -> Result<&Credentials> {
        self.credentials(0)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
