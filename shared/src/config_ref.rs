use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque reference to a configuration, resolved by the server's
/// configuration resolver
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigRef(String);

impl ConfigRef {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConfigRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ConfigRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
