//! Exact package identifiers
//!
//! Registry lookups take a [`PackageId`], never a bare string. The identifier
//! is carried byte-for-byte: a scoped name such as `@scope/pkg` is sent as one
//! URL path segment (`@scope%2Fpkg`) and is never split at `@` into a
//! name/version pair.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Exact registry identifier of one package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageId(String);

impl PackageId {
    /// Wrap a name. Fails only on the empty string; no normalization happens.
    pub fn new(name: impl Into<String>) -> Result<Self, ClientError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ClientError::EmptyPackageId);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PackageId {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
