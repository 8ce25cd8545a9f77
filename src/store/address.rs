use crate::error::StoreError;
use std::fmt;
use std::str::FromStr;

/// Where a value lives in the key-value store.
///
/// `Flat` keys map straight onto a backend entry. `Compound` addresses name a
/// field inside the JSON document stored under `container`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageAddress {
    Flat(String),
    Compound { container: String, path: String },
}

impl StorageAddress {
    pub fn flat(key: impl Into<String>) -> Self {
        Self::Flat(key.into())
    }

    pub fn compound(container: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Compound {
            container: container.into(),
            path: path.into(),
        }
    }

    /// Parse the textual form. A leading `@` marks a compound address whose
    /// first dotted segment is the container: `@box.users[0].token`.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(StoreError::InvalidAddress("empty key".into()));
        }

        let Some(compound) = raw.strip_prefix('@') else {
            return Ok(Self::Flat(raw.to_string()));
        };

        match compound.split_once('.') {
            Some((container, path)) if !container.is_empty() && !path.is_empty() => {
                Ok(Self::compound(container, path))
            }
            _ => Err(StoreError::InvalidAddress(format!(
                "`{raw}` must look like @container.path"
            ))),
        }
    }

    /// The backend key this address ultimately reads and writes.
    pub fn backend_key(&self) -> &str {
        match self {
            Self::Flat(key) => key,
            Self::Compound { container, .. } => container,
        }
    }
}

impl FromStr for StorageAddress {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StorageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(key) => f.write_str(key),
            Self::Compound { container, path } => write!(f, "@{container}.{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys_are_flat_even_with_dots() {
        assert_eq!(
            StorageAddress::parse("site.cookie").unwrap(),
            StorageAddress::flat("site.cookie")
        );
    }

    #[test]
    fn at_prefix_splits_container_from_path() {
        let address = StorageAddress::parse("@box.users[0].token").unwrap();
        assert_eq!(address, StorageAddress::compound("box", "users[0].token"));
        assert_eq!(address.backend_key(), "box");
        assert_eq!(address.to_string(), "@box.users[0].token");
    }

    #[test]
    fn malformed_compound_addresses_are_rejected() {
        assert!(StorageAddress::parse("@box").is_err());
        assert!(StorageAddress::parse("@.path").is_err());
        assert!(StorageAddress::parse("   ").is_err());
    }
}
