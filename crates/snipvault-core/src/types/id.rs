//! Newtype identifiers for all domain entities.
//!
//! Using distinct types prevents accidentally passing a `FolderId` where a
//! `SnippetId` is expected. Entity ids wrap [`uuid::Uuid`]; the owner id is
//! an opaque string handed to us by the identity collaborator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a snippet within an owner's namespace.
    SnippetId
);

define_id!(
    /// Unique identifier for a folder within an owner's namespace.
    FolderId
);

define_id!(
    /// Unique identifier for a share link.
    ShareLinkId
);

/// Identity namespace under which all snippets and folders of a user live.
///
/// Resolved from the caller's bearer credential; the core trusts it for
/// every authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Prefix reserved for internal namespaces (never issued to users).
    pub const RESERVED_PREFIX: &'static str = "__";

    /// Wrap an identity string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The namespace holding documents that are looked up without an owner.
    pub fn system(name: &str) -> Self {
        Self(format!("{}{name}", Self::RESERVED_PREFIX))
    }

    /// Borrow the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id falls into the reserved internal namespace.
    pub fn is_reserved(&self) -> bool {
        self.0.starts_with(Self::RESERVED_PREFIX)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_id_new() {
        let id1 = SnippetId::new();
        let id2 = SnippetId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_folder_id_from_str() {
        let uuid = Uuid::new_v4();
        let id: FolderId = uuid.to_string().parse().expect("should parse");
        assert_eq!(id.0, uuid);
        assert!("not-a-uuid".parse::<FolderId>().is_err());
    }

    #[test]
    fn test_owner_id_is_transparent() {
        let owner = OwnerId::new("user-42");
        let json = serde_json::to_string(&owner).expect("serialize");
        assert_eq!(json, "\"user-42\"");
    }

    #[test]
    fn test_system_namespace_is_reserved() {
        assert!(OwnerId::system("links").is_reserved());
        assert!(!OwnerId::new("alice").is_reserved());
    }
}
