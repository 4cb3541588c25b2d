use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Catalog ids are opaque strings issued by the remote catalog. The only
/// invariant we enforce locally is that they are non-blank.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Build an id, rejecting blank input.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(concat!(
                        stringify!($name),
                        " must not be empty"
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(VideoId);
define_id!(PlaylistId);
define_id!(AlbumId);
define_id!(ArtistId);

/// Prefix the catalog uses for playlists that are generated from an album.
pub const ALBUM_PLAYLIST_PREFIX: &str = "OLAK5uy_";

impl PlaylistId {
    /// Whether this playlist is a catalog-generated stand-in for an album.
    pub fn is_album_surrogate(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.0.starts_with(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_ids_are_rejected() {
        assert!(VideoId::new("").is_err());
        assert!(AlbumId::new("   ").is_err());
        assert!(matches!(
            PlaylistId::new("\t"),
            Err(DomainError::InvalidId(msg)) if msg == "PlaylistId must not be empty"
        ));
    }

    #[test]
    fn test_ids_are_trimmed() {
        let id = ArtistId::new("  UC123 ").expect("valid id");
        assert_eq!(id.as_str(), "UC123");
        assert_eq!(id.to_string(), "UC123");
    }

    #[test]
    fn test_deserialize_validates_like_new() {
        assert!(serde_json::from_str::<VideoId>("\"   \"").is_err());

        let id: PlaylistId = serde_json::from_str("\" PLfoo \"").expect("valid id");
        assert_eq!(id.as_str(), "PLfoo");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"PLfoo\"");
    }

    #[test]
    fn test_album_surrogate_prefix() {
        let surrogate = PlaylistId::new("OLAK5uy_ABC").expect("valid id");
        let regular = PlaylistId::new("PLfoo").expect("valid id");

        assert!(surrogate.is_album_surrogate(ALBUM_PLAYLIST_PREFIX));
        assert!(!regular.is_album_surrogate(ALBUM_PLAYLIST_PREFIX));
        assert!(!surrogate.is_album_surrogate(""));
    }
}
