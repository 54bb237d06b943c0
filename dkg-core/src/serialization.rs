//! Serialization support.

#[cfg(feature = "serialization")]
use alloc::vec::Vec;

#[cfg(feature = "serialization")]
use crate::Error;

/// Header for the serialized form of every type that is communicated between
/// trustees or persisted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Header {
    /// Format version
    #[serde(deserialize_with = "version_deserialize")]
    pub(crate) version: u8,
}

impl Default for Header {
    fn default() -> Self {
        Self { version: 0 }
    }
}

/// Deserialize a version. For now, since there is a single version 0,
/// simply validate if it's 0.
pub(crate) fn version_deserialize<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let version: u8 = serde::de::Deserialize::deserialize(deserializer)?;
    if version != 0 {
        Err(serde::de::Error::custom(
            "wrong format version, only 0 supported",
        ))
    } else {
        Ok(version)
    }
}

// Default byte-oriented serialization for structs that need to be communicated.
//
// Note that we still manually implement these methods in each applicable type,
// instead of making these traits `pub` and asking users to import the traits.

#[cfg(feature = "serialization")]
pub(crate) trait Serialize {
    /// Serialize the struct into a Vec.
    fn serialize(&self) -> Result<Vec<u8>, Error>;
}

#[cfg(feature = "serialization")]
pub(crate) trait Deserialize {
    /// Deserialize the struct from a slice of bytes.
    fn deserialize(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: core::marker::Sized;
}

#[cfg(feature = "serialization")]
impl<T: serde::Serialize> Serialize for T {
    fn serialize(&self) -> Result<Vec<u8>, Error> {
        postcard::to_allocvec(self).map_err(|_| Error::SerializationError)
    }
}

#[cfg(feature = "serialization")]
impl<T: for<'de> serde::Deserialize<'de>> Deserialize for T {
    fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        postcard::from_bytes(bytes).map_err(|_| Error::DeserializationError)
    }
}
