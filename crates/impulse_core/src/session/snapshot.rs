//! Encode/decode pair for session snapshots.
//!
//! # Responsibility
//! - Turn a serializable entity into an opaque byte blob and back.
//!
//! # Invariants
//! - `decode_snapshot(encode_snapshot(v))` is structurally equal to `v`;
//!   floats come back bit-for-bit, non-finite values included.
//! - Blobs start with `SNAPSHOT_VERSION`; any other version is a decode failure.
//! - Decode failures are corruption, never "absent".

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot encode/decode failures.
#[derive(Debug)]
pub enum SnapshotError {
    Encode(bincode::Error),
    Decode(bincode::Error),
    UnsupportedVersion { found: u32, supported: u32 },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Decode(err) => write!(f, "failed to decode snapshot: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "snapshot version {found} is not supported (expected {supported})"
            ),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

/// Encodes `value` as a versioned snapshot blob.
pub fn encode_snapshot<T: Serialize>(value: &T) -> Result<Vec<u8>, SnapshotError> {
    bincode::serialize(&(SNAPSHOT_VERSION, value)).map_err(SnapshotError::Encode)
}

/// Decodes a blob produced by [`encode_snapshot`].
pub fn decode_snapshot<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SnapshotError> {
    let version: u32 = bincode::deserialize(bytes).map_err(SnapshotError::Decode)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: version,
            supported: SNAPSHOT_VERSION,
        });
    }

    let (_, payload): (u32, T) = bincode::deserialize(bytes).map_err(SnapshotError::Decode)?;
    Ok(payload)
}
