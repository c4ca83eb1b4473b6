//! Numeric wire conventions shared by an encoder and its decoders.

use binmodel_buffers::Endianness;
use serde::{Deserialize, Serialize};

/// Codec configuration.
///
/// None of these settings are carried on the wire, so both ends of an
/// exchange must be built with equal configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Use 6-byte string length prefixes and 6-byte `*_64` integers.
    /// When off both shrink to 4 bytes.
    pub support_64: bool,
    /// Signedness used by the low-level integer helpers when the caller
    /// does not pick one. Type-tagged chunks always use the tag's sign.
    pub unsigned: bool,
    /// Byte order of every multi-byte number.
    pub endianness: Endianness,
    /// Reject boolean payload bytes other than `0` and `1`.
    pub strict_booleans: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            support_64: true,
            unsigned: false,
            endianness: Endianness::Big,
            strict_booleans: false,
        }
    }
}

impl CodecConfig {
    /// Width in bytes of `INT_64`/`UINT_64` payloads.
    pub fn int64_width(&self) -> usize {
        if self.support_64 {
            6
        } else {
            4
        }
    }

    /// Width in bytes of STRING/JSON length prefixes.
    pub fn length_prefix_width(&self) -> usize {
        self.int64_width()
    }
}
