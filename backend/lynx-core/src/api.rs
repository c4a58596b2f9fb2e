//! Lynx APU public configuration and error types

use bincode::error::{DecodeError, EncodeError};
use bincode::{Decode, Encode};
use lynx_config::{DEFAULT_SAMPLE_RATE_DIVIDER, LynxAudioMode};
use thiserror::Error;

/// Bumped whenever the encoded APU state layout changes.
pub const APU_STATE_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum ApuStateError {
    #[error("Error serializing APU state: {0}")]
    Encode(#[from] EncodeError),
    #[error("Error deserializing APU state: {0}")]
    Decode(#[from] DecodeError),
    #[error("APU state version mismatch; expected {expected}, was {actual}")]
    VersionMismatch { expected: u16, actual: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LynxApuConfig {
    pub audio_mode: LynxAudioMode,
    /// Master clock ticks per output frame
    pub sample_rate_divider: u32,
}

impl Default for LynxApuConfig {
    fn default() -> Self {
        Self {
            audio_mode: LynxAudioMode::default(),
            sample_rate_divider: DEFAULT_SAMPLE_RATE_DIVIDER,
        }
    }
}
