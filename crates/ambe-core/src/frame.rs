//! Channel frame - one 20 ms slice of the compressed voice channel
//!
//! A frame is an opaque 80-bit block. The only structure this layer
//! knows about is the classification pattern in the first byte; the
//! remaining bits belong to the frame-parameter codec.

use crate::{AmbeError, AmbeResult};

/// Frame duration in milliseconds
pub const FRAME_DURATION_MS: u32 = 20;

/// Size of one compressed frame in bytes (80 bits)
pub const FRAME_BYTES: usize = 10;

/// Nominal PCM samples produced per frame (20 ms at 8 kHz)
pub const SAMPLES_PER_FRAME: usize = 160;

/// Smallest output block the channel timing can request
pub const MIN_BLOCK_SAMPLES: usize = 152;

/// Largest output block the channel timing can request
pub const MAX_BLOCK_SAMPLES: usize = 168;

/// Mask selecting the classification bits of the first frame byte
const KIND_MASK: u8 = 0xfc;

/// Masked first-byte pattern marking a tone frame (top 6 bits `111111`)
const TONE_PATTERN: u8 = 0xfc;

/// Masked first-byte pattern marking a silence frame (top 6 bits `111110`)
const SILENCE_PATTERN: u8 = 0xf8;

/// One 80-bit compressed voice frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; FRAME_BYTES]);

impl Frame {
    /// Create a frame from its raw bytes
    pub const fn new(bytes: [u8; FRAME_BYTES]) -> Self {
        Frame(bytes)
    }

    /// Create a frame from the first 10 bytes of a slice
    pub fn from_slice(data: &[u8]) -> AmbeResult<Self> {
        if data.len() < FRAME_BYTES {
            return Err(AmbeError::FrameTooShort {
                expected: FRAME_BYTES,
                actual: data.len(),
            });
        }

        let mut bytes = [0u8; FRAME_BYTES];
        bytes.copy_from_slice(&data[..FRAME_BYTES]);
        Ok(Frame(bytes))
    }

    /// Raw frame bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.0
    }

    /// Classify the frame from its first byte.
    ///
    /// Pure and total: every byte value maps to exactly one kind, and
    /// no other frame byte or decoder state is consulted. The tone
    /// pattern is matched before the silence pattern since the two
    /// share a bit prefix. The `0xfc`/`0xf8` patterns come from the
    /// reference decoder, not from the published channel
    /// specification; treat them as an exact behavioral contract.
    pub fn kind(&self) -> FrameKind {
        match self.0[0] & KIND_MASK {
            TONE_PATTERN => FrameKind::Tone,
            SILENCE_PATTERN => FrameKind::Silence,
            _ => FrameKind::Speech,
        }
    }
}

impl From<[u8; FRAME_BYTES]> for Frame {
    fn from(bytes: [u8; FRAME_BYTES]) -> Self {
        Frame(bytes)
    }
}

/// Frame classification, derived from the top bits of the first byte.
///
/// Marked non-exhaustive so downstream dispatch keeps a defensive arm
/// for kinds a future channel revision might add.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Regular speech frame, two subframes of spectral parameters
    Speech,
    /// Channel-marked silence, no usable spectral content
    Silence,
    /// Signalling tone (DTMF, call progress)
    Tone,
}
