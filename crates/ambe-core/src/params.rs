//! Decoded spectral parameters
//!
//! A speech frame decodes into two subframes, one per temporal half of
//! the 20 ms interval. Each subframe is later converted into the
//! parameter form the synthesis engine consumes.

/// Number of discrete voicing bands carried per subframe
pub const VOICING_BANDS: usize = 8;

/// Largest harmonic count (L) a subframe can carry
pub const MAX_HARMONICS: usize = 56;

/// Decoded spectral parameters for half of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Subframe {
    /// Fundamental frequency, normalized to cycles per sample
    pub fundamental: f32,

    /// Number of spectral harmonics (L)
    pub harmonics: usize,

    /// Voicing decision per discretized voicing band
    pub voiced: [bool; VOICING_BANDS],

    /// Log2 spectral magnitude per harmonic
    pub log_magnitudes: Vec<f32>,
}

impl Default for Subframe {
    /// Session-start value: no spectral content yet. Used only as the
    /// decoding context for the first speech frame, never synthesized.
    fn default() -> Self {
        Self {
            fundamental: 0.0,
            harmonics: 0,
            voiced: [false; VOICING_BANDS],
            log_magnitudes: Vec::new(),
        }
    }
}

/// Parameters handed to the synthesis engine for one subframe
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParams {
    /// Angular fundamental frequency in radians per sample (w0)
    pub angular_frequency: f32,

    /// Number of harmonics (L)
    pub harmonics: usize,

    /// Voicing flag per harmonic; index 0 is harmonic 1
    pub voiced: Vec<bool>,

    /// Linear spectral magnitude per harmonic; index 0 is harmonic 1
    pub magnitudes: Vec<f32>,
}
