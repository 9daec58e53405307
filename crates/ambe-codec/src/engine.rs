//! Collaborator contracts for the decode pipeline
//!
//! The codec core orchestrates; the actual bit unpacking, spectral
//! synthesis, and tone reconstruction live behind these traits.

use ambe_core::{AmbeResult, Frame, Subframe, SynthesisParams};

use crate::DecoderState;

/// Bit-level frame-parameter codec.
///
/// Extracts the index fields from an 80-bit speech frame and decodes
/// them into the two subframe halves of the interval, applying its own
/// error-correction and interpolation rules.
pub trait ParameterDecoder {
    /// Decode one speech frame into its two subframes.
    ///
    /// `prev` is the second subframe of the previous speech frame (the
    /// zeroed default at session start) and serves as interpolation
    /// context. `bad_frame` signals that the channel bits are
    /// unreliable; implementations should prefer redundancy or
    /// interpolation-based recovery over literal decoding when set.
    fn decode(&self, frame: &Frame, prev: &Subframe, bad_frame: bool)
        -> AmbeResult<[Subframe; 2]>;
}

/// Spectral synthesis engine.
///
/// Performs voiced/unvoiced spectral enhancement and waveform
/// synthesis for one subframe. Opaque to the codec core beyond this
/// call contract.
pub trait SynthesisEngine {
    /// Carry-over context the engine needs to interpolate consecutive
    /// subframes smoothly (predecessor parameters, oscillator phases).
    type Context: Clone;

    /// Context in effect before the first speech frame of a session.
    ///
    /// Engines may define non-zero defaults for stability; this is not
    /// required to be a zeroed value.
    fn initial_context(&self) -> Self::Context;

    /// Synthesize one half-block of PCM into `audio`, interpolating
    /// against `predecessor`. `quality` selects the unvoiced
    /// reconstruction quality. Returns the context the next subframe
    /// must interpolate against.
    ///
    /// The engine must fill `audio` completely.
    fn synthesize(
        &self,
        audio: &mut [i16],
        params: &SynthesisParams,
        predecessor: &Self::Context,
        quality: u32,
    ) -> AmbeResult<Self::Context>;
}

/// Tone-frame reconstruction.
///
/// Owns the decoder-state update policy for tone frames; the dispatch
/// layer only hands over the session state and the sized output block.
pub trait ToneDecoder<C> {
    /// Reconstruct a tone frame into `audio`, returning the successor
    /// session state.
    fn decode(
        &self,
        audio: &mut [i16],
        frame: &Frame,
        state: &DecoderState<C>,
    ) -> AmbeResult<DecoderState<C>>;
}
