//! AMBE Codec - Per-frame decode orchestration
//!
//! Decodes 80-bit AMBE channel frames into linear PCM, one frame per
//! call. This crate owns the small state machine around each call:
//! frame classification, dispatch to the speech/silence/tone paths,
//! subframe conversion, and the carry-over of decoder state from one
//! speech frame into the next.
//!
//! The heavy lifting is delegated to collaborators behind traits:
//! the bit-level parameter codec ([`ParameterDecoder`]), the spectral
//! synthesis engine ([`SynthesisEngine`]) and tone reconstruction
//! ([`ToneDecoder`]).
//!
//! # Temporal coupling
//!
//! Each speech frame's reconstruction depends on the previous one: the
//! parameter codec interpolates against the last subframe, and the
//! synthesis engine interpolates each half-block against its
//! predecessor. [`DecoderState`] carries exactly that context. Getting
//! the carry-over wrong does not fail loudly; it degrades the audio.

pub mod convert;
pub mod decoder;
pub mod engine;

pub use convert::*;
pub use decoder::*;
pub use engine::*;
