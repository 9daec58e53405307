//! AMBE Core - Data model for the satellite voice-channel decoder
//!
//! This crate defines the types shared across the decoder:
//! - Compressed channel frames and their classification (`frame`)
//! - Decoded subframe and synthesis parameters (`params`)
//! - The decode error taxonomy (`error`)
//!
//! The decode orchestration itself lives in `ambe-codec`.

pub mod error;
pub mod frame;
pub mod params;

pub use error::*;
pub use frame::*;
pub use params::*;
