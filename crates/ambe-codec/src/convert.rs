//! Subframe conversion - decoded subframe to synthesis parameters
//!
//! Maps one decoded [`Subframe`] into the [`SynthesisParams`] form the
//! synthesis engine consumes: angular frequency, per-harmonic voicing
//! looked up from the discretized voicing bands, and linear magnitudes
//! derived from the log-magnitude envelope.
//!
//! The numeric policy here is copied from the reference decoder. Any
//! deviation changes the audio output even when everything else passes,
//! so the constants are named and must be preserved exactly.

use std::f32::consts::TAU;

use ambe_core::{AmbeError, AmbeResult, Subframe, SynthesisParams, MAX_HARMONICS, VOICING_BANDS};

/// Scale mapping harmonic index onto the voicing bands: harmonic `i`
/// reads band `trunc((i - 1) * 16 * f0)`.
pub const VOICING_BAND_SCALE: f32 = 16.0;

/// Numerator of the energy correction applied to unvoiced harmonics,
/// relative to the spectral envelope: `0.2046 / sqrt(w0)`. Taken
/// verbatim from the reference decoder; no published derivation.
pub const UNVOICED_GAIN: f32 = 0.2046;

/// Divisor bringing the linear magnitudes into the synthesis engine's
/// expected range: `2^Mlog / 6`.
const MAGNITUDE_SCALE: f32 = 6.0;

/// Convert one decoded subframe into synthesis parameters.
///
/// Pure: the same subframe always converts to the same parameters.
///
/// # Errors
///
/// Returns [`AmbeError::ContractViolation`] when the subframe breaks
/// the upstream contract: non-positive fundamental frequency (the
/// unvoiced gain divides by its square root), harmonic count outside
/// `1..=MAX_HARMONICS`, a magnitude array shorter than the harmonic
/// count, or a fundamental high enough to push the voicing-band lookup
/// out of range.
pub fn synthesis_params(sf: &Subframe) -> AmbeResult<SynthesisParams> {
    if sf.fundamental <= 0.0 {
        return Err(AmbeError::ContractViolation(format!(
            "fundamental frequency must be positive, got {}",
            sf.fundamental
        )));
    }
    if sf.harmonics == 0 || sf.harmonics > MAX_HARMONICS {
        return Err(AmbeError::ContractViolation(format!(
            "harmonic count {} outside 1..={}",
            sf.harmonics, MAX_HARMONICS
        )));
    }
    if sf.log_magnitudes.len() < sf.harmonics {
        return Err(AmbeError::ContractViolation(format!(
            "{} log magnitudes for {} harmonics",
            sf.log_magnitudes.len(),
            sf.harmonics
        )));
    }

    let angular_frequency = sf.fundamental * TAU;
    let unvoiced_gain = UNVOICED_GAIN / angular_frequency.sqrt();

    let mut voiced = Vec::with_capacity(sf.harmonics);
    let mut magnitudes = Vec::with_capacity(sf.harmonics);

    for i in 1..=sf.harmonics {
        let band = ((i - 1) as f32 * VOICING_BAND_SCALE * sf.fundamental) as usize;
        if band >= VOICING_BANDS {
            return Err(AmbeError::ContractViolation(format!(
                "harmonic {} maps to voicing band {} (have {})",
                i, band, VOICING_BANDS
            )));
        }

        let v = sf.voiced[band];
        let mut magnitude = 2.0f32.powf(sf.log_magnitudes[i - 1]) / MAGNITUDE_SCALE;
        if !v {
            magnitude *= unvoiced_gain;
        }

        voiced.push(v);
        magnitudes.push(magnitude);
    }

    Ok(SynthesisParams {
        angular_frequency,
        harmonics: sf.harmonics,
        voiced,
        magnitudes,
    })
}
