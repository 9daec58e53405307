//! Frame decode dispatch and per-channel session state
//!
//! One decode call fully consumes one 80-bit frame and fully produces
//! one PCM block. The session state is owned by the caller and flows
//! through each call by value: the dispatcher reads the previous state
//! and returns the successor, never mutating in place. On error the
//! caller's state is untouched and the output block is unspecified.

use ambe_core::{
    AmbeError, AmbeResult, Frame, FrameKind, Subframe, MAX_BLOCK_SAMPLES, MIN_BLOCK_SAMPLES,
};

use crate::{convert, ParameterDecoder, SynthesisEngine, ToneDecoder};

/// Unvoiced reconstruction quality forwarded to the synthesis engine
/// on every call. The reference decoder always synthesizes with 2.
const UNVOICED_QUALITY: u32 = 2;

/// Per-channel decoder state carried across frames.
///
/// Always reflects the last speech frame's second subframe; the
/// silence and tone paths neither read nor write these fields. One
/// instance per logical voice channel, never shared between callers.
///
/// Dropping the state is the whole teardown; there are no external
/// resources to release.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderState<C> {
    /// Second subframe of the last speech frame, decoding context for
    /// the next frame's parameter decode
    pub prev_subframe: Subframe,

    /// Synthesis carry-over from the last speech frame's second half
    pub prev_synthesis: C,
}

impl<C> DecoderState<C> {
    /// Session-start state: zeroed subframe plus the engine-defined
    /// initial synthesis context.
    pub fn new(initial_context: C) -> Self {
        Self {
            prev_subframe: Subframe::default(),
            prev_synthesis: initial_context,
        }
    }
}

/// Top-level frame decoder.
///
/// Classifies each frame and dispatches it to the speech, silence, or
/// tone reconstruction path. Holds only the collaborators; all
/// per-channel state lives in the caller-owned [`DecoderState`], so
/// one decoder can serve many channels.
#[derive(Debug)]
pub struct AmbeDecoder<P, E, T> {
    params: P,
    synthesis: E,
    tones: T,
}

impl<P, E, T> AmbeDecoder<P, E, T>
where
    P: ParameterDecoder,
    E: SynthesisEngine,
    T: ToneDecoder<E::Context>,
{
    pub fn new(params: P, synthesis: E, tones: T) -> Self {
        Self {
            params,
            synthesis,
            tones,
        }
    }

    /// Fresh state for one voice channel.
    pub fn init_session(&self) -> DecoderState<E::Context> {
        DecoderState::new(self.synthesis.initial_context())
    }

    /// Decode one frame into `audio`, returning the successor session
    /// state.
    ///
    /// `audio` must hold between 152 and 168 samples (nominally 160);
    /// exactly `audio.len()` samples are written on success. The
    /// nominal block synthesizes as two 80-sample halves.
    ///
    /// `bad_frame` marks the channel bits as unreliable. It is a hint
    /// forwarded verbatim to the parameter decoder's recovery logic,
    /// never an error by itself.
    pub fn decode_frame(
        &self,
        state: &DecoderState<E::Context>,
        audio: &mut [i16],
        frame: &Frame,
        bad_frame: bool,
    ) -> AmbeResult<DecoderState<E::Context>> {
        check_block_size(audio.len())?;

        let kind = frame.kind();
        tracing::trace!(
            "decode frame: kind={:?} block={} bad={}",
            kind,
            audio.len(),
            bad_frame
        );

        match kind {
            FrameKind::Speech => self.decode_speech(state, audio, frame, bad_frame),
            FrameKind::Silence => {
                // Placeholder until comfort-noise generation exists;
                // the speech-interpolation state is left untouched.
                audio.fill(0);
                Ok(state.clone())
            }
            FrameKind::Tone => self.tones.decode(audio, frame, state),
            _ => Err(AmbeError::InvalidFrameKind),
        }
    }

    /// Generate filler audio for a DTX gap (no frame received).
    ///
    /// Never fails and always overwrites all of `audio` with zeros.
    /// The session state is reserved for a future comfort-noise
    /// generator and currently unused.
    pub fn decode_dtx(&self, state: &DecoderState<E::Context>, audio: &mut [i16]) {
        let _ = state;
        audio.fill(0);
    }

    fn decode_speech(
        &self,
        state: &DecoderState<E::Context>,
        audio: &mut [i16],
        frame: &Frame,
        bad_frame: bool,
    ) -> AmbeResult<DecoderState<E::Context>> {
        let [sf0, sf1] = self.params.decode(frame, &state.prev_subframe, bad_frame)?;

        let mp0 = convert::synthesis_params(&sf0)?;
        let mp1 = convert::synthesis_params(&sf1)?;

        // The halves interpolate against each other: the first against
        // the carried-over context, the second against the first's.
        // Only the second half's context survives into the next frame.
        let (first, second) = audio.split_at_mut(audio.len() / 2);
        let ctx0 = self
            .synthesis
            .synthesize(first, &mp0, &state.prev_synthesis, UNVOICED_QUALITY)?;
        let ctx1 = self.synthesis.synthesize(second, &mp1, &ctx0, UNVOICED_QUALITY)?;

        Ok(DecoderState {
            prev_subframe: sf1,
            prev_synthesis: ctx1,
        })
    }
}

fn check_block_size(samples: usize) -> AmbeResult<()> {
    if !(MIN_BLOCK_SAMPLES..=MAX_BLOCK_SAMPLES).contains(&samples) {
        return Err(AmbeError::BlockSize {
            samples,
            min: MIN_BLOCK_SAMPLES,
            max: MAX_BLOCK_SAMPLES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambe_core::{SynthesisParams, SAMPLES_PER_FRAME, VOICING_BANDS};
    use std::cell::{Cell, RefCell};

    fn speech_frame() -> Frame {
        Frame::new([0x00; 10])
    }

    fn silence_frame() -> Frame {
        Frame::new([0xf8, 0, 0, 0, 0, 0, 0, 0, 0, 0])
    }

    fn tone_frame() -> Frame {
        Frame::new([0xfc, 0, 0, 0, 0, 0, 0, 0, 0, 0])
    }

    fn subframe(fundamental: f32) -> Subframe {
        Subframe {
            fundamental,
            harmonics: 2,
            voiced: [true; VOICING_BANDS],
            log_magnitudes: vec![0.25, -0.5],
        }
    }

    /// Returns a fixed subframe pair and records every call's context.
    struct StubParams {
        calls: RefCell<Vec<(Subframe, bool)>>,
    }

    impl StubParams {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ParameterDecoder for StubParams {
        fn decode(
            &self,
            _frame: &Frame,
            prev: &Subframe,
            bad_frame: bool,
        ) -> AmbeResult<[Subframe; 2]> {
            self.calls.borrow_mut().push((prev.clone(), bad_frame));
            Ok([subframe(0.02), subframe(0.025)])
        }
    }

    struct FailingParams;

    impl ParameterDecoder for FailingParams {
        fn decode(
            &self,
            _frame: &Frame,
            _prev: &Subframe,
            _bad_frame: bool,
        ) -> AmbeResult<[Subframe; 2]> {
            Err(AmbeError::UpstreamDecode("golay check failed".into()))
        }
    }

    /// Tags every synthesis call with a fresh context id and records
    /// which predecessor each call interpolated against.
    struct ProbeEngine {
        next_id: Cell<u64>,
        calls: RefCell<Vec<(u64, u64)>>,
    }

    impl ProbeEngine {
        fn new() -> Self {
            Self {
                next_id: Cell::new(1),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SynthesisEngine for ProbeEngine {
        type Context = u64;

        fn initial_context(&self) -> u64 {
            0
        }

        fn synthesize(
            &self,
            audio: &mut [i16],
            _params: &SynthesisParams,
            predecessor: &u64,
            quality: u32,
        ) -> AmbeResult<u64> {
            assert_eq!(quality, 2);

            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.calls.borrow_mut().push((*predecessor, id));

            audio.fill(id as i16);
            Ok(id)
        }
    }

    /// Writes a marker sample and leaves the state alone.
    struct StubTones;

    impl<C: Clone> ToneDecoder<C> for StubTones {
        fn decode(
            &self,
            audio: &mut [i16],
            _frame: &Frame,
            state: &DecoderState<C>,
        ) -> AmbeResult<DecoderState<C>> {
            audio.fill(7);
            Ok(state.clone())
        }
    }

    fn decoder() -> AmbeDecoder<StubParams, ProbeEngine, StubTones> {
        AmbeDecoder::new(StubParams::new(), ProbeEngine::new(), StubTones)
    }

    #[test]
    fn test_first_speech_frame_after_init() {
        let dec = decoder();
        let state = dec.init_session();
        let mut audio = [0i16; SAMPLES_PER_FRAME];

        let next = dec
            .decode_frame(&state, &mut audio, &speech_frame(), false)
            .unwrap();

        // The stub saw the zeroed session-start subframe
        let calls = dec.params.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Subframe::default());

        // Both halves were written
        assert!(audio[..80].iter().all(|&s| s == 1));
        assert!(audio[80..].iter().all(|&s| s == 2));

        // Successor state holds the second subframe
        assert_eq!(next.prev_subframe, subframe(0.025));
        assert_eq!(next.prev_synthesis, 2);
    }

    #[test]
    fn test_speech_chaining_across_frames() {
        let dec = decoder();
        let state = dec.init_session();
        let mut audio = [0i16; SAMPLES_PER_FRAME];

        let state1 = dec
            .decode_frame(&state, &mut audio, &speech_frame(), false)
            .unwrap();
        let state2 = dec
            .decode_frame(&state1, &mut audio, &speech_frame(), false)
            .unwrap();

        let calls = dec.synthesis.calls.borrow();
        assert_eq!(calls.len(), 4);

        // Frame 1: first half against the initial context, second
        // half against the first half's context.
        assert_eq!(calls[0], (0, 1));
        assert_eq!(calls[1], (1, 2));

        // Frame 2's first half interpolates against exactly the
        // context frame 1's second half produced, carried via state.
        assert_eq!(state1.prev_synthesis, 2);
        assert_eq!(calls[2], (2, 3));
        assert_eq!(calls[3], (3, 4));
        assert_eq!(state2.prev_synthesis, 4);
    }

    #[test]
    fn test_silence_zeros_block_and_keeps_state() {
        let dec = decoder();

        for n in MIN_BLOCK_SAMPLES..=MAX_BLOCK_SAMPLES {
            let state = dec.init_session();
            let mut audio = vec![0x55i16; n];

            let next = dec
                .decode_frame(&state, &mut audio, &silence_frame(), false)
                .unwrap();

            assert!(audio.iter().all(|&s| s == 0));
            assert_eq!(next, state);
        }

        // No collaborator was consulted
        assert!(dec.params.calls.borrow().is_empty());
        assert!(dec.synthesis.calls.borrow().is_empty());
    }

    #[test]
    fn test_silence_preserves_speech_state() {
        let dec = decoder();
        let state = dec.init_session();
        let mut audio = [0i16; SAMPLES_PER_FRAME];

        let after_speech = dec
            .decode_frame(&state, &mut audio, &speech_frame(), false)
            .unwrap();
        let after_silence = dec
            .decode_frame(&after_speech, &mut audio, &silence_frame(), false)
            .unwrap();

        assert_eq!(after_silence, after_speech);
    }

    #[test]
    fn test_tone_delegates() {
        let dec = decoder();
        let state = dec.init_session();
        let mut audio = [0i16; SAMPLES_PER_FRAME];

        dec.decode_frame(&state, &mut audio, &tone_frame(), false)
            .unwrap();

        assert!(audio.iter().all(|&s| s == 7));
        assert!(dec.params.calls.borrow().is_empty());
    }

    #[test]
    fn test_bad_frame_flag_forwarded() {
        let dec = decoder();
        let state = dec.init_session();
        let mut audio = [0i16; SAMPLES_PER_FRAME];

        dec.decode_frame(&state, &mut audio, &speech_frame(), true)
            .unwrap();
        dec.decode_frame(&state, &mut audio, &speech_frame(), false)
            .unwrap();

        let calls = dec.params.calls.borrow();
        assert!(calls[0].1);
        assert!(!calls[1].1);
    }

    #[test]
    fn test_upstream_failure_propagates() {
        let dec = AmbeDecoder::new(FailingParams, ProbeEngine::new(), StubTones);
        let state = dec.init_session();
        let mut audio = [0i16; SAMPLES_PER_FRAME];

        let err = dec
            .decode_frame(&state, &mut audio, &speech_frame(), false)
            .unwrap_err();

        assert!(matches!(err, AmbeError::UpstreamDecode(_)));
        // The caller still owns the pre-call state untouched
        assert_eq!(state, dec.init_session());
    }

    #[test]
    fn test_block_size_validated() {
        let dec = decoder();
        let state = dec.init_session();

        for n in [0, MIN_BLOCK_SAMPLES - 1, MAX_BLOCK_SAMPLES + 1] {
            let mut audio = vec![0i16; n];
            let err = dec
                .decode_frame(&state, &mut audio, &silence_frame(), false)
                .unwrap_err();
            assert!(matches!(err, AmbeError::BlockSize { samples, .. } if samples == n));
        }
    }

    #[test]
    fn test_odd_block_writes_every_sample() {
        let dec = decoder();
        let state = dec.init_session();
        let mut audio = vec![0x55i16; 153];

        dec.decode_frame(&state, &mut audio, &speech_frame(), false)
            .unwrap();

        // 76 + 77 samples, nothing left over from the fill pattern
        assert!(audio[..76].iter().all(|&s| s == 1));
        assert!(audio[76..].iter().all(|&s| s == 2));
    }

    #[test]
    fn test_dtx_writes_zeros_at_boundaries() {
        let dec = decoder();
        let state = dec.init_session();

        for n in [MIN_BLOCK_SAMPLES, SAMPLES_PER_FRAME, MAX_BLOCK_SAMPLES] {
            let mut audio = vec![0x55i16; n];
            dec.decode_dtx(&state, &mut audio);
            assert!(audio.iter().all(|&s| s == 0));
        }
    }
}
