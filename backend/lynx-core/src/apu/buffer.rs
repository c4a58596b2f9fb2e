//! Fixed-capacity interleaved stereo PCM buffer
//!
//! Storage is allocated once up front and reused after every flush. Save states encode the number
//! of buffered frames followed by only the valid samples.

use bincode::de::{BorrowDecoder, Decoder};
use bincode::enc::Encoder;
use bincode::error::{DecodeError, EncodeError};
use bincode::{BorrowDecode, Decode, Encode};

pub const SAMPLE_BUFFER_FRAMES: usize = 2048;

const SAMPLE_BUFFER_LEN: usize = 2 * SAMPLE_BUFFER_FRAMES;

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    frames: usize,
    samples: Box<[i16; SAMPLE_BUFFER_LEN]>,
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self { frames: 0, samples: Box::new([0; SAMPLE_BUFFER_LEN]) }
    }

    /// Append one stereo frame. Returns `true` if the buffer is now full; the caller must flush
    /// before pushing again.
    #[inline]
    pub fn push(&mut self, sample_l: i16, sample_r: i16) -> bool {
        debug_assert!(self.frames < SAMPLE_BUFFER_FRAMES);

        let i = 2 * self.frames;
        self.samples[i] = sample_l;
        self.samples[i + 1] = sample_r;
        self.frames += 1;

        self.is_full()
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.frames == SAMPLE_BUFFER_FRAMES
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    #[inline]
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// The valid interleaved samples, `[L, R, L, R, ...]`.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[i16] {
        &self.samples[..2 * self.frames]
    }

    #[inline]
    pub fn clear(&mut self) {
        self.frames = 0;
    }
}

// Storage past the valid frames is stale and does not participate in equality
impl PartialEq for SampleBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.samples() == other.samples()
    }
}

impl Eq for SampleBuffer {}

impl Encode for SampleBuffer {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        (self.frames as u32).encode(encoder)?;

        for sample in self.samples() {
            sample.encode(encoder)?;
        }

        Ok(())
    }
}

fn decode_buffer<D: Decoder>(decoder: &mut D) -> Result<SampleBuffer, DecodeError> {
    let frames = u32::decode(decoder)? as usize;
    if frames > SAMPLE_BUFFER_FRAMES {
        return Err(DecodeError::Other("buffered frame count exceeds sample buffer capacity"));
    }

    let mut buffer = SampleBuffer::new();
    for sample in &mut buffer.samples[..2 * frames] {
        *sample = i16::decode(decoder)?;
    }
    buffer.frames = frames;

    Ok(buffer)
}

impl<Context> Decode<Context> for SampleBuffer {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        decode_buffer(decoder)
    }
}

impl<'de, Context> BorrowDecode<'de, Context> for SampleBuffer {
    fn borrow_decode<D: BorrowDecoder<'de, Context = Context>>(
        decoder: &mut D,
    ) -> Result<Self, DecodeError> {
        decode_buffer(decoder)
    }
}
