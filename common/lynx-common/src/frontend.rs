/// Downstream consumer of the PCM audio produced by an emulation core.
///
/// The core only lends out its sample storage for the duration of the call; implementations that
/// hand audio to another thread or device must copy out of `samples` before returning.
pub trait AudioSink {
    type Err;

    /// Push a batch of interleaved stereo 16-bit PCM frames (`[L, R, L, R, ...]`). The number of
    /// frames is `samples.len() / 2`.
    ///
    /// # Errors
    ///
    /// This method will return an error if it is unable to deliver the samples to the audio device.
    fn push_frames(&mut self, samples: &[i16], sample_rate: u32) -> Result<(), Self::Err>;
}
