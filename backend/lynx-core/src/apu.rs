//! Lynx APU (the audio half of the Mikey chip)
//!
//! 4 channels, each a countdown timer clocking a 12-bit LFSR with selectable feedback taps. Every
//! master clock tick advances all channel timers, and every `sample_rate_divider` ticks the channel
//! outputs are mixed into one stereo 16-bit frame. Frames accumulate in a fixed-size buffer that is
//! handed to the audio sink when it fills or when the frame ends.

pub mod buffer;
pub mod channel;
pub mod mixer;

use crate::api::{APU_STATE_VERSION, ApuStateError, LynxApuConfig};
use crate::apu::buffer::SampleBuffer;
use crate::apu::channel::AudioChannelState;
use bincode::error::DecodeError;
use bincode::{Decode, Encode};
use lynx_common::bincode_config;
use lynx_common::frontend::AudioSink;
use lynx_common::num::GetBit;
use std::array;
use std::fmt::Display;

pub const CHANNEL_REGISTERS_END: u8 = 0x1F;
pub const ATTENUATION_START: u8 = 0x20;
pub const ATTENUATION_END: u8 = 0x27;
pub const MASTER_VOLUME: u8 = 0x30;

const INITIAL_MASTER_VOLUME: u8 = 0xFF;

// Field order is the save state order; do not reorder
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Apu {
    channels: [AudioChannelState; 4],
    master_volume: u8,
    stereo_enabled: bool,
    sample_counter: u32,
    buffer: SampleBuffer,
    sample_rate_divider: u32,
}

impl Apu {
    #[must_use]
    pub fn new(config: LynxApuConfig) -> Self {
        Self {
            channels: array::from_fn(|_| AudioChannelState::new()),
            master_volume: INITIAL_MASTER_VOLUME,
            stereo_enabled: config.audio_mode.stereo_enabled(),
            sample_counter: 0,
            buffer: SampleBuffer::new(),
            sample_rate_divider: config.sample_rate_divider.max(1),
        }
    }

    /// Cold reset. Configuration-derived state is kept; any buffered audio is discarded.
    pub fn reset(&mut self) {
        log::debug!("APU reset");

        self.channels = array::from_fn(|_| AudioChannelState::new());
        self.master_volume = INITIAL_MASTER_VOLUME;
        self.sample_counter = 0;
        self.buffer.clear();
    }

    pub fn reload_config(&mut self, config: LynxApuConfig) {
        self.stereo_enabled = config.audio_mode.stereo_enabled();
        self.sample_rate_divider = config.sample_rate_divider.max(1);
        self.sample_counter = self.sample_counter.min(self.sample_rate_divider - 1);

        log::debug!(
            "Reloaded APU config; stereo={}, sample rate divider={}",
            self.stereo_enabled,
            self.sample_rate_divider
        );
    }

    /// Advance the APU by one master clock tick. The sink is only called if this tick fills the
    /// sample buffer.
    #[inline]
    pub fn tick<A>(&mut self, audio_sink: &mut A)
    where
        A: AudioSink,
        A::Err: Display,
    {
        for channel in &mut self.channels {
            channel::tick_timer(channel);
        }

        self.sample_counter += 1;
        if self.sample_counter >= self.sample_rate_divider {
            self.sample_counter = 0;

            let (sample_l, sample_r) =
                mixer::mix(&self.channels, self.master_volume, self.stereo_enabled);
            if self.buffer.push(sample_l, sample_r) {
                self.flush(audio_sink);
            }
        }
    }

    pub fn tick_cycles<A>(&mut self, cycles: u32, audio_sink: &mut A)
    where
        A: AudioSink,
        A::Err: Display,
    {
        for _ in 0..cycles {
            self.tick(audio_sink);
        }
    }

    /// Flush any buffered frames at the end of a video frame.
    pub fn end_frame<A>(&mut self, audio_sink: &mut A)
    where
        A: AudioSink,
        A::Err: Display,
    {
        self.flush(audio_sink);
    }

    fn flush<A>(&mut self, audio_sink: &mut A)
    where
        A: AudioSink,
        A::Err: Display,
    {
        if self.buffer.is_empty() {
            return;
        }

        if let Err(err) = audio_sink.push_frames(self.buffer.samples(), self.sample_rate()) {
            log::error!("Error pushing {} audio frames to sink: {err}", self.buffer.frames());
        }

        self.buffer.clear();
    }

    #[must_use]
    pub fn read_register(&self, address: u8) -> u8 {
        let value = match address {
            0x00..=CHANNEL_REGISTERS_END => {
                self.channels[channel_index(address)].read_register(address & 7)
            }
            ATTENUATION_START..=ATTENUATION_END => {
                let channel = &self.channels[attenuation_channel_index(address)];
                if address.bit(0) { channel.right_atten() } else { channel.left_atten() }
            }
            MASTER_VOLUME => self.master_volume,
            _ => 0x00,
        };

        log::trace!("APU read register {address:02X}: {value:02X}");

        value
    }

    pub fn write_register(&mut self, address: u8, value: u8) {
        log::trace!("APU write register {address:02X} {value:02X}");

        match address {
            0x00..=CHANNEL_REGISTERS_END => {
                self.channels[channel_index(address)].write_register(address & 7, value);
            }
            ATTENUATION_START..=ATTENUATION_END => {
                let channel = &mut self.channels[attenuation_channel_index(address)];
                if address.bit(0) {
                    channel.write_right_atten(value);
                } else {
                    channel.write_left_atten(value);
                }
            }
            MASTER_VOLUME => self.master_volume = value,
            _ => {}
        }
    }

    /// Export the complete APU state, including buffered frames and mid-sample timing.
    ///
    /// # Errors
    ///
    /// Propagates any bincode encoding error.
    pub fn save_state(&self) -> Result<Vec<u8>, ApuStateError> {
        let mut bytes = bincode::encode_to_vec(APU_STATE_VERSION, bincode_config!())?;
        bincode::encode_into_std_write(self, &mut bytes, bincode_config!())?;
        Ok(bytes)
    }

    /// Replace this APU's state with a previously exported state.
    ///
    /// # Errors
    ///
    /// Returns an error if the version prefix does not match, the state fails to decode, the blob
    /// has trailing bytes, or the decoded state violates an invariant that register writes and
    /// ticking maintain. On error the current state is left untouched.
    pub fn load_state(&mut self, bytes: &[u8]) -> Result<(), ApuStateError> {
        let (version, version_len): (u16, usize) =
            bincode::decode_from_slice(bytes, bincode_config!())?;
        if version != APU_STATE_VERSION {
            return Err(ApuStateError::VersionMismatch {
                expected: APU_STATE_VERSION,
                actual: version,
            });
        }

        let (loaded, state_len): (Self, usize) =
            bincode::decode_from_slice(&bytes[version_len..], bincode_config!())?;
        if version_len + state_len != bytes.len() {
            return Err(DecodeError::Other("trailing bytes after APU state").into());
        }
        loaded.validate()?;

        *self = loaded;

        log::debug!("Loaded APU state; {} buffered frames", self.buffer.frames());

        Ok(())
    }

    // The tick path relies on these; a state that violates them would panic or leave the 12-bit
    // shift register invariant broken
    fn validate(&self) -> Result<(), DecodeError> {
        if self.sample_rate_divider == 0 {
            return Err(DecodeError::Other("sample rate divider is 0"));
        }

        if self.sample_counter >= self.sample_rate_divider {
            return Err(DecodeError::Other("sample counter is not below the sample rate divider"));
        }

        for channel in &self.channels {
            channel.validate().map_err(DecodeError::Other)?;
        }

        Ok(())
    }

    #[must_use]
    pub fn channel(&self, index: usize) -> &AudioChannelState {
        &self.channels[index]
    }

    #[must_use]
    pub fn channels(&self) -> &[AudioChannelState; 4] {
        &self.channels
    }

    #[must_use]
    pub fn master_volume(&self) -> u8 {
        self.master_volume
    }

    #[must_use]
    pub fn stereo_enabled(&self) -> bool {
        self.stereo_enabled
    }

    #[must_use]
    pub fn buffered_frames(&self) -> usize {
        self.buffer.frames()
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        lynx_config::sample_rate_for_divider(self.sample_rate_divider)
    }
}

fn channel_index(address: u8) -> usize {
    ((address >> 3) & 3).into()
}

fn attenuation_channel_index(address: u8) -> usize {
    ((address - ATTENUATION_START) >> 1).into()
}
