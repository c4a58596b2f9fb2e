//! Mikey audio channel: countdown timer driving a 12-bit LFSR waveform generator

use bincode::{Decode, Encode};
use lynx_common::num::{ClampToI8, GetBit};

/// Shift register bit positions that can feed back into bit 11, indexed by `FeedbackEnable` bit.
pub const FEEDBACK_TAPS: [u8; 8] = [0, 1, 2, 3, 4, 5, 7, 10];

pub const SHIFT_REGISTER_MASK: u16 = 0x0FFF;

// A zero shift register never produces a 1 bit again
pub const INITIAL_SHIFT_REGISTER: u16 = 0x001;

const CONTROL_ENABLED_BIT: u8 = 7;
const CONTROL_INTEGRATE_BIT: u8 = 5;

/// Channel shape that can be driven by [`tick_timer`].
pub trait TimerChannel {
    fn timer_enabled(&self) -> bool;

    fn counter(&self) -> u8;

    fn set_counter(&mut self, counter: u8);

    fn backup_value(&self) -> u8;

    /// Advance the waveform generator by one step.
    fn clock_waveform(&mut self);
}

/// Advance a channel's countdown timer by one master clock tick, clocking the waveform generator
/// and reloading the counter on underflow.
///
/// Disabled channels do not consume ticks.
#[inline]
pub fn tick_timer(channel: &mut impl TimerChannel) {
    if !channel.timer_enabled() {
        return;
    }

    let counter = channel.counter();
    if counter != 0 {
        channel.set_counter(counter - 1);
        return;
    }

    channel.set_counter(channel.backup_value());
    channel.clock_waveform();
}

// Field order is the save state order; do not reorder
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AudioChannelState {
    volume: i8,
    feedback_enable: u8,
    output: i8,
    shift_register: u16,
    backup_value: u8,
    control: u8,
    counter: u8,
    left_atten: u8,
    right_atten: u8,
    integrate: bool,
    enabled: bool,
}

impl Default for AudioChannelState {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioChannelState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            volume: 0,
            feedback_enable: 0,
            output: 0,
            shift_register: INITIAL_SHIFT_REGISTER,
            backup_value: 0,
            control: 0,
            counter: 0,
            left_atten: 0x0F,
            right_atten: 0x0F,
            integrate: false,
            enabled: false,
        }
    }

    /// Clock the LFSR once and update the channel output from the new bit 0.
    pub fn clock(&mut self) {
        let feedback = FEEDBACK_TAPS
            .into_iter()
            .enumerate()
            .filter(|&(i, _)| self.feedback_enable.bit(i as u8))
            .fold(false, |acc, (_, tap)| acc ^ self.shift_register.bit(tap));

        self.shift_register =
            ((self.shift_register >> 1) | (u16::from(feedback) << 11)) & SHIFT_REGISTER_MASK;

        let volume = i16::from(self.volume);
        let delta = if self.shift_register.bit(0) { volume } else { -volume };

        // Both paths saturate; -(-128) does not fit in an i8
        self.output = if self.integrate {
            (i16::from(self.output) + delta).clamp_to_i8()
        } else {
            delta.clamp_to_i8()
        };
    }

    /// Read one of the 8 per-channel registers; `index` must be in 0..8.
    #[must_use]
    pub fn read_register(&self, index: u8) -> u8 {
        match index & 7 {
            0 => self.volume as u8,
            1 => self.feedback_enable,
            2 => self.output as u8,
            3 => self.shift_register as u8,
            4 => (self.shift_register >> 8) as u8 & 0x0F,
            5 => self.backup_value,
            6 => self.control,
            7 => self.counter,
            _ => unreachable!("value & 7 is always <= 7"),
        }
    }

    pub fn write_register(&mut self, index: u8, value: u8) {
        match index & 7 {
            0 => self.volume = value as i8,
            1 => self.feedback_enable = value,
            2 => self.output = value as i8,
            3 => self.shift_register = (self.shift_register & 0x0F00) | u16::from(value),
            4 => {
                self.shift_register =
                    (self.shift_register & 0x00FF) | (u16::from(value & 0x0F) << 8);
            }
            5 => self.backup_value = value,
            6 => self.write_control(value),
            7 => self.counter = value,
            _ => unreachable!("value & 7 is always <= 7"),
        }
    }

    fn write_control(&mut self, value: u8) {
        self.control = value;
        self.enabled = value.bit(CONTROL_ENABLED_BIT);
        self.integrate = value.bit(CONTROL_INTEGRATE_BIT);

        log::trace!("  Enabled: {}", self.enabled);
        log::trace!("  Integrate: {}", self.integrate);
    }

    /// Check the invariants that register writes maintain. Only a corrupt save state can break them.
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.shift_register > SHIFT_REGISTER_MASK {
            return Err("channel shift register is wider than 12 bits");
        }

        if self.left_atten > 0x0F || self.right_atten > 0x0F {
            return Err("channel attenuation is wider than 4 bits");
        }

        if self.enabled != self.control.bit(CONTROL_ENABLED_BIT)
            || self.integrate != self.control.bit(CONTROL_INTEGRATE_BIT)
        {
            return Err("channel enabled/integrate flags do not match the control register");
        }

        Ok(())
    }

    pub fn write_left_atten(&mut self, value: u8) {
        self.left_atten = value & 0x0F;
    }

    pub fn write_right_atten(&mut self, value: u8) {
        self.right_atten = value & 0x0F;
    }

    #[must_use]
    pub fn volume(&self) -> i8 {
        self.volume
    }

    #[must_use]
    pub fn feedback_enable(&self) -> u8 {
        self.feedback_enable
    }

    #[must_use]
    pub fn output(&self) -> i8 {
        self.output
    }

    #[must_use]
    pub fn shift_register(&self) -> u16 {
        self.shift_register
    }

    #[must_use]
    pub fn control(&self) -> u8 {
        self.control
    }

    #[must_use]
    pub fn left_atten(&self) -> u8 {
        self.left_atten
    }

    #[must_use]
    pub fn right_atten(&self) -> u8 {
        self.right_atten
    }

    #[must_use]
    pub fn integrate(&self) -> bool {
        self.integrate
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl TimerChannel for AudioChannelState {
    #[inline]
    fn timer_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    fn counter(&self) -> u8 {
        self.counter
    }

    #[inline]
    fn set_counter(&mut self, counter: u8) {
        self.counter = counter;
    }

    #[inline]
    fn backup_value(&self) -> u8 {
        self.backup_value
    }

    #[inline]
    fn clock_waveform(&mut self) {
        self.clock();
    }
}
