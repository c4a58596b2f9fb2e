//! Stereo mixing of the 4 channel outputs into 16-bit PCM

use crate::apu::channel::AudioChannelState;
use lynx_common::num::ClampToI16;

pub const OUTPUT_GAIN: i32 = 64;

/// Mix the current channel outputs into one stereo frame.
///
/// `master_volume + 1` is intentional; a master volume of 0 still passes a small signal.
#[must_use]
pub fn mix(
    channels: &[AudioChannelState; 4],
    master_volume: u8,
    stereo_enabled: bool,
) -> (i16, i16) {
    let (mut sample_l, mut sample_r) = channels
        .iter()
        .filter(|channel| channel.enabled())
        .map(|channel| {
            let output = i32::from(channel.output());
            (
                (output * i32::from(channel.left_atten())) >> 2,
                (output * i32::from(channel.right_atten())) >> 2,
            )
        })
        .fold((0, 0), |(acc_l, acc_r), (l, r)| (acc_l + l, acc_r + r));

    let master_multiplier = i32::from(master_volume) + 1;
    sample_l = (sample_l * master_multiplier) >> 4;
    sample_r = (sample_r * master_multiplier) >> 4;

    if !stereo_enabled {
        let mono = (sample_l + sample_r) / 2;
        sample_l = mono;
        sample_r = mono;
    }

    ((sample_l * OUTPUT_GAIN).clamp_to_i16(), (sample_r * OUTPUT_GAIN).clamp_to_i16())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::array;
    use test_log::test;

    fn channel_with_output(
        output: i8,
        left_atten: u8,
        right_atten: u8,
        control: u8,
    ) -> AudioChannelState {
        let mut channel = AudioChannelState::new();
        channel.write_register(2, output as u8);
        channel.write_register(6, control);
        channel.write_left_atten(left_atten);
        channel.write_right_atten(right_atten);
        channel
    }

    #[test]
    fn clamps_to_i16_range() {
        let channels = array::from_fn(|_| channel_with_output(i8::MAX, 0x0F, 0x0F, 0x80));
        assert_eq!((i16::MAX, i16::MAX), mix(&channels, 0xFF, true));

        let channels = array::from_fn(|_| channel_with_output(i8::MIN, 0x0F, 0x0F, 0x80));
        assert_eq!((i16::MIN, i16::MIN), mix(&channels, 0xFF, true));
    }

    #[test]
    fn single_channel_amplitude() {
        let mut channels = array::from_fn(|_| AudioChannelState::new());
        channels[0] = channel_with_output(-2, 0x0F, 0x08, 0x80);

        // L: (-2 * 15) >> 2 = -8, (-8 * 256) >> 4 = -128, -128 * 64 = -8192
        // R: (-2 * 8) >> 2 = -4, (-4 * 256) >> 4 = -64, -64 * 64 = -4096
        assert_eq!((-8192, -4096), mix(&channels, 0xFF, true));
    }

    #[test]
    fn master_volume_zero_is_not_silent() {
        let mut channels = array::from_fn(|_| AudioChannelState::new());
        channels[0] = channel_with_output(64, 0x0F, 0x0F, 0x80);

        // (64 * 15) >> 2 = 240, (240 * 1) >> 4 = 15, 15 * 64 = 960
        assert_eq!((960, 960), mix(&channels, 0, true));
    }

    #[test]
    fn mono_fold_down() {
        let mut channels = array::from_fn(|_| AudioChannelState::new());
        channels[0] = channel_with_output(8, 0x0F, 0x00, 0x80);

        // L: (8 * 15) >> 2 = 30, (30 * 16) >> 4 = 30; R: 0; mono = 15
        assert_eq!((30 * 64, 0), mix(&channels, 0x0F, true));
        assert_eq!((15 * 64, 15 * 64), mix(&channels, 0x0F, false));

        // Odd negative sums truncate toward zero: (-1 + 0) / 2 = 0, (-3 + 0) / 2 = -1
        channels[0] = channel_with_output(-1, 0x04, 0x00, 0x80);
        assert_eq!((-64, 0), mix(&channels, 0x0F, true));
        assert_eq!((0, 0), mix(&channels, 0x0F, false));

        channels[0] = channel_with_output(-3, 0x04, 0x00, 0x80);
        assert_eq!((-3 * 64, 0), mix(&channels, 0x0F, true));
        assert_eq!((-64, -64), mix(&channels, 0x0F, false));
    }

    #[test]
    fn disabled_channels_contribute_nothing() {
        let channels = array::from_fn(|_| channel_with_output(i8::MAX, 0x0F, 0x0F, 0x20));
        assert_eq!((0, 0), mix(&channels, 0xFF, true));

        let mut channels = channels;
        channels[2] = channel_with_output(4, 0x04, 0x04, 0x80);

        // (4 * 4) >> 2 = 4, (4 * 256) >> 4 = 64, 64 * 64 = 4096
        assert_eq!((4096, 4096), mix(&channels, 0xFF, true));
    }
}
