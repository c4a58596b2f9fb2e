use std::ops::RangeInclusive;

pub trait GetBit {
    #[must_use]
    fn bit(self, i: u8) -> bool;

    #[must_use]
    fn bits(self, range: RangeInclusive<u8>) -> Self;
}

macro_rules! impl_get_bit {
    ($t:ty) => {
        impl GetBit for $t {
            #[inline]
            fn bit(self, i: u8) -> bool {
                debug_assert!(i < (<$t>::BITS as u8));
                self & (1 << i) != 0
            }

            #[inline]
            fn bits(self, range: RangeInclusive<u8>) -> Self {
                let start = *range.start();
                let end = *range.end();
                debug_assert!(end < (<$t>::BITS as u8));

                (self >> start) & ((1 << (end - start + 1)) - 1)
            }
        }
    };
}

impl_get_bit!(u8);
impl_get_bit!(u16);
impl_get_bit!(u32);

/// Saturating narrowing conversion into the signed 8-bit range.
pub trait ClampToI8 {
    fn clamp_to_i8(self) -> i8;
}

impl ClampToI8 for i16 {
    #[inline]
    fn clamp_to_i8(self) -> i8 {
        self.clamp(i8::MIN.into(), i8::MAX.into()) as i8
    }
}

/// Saturating narrowing conversion into the signed 16-bit range.
pub trait ClampToI16 {
    fn clamp_to_i16(self) -> i16;
}

impl ClampToI16 for i32 {
    #[inline]
    fn clamp_to_i16(self) -> i16 {
        self.clamp(i16::MIN.into(), i16::MAX.into()) as i16
    }
}
