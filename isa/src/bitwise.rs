use std::fmt::Debug;
use std::mem::size_of;
use std::ops::RangeInclusive;

/// Helpers to read and write bit fields of a machine word.
/// Bit indices go from lsb to msb (right to left).
pub trait Bits
where
    Self: Copy + Sized + Into<u64> + TryFrom<u64>,
    <Self as TryFrom<u64>>::Error: Debug,
{
    fn get_bit(&self, bit_idx: u8) -> bool {
        debug_assert!(bit_idx < (size_of::<Self>() * 8) as u8);
        let bitwise: u64 = (*self).into();
        (bitwise & (0b1 << bit_idx)) != 0
    }

    /// Mask with `width` ones starting from bit 0.
    fn field_mask(width: u8) -> u64 {
        debug_assert!(width > 0 && width <= (size_of::<Self>() * 8) as u8);
        (1_u64 << width) - 1
    }

    fn get_bits(&self, bits_range: RangeInclusive<u8>) -> Self {
        let start = *bits_range.start();
        let length = bits_range.len() as u8;

        // If bits_range is 4..=7 the mask is 0b1111 moved 4 bits to the left.
        let mask = Self::field_mask(length) << start;
        let value: u64 = (*self).into();

        <Self as TryFrom<u64>>::try_from((value & mask) >> start).unwrap()
    }

    /// Writes `value` into `bits_range`. Bits of `value` that don't fit
    /// the range are dropped, the rest of the word is left untouched.
    fn set_bits(&mut self, bits_range: RangeInclusive<u8>, value: u64) {
        let start = *bits_range.start();
        let length = bits_range.len() as u8;
        let mask = Self::field_mask(length);

        let mut bitwise: u64 = (*self).into();
        bitwise = (bitwise & !(mask << start)) | ((value & mask) << start);
        *self = <Self as TryFrom<u64>>::try_from(bitwise).unwrap();
    }
}

impl Bits for u16 {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    #[test]
    fn get_bit() {
        let b = 0b1011_0011_10_u16;
        assert!(b.get_bit(1));
        assert!(!b.get_bit(0));
        assert!(b.get_bit(2));
        assert!(!b.get_bit(15));
    }

    #[test]
    #[should_panic]
    fn invalid_index() {
        let b = 0_u16;
        b.get_bit(16);
    }

    #[test]
    fn get_bits() {
        let b = 0b1011_0011_1000_1110_u16;
        assert_eq!(b.get_bits(0..=3), 0b1110);
        assert_eq!(b.get_bits(4..=7), 0b1000);
        assert_eq!(b.get_bits(8..=11), 0b0011);
        assert_eq!(b.get_bits(12..=15), 0b1011);
        assert_eq!(b.get_bits(0..=7), 0b1000_1110);
        assert_eq!(b.get_bits(0..=11), 0b0011_1000_1110);
        assert_eq!(b.get_bits(0..=15), b);
    }

    #[test]
    fn set_bits() {
        let mut b = 0_u16;
        b.set_bits(12..=15, 0x1);
        b.set_bits(8..=11, 0x3);
        b.set_bits(4..=7, 0x1);
        b.set_bits(0..=3, 0x2);
        assert_eq!(b, 0x1312);

        b.set_bits(0..=7, 0x42);
        assert_eq!(b, 0x1342);
    }

    #[test]
    fn set_bits_truncates_value() {
        let mut b = 0xFFFF_u16;
        b.set_bits(4..=7, 0x1_2);
        assert_eq!(b, 0xFF2F);

        let mut b = 0_u16;
        b.set_bits(0..=11, 0xF_ABC);
        assert_eq!(b, 0x0ABC);
    }

    #[test]
    fn set_then_get_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let value = rng.gen_range(0..=0xFFF_u64);
            let mut word = rng.gen_range(0..=u16::MAX);
            word.set_bits(0..=11, value);
            assert_eq!(u64::from(word.get_bits(0..=11)), value);
        }
    }

    #[test]
    fn field_mask() {
        assert_eq!(u16::field_mask(4), 0xF);
        assert_eq!(u16::field_mask(8), 0xFF);
        assert_eq!(u16::field_mask(12), 0xFFF);
        assert_eq!(u16::field_mask(16), 0xFFFF);
    }
}
