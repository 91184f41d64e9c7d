/// A structure for splitting a two-byte instruction word
/// into the bit fields the CHIP-8 instruction set uses.
///
/// Given the word `0xABCD`:
/// - `family` is `0xA`
/// - `x` is `0xB`
/// - `y` is `0xC`
/// - `n` is `0xD`
/// - `kk` is `0xCD`
/// - `nnn` is `0xBCD`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {

    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter((value >> 8) as u8, (value & 0x00FF) as u8)
    }

    /// Build from the two bytes as they are laid out in memory,
    /// most significant byte first.
    pub fn new(left: u8, right: u8) -> BitSplitter {
        BitSplitter(left, right)
    }

    /// Left-shift the first byte 8 bits,
    /// then take bitwise or with the second one.
    pub fn as_u16(&self) -> u16 {
        ((self.0 as u16) << 8) | self.1 as u16
    }

    /// All four nibbles, most significant first.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    pub fn family(&self) -> u8 {
        self.0 >> 4
    }

    pub fn x(&self) -> u8 {
        self.0 & 0x0F
    }

    pub fn y(&self) -> u8 {
        self.1 >> 4
    }

    pub fn n(&self) -> u8 {
        self.1 & 0x0F
    }

    pub fn kk(&self) -> u8 {
        self.1
    }

    pub fn nnn(&self) -> u16 {
        self.as_u16() & 0x0FFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_extracted() {
        let word = BitSplitter::from_u16(0xABCD);
        assert_eq!(0xA, word.family());
        assert_eq!(0xB, word.x());
        assert_eq!(0xC, word.y());
        assert_eq!(0xD, word.n());
        assert_eq!(0xCD, word.kk());
        assert_eq!(0xBCD, word.nnn());
    }

    #[test]
    fn nibbles_are_most_significant_first() {
        assert_eq!((0xF, 0x0, 0x6, 0x5), BitSplitter::from_u16(0xF065).nibbles());
        assert_eq!((0x0, 0x0, 0xE, 0xE), BitSplitter::from_u16(0x00EE).nibbles());
    }

    #[test]
    fn new_equals_from_u16() {
        assert_eq!(BitSplitter::new(0x12, 0x34), BitSplitter::from_u16(0x1234));
        assert_eq!(BitSplitter::new(0xFF, 0x00), BitSplitter::from_u16(0xFF00));
        assert_eq!(0x2F2F, BitSplitter::new(0x2F, 0x2F).as_u16());
    }
}
