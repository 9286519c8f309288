//! Bit-exact constant tables for the SCSU command set, per UTR #6.

/// Single-byte mode: quote one character from static window n.
pub const SQ0: u8 = 0x01;
pub const SQ7: u8 = 0x08;
/// Single-byte mode: define extended dynamic window.
pub const SDX: u8 = 0x0B;
/// Reserved, single-byte mode.
pub const SRS: u8 = 0x0C;
/// Single-byte mode: quote one raw Unicode character (2 bytes follow).
pub const SQU: u8 = 0x0E;
/// Single-byte mode: switch to Unicode mode.
pub const SCU: u8 = 0x0F;
/// Single-byte mode: select dynamic window n.
pub const SC0: u8 = 0x10;
pub const SC7: u8 = 0x17;
/// Single-byte mode: define & select dynamic window n.
pub const SD0: u8 = 0x18;
pub const SD7: u8 = 0x1F;

/// Unicode mode: select dynamic window n, return to single-byte mode.
pub const UC0: u8 = 0xE0;
pub const UC7: u8 = 0xE7;
/// Unicode mode: define & select dynamic window n, return to single-byte mode.
pub const UD0: u8 = 0xE8;
pub const UD7: u8 = 0xEF;
/// Unicode mode: quote one raw Unicode character (2 bytes follow), stay in Unicode mode.
pub const UQU: u8 = 0xF0;
/// Unicode mode: define extended dynamic window, stay in Unicode mode.
pub const UDX: u8 = 0xF1;
/// Reserved, Unicode mode.
pub const URS: u8 = 0xF2;

/// Fixed, non-relocatable static windows, indexed 0..7.
pub const STATIC_OFFSETS: [u32; 8] = [
    0x0000, 0x0080, 0x0100, 0x0300, 0x2000, 0x2080, 0x2100, 0x3000,
];

/// Offsets the eight dynamic windows start at before any redefinition.
pub const INITIAL_DYNAMIC_OFFSETS: [u32; 8] = [
    0x0080, 0x00C0, 0x0400, 0x0600, 0x0900, 0x3040, 0x30A0, 0xFF00,
];

/// Offsets selectable by the single-byte argument of SDn/UDn when that byte
/// is `>= FIXED_THRESHOLD`, indexed starting at `FIXED_THRESHOLD`.
pub const FIXED_OFFSETS: [u32; 7] = [0x00C0, 0x0250, 0x0370, 0x0530, 0x3040, 0x30A0, 0xFF60];

/// Below this, the SDn/UDn argument byte selects a half-block-quantized offset.
pub const GAP_THRESHOLD: u8 = 0x68;
/// Offset the gap range (`GAP_THRESHOLD..RESERVED_START`) continues from.
pub const GAP_OFFSET: u32 = 0xAC00;
/// Start of the reserved argument-byte range for SDn/UDn.
pub const RESERVED_START: u8 = 0xA8;
/// Arguments at or above this select from `FIXED_OFFSETS`.
pub const FIXED_THRESHOLD: u8 = 0xF9;

/// A code point is "compressible" (windowable or single-byte-quotable) if it
/// is below the CJK ideograph block or in the half-width/symbol area and up.
pub fn is_compressible(scalar: u32) -> bool {
    scalar < 0x3400 || scalar >= 0xE000
}

/// Decode the single argument byte of SDn/UDn into a window offset.
pub fn decode_window_offset(b: u8) -> Option<u32> {
    if b < GAP_THRESHOLD {
        Some((b as u32) << 7)
    } else if b < RESERVED_START {
        Some(((b as u32) << 7) + GAP_OFFSET - ((GAP_THRESHOLD as u32) << 7))
    } else if b < FIXED_THRESHOLD {
        None
    } else {
        Some(FIXED_OFFSETS[(b - FIXED_THRESHOLD) as usize])
    }
}

/// Encode a window offset back into the single argument byte of SDn/UDn,
/// preferring the representation a conformant encoder would pick: an exact
/// fixed-table hit, else half-block quantization, else the gap range.
pub fn encode_window_offset(offset: u32) -> Option<u8> {
    if let Some(idx) = FIXED_OFFSETS.iter().position(|&o| o == offset) {
        return Some(FIXED_THRESHOLD + idx as u8);
    }
    if offset % 0x80 == 0 {
        let quantized = offset >> 7;
        if quantized < GAP_THRESHOLD as u32 {
            return Some(quantized as u8);
        }
        let gap_quantized = (offset - GAP_OFFSET + ((GAP_THRESHOLD as u32) << 7)) >> 7;
        if (GAP_THRESHOLD as u32..RESERVED_START as u32).contains(&gap_quantized) {
            return Some(gap_quantized as u8);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_offset_roundtrip_fixed() {
        for (i, &offset) in FIXED_OFFSETS.iter().enumerate() {
            let b = FIXED_THRESHOLD + i as u8;
            assert_eq!(decode_window_offset(b), Some(offset));
            assert_eq!(encode_window_offset(offset), Some(b));
        }
    }

    #[test]
    fn test_window_offset_half_block() {
        assert_eq!(decode_window_offset(0x00), Some(0x0000));
        assert_eq!(decode_window_offset(0x01), Some(0x0080));
        assert_eq!(encode_window_offset(0x0080), Some(0x01));
    }

    #[test]
    fn test_window_offset_reserved_range_is_none() {
        assert_eq!(decode_window_offset(0xA8), None);
        assert_eq!(decode_window_offset(0xF8), None);
    }

    #[test]
    fn test_compressible_boundaries() {
        assert!(is_compressible(0));
        assert!(is_compressible(0x33FF));
        assert!(!is_compressible(0x3400));
        assert!(!is_compressible(0xDFFF));
        assert!(is_compressible(0xE000));
        assert!(is_compressible(0xFFFF));
    }
}
