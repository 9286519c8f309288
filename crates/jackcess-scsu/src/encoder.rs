use crate::tables::*;

/// Outcome of a single `encode` call.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EncodeResult {
    /// All of `input` was consumed; `written` bytes were placed in `output`.
    Done { written: usize },
    /// `output` filled up before `input` was exhausted; `written` bytes were
    /// placed in `output`. Call again with a larger buffer (or drain this
    /// one first) — the same `input` slice resumes from where it left off.
    NeedMoreOutput { written: usize },
}

/// Encodes UTF-16 code units into an SCSU byte stream.
///
/// Per-instance state: `next_window` (round-robin index for positioning new
/// dynamic windows) is deliberately *not* shared across encoder instances,
/// so encoding stays deterministic when multiple encoders run concurrently.
#[derive(Debug, Clone)]
pub struct ScsuEncoder {
    dynamic_offsets: [u32; 8],
    current_window: usize,
    next_window: u8,
    in_unicode_mode: bool,
    input_pos: usize,
}

impl Default for ScsuEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScsuEncoder {
    pub fn new() -> Self {
        Self {
            dynamic_offsets: INITIAL_DYNAMIC_OFFSETS,
            current_window: 0,
            next_window: 0,
            in_unicode_mode: false,
            input_pos: 0,
        }
    }

    /// Restore all codec state to its initial values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Encode as much of `input` as fits in `output`, resuming from wherever
    /// a previous call on this instance left off.
    pub fn encode(&mut self, input: &[u16], output: &mut [u8]) -> EncodeResult {
        let mut out_pos = 0usize;
        let mut scu_mark: Option<usize> = None;
        let mut run_char_count = 0usize;

        loop {
            if self.input_pos >= input.len() {
                return EncodeResult::Done { written: out_pos };
            }
            let progressed = if self.in_unicode_mode {
                self.step_unicode(input, output, &mut out_pos, &mut scu_mark, &mut run_char_count)
            } else {
                self.step_single_byte(input, output, &mut out_pos, &mut scu_mark)
            };
            if !progressed {
                return EncodeResult::NeedMoreOutput { written: out_pos };
            }
        }
    }

    fn step_single_byte(
        &mut self,
        input: &[u16],
        output: &mut [u8],
        out_pos: &mut usize,
        scu_mark: &mut Option<usize>,
    ) -> bool {
        let (scalar, width) = peek_scalar(input, self.input_pos);

        if matches!(scalar, 0x00 | 0x09 | 0x0A | 0x0D) || (0x20..=0x7F).contains(&scalar) {
            return try_emit(output, out_pos, &[scalar as u8]) && {
                self.input_pos += width;
                true
            };
        }
        if scalar < 0x20 {
            // other controls: quote through static window 0.
            return try_emit(output, out_pos, &[SQ0, scalar as u8]) && {
                self.input_pos += width;
                true
            };
        }

        let offset = self.dynamic_offsets[self.current_window];
        if fits_window(offset, scalar) {
            let byte = 0x80 + (scalar - offset) as u8;
            return try_emit(output, out_pos, &[byte]) && {
                self.input_pos += width;
                true
            };
        }

        if !is_compressible(scalar) {
            if try_emit(output, out_pos, &[SCU]) {
                *scu_mark = Some(*out_pos - 1);
                self.in_unicode_mode = true;
                true
            } else {
                false
            }
        } else {
            self.select_window_and_emit(input, output, out_pos, scalar, width, scu_mark)
        }
    }

    /// `scalar` doesn't fit the current window but is compressible. Try, in
    /// priority order: another existing dynamic window, a static window,
    /// positioning a brand-new dynamic window. Falls back to entering
    /// Unicode mode if none apply.
    fn select_window_and_emit(
        &mut self,
        input: &[u16],
        output: &mut [u8],
        out_pos: &mut usize,
        scalar: u32,
        width: usize,
        scu_mark: &mut Option<usize>,
    ) -> bool {
        if let Some(dyn_idx) = (0..8).find(|&i| fits_window(self.dynamic_offsets[i], scalar)) {
            let next = peek_next_scalar(input, self.input_pos, width);
            let prefer_static = next.is_none_or(|n| !fits_window(self.dynamic_offsets[dyn_idx], n))
                && (0..8).any(|i| fits_window(STATIC_OFFSETS[i], scalar));
            if prefer_static {
                let static_idx = (0..8).find(|&i| fits_window(STATIC_OFFSETS[i], scalar)).unwrap();
                return self.emit_static_quote(output, out_pos, static_idx, scalar, width);
            }
            let byte = 0x80 + (scalar - self.dynamic_offsets[dyn_idx]) as u8;
            return try_emit(output, out_pos, &[SC0 + dyn_idx as u8, byte]) && {
                self.current_window = dyn_idx;
                self.input_pos += width;
                true
            };
        }

        if let Some(static_idx) = (0..8).find(|&i| fits_window(STATIC_OFFSETS[i], scalar)) {
            return self.emit_static_quote(output, out_pos, static_idx, scalar, width);
        }

        if let Some((cmd, args)) = self.plan_new_dynamic_window(scalar) {
            let mut bytes = vec![cmd];
            bytes.extend_from_slice(&args.0[..args.1]);
            if try_emit(output, out_pos, &bytes) {
                let window = self.next_window as usize % 8;
                self.dynamic_offsets[window] = floor_window_offset(scalar);
                self.current_window = window;
                self.next_window = self.next_window.wrapping_add(1) % 8;
                return true;
            }
            return false;
        }

        if try_emit(output, out_pos, &[SCU]) {
            *scu_mark = Some(*out_pos - 1);
            self.in_unicode_mode = true;
            true
        } else {
            false
        }
    }

    fn emit_static_quote(
        &mut self,
        output: &mut [u8],
        out_pos: &mut usize,
        static_idx: usize,
        scalar: u32,
        width: usize,
    ) -> bool {
        let byte = 0x80 + (scalar - STATIC_OFFSETS[static_idx]) as u8;
        try_emit(output, out_pos, &[SQ0 + static_idx as u8, byte]) && {
            self.input_pos += width;
            true
        }
    }

    /// Plan the command bytes (not counting the following data byte, which
    /// the *next* loop iteration emits via the ordinary window-relative
    /// path) to position a new dynamic window over `scalar`. Returns the
    /// command byte plus up to 2 argument bytes (with a length).
    fn plan_new_dynamic_window(&self, scalar: u32) -> Option<(u8, ([u8; 2], usize))> {
        let window = self.next_window as usize % 8;
        let floor = floor_window_offset(scalar);
        if scalar >= 0x10000 {
            let low13 = ((floor - 0x10000) >> 7) as u16;
            let arg = ((window as u16) << 13) | (low13 & 0x1FFF);
            Some((SDX, ([(arg >> 8) as u8, (arg & 0xFF) as u8], 2)))
        } else {
            let arg = encode_window_offset(floor)?;
            Some((SD0 + window as u8, ([arg, 0], 1)))
        }
    }

    fn step_unicode(
        &mut self,
        input: &[u16],
        output: &mut [u8],
        out_pos: &mut usize,
        scu_mark: &mut Option<usize>,
        run_char_count: &mut usize,
    ) -> bool {
        let (scalar, width) = peek_scalar(input, self.input_pos);
        if is_compressible(scalar) {
            let next = peek_next_scalar(input, self.input_pos, width);
            if next.is_some_and(is_compressible) {
                // Two consecutive compressible characters: leave Unicode
                // mode without consuming either; let single-byte window
                // selection take over.
                self.finish_unicode_run(output, *out_pos, scu_mark, run_char_count);
                self.in_unicode_mode = false;
                return true;
            }
        }

        // Surrogate halves (width == 2, combined scalar >= 0x10000) never
        // collide with the unicode-mode command range (MSB 0xD8..0xDF).
        if width == 2 {
            let hi = input[self.input_pos];
            let lo = input[self.input_pos + 1];
            if try_emit(output, out_pos, &[(hi >> 8) as u8, (hi & 0xFF) as u8])
                && try_emit(output, out_pos, &[(lo >> 8) as u8, (lo & 0xFF) as u8])
            {
                self.input_pos += 2;
                *run_char_count += 1;
                return true;
            }
            return false;
        }

        let unit = scalar as u16;
        if (0xE000..=0xF2FF).contains(&scalar) {
            if try_emit(output, out_pos, &[UQU, (unit >> 8) as u8, (unit & 0xFF) as u8]) {
                self.input_pos += 1;
                *run_char_count += 1;
                true
            } else {
                false
            }
        } else if try_emit(output, out_pos, &[(unit >> 8) as u8, (unit & 0xFF) as u8]) {
            self.input_pos += 1;
            *run_char_count += 1;
            true
        } else {
            false
        }
    }

    /// If the run that just ended emitted exactly one character as a plain
    /// 3-byte `SCU hi lo` sequence, rewrite it to `SQU hi lo` (identical
    /// length) and treat the codec as never having left single-byte mode.
    fn finish_unicode_run(
        &mut self,
        output: &mut [u8],
        out_pos: usize,
        scu_mark: &mut Option<usize>,
        run_char_count: &mut usize,
    ) {
        if *run_char_count == 1 {
            if let Some(mark) = *scu_mark {
                if mark + 3 == out_pos && output[mark] == SCU {
                    output[mark] = SQU;
                }
            }
        }
        *scu_mark = None;
        *run_char_count = 0;
    }
}

fn try_emit(output: &mut [u8], out_pos: &mut usize, bytes: &[u8]) -> bool {
    if *out_pos + bytes.len() > output.len() {
        return false;
    }
    output[*out_pos..*out_pos + bytes.len()].copy_from_slice(bytes);
    *out_pos += bytes.len();
    true
}

fn fits_window(offset: u32, scalar: u32) -> bool {
    scalar >= offset && scalar < offset + 0x80
}

fn floor_window_offset(scalar: u32) -> u32 {
    scalar - (scalar % 0x80)
}

/// Combine a (possibly surrogate-paired) UTF-16 code unit at `pos` into its
/// scalar value, returning `(scalar, code_unit_width)`.
fn peek_scalar(input: &[u16], pos: usize) -> (u32, usize) {
    let unit = input[pos];
    if (0xD800..=0xDBFF).contains(&unit) {
        if let Some(&low) = input.get(pos + 1) {
            if (0xDC00..=0xDFFF).contains(&low) {
                let scalar =
                    0x10000 + (((unit - 0xD800) as u32) << 10) + (low - 0xDC00) as u32;
                return (scalar, 2);
            }
        }
    }
    (unit as u32, 1)
}

fn peek_next_scalar(input: &[u16], pos: usize, width: usize) -> Option<u32> {
    let next_pos = pos + width;
    if next_pos >= input.len() {
        None
    } else {
        Some(peek_scalar(input, next_pos).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{DecodeResult, ScsuDecoder};

    fn roundtrip(s: &str) -> (Vec<u8>, String) {
        let units: Vec<u16> = s.encode_utf16().collect();
        let mut enc = ScsuEncoder::new();
        let mut out = vec![0u8; units.len() * 4 + 16];
        let r = enc.encode(&units, &mut out);
        let written = match r {
            EncodeResult::Done { written } => written,
            EncodeResult::NeedMoreOutput { .. } => panic!("buffer too small in test"),
        };
        out.truncate(written);

        let mut dec = ScsuDecoder::new();
        let mut decoded = Vec::new();
        assert_eq!(
            dec.decode(&out, &mut decoded).unwrap(),
            DecodeResult::Done
        );
        (out, String::from_utf16(&decoded).unwrap())
    }

    #[test]
    fn test_encode_ascii_hello() {
        let (bytes, back) = roundtrip("Hello");
        assert_eq!(bytes, vec![0x48, 0x65, 0x6C, 0x6C, 0x6F]);
        assert_eq!(back, "Hello");
    }

    #[test]
    fn test_encode_ascii_never_expands() {
        let s = "the quick brown fox jumps over the lazy dog 0123456789";
        let units: Vec<u16> = s.encode_utf16().collect();
        let mut enc = ScsuEncoder::new();
        let mut out = vec![0u8; units.len() * 4 + 16];
        let EncodeResult::Done { written } = enc.encode(&units, &mut out) else {
            panic!()
        };
        assert!(written <= units.len());
    }

    #[test]
    fn test_encode_cyrillic_roundtrips() {
        let (_bytes, back) = roundtrip("\u{0410}\u{0411}\u{0412}");
        assert_eq!(back, "\u{0410}\u{0411}\u{0412}");
    }

    #[test]
    fn test_encode_single_char_unicode_run_uses_squ() {
        // U+4E2D (CJK, non-compressible) surrounded by ASCII: should enter
        // Unicode mode for exactly one char, then the rewrite kicks in.
        let s = "a\u{4E2D}b";
        let units: Vec<u16> = s.encode_utf16().collect();
        let mut enc = ScsuEncoder::new();
        let mut out = vec![0u8; 32];
        let EncodeResult::Done { written } = enc.encode(&units, &mut out) else {
            panic!()
        };
        // 'a', SQU, hi, lo, 'b'
        assert_eq!(out[0], b'a');
        assert_eq!(out[1], SQU);
        assert_eq!(out[4], b'b');
        assert_eq!(written, 5);
    }

    #[test]
    fn test_encode_cjk_run_stays_in_unicode_mode() {
        let s = "\u{4E2D}\u{6587}\u{5B57}";
        let (bytes, back) = roundtrip(s);
        assert_eq!(bytes[0], SCU);
        assert_eq!(back, s);
    }

    #[test]
    fn test_encode_resumes_after_need_more_output() {
        let s = "Hello, world! This text is long enough to need resumption.";
        let units: Vec<u16> = s.encode_utf16().collect();
        let mut enc = ScsuEncoder::new();
        let mut acc = Vec::new();
        loop {
            let mut out = [0u8; 4];
            match enc.encode(&units, &mut out) {
                EncodeResult::Done { written } => {
                    acc.extend_from_slice(&out[..written]);
                    break;
                }
                EncodeResult::NeedMoreOutput { written } => {
                    acc.extend_from_slice(&out[..written]);
                }
            }
        }
        let mut dec = ScsuDecoder::new();
        let mut decoded = Vec::new();
        dec.decode(&acc, &mut decoded).unwrap();
        assert_eq!(String::from_utf16(&decoded).unwrap(), s);
    }

    #[test]
    fn test_encode_worst_case_bound() {
        let s = "\u{4E2D}\u{3042}\u{4E01}\u{3044}";
        let units: Vec<u16> = s.encode_utf16().collect();
        let mut enc = ScsuEncoder::new();
        let mut out = vec![0u8; units.len() * 2 + 4];
        let EncodeResult::Done { written } = enc.encode(&units, &mut out) else {
            panic!()
        };
        assert!(written <= 2 * units.len() + 4);
    }
}
