use crate::error::ScsuError;
use crate::tables::*;

/// Outcome of a single `decode` call.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DecodeResult {
    /// The whole input was consumed and the output is complete and valid.
    Done,
    /// Input ended in the middle of a multi-byte command. The decoder has
    /// not advanced past the start of that command; call again with a
    /// longer slice backed by the same buffer to resume.
    NeedMoreInput,
}

/// Decodes an SCSU byte stream into UTF-16 code units.
///
/// A single instance may decode several independent strings back to back;
/// dynamic window state deliberately persists between calls, since real
/// hosts reuse one decoder per column to keep compression window locality
/// across values. Call [`reset`](ScsuDecoder::reset) to start a fresh
/// stream with the initial window table.
#[derive(Debug, Clone)]
pub struct ScsuDecoder {
    dynamic_offsets: [u32; 8],
    current_window: usize,
    in_unicode_mode: bool,
    input_pos: usize,
}

impl Default for ScsuDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScsuDecoder {
    pub fn new() -> Self {
        Self {
            dynamic_offsets: INITIAL_DYNAMIC_OFFSETS,
            current_window: 0,
            in_unicode_mode: false,
            input_pos: 0,
        }
    }

    /// Restore all codec state to its initial values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn push_scalar(output: &mut Vec<u16>, scalar: u32) {
        if scalar > 0xFFFF {
            let s = scalar - 0x10000;
            output.push(0xD800 + (s >> 10) as u16);
            output.push(0xDC00 + (s & 0x3FF) as u16);
        } else {
            output.push(scalar as u16);
        }
    }

    /// Decode as much of `input` as forms complete commands, resuming from
    /// wherever a previous call left off. `output` is appended to, never
    /// cleared.
    pub fn decode(
        &mut self,
        input: &[u8],
        output: &mut Vec<u16>,
    ) -> Result<DecodeResult, ScsuError> {
        loop {
            if self.input_pos >= input.len() {
                self.validate(output)?;
                self.input_pos = 0;
                return Ok(DecodeResult::Done);
            }
            let start = self.input_pos;
            match self.step(input, output) {
                Ok(true) => continue,
                Ok(false) => {
                    self.input_pos = start;
                    return Ok(DecodeResult::NeedMoreInput);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn validate(&self, output: &[u16]) -> Result<(), ScsuError> {
        let mut i = 0;
        while i < output.len() {
            let u = output[i];
            if (0xD800..=0xDBFF).contains(&u) {
                let low_ok = output
                    .get(i + 1)
                    .is_some_and(|&l| (0xDC00..=0xDFFF).contains(&l));
                if !low_ok {
                    return Err(ScsuError::IllegalInput(
                        "unpaired high surrogate".to_string(),
                    ));
                }
                i += 2;
            } else if (0xDC00..=0xDFFF).contains(&u) {
                return Err(ScsuError::IllegalInput(
                    "unpaired low surrogate".to_string(),
                ));
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    /// Process exactly one command at `self.input_pos`. Returns `Ok(true)`
    /// if it advanced, `Ok(false)` if `input` ran out mid-command.
    fn step(&mut self, input: &[u8], output: &mut Vec<u16>) -> Result<bool, ScsuError> {
        if self.in_unicode_mode {
            self.step_unicode(input, output)
        } else {
            self.step_single_byte(input, output)
        }
    }

    fn step_single_byte(&mut self, input: &[u8], output: &mut Vec<u16>) -> Result<bool, ScsuError> {
        let b = input[self.input_pos];
        match b {
            0x00 | 0x09 | 0x0A | 0x0D => {
                output.push(b as u16);
                self.input_pos += 1;
            }
            SRS => {
                return Err(ScsuError::IllegalInput(format!(
                    "reserved command byte 0x{b:02X}"
                )));
            }
            SQ0..=SQ7 => {
                let Some(&arg) = input.get(self.input_pos + 1) else {
                    return Ok(false);
                };
                let window = (b - SQ0) as usize;
                let scalar = if arg < 0x80 {
                    arg as u32
                } else {
                    STATIC_OFFSETS[window] + (arg as u32 - 0x80)
                };
                Self::push_scalar(output, scalar);
                self.input_pos += 2;
            }
            SDX => {
                let (Some(&b1), Some(&b2)) =
                    (input.get(self.input_pos + 1), input.get(self.input_pos + 2))
                else {
                    return Ok(false);
                };
                let (window, offset) = decode_extended(b1, b2);
                self.dynamic_offsets[window] = offset;
                self.current_window = window;
                self.input_pos += 3;
            }
            SQU => {
                let (Some(&hi), Some(&lo)) =
                    (input.get(self.input_pos + 1), input.get(self.input_pos + 2))
                else {
                    return Ok(false);
                };
                output.push(((hi as u16) << 8) | lo as u16);
                self.input_pos += 3;
            }
            SCU => {
                self.in_unicode_mode = true;
                self.input_pos += 1;
            }
            SC0..=SC7 => {
                self.current_window = (b - SC0) as usize;
                self.input_pos += 1;
            }
            SD0..=SD7 => {
                let Some(&arg) = input.get(self.input_pos + 1) else {
                    return Ok(false);
                };
                let window = (b - SD0) as usize;
                let offset = decode_window_offset(arg).ok_or_else(|| {
                    ScsuError::IllegalInput(format!("reserved SDn argument 0x{arg:02X}"))
                })?;
                self.dynamic_offsets[window] = offset;
                self.current_window = window;
                self.input_pos += 2;
            }
            0x80..=0xFF => {
                let scalar = self.dynamic_offsets[self.current_window] + (b as u32 - 0x80);
                Self::push_scalar(output, scalar);
                self.input_pos += 1;
            }
            _ => {
                // remaining ASCII range (0x0B handled above, 0x20..=0x7F, etc.)
                output.push(b as u16);
                self.input_pos += 1;
            }
        }
        Ok(true)
    }

    fn step_unicode(&mut self, input: &[u8], output: &mut Vec<u16>) -> Result<bool, ScsuError> {
        let b = input[self.input_pos];
        match b {
            UC0..=UC7 => {
                self.current_window = (b - UC0) as usize;
                self.in_unicode_mode = false;
                self.input_pos += 1;
            }
            UD0..=UD7 => {
                let Some(&arg) = input.get(self.input_pos + 1) else {
                    return Ok(false);
                };
                let window = (b - UD0) as usize;
                let offset = decode_window_offset(arg).ok_or_else(|| {
                    ScsuError::IllegalInput(format!("reserved UDn argument 0x{arg:02X}"))
                })?;
                self.dynamic_offsets[window] = offset;
                self.current_window = window;
                self.in_unicode_mode = false;
                self.input_pos += 2;
            }
            UQU => {
                let (Some(&hi), Some(&lo)) =
                    (input.get(self.input_pos + 1), input.get(self.input_pos + 2))
                else {
                    return Ok(false);
                };
                output.push(((hi as u16) << 8) | lo as u16);
                self.input_pos += 3;
            }
            UDX => {
                let (Some(&b1), Some(&b2)) =
                    (input.get(self.input_pos + 1), input.get(self.input_pos + 2))
                else {
                    return Ok(false);
                };
                let (window, offset) = decode_extended(b1, b2);
                self.dynamic_offsets[window] = offset;
                self.current_window = window;
                self.input_pos += 3;
            }
            URS => {
                return Err(ScsuError::IllegalInput(format!(
                    "reserved command byte 0x{b:02X}"
                )));
            }
            _ => {
                let Some(&lo) = input.get(self.input_pos + 1) else {
                    return Ok(false);
                };
                output.push(((b as u16) << 8) | lo as u16);
                self.input_pos += 2;
            }
        }
        Ok(true)
    }
}

fn decode_extended(b1: u8, b2: u8) -> (usize, u32) {
    let arg = ((b1 as u16) << 8) | b2 as u16;
    let window = ((arg >> 13) & 0x7) as usize;
    let low13 = (arg & 0x1FFF) as u32;
    (window, (low13 << 7) + 0x10000)
}
