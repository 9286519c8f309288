use jackcess_scsu::{DecodeResult, EncodeResult, ScsuDecoder, ScsuEncoder};

fn encode_all(s: &str) -> Vec<u8> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut enc = ScsuEncoder::new();
    let mut out = vec![0u8; units.len() * 4 + 16];
    match enc.encode(&units, &mut out) {
        EncodeResult::Done { written } => {
            out.truncate(written);
            out
        }
        EncodeResult::NeedMoreOutput { .. } => panic!("buffer undersized"),
    }
}

fn decode_all(bytes: &[u8]) -> String {
    let mut dec = ScsuDecoder::new();
    let mut out = Vec::new();
    assert_eq!(dec.decode(bytes, &mut out).unwrap(), DecodeResult::Done);
    String::from_utf16(&out).unwrap()
}

fn assert_roundtrips(s: &str) {
    let encoded = encode_all(s);
    assert_eq!(decode_all(&encoded), s, "roundtrip failed for {s:?}");
}

#[test]
fn roundtrips_plain_ascii() {
    assert_roundtrips("the quick brown fox jumps over the lazy dog");
}

#[test]
fn roundtrips_mixed_ascii_and_latin1_supplement() {
    assert_roundtrips("café naïve Zürich");
}

#[test]
fn roundtrips_cyrillic_block() {
    assert_roundtrips("Привет, мир!");
}

#[test]
fn roundtrips_greek_block() {
    assert_roundtrips("Γειά σου Κόσμε");
}

#[test]
fn roundtrips_japanese_hiragana_katakana_kanji() {
    assert_roundtrips("こんにちは世界カタカナ");
}

#[test]
fn roundtrips_supplementary_plane_characters() {
    // U+1D11E (musical symbol G clef) needs a surrogate pair.
    assert_roundtrips("a\u{1D11E}b");
}

#[test]
fn roundtrips_mixed_scripts_with_interleaved_ascii() {
    assert_roundtrips("Hello Привет 世界 123 こんにちは");
}

#[test]
fn roundtrips_control_characters() {
    assert_roundtrips("line1\r\nline2\ttabbed\x01ctrl");
}

#[test]
fn roundtrips_empty_string() {
    assert_roundtrips("");
}

#[test]
fn ascii_only_never_expands_beyond_input_length() {
    let s = "A".repeat(500);
    let encoded = encode_all(&s);
    assert!(encoded.len() <= s.len());
}

#[test]
fn single_window_text_expands_by_at_most_two_bytes() {
    let s = "Привет".to_string();
    let encoded = encode_all(&s);
    let units: Vec<u16> = s.encode_utf16().collect();
    assert!(encoded.len() <= units.len() + 2);
}

#[test]
fn single_character_unicode_run_is_rewritten_to_squ() {
    let bytes = encode_all("中");
    assert_eq!(bytes[0], jackcess_scsu::tables::SQU);
}

#[test]
fn decoder_accepts_hand_written_scu_stream() {
    // SCU, then U+3042 (Hiragana A) as a raw pair.
    let bytes = [jackcess_scsu::tables::SCU, 0x30, 0x42];
    assert_eq!(decode_all(&bytes), "あ");
}
