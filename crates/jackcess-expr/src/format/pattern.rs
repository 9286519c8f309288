//! The custom pattern engine backing `Format(x, "#,##0.00")` and friends —
//! everything that isn't one of the named formats in [`super::named`].
//!
//! Sections are separated by top-level `;` (positive[;negative[;zero[;null]]]).
//! Supported number tokens: `0 # . , %`; quoted `"literal"` runs and `\x`
//! escapes pass through verbatim; `[color]` tags are recognized and dropped.
//! Supported date tokens: `d dd ddd dddd m mm mmm mmmm q w ww yy yyyy h hh
//! n nn s ss AMPM am/pm a/p`. Text tokens `@ & < > !` are handled by
//! [`apply_text`].

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::EvalError;
use crate::value::Value;

fn split_sections(pattern: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ';' if !in_quotes => {
                sections.push(current.clone());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    sections.push(current);
    sections
}

/// Consumes a literal run starting at `chars[i]`: `"quoted text"`, a
/// `\`-escaped character, or a `[color]` tag (dropped, since color tags
/// have no effect on rendered text). Returns the literal text plus the
/// number of source characters consumed, or `None` if `chars[i]` starts
/// none of those.
fn literal_run(chars: &[char], i: usize) -> Option<(String, usize)> {
    match chars[i] {
        '"' => {
            let mut s = String::new();
            let mut j = i + 1;
            while j < chars.len() && chars[j] != '"' {
                s.push(chars[j]);
                j += 1;
            }
            let end = if j < chars.len() { j + 1 } else { j };
            Some((s, end - i))
        }
        '\\' => {
            if i + 1 < chars.len() {
                Some((chars[i + 1].to_string(), 2))
            } else {
                Some((String::new(), 1))
            }
        }
        '[' => {
            let mut j = i + 1;
            while j < chars.len() && chars[j] != ']' {
                j += 1;
            }
            let end = if j < chars.len() { j + 1 } else { j };
            Some((String::new(), end - i))
        }
        _ => None,
    }
}

struct NumSpec {
    prefix: String,
    use_comma: bool,
    min_int: usize,
    decimals: usize,
    has_percent: bool,
    suffix: String,
}

fn parse_number_section(section: &str) -> NumSpec {
    let mut prefix = String::new();
    let mut suffix = String::new();
    let mut int_digits = String::new();
    let mut frac_digits = String::new();
    let mut use_comma = false;
    let mut has_percent = false;
    let mut seen_point = false;
    let mut seen_placeholder = false;

    let chars: Vec<char> = section.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if let Some((lit, consumed)) = literal_run(&chars, i) {
            if seen_placeholder {
                suffix.push_str(&lit);
            } else {
                prefix.push_str(&lit);
            }
            i += consumed;
            continue;
        }
        i += 1;
        match c {
            '0' | '#' => {
                seen_placeholder = true;
                if seen_point {
                    frac_digits.push(c);
                } else {
                    int_digits.push(c);
                }
            }
            '.' if !seen_point => {
                seen_placeholder = true;
                seen_point = true;
            }
            ',' => {
                use_comma = true;
                seen_placeholder = true;
            }
            '%' => {
                has_percent = true;
                seen_placeholder = true;
            }
            _ => {
                if seen_placeholder {
                    suffix.push(c);
                } else {
                    prefix.push(c);
                }
            }
        }
    }

    NumSpec {
        prefix,
        use_comma,
        min_int: int_digits.chars().filter(|c| *c == '0').count(),
        decimals: frac_digits.len(),
        has_percent,
        suffix,
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::new();
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

fn render_number(n: f64, spec: &NumSpec) -> String {
    let scaled = if spec.has_percent { n * 100.0 } else { n };
    let negative = scaled < 0.0;
    let magnitude = scaled.abs();
    let formatted = format!("{magnitude:.*}", spec.decimals);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (formatted, String::new()),
    };
    let mut int_part = int_part;
    while int_part.len() < spec.min_int {
        int_part.insert(0, '0');
    }
    let int_part = if spec.use_comma { group_thousands(&int_part) } else { int_part };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&spec.prefix);
    out.push_str(&int_part);
    if spec.decimals > 0 {
        out.push('.');
        out.push_str(&frac_part);
    }
    out.push_str(&spec.suffix);
    if spec.has_percent {
        out.push('%');
    }
    out
}

/// Applies a custom numeric/date/text format pattern to a value.
pub fn apply(v: &Value, pattern: &str) -> Result<String, EvalError> {
    match v {
        Value::DateTime(dt) => apply_date(*dt, pattern),
        Value::String(s) => Ok(apply_text(s, pattern)),
        Value::Null => Ok(apply_text("", pattern)),
        other => {
            let n = other.as_f64().ok_or(EvalError::TypeMismatch { expr: "Format".into() })?;
            apply_number(n, pattern)
        }
    }
}

pub fn apply_number(n: f64, pattern: &str) -> Result<String, EvalError> {
    let sections = split_sections(pattern);
    let has_negative_section = n < 0.0 && sections.len() > 1;
    let section = if has_negative_section {
        &sections[1]
    } else if n == 0.0 && sections.len() > 2 {
        &sections[2]
    } else {
        &sections[0]
    };
    let spec = parse_number_section(section);
    // An explicit negative section supplies its own sign treatment (e.g.
    // parens); otherwise fall back to a leading `-` on the magnitude.
    let value = if has_negative_section { n.abs() } else { n };
    Ok(render_number(value, &spec))
}

fn month_name(m: u32, short: bool) -> &'static str {
    const LONG: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    const SHORT: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let idx = (m.max(1) - 1) as usize % 12;
    if short { SHORT[idx] } else { LONG[idx] }
}

fn weekday_name(dt: &NaiveDateTime, short: bool) -> &'static str {
    const LONG: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
    const SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    let idx = dt.weekday().num_days_from_sunday() as usize;
    if short { SHORT[idx] } else { LONG[idx] }
}

/// Applies a custom date/time pattern, matching the longest known token at
/// each position and passing quoted/escaped literals through untouched.
pub fn apply_date(dt: NaiveDateTime, pattern: &str) -> Result<String, EvalError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if let Some((lit, consumed)) = literal_run(&chars, i) {
            out.push_str(&lit);
            i += consumed;
            continue;
        }
        let rest: String = chars[i..].iter().collect();
        let lower = rest.to_ascii_lowercase();
        let token_defs: &[(&str, usize)] = &[
            ("dddd", 4),
            ("ddd", 3),
            ("dd", 2),
            ("d", 1),
            ("mmmm", 4),
            ("mmm", 3),
            ("mm", 2),
            ("m", 1),
            ("yyyy", 4),
            ("yy", 2),
            ("hh", 2),
            ("h", 1),
            ("nn", 2),
            ("n", 1),
            ("ss", 2),
            ("s", 1),
            ("ampm", 4),
            ("am/pm", 5),
            ("a/p", 3),
            ("q", 1),
            ("ww", 2),
            ("w", 1),
            ("c", 1),
        ];
        let matched = token_defs.iter().find(|(tok, _)| lower.starts_with(tok));
        if let Some((tok, len)) = matched {
            out.push_str(&render_date_token(tok, &dt));
            i += len;
            continue;
        }
        out.push(c);
        i += 1;
    }
    Ok(out)
}

fn render_date_token(tok: &str, dt: &NaiveDateTime) -> String {
    match tok {
        "dddd" => weekday_name(dt, false).to_string(),
        "ddd" => weekday_name(dt, true).to_string(),
        "dd" => format!("{:02}", dt.day()),
        "d" => dt.day().to_string(),
        "mmmm" => month_name(dt.month(), false).to_string(),
        "mmm" => month_name(dt.month(), true).to_string(),
        "mm" => format!("{:02}", dt.month()),
        "m" => dt.month().to_string(),
        "yyyy" => dt.year().to_string(),
        "yy" => format!("{:02}", dt.year().rem_euclid(100)),
        "hh" => format!("{:02}", dt.hour12().1),
        "h" => dt.hour12().1.to_string(),
        "nn" => format!("{:02}", dt.minute()),
        "n" => dt.minute().to_string(),
        "ss" => format!("{:02}", dt.second()),
        "s" => dt.second().to_string(),
        "ampm" | "am/pm" => if dt.hour12().0 { "PM" } else { "AM" }.to_string(),
        "a/p" => if dt.hour12().0 { "P" } else { "A" }.to_string(),
        "q" => (dt.month0() / 3 + 1).to_string(),
        "ww" => format!("{:02}", dt.iso_week().week()),
        "w" => (dt.weekday().num_days_from_sunday() + 1).to_string(),
        "c" => dt.format("%-m/%-d/%Y %-I:%M:%S %p").to_string(),
        _ => String::new(),
    }
}

/// Applies a text format pattern: `@` (mandatory char or space), `&`
/// (optional char), `<`/`>` (force lower/upper case), `!` (left-to-right
/// fill, i.e. consume placeholders from the left rather than the right).
pub fn apply_text(text: &str, pattern: &str) -> String {
    if pattern.is_empty() {
        return text.to_string();
    }
    let left_to_right = pattern.starts_with('!');
    let pattern = pattern.trim_start_matches('!');
    let input: Vec<char> = text.chars().collect();
    let placeholder_count = pattern.chars().filter(|c| *c == '@' || *c == '&').count();

    // Align the input against the placeholders before reading the pattern,
    // so `<`/`>` directives (read left to right below) apply to whichever
    // characters actually land under later placeholders. Default fill is
    // right-to-left: the tail of `input` lines up with the last
    // placeholders, dropping a too-long prefix or padding a too-short one
    // on the left. `!` reverses that alignment.
    let mut slots: std::collections::VecDeque<Option<char>> = std::collections::VecDeque::new();
    if left_to_right {
        for i in 0..placeholder_count {
            slots.push_back(input.get(i).copied());
        }
    } else {
        let start = input.len().saturating_sub(placeholder_count);
        let tail = &input[start..];
        for _ in 0..placeholder_count.saturating_sub(tail.len()) {
            slots.push_back(None);
        }
        for &c in tail {
            slots.push_back(Some(c));
        }
    }

    let mut force: Option<bool> = None; // Some(true) = upper, Some(false) = lower
    let mut rendered = String::new();
    for c in pattern.chars() {
        match c {
            '@' => {
                let ch = slots.pop_front().flatten().unwrap_or(' ');
                rendered.push(apply_case(ch, force));
            }
            '&' => {
                if let Some(ch) = slots.pop_front().flatten() {
                    rendered.push(apply_case(ch, force));
                }
            }
            '<' => force = Some(false),
            '>' => force = Some(true),
            _ => rendered.push(c),
        }
    }
    rendered
}

fn apply_case(c: char, force: Option<bool>) -> char {
    match force {
        Some(true) => c.to_ascii_uppercase(),
        Some(false) => c.to_ascii_lowercase(),
        None => c,
    }
}
