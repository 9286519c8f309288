use std::sync::Arc;

use fancy_regex::Regex;

use crate::ast::LikePattern;

/// Translate an Access `Like` pattern into an anchored, case-insensitive
/// regular expression. An unbalanced `[` compiles to a pattern that
/// never matches rather than erroring — Access itself treats it this way.
pub fn compile(pattern: &str) -> LikePattern {
    let body = match translate(pattern) {
        Some(body) => body,
        None => "(?!)".to_string(),
    };
    let regex = Regex::new(&format!("(?is)^{body}$")).unwrap_or_else(|_| Regex::new("(?!)").unwrap());
    LikePattern {
        source: pattern.to_string(),
        regex: Arc::new(regex),
    }
}

fn translate(pattern: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '?' => out.push('.'),
            '*' => out.push_str(".*"),
            '#' => out.push_str("\\d"),
            '[' => {
                let mut class = String::from("[");
                let mut closed = false;
                if chars.peek() == Some(&'!') {
                    chars.next();
                    class.push('^');
                }
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    if c == '\\' || c == '^' {
                        class.push('\\');
                    }
                    class.push(c);
                }
                if !closed {
                    return None;
                }
                class.push(']');
                out.push_str(&class);
            }
            other => {
                if regex_needs_escape(other) {
                    out.push('\\');
                }
                out.push(other);
            }
        }
    }
    Some(out)
}

fn regex_needs_escape(c: char) -> bool {
    matches!(
        c,
        '.' | '^' | '$' | '+' | '(' | ')' | '{' | '}' | '|' | '\\'
    )
}

pub fn is_match(pattern: &LikePattern, text: &str) -> bool {
    pattern.regex.is_match(text).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_mark_matches_one_char() {
        let p = compile("a?c");
        assert!(is_match(&p, "abc"));
        assert!(!is_match(&p, "ac"));
    }

    #[test]
    fn test_star_matches_any_run() {
        let p = compile("abc*");
        assert!(is_match(&p, "abcdef"));
        assert!(is_match(&p, "abc"));
    }

    #[test]
    fn test_hash_matches_digit() {
        let p = compile("a#c");
        assert!(is_match(&p, "a1c"));
        assert!(!is_match(&p, "axc"));
    }

    #[test]
    fn test_char_class_with_negation() {
        let p = compile("[!abc]");
        assert!(is_match(&p, "d"));
        assert!(!is_match(&p, "a"));
    }

    #[test]
    fn test_unbalanced_bracket_never_matches() {
        let p = compile("[abc");
        assert!(!is_match(&p, "a"));
        assert!(!is_match(&p, ""));
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let p = compile("abc");
        assert!(is_match(&p, "ABC"));
    }
}
