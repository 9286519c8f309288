//! A single entry point over the three independent subsystems this crate
//! family provides: compressed-text (de)coding, query-SQL reconstruction,
//! and expression parsing/evaluation. Each subsystem also stands alone as
//! its own crate; this facade exists for callers that want all three
//! without tracking three dependency lines.

pub use jackcess_expr as expr;
pub use jackcess_query as query;
pub use jackcess_scsu as scsu;

pub use jackcess_expr::{evaluate, parse, EvalContext, EvalError, ParseError, ParseKind, SimpleContext, Value};
pub use jackcess_query::{reconstruct, Attribute, ObjectFlag, QueryError, QueryKind, QueryResult, Row};
pub use jackcess_scsu::{DecodeResult, EncodeResult, ScsuDecoder, ScsuEncoder, ScsuError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scsu_round_trip_through_facade() {
        let input: Vec<u16> = "Hello".encode_utf16().collect();
        let mut output = [0u8; 64];
        let mut encoder = ScsuEncoder::new();
        let result = encoder.encode(&input, &mut output);
        let written = match result {
            EncodeResult::Done { written } => written,
            EncodeResult::NeedMoreOutput { .. } => panic!("output buffer too small"),
        };

        let mut decoded = Vec::new();
        let mut decoder = ScsuDecoder::new();
        decoder.decode(&output[..written], &mut decoded).unwrap();
        assert_eq!(String::from_utf16(&decoded).unwrap(), "Hello");
    }

    #[test]
    fn test_query_reconstruction_through_facade() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(0),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column).with_expression("[a]"),
        ];
        let result = reconstruct(0, "Query1", &rows, 1);
        assert_eq!(result.kind, QueryKind::Select);
        assert_eq!(result.sql.as_deref(), Some("SELECT [a] FROM T;"));
    }

    #[test]
    fn test_expression_evaluation_through_facade() {
        let mut ctx = SimpleContext::default();
        let result = evaluate(ParseKind::DefaultValue, "1 + 2", &mut ctx).unwrap();
        assert_eq!(result, Value::Long(3));
    }
}
