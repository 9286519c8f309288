use thiserror::Error;

/// Raised during parsing; surfaces directly to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of expression")]
    UnexpectedEof,
    #[error("unexpected token {0:?}")]
    UnexpectedToken(String),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated date literal")]
    UnterminatedDateLiteral,
    #[error("invalid number literal {0:?}")]
    InvalidNumber(String),
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("{0}")]
    Other(String),
}

/// Raised during evaluation; includes the originating expression text
/// for diagnostics. `ArithmeticError` (overflow, division by zero, domain
/// errors) surfaces through this variant set, not as a separate type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("invalid function call")]
    InvalidFunctionCall,
    #[error("division by zero")]
    DivisionByZero,
    #[error("numeric overflow")]
    Overflow,
    #[error("type mismatch evaluating {expr:?}")]
    TypeMismatch { expr: String },
    #[error("unknown function {0:?}")]
    UnknownFunction(String),
    #[error("unknown identifier {0:?}")]
    UnknownIdentifier(String),
    #[error("invalid date/time value")]
    InvalidDateTime,
    #[error("{0}")]
    Other(String),
}
