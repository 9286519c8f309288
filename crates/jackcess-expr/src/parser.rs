use crate::ast::{BinaryOp, CompareOp, Expression, LogicalOp, ObjectRef, UnaryOp};
use crate::error::ParseError;
use crate::lexer::{Keyword, Lexer, Token};
use crate::like;
use crate::value::Value;

/// The four contexts an expression's text can be parsed in. All
/// four share the same grammar; `FieldValidator`/`RecordValidator` add the
/// bare-compare-RHS synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    DefaultValue,
    FieldValidator,
    FieldDefault,
    RecordValidator,
}

impl ParseKind {
    fn allows_implicit_compare(self) -> bool {
        matches!(self, ParseKind::FieldValidator | ParseKind::RecordValidator)
    }
}

pub fn parse(kind: ParseKind, text: &str) -> Result<Expression, ParseError> {
    let tokens = Lexer::new(text).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = if kind.allows_implicit_compare() {
        parser.parse_validator_body()?
    } else {
        parser.parse_expr()?
    };
    parser.expect_eof()?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if *self.peek() == Token::Eof {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken(format!("{:?}", self.peek())))
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), ParseError> {
        if self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken(format!("{:?}", self.peek())))
        }
    }

    /// Bare compare-RHS synthesis for `FIELD_VALIDATOR`/`RECORD_VALIDATOR`
    ///: if the text opens with a comparison/Like/Between/In token,
    /// there is no explicit left operand — synthesize "this column".
    fn parse_validator_body(&mut self) -> Result<Expression, ParseError> {
        let lhs = Box::new(Expression::ThisColumn);
        match self.peek().clone() {
            Token::Eq | Token::Ne | Token::Lt | Token::Le | Token::Gt | Token::Ge => {
                let op = self.compare_op()?;
                let rhs = self.parse_concat()?;
                Ok(Expression::ImplicitCompare { op, rhs: Box::new(rhs) })
            }
            Token::Keyword(Keyword::Like) => {
                self.advance();
                self.parse_like_tail(lhs, false)
            }
            Token::Keyword(Keyword::Between) => {
                self.advance();
                self.parse_between_tail(lhs, false)
            }
            Token::Keyword(Keyword::In) => {
                self.advance();
                self.parse_in_tail(lhs, false)
            }
            Token::Keyword(Keyword::Not) => {
                self.advance();
                match self.peek().clone() {
                    Token::Keyword(Keyword::Like) => {
                        self.advance();
                        self.parse_like_tail(lhs, true)
                    }
                    Token::Keyword(Keyword::Between) => {
                        self.advance();
                        self.parse_between_tail(lhs, true)
                    }
                    Token::Keyword(Keyword::In) => {
                        self.advance();
                        self.parse_in_tail(lhs, true)
                    }
                    _ => Ok(Expression::Unary {
                        op: UnaryOp::Not,
                        expr: Box::new(self.parse_expr()?),
                    }),
                }
            }
            _ => self.parse_expr(),
        }
    }

    fn compare_op(&mut self) -> Result<CompareOp, ParseError> {
        let op = match self.advance() {
            Token::Eq => CompareOp::Eq,
            Token::Ne => CompareOp::Ne,
            Token::Lt => CompareOp::Lt,
            Token::Le => CompareOp::Le,
            Token::Gt => CompareOp::Gt,
            Token::Ge => CompareOp::Ge,
            other => return Err(ParseError::UnexpectedToken(format!("{other:?}"))),
        };
        Ok(op)
    }

    fn parse_expr(&mut self) -> Result<Expression, ParseError> {
        self.parse_imp()
    }

    fn parse_imp(&mut self) -> Result<Expression, ParseError> {
        self.parse_logical_left(Self::parse_eqv, Keyword::Imp, LogicalOp::Imp)
    }

    fn parse_eqv(&mut self) -> Result<Expression, ParseError> {
        self.parse_logical_left(Self::parse_xor, Keyword::Eqv, LogicalOp::Eqv)
    }

    fn parse_xor(&mut self) -> Result<Expression, ParseError> {
        self.parse_logical_left(Self::parse_or, Keyword::Xor, LogicalOp::Xor)
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        self.parse_logical_left(Self::parse_and, Keyword::Or, LogicalOp::Or)
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        self.parse_logical_left(Self::parse_not, Keyword::And, LogicalOp::And)
    }

    fn parse_logical_left(
        &mut self,
        next: fn(&mut Self) -> Result<Expression, ParseError>,
        keyword: Keyword,
        op: LogicalOp,
    ) -> Result<Expression, ParseError> {
        let mut lhs = next(self)?;
        while *self.peek() == Token::Keyword(keyword) {
            self.advance();
            let rhs = next(self)?;
            lhs = Expression::Logical { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expression, ParseError> {
        if *self.peek() == Token::Keyword(Keyword::Not) {
            self.advance();
            let expr = self.parse_not()?;
            return Ok(Expression::Unary { op: UnaryOp::Not, expr: Box::new(expr) });
        }
        self.parse_compare()
    }

    fn parse_compare(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_special()?;
        loop {
            let op = match self.peek() {
                Token::Eq => CompareOp::Eq,
                Token::Ne => CompareOp::Ne,
                Token::Lt => CompareOp::Lt,
                Token::Le => CompareOp::Le,
                Token::Gt => CompareOp::Gt,
                Token::Ge => CompareOp::Ge,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_special()?;
            lhs = Expression::Compare { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    /// `Is / Like / In / Between`, optionally preceded by `Not`.
    fn parse_special(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_concat()?;
        loop {
            match self.peek().clone() {
                Token::Keyword(Keyword::Is) => {
                    self.advance();
                    let negate = if *self.peek() == Token::Keyword(Keyword::Not) {
                        self.advance();
                        true
                    } else {
                        false
                    };
                    self.expect(&Token::Keyword(Keyword::Null))?;
                    lhs = Expression::NullTest { expr: Box::new(lhs), negate };
                }
                Token::Keyword(Keyword::Like) => {
                    self.advance();
                    lhs = self.parse_like_tail(Box::new(lhs), false)?;
                }
                Token::Keyword(Keyword::In) => {
                    self.advance();
                    lhs = self.parse_in_tail(Box::new(lhs), false)?;
                }
                Token::Keyword(Keyword::Between) => {
                    self.advance();
                    lhs = self.parse_between_tail(Box::new(lhs), false)?;
                }
                Token::Keyword(Keyword::Not) => {
                    let save = self.pos;
                    self.advance();
                    match self.peek().clone() {
                        Token::Keyword(Keyword::Like) => {
                            self.advance();
                            lhs = self.parse_like_tail(Box::new(lhs), true)?;
                        }
                        Token::Keyword(Keyword::In) => {
                            self.advance();
                            lhs = self.parse_in_tail(Box::new(lhs), true)?;
                        }
                        Token::Keyword(Keyword::Between) => {
                            self.advance();
                            lhs = self.parse_between_tail(Box::new(lhs), true)?;
                        }
                        _ => {
                            self.pos = save;
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_like_tail(&mut self, lhs: Box<Expression>, negate: bool) -> Result<Expression, ParseError> {
        let pattern_expr = self.parse_concat()?;
        let Expression::Literal(Value::String(pattern_text)) = pattern_expr else {
            return Err(ParseError::Other(
                "Like requires a literal string pattern".to_string(),
            ));
        };
        Ok(Expression::Like { expr: lhs, pattern: like::compile(&pattern_text), negate })
    }

    fn parse_in_tail(&mut self, lhs: Box<Expression>, negate: bool) -> Result<Expression, ParseError> {
        self.expect(&Token::LParen)?;
        let mut list = Vec::new();
        if *self.peek() != Token::RParen {
            loop {
                list.push(self.parse_concat()?);
                if *self.peek() == Token::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;
        Ok(Expression::In { expr: lhs, list, negate })
    }

    fn parse_between_tail(&mut self, lhs: Box<Expression>, negate: bool) -> Result<Expression, ParseError> {
        let low = self.parse_concat()?;
        self.expect(&Token::Keyword(Keyword::And))?;
        let high = self.parse_concat()?;
        Ok(Expression::Between { expr: lhs, low: Box::new(low), high: Box::new(high), negate })
    }

    fn parse_concat(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_additive()?;
        while *self.peek() == Token::Ampersand {
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Expression::Binary { op: BinaryOp::Concat, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expression::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_int_div()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_int_div()?;
            lhs = Expression::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_int_div(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_mod()?;
        while *self.peek() == Token::Backslash {
            self.advance();
            let rhs = self.parse_mod()?;
            lhs = Expression::Binary { op: BinaryOp::IntDiv, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_mod(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_pow()?;
        while *self.peek() == Token::Keyword(Keyword::Mod) {
            self.advance();
            let rhs = self.parse_pow()?;
            lhs = Expression::Binary { op: BinaryOp::Mod, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    /// `^` is right-associative.
    fn parse_pow(&mut self) -> Result<Expression, ParseError> {
        let lhs = self.parse_unary()?;
        if *self.peek() == Token::Caret {
            self.advance();
            let rhs = self.parse_pow()?;
            return Ok(Expression::Binary { op: BinaryOp::Pow, lhs: Box::new(lhs), rhs: Box::new(rhs) });
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        match self.peek() {
            Token::Plus => {
                self.advance();
                Ok(Expression::Unary { op: UnaryOp::Plus, expr: Box::new(self.parse_unary()?) })
            }
            Token::Minus => {
                self.advance();
                Ok(Expression::Unary { op: UnaryOp::Minus, expr: Box::new(self.parse_unary()?) })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match self.advance() {
            Token::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Ok(Expression::Literal(Value::Long(n as i64)))
                } else {
                    Ok(Expression::Literal(Value::Double(n)))
                }
            }
            Token::Str(s) => Ok(Expression::Literal(Value::String(s))),
            Token::DateLiteral(dt) => Ok(Expression::Literal(Value::DateTime(dt))),
            Token::Keyword(Keyword::Null) => Ok(Expression::Literal(Value::Null)),
            Token::Keyword(Keyword::True) => Ok(Expression::Literal(Value::Bool(true))),
            Token::Keyword(Keyword::False) => Ok(Expression::Literal(Value::Bool(false))),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(Expression::Paren(Box::new(inner)))
            }
            Token::Bracketed(name) => self.parse_object_ref_tail(name),
            Token::Ident(name) => {
                if *self.peek() == Token::LParen {
                    self.advance();
                    let mut args = Vec::new();
                    if *self.peek() != Token::RParen {
                        loop {
                            args.push(self.parse_expr()?);
                            if *self.peek() == Token::Comma {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(&Token::RParen)?;
                    Ok(Expression::Call { name, args })
                } else {
                    Ok(Expression::ObjectReference(ObjectRef { collection: None, object: None, column: name }))
                }
            }
            other => Err(ParseError::UnexpectedToken(format!("{other:?}"))),
        }
    }

    /// `[A]`, `[A].[B]`, `[A].[B].[C]` — bracketed components chained by
    /// `.` build a qualified object reference.
    fn parse_object_ref_tail(&mut self, first: String) -> Result<Expression, ParseError> {
        let mut parts = vec![first];
        while *self.peek() == Token::Dot {
            self.advance();
            match self.advance() {
                Token::Bracketed(s) | Token::Ident(s) => parts.push(s),
                other => return Err(ParseError::UnexpectedToken(format!("{other:?}"))),
            }
        }
        let reference = match parts.len() {
            1 => ObjectRef { collection: None, object: None, column: parts.remove(0) },
            2 => {
                let column = parts.remove(1);
                ObjectRef { collection: None, object: Some(parts.remove(0)), column }
            }
            _ => {
                let column = parts.remove(parts.len() - 1);
                let object = parts.remove(parts.len() - 1);
                ObjectRef { collection: Some(parts.remove(0)), object: Some(object), column }
            }
        };
        Ok(Expression::ObjectReference(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_arithmetic() {
        let expr = parse(ParseKind::DefaultValue, "1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expression::Binary {
                op: BinaryOp::Add,
                lhs: Box::new(Expression::Literal(Value::Long(1))),
                rhs: Box::new(Expression::Binary {
                    op: BinaryOp::Mul,
                    lhs: Box::new(Expression::Literal(Value::Long(2))),
                    rhs: Box::new(Expression::Literal(Value::Long(3))),
                }),
            }
        );
    }

    #[test]
    fn test_pow_is_right_associative() {
        let expr = parse(ParseKind::DefaultValue, "2 ^ 3 ^ 2").unwrap();
        match expr {
            Expression::Binary { op: BinaryOp::Pow, rhs, .. } => {
                assert!(matches!(*rhs, Expression::Binary { op: BinaryOp::Pow, .. }));
            }
            other => panic!("expected right-associative pow, got {other:?}"),
        }
    }

    #[test]
    fn test_field_validator_bare_compare_synthesizes_this_column() {
        let expr = parse(ParseKind::FieldValidator, "> 0").unwrap();
        assert_eq!(
            expr,
            Expression::ImplicitCompare {
                op: CompareOp::Gt,
                rhs: Box::new(Expression::Literal(Value::Long(0))),
            }
        );
    }

    #[test]
    fn test_field_validator_bare_like_synthesizes_this_column() {
        let expr = parse(ParseKind::FieldValidator, "Like \"abc*\"").unwrap();
        match expr {
            Expression::Like { expr, .. } => assert_eq!(*expr, Expression::ThisColumn),
            other => panic!("expected Like node, got {other:?}"),
        }
    }

    #[test]
    fn test_object_reference_dotted() {
        let expr = parse(ParseKind::DefaultValue, "[Table].[Col]").unwrap();
        assert_eq!(
            expr,
            Expression::ObjectReference(ObjectRef {
                collection: None,
                object: Some("Table".to_string()),
                column: "Col".to_string(),
            })
        );
    }

    #[test]
    fn test_function_call() {
        let expr = parse(ParseKind::DefaultValue, "IIf(10>1,\"foo\",\"bar\")").unwrap();
        assert!(matches!(expr, Expression::Call { .. }));
    }
}
