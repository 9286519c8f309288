use std::sync::Arc;

use fancy_regex::Regex;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Xor,
    Eqv,
    Imp,
}

/// A qualified `[Collection].[Object].[Column]` reference. `collection`
/// and `object` are absent for a bare `[Column]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub collection: Option<String>,
    pub object: Option<String>,
    pub column: String,
}

/// A compiled `Like` pattern: the original text plus the regular
/// expression derived from it.
#[derive(Debug, Clone)]
pub struct LikePattern {
    pub source: String,
    pub regex: Arc<Regex>,
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// AST node variants. Every node is evaluated via
/// `crate::eval::eval`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Value),
    ObjectReference(ObjectRef),
    ThisColumn,
    Unary {
        op: UnaryOp,
        expr: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Compare {
        op: CompareOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Logical {
        op: LogicalOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    NullTest {
        expr: Box<Expression>,
        negate: bool,
    },
    In {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negate: bool,
    },
    Between {
        expr: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
        negate: bool,
    },
    Like {
        expr: Box<Expression>,
        pattern: LikePattern,
        negate: bool,
    },
    Call {
        name: String,
        args: Vec<Expression>,
    },
    Paren(Box<Expression>),
    /// Synthesized when a `FIELD_VALIDATOR`/`RECORD_VALIDATOR` parse is a
    /// bare compare RHS; the left operand is implicitly "this column"
    ///.
    ImplicitCompare {
        op: CompareOp,
        rhs: Box<Expression>,
    },
}

impl Expression {
    pub fn to_debug_string(&self) -> String {
        format!("{self:?}")
    }
}
