use strum_macros::FromRepr;

/// Kind of a single MSysQueries record, per the column the host maps the
/// raw `Attribute` byte from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum Attribute {
    Type = 1,
    Parameter = 2,
    Flag = 3,
    RemoteDatabase = 4,
    Table = 5,
    Column = 6,
    Join = 7,
    Where = 8,
    GroupBy = 9,
    Having = 10,
    OrderBy = 11,
}

impl Attribute {
    /// Attributes of which at most one record may appear in a well-formed
    /// query.
    pub fn is_singular(self) -> bool {
        matches!(
            self,
            Attribute::Type | Attribute::Flag | Attribute::RemoteDatabase | Attribute::Where | Attribute::Having
        )
    }
}

/// One row of a query's MSysQueries record set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub attribute: Option<Attribute>,
    pub expression: Option<String>,
    pub flag: Option<i16>,
    pub extra: Option<i32>,
    pub name1: Option<String>,
    pub name2: Option<String>,
    pub object_id: Option<i32>,
    pub order: Option<Vec<u8>>,
}

impl Row {
    pub fn new(attribute: Attribute) -> Self {
        Self {
            attribute: Some(attribute),
            ..Default::default()
        }
    }

    pub fn with_expression(mut self, expr: impl Into<String>) -> Self {
        self.expression = Some(expr.into());
        self
    }

    pub fn with_flag(mut self, flag: i16) -> Self {
        self.flag = Some(flag);
        self
    }

    pub fn with_extra(mut self, extra: i32) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn with_name1(mut self, name: impl Into<String>) -> Self {
        self.name1 = Some(name.into());
        self
    }

    pub fn with_name2(mut self, name: impl Into<String>) -> Self {
        self.name2 = Some(name.into());
        self
    }

    /// The row's opaque display-ordering sort key, if the host supplied one.
    /// No ordering logic is implemented against it; it is surfaced purely
    /// so callers that need to match Access's own record order can do so.
    pub fn order_key(&self) -> Option<&[u8]> {
        self.order.as_deref()
    }
}
