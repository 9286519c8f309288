use crate::quoting::quote_identifier;
use crate::row::Row;

/// Access's fixed parameter data-type codes, as carried in a parameter
/// record's `flag` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bit,
    Byte,
    Short,
    Long,
    Currency,
    IeeeSingle,
    IeeeDouble,
    DateTime,
    Binary,
    Text,
    LongBinary,
    Guid,
    /// Unknown/unrecognized type code.
    Value,
}

impl ParamType {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => ParamType::Bit,
            2 => ParamType::Byte,
            3 => ParamType::Short,
            4 => ParamType::Long,
            5 => ParamType::Currency,
            6 => ParamType::IeeeSingle,
            7 => ParamType::IeeeDouble,
            8 => ParamType::DateTime,
            9 => ParamType::Binary,
            10 => ParamType::Text,
            11 => ParamType::LongBinary,
            15 => ParamType::Guid,
            _ => ParamType::Value,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamType::Bit => "Bit",
            ParamType::Byte => "Byte",
            ParamType::Short => "Short",
            ParamType::Long => "Long",
            ParamType::Currency => "Currency",
            ParamType::IeeeSingle => "IEEESingle",
            ParamType::IeeeDouble => "IEEEDouble",
            ParamType::DateTime => "DateTime",
            ParamType::Binary => "Binary",
            ParamType::Text => "Text",
            ParamType::LongBinary => "LongBinary",
            ParamType::Guid => "Guid",
            ParamType::Value => "Value",
        }
    }
}

/// Render one `PARAMETERS` clause entry: `<name> <typeName>`, with
/// `(<length>)` appended for TEXT parameters that carry a positive length.
pub fn format_parameter(row: &Row) -> String {
    let name = row.name1.as_deref().unwrap_or_default();
    let ptype = ParamType::from_code(row.flag.unwrap_or(0));
    let mut label = ptype.label().to_string();
    if ptype == ParamType::Text {
        if let Some(extra) = row.extra {
            if extra > 0 {
                label = format!("{label}({extra})");
            }
        }
    }
    format!("{} {}", quote_identifier(name), label)
}
