use crate::dispatch::Grouped;
use crate::error::QueryError;

/// Emits the type record's expression as-is; bypasses the standard-clause
/// wrapper entirely.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    grouped
        .type_row
        .expression
        .clone()
        .ok_or_else(|| QueryError::Other("data-definition query has no DDL expression".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::group;
    use crate::row::{Attribute, Row};

    #[test]
    fn test_data_definition() {
        let rows = vec![Row::new(Attribute::Type)
            .with_flag(96)
            .with_expression("CREATE TABLE Foo (Bar INTEGER)")];
        let grouped = group(&rows).unwrap();
        assert_eq!(render(&grouped).unwrap(), "CREATE TABLE Foo (Bar INTEGER)");
    }
}
