use crate::dispatch::Grouped;
use crate::error::QueryError;

use super::select::render_with_verb;

/// SELECT-body with the leading `SELECT DISTINCTROW` replaced by `DELETE`
///.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    render_with_verb(grouped, "DELETE", None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::group;
    use crate::row::{Attribute, Row};

    #[test]
    fn test_delete_with_where() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(32),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Where).with_expression("[a] > 1"),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(render(&grouped).unwrap(), "DELETE FROM T WHERE [a] > 1");
    }
}
