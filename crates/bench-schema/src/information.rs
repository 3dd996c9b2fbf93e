//! Parameterized statements against the information-schema views.
//!
//! The SQL strings here are part of the tool's compatibility surface and
//! are kept stable; everything else the engine sends is built through the
//! statement builders on [`crate::Table`].

use bench_core::{Statement, Value};

const LIST_TABLES_SQL: &str = "SELECT TABLE_CATALOG, TABLE_SCHEMA, TABLE_NAME, \
TABLE_TYPE, PARENT_TABLE_NAME, ON_DELETE_ACTION, SPANNER_STATE \
FROM information_schema.tables \
WHERE table_catalog = \"\" AND table_schema = \"\" \
ORDER BY table_catalog, table_schema, table_name";

const GET_TABLE_SQL: &str = "SELECT TABLE_CATALOG, TABLE_SCHEMA, TABLE_NAME, \
TABLE_TYPE, PARENT_TABLE_NAME, ON_DELETE_ACTION, SPANNER_STATE \
FROM information_schema.tables \
WHERE table_schema = \"\" AND table_name = @table_name";

const GET_COLUMNS_SQL: &str = r#"
SELECT
  c.COLUMN_NAME,
  c.ORDINAL_POSITION,
  c.IS_NULLABLE,
  c.SPANNER_TYPE,
  c.SPANNER_STATE,
  EXISTS (
  SELECT
    1
  FROM
    INFORMATION_SCHEMA.INDEX_COLUMNS ic
  WHERE
    ic.TABLE_SCHEMA = ""
    AND ic.TABLE_NAME = c.TABLE_NAME
    AND ic.COLUMN_NAME = c.COLUMN_NAME
    AND ic.INDEX_NAME = "PRIMARY_KEY" ) IS_PRIMARY_KEY,
  IS_GENERATED = "ALWAYS" AS IS_GENERATED,
  EXISTS (
    SELECT
        1
    FROM
         INFORMATION_SCHEMA.COLUMN_OPTIONS co
    WHERE
        co.TABLE_SCHEMA = ""
        AND co.TABLE_NAME = c.TABLE_NAME
        AND co.COLUMN_NAME = c.COLUMN_NAME
        AND co.OPTION_NAME = "allow_commit_timestamp"
        AND co.OPTION_VALUE = "TRUE"
  ) ALLOW_COMMIT_TIMESTAMP
FROM
  INFORMATION_SCHEMA.COLUMNS c
WHERE
  c.TABLE_SCHEMA = ""
  AND c.TABLE_NAME = @table_name
ORDER BY
  c.ORDINAL_POSITION
"#;

const GET_INDEXES_SQL: &str = "SELECT \
INDEX_NAME, IS_UNIQUE, IS_NULL_FILTERED, INDEX_STATE \
FROM INFORMATION_SCHEMA.INDEXES \
WHERE TABLE_SCHEMA = \"\" \
AND INDEX_NAME != \"PRIMARY_KEY\" \
AND TABLE_NAME = @table_name \
AND SPANNER_IS_MANAGED = FALSE ";

/// All tables, ordered by name.
pub fn list_tables() -> Statement {
    Statement::new(LIST_TABLES_SQL)
}

/// One table by name.
pub fn get_table(table: &str) -> Statement {
    let mut stmt = Statement::new(GET_TABLE_SQL);
    stmt.add_param("table_name", Value::String(table.to_string()));
    stmt
}

/// Columns of one table, ordered by ordinal position. Primary-key and
/// commit-timestamp flags are derived from the index-columns and
/// column-options views.
pub fn get_columns(table: &str) -> Statement {
    let mut stmt = Statement::new(GET_COLUMNS_SQL);
    stmt.add_param("table_name", Value::String(table.to_string()));
    stmt
}

/// Secondary indexes of one table, excluding the primary-key pseudo-index
/// and database-managed indexes.
pub fn get_indexes(table: &str) -> Statement {
    let mut stmt = Statement::new(GET_INDEXES_SQL);
    stmt.add_param("table_name", Value::String(table.to_string()));
    stmt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_carry_the_table_parameter() {
        for stmt in [get_table("T"), get_columns("T"), get_indexes("T")] {
            assert_eq!(
                stmt.params.get("table_name"),
                Some(&Value::String("T".to_string()))
            );
        }
        assert!(list_tables().params.is_empty());
    }

    #[test]
    fn queries_target_the_expected_views() {
        assert!(list_tables().sql.contains("information_schema.tables"));
        assert!(get_columns("T").sql.contains("INFORMATION_SCHEMA.COLUMNS"));
        assert!(get_columns("T").sql.contains("ALLOW_COMMIT_TIMESTAMP"));
        assert!(get_indexes("T").sql.contains("SPANNER_IS_MANAGED = FALSE"));
    }
}
