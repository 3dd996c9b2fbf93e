//! Schema loading from a live database.

use bench_core::Connection;
use tracing::debug;

use crate::column::Column;
use crate::error::SchemaError;
use crate::index::Index;
use crate::information;
use crate::table::Table;
use crate::tables::Tables;

/// The full schema of the target database.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: Tables,
}

impl Schema {
    pub fn new(mut tables: Tables) -> Result<Self, SchemaError> {
        tables.traverse()?;
        Ok(Self { tables })
    }

    /// Introspect every table, its columns and its indexes, then resolve
    /// interleave relationships.
    pub async fn load(connection: &dyn Connection) -> Result<Self, SchemaError> {
        let mut tables = Tables::new();
        for row in connection.query(information::list_tables()).await? {
            tables.push(Table::from_row(&row)?);
        }

        Self::load_details(connection, &mut tables).await?;

        tables.traverse()?;
        Ok(Self { tables })
    }

    /// Introspect a single table by name.
    ///
    /// Interleave links are not resolved; the caller gets exactly one table.
    pub async fn load_table(
        connection: &dyn Connection,
        name: &str,
    ) -> Result<Self, SchemaError> {
        let mut tables = Tables::new();
        for row in connection.query(information::get_table(name)).await? {
            tables.push(Table::from_row(&row)?);
        }

        Self::load_details(connection, &mut tables).await?;
        Ok(Self { tables })
    }

    async fn load_details(
        connection: &dyn Connection,
        tables: &mut Tables,
    ) -> Result<(), SchemaError> {
        for table in tables.iter_mut() {
            debug!(table = table.name(), "loading columns and indexes");

            for row in connection
                .query(information::get_columns(table.name()))
                .await?
            {
                table.add_column(Column::from_row(&row)?);
            }
            for row in connection
                .query(information::get_indexes(table.name()))
                .await?
            {
                table.add_index(Index::from_row(&row)?);
            }
        }
        Ok(())
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}
