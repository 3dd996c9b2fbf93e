//! Table collection and interleave traversal.

use crate::error::SchemaError;
use crate::table::Table;

/// An arena of tables with name-resolved interleave links.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    tables: Vec<Table>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.tables.iter_mut()
    }

    /// First table with the given name.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name() == name)
    }

    /// Resolve parent names into links, wiring both directions.
    ///
    /// Fails when a parent name references a table absent from the
    /// collection, or when the parent chain loops.
    pub fn traverse(&mut self) -> Result<(), SchemaError> {
        for child_idx in 0..self.tables.len() {
            let Some(parent_name) = self.tables[child_idx].parent_name().map(str::to_string)
            else {
                continue;
            };

            let parent_idx =
                self.index_of(&parent_name)
                    .ok_or_else(|| SchemaError::UnknownParent {
                        table: self.tables[child_idx].name().to_string(),
                        parent: parent_name.clone(),
                    })?;

            let child_name = self.tables[child_idx].name().to_string();
            self.tables[child_idx].parent = Some(parent_idx);
            self.tables[parent_idx].child = Some(child_idx);
            self.tables[parent_idx].set_child_name(&child_name);
        }

        // A parent chain longer than the table count can only be a loop.
        for table in &self.tables {
            let mut steps = 0;
            let mut cursor = table.parent;
            while let Some(idx) = cursor {
                steps += 1;
                if steps > self.tables.len() {
                    return Err(SchemaError::Cycle(table.name().to_string()));
                }
                cursor = self.tables[idx].parent;
            }
        }

        Ok(())
    }

    /// Walk the parent chain to the top. Returns `None` for tables that are
    /// not interleaved at all.
    pub fn apex_of(&self, table: &Table) -> Option<&Table> {
        if !table.is_interleaved() {
            return None;
        }
        let mut current = table;
        while let Some(idx) = current.parent {
            current = &self.tables[idx];
        }
        self.get(current.name())
    }

    /// Names along the apex-to-bottom chain that contains `table`.
    pub fn relation_chain(&self, table: &Table) -> Vec<String> {
        let Some(apex) = self.apex_of(table) else {
            return vec![table.name().to_string()];
        };

        let mut names = vec![apex.name().to_string()];
        let mut cursor = apex.child;
        while let Some(idx) = cursor {
            names.push(self.tables[idx].name().to_string());
            cursor = self.tables[idx].child;
        }
        names
    }
}

impl<'a> IntoIterator for &'a Tables {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
