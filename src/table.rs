//! An in-memory table of text cells, as read from a CSV extract.

use crate::{PipelineError, Result, Stage};

/// A single value in a [Table]. Empty CSV fields are represented as `None`.
pub type Cell = Option<String>;

/// An ordered set of named columns, stored row by row. Every row has exactly one cell per column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// The reader configuration used for every extract: header row, trimmed fields, and records
    /// allowed to be shorter than the header.
    pub fn configured_csv_reader_builder() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.has_headers(true).trim(csv::Trim::All).flexible(true);
        builder
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, padding it with empty cells up to the table width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        debug_assert!(row.len() <= self.width());
        row.resize(self.width(), None);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Look up a column that `stage` cannot do without.
    pub fn require_column(&self, name: &str, stage: Stage) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_owned(),
                stage,
            })
    }

    /// Remove a column, returning whether it was present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(index);
        for row in self.rows.iter_mut() {
            row.remove(index);
        }
        true
    }

    /// Replace every cell of a column with the result of `f`.
    pub fn map_column<F>(&mut self, index: usize, mut f: F)
    where
        F: FnMut(Cell) -> Cell,
    {
        for row in self.rows.iter_mut() {
            row[index] = f(row[index].take());
        }
    }

    /// Overwrite the column called `name` with `values`, appending it if it does not exist yet.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.len());
        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.columns.push(name.to_owned());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Serialize a [Table] to CSV, absent cells as empty fields.
    pub fn dump_csv<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
        writer.write_record(&self.columns)?;
        for row in self.rows.iter() {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))?;
        }
        Ok(())
    }
}

/// Convert a raw CSV field to a [Cell].
pub fn cell_from_field(field: &str) -> Cell {
    if field.is_empty() {
        None
    } else {
        Some(field.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use expect_test::{expect, Expect};

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|field| cell_from_field(field)).collect());
        }
        table
    }

    fn check_table(table: &Table, expect: Expect) {
        let mut writer = csv::Writer::from_writer(vec![]);
        table.dump_csv(&mut writer).unwrap();
        let actual = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        expect.assert_eq(&actual);
    }

    #[test]
    fn short_rows_are_padded() {
        let table = table(&["a", "b", "c"], &[&["1"], &["1", "2", "3"]]);
        assert_eq!(table.rows()[0], vec![Some("1".to_owned()), None, None]);
        check_table(
            &table,
            expect![[r#"
                a,b,c
                1,,
                1,2,3
            "#]],
        );
    }

    #[test]
    fn drop_existing_column() {
        let mut table = table(&["a", "b", "c"], &[&["1", "2", "3"]]);
        assert!(table.drop_column("b"));
        assert!(!table.drop_column("b"));
        check_table(
            &table,
            expect![[r#"
                a,c
                1,3
            "#]],
        );
    }

    #[test]
    fn require_missing_column() {
        let table = table(&["a"], &[]);
        let error = table.require_column("b", Stage::Merge).unwrap_err();
        assert_eq!(error.to_string(), "missing column 'b' during merging");
    }

    #[test]
    fn map_and_set_columns() {
        let mut table = table(&["a", "b"], &[&["1", ""], &["2", "x"]]);
        table.map_column(1, |cell| cell.or_else(|| Some("-".to_owned())));
        table.set_column("a", vec![Some("10".to_owned()), None]);
        table.set_column("c", vec![Some("y".to_owned()), Some("z".to_owned())]);
        check_table(
            &table,
            expect![[r#"
                a,b,c
                10,-,y
                ,x,z
            "#]],
        );
    }
}
