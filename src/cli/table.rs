use std::marker::PhantomData;

use prettytable::{cell, format, row, Row, Table};

use bgp_filters::SourceReport;

pub trait ToRow {
    fn columns() -> Row;
    fn to_row(&self) -> Row;
}

pub struct OutputTable<T: ToRow> {
    inner: Table,
    row_type: PhantomData<T>,
}

impl<T> OutputTable<T>
where
    T: ToRow,
{
    pub fn new() -> Self {
        let format = format::FormatBuilder::new()
            .padding(1, 1)
            .separator(
                format::LinePosition::Title,
                format::LineSeparator::new('-', '+', '+', '+'),
            )
            .build();
        let mut table = Table::new();
        table.set_format(format);
        table.set_titles(T::columns());
        Self {
            inner: table,
            row_type: PhantomData,
        }
    }

    pub fn add_row(&mut self, row: &T) {
        self.inner.add_row(row.to_row());
    }

    pub fn print(&self) {
        self.inner.printstd();
    }
}

pub struct SourceSummaryRow<'a>(pub &'a SourceReport);

impl ToRow for SourceSummaryRow<'_> {
    fn columns() -> Row {
        row!["Source", "Requests", "Succeeded", "Disabled", "Failed", "Merged"]
    }

    fn to_row(&self) -> Row {
        let source = self.0;
        let merged = match (&source.merged, &source.error) {
            (_, Some(error)) => error.clone(),
            (Some(path), None) => path.display().to_string(),
            (None, None) if source.planned() > 0 => format!("{} planned", source.planned()),
            (None, None) => String::from("---"),
        };
        let failed = source.failed_count().to_string();
        if source.is_clean() {
            row![
                source.name,
                source.requests.len(),
                source.succeeded(),
                source.disabled(),
                failed,
                merged
            ]
        } else {
            row![
                source.name,
                source.requests.len(),
                source.succeeded(),
                source.disabled(),
                Fr->failed,
                Fr->merged
            ]
        }
    }
}
