//! Validation and summary of the CSV that Overpass sends back.

use std::collections::BTreeMap;
use std::fmt;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{QueryError, Result};

/// A checked Overpass CSV export. The raw text is kept untouched for the sink.
#[derive(Clone, Debug)]
pub struct CsvExport {
    raw: String,
    header: Vec<String>,
    rows: Vec<StringRecord>,
}

impl CsvExport {
    /// Parses `body` and checks it against the expected column header names.
    ///
    /// A leading `@` on header fields is ignored, since the live interpreter writes
    /// `@id`, `@type`, `@lat` and `@lon`. A completely empty body counts as zero rows.
    pub fn parse(body: &str, expected: &[&str]) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body.as_bytes());
        let mut records = reader.records();

        let Some(first) = records.next() else {
            return Ok(CsvExport {
                raw: body.to_string(),
                header: expected.iter().map(|s| s.to_string()).collect(),
                rows: Vec::new(),
            });
        };
        let first = first?;

        let header: Vec<String> = first
            .iter()
            .map(|field| field.trim().trim_start_matches('@').to_string())
            .collect();
        if header != expected {
            return Err(QueryError::UnexpectedHeader {
                expected: expected.join(","),
                found: header.join(","),
            });
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            if record.len() != header.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(QueryError::MalformedRow {
                    line,
                    expected: header.len(),
                    found: record.len(),
                });
            }
            rows.push(record);
        }

        Ok(CsvExport {
            raw: body.to_string(),
            header,
            rows,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn summary(&self) -> ExportSummary {
        let mut summary = ExportSummary {
            rows: self.rows.len(),
            ..Default::default()
        };

        let count = |index: Option<usize>, into: &mut BTreeMap<String, usize>| {
            if let Some(index) = index {
                for row in &self.rows {
                    let value = row.get(index).unwrap_or_default().trim();
                    let key = if value.is_empty() { "(none)" } else { value };
                    *into.entry(key.to_string()).or_default() += 1;
                }
            }
        };
        count(self.column("type"), &mut summary.by_type);
        count(self.column("wheelchair"), &mut summary.by_wheelchair);
        if let Some(index) = self.column("toilets:wheelchair") {
            summary.accessible_toilets = self
                .rows
                .iter()
                .filter(|row| row.get(index).map(str::trim) == Some("yes"))
                .count();
        }
        summary
    }
}

/// Row counts of an export, grouped the way the accessibility data is usually read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_wheelchair: BTreeMap<String, usize>,
    pub accessible_toilets: usize,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows: {}", self.rows)?;
        for (kind, n) in &self.by_type {
            writeln!(f, "  type {kind}: {n}")?;
        }
        for (value, n) in &self.by_wheelchair {
            writeln!(f, "  wheelchair={value}: {n}")?;
        }
        write!(f, "  toilets:wheelchair=yes: {}", self.accessible_toilets)
    }
}
