use std::io::{self, Write};

/// One CSV table of experiment output.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    pub fn new(title: impl Into<String>, header: &[&str]) -> Self {
        Self {
            title: title.into(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row of a size column followed by values printed with
    /// `precision` decimals.
    pub fn push(&mut self, n: usize, values: &[f64], precision: usize) {
        debug_assert_eq!(values.len() + 1, self.header.len());
        let mut row = Vec::with_capacity(values.len() + 1);
        row.push(n.to_string());
        row.extend(values.iter().map(|v| format!("{:.*}", precision, v)));
        self.rows.push(row);
    }

    pub fn write_csv<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "=== {} ===", self.title)?;
        writeln!(out, "{}", self.header.join(","))?;
        for row in &self.rows {
            writeln!(out, "{}", row.join(","))?;
        }
        Ok(())
    }
}
