use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::Result;
use located_error::LocatedError;

use super::error::ReadError;

/// Column widths for a fixed-width marker-data record.
#[derive(Debug, Clone, Copy)]
pub struct MarkerFieldWidths {
    pub famid_len: usize,
    pub id_len: usize,
    pub gtype_len: usize,
    pub loci: usize,
}

impl MarkerFieldWidths {
    #[must_use]
    pub fn record_len(&self) -> usize {
        self.famid_len + self.id_len + self.loci * self.gtype_len
    }
}

/// A single un-interpreted marker-data line.
#[derive(Debug, Clone)]
pub struct RawMarkerRecord {
    pub line_no: usize,
    pub famid: Option<String>,
    pub id: String,
    pub genotypes: Vec<String>,
}

pub struct MarkerReader {
    lines: std::io::Lines<BufReader<File>>,
    widths: MarkerFieldWidths,
    line_no: usize,
}

impl MarkerReader {
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>, widths: MarkerFieldWidths) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(ReadError::Open).loc("While opening marker file")?;
        Ok(Self { lines: BufReader::new(file).lines(), widths, line_no: 0 })
    }

    fn split_record(&self, line_no: usize, line: &str) -> Result<RawMarkerRecord> {
        let expected = self.widths.record_len();
        if line.len() != expected {
            return Err(ReadError::RecordLength{line: line_no, expected, found: line.len()}).loc("While splitting fixed-width marker record")
        }
        let mut cursor = 0usize;
        let mut take = |width: usize| -> String {
            let field = line[cursor..cursor + width].to_string();
            cursor += width;
            field
        };

        let famid = (self.widths.famid_len > 0).then(|| take(self.widths.famid_len));
        let id = take(self.widths.id_len);
        let genotypes = (0..self.widths.loci).map(|_| take(self.widths.gtype_len)).collect();

        Ok(RawMarkerRecord{line_no, famid, id, genotypes})
    }
}

impl Iterator for MarkerReader {
    type Item = Result<RawMarkerRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw_line = self.lines.next()?;
            self.line_no += 1;
            let line = match raw_line.map_err(|e| ReadError::Line(self.line_no, e)) {
                Ok(line) => line,
                Err(e) => return Some(Err(e).loc("While reading marker file")),
            };
            if line.trim().is_empty() {
                continue
            }
            return Some(self.split_record(self.line_no, &line))
        }
    }
}
