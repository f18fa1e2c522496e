use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::Result;
use located_error::LocatedError;

use super::error::ReadError;

/// Column widths for a fixed-width raw pedigree record.
///
/// Field order on each line is: `[famid] id father mother sex [twin] [hhid]`. A width of zero
/// disables the optional `famid`/`twin`/`hhid` fields.
#[derive(Debug, Clone, Copy)]
pub struct PedigreeFieldWidths {
    pub famid_len: usize,
    pub id_len: usize,
    pub sex_len: usize,
    pub twin_len: usize,
    pub hhid_len: usize,
}

impl PedigreeFieldWidths {
    /// Total record length implied by these widths (famid + 3*id + sex + twin + hhid).
    #[must_use]
    pub fn record_len(&self) -> usize {
        self.famid_len + 3 * self.id_len + self.sex_len + self.twin_len + self.hhid_len
    }
}

/// A single un-interpreted raw pedigree line, split according to [`PedigreeFieldWidths`].
///
/// Fields are returned verbatim (not trimmed): deciding what counts as "blank" is a pedigree
/// semantics concern, not an I/O concern.
#[derive(Debug, Clone)]
pub struct RawPedRecord {
    pub line_no: usize,
    pub famid: Option<String>,
    pub id: String,
    pub father: String,
    pub mother: String,
    pub sex: String,
    pub twin: Option<String>,
    pub hhid: Option<String>,
}

/// Reads a fixed-width pedigree file line by line.
pub struct PedigreeReader {
    lines: std::io::Lines<BufReader<File>>,
    widths: PedigreeFieldWidths,
    line_no: usize,
}

impl PedigreeReader {
    /// Open `path` for fixed-width reading with the given `widths`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>, widths: PedigreeFieldWidths) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(ReadError::Open).loc("While opening pedigree file")?;
        Ok(Self { lines: BufReader::new(file).lines(), widths, line_no: 0 })
    }

    fn split_record(&self, line_no: usize, line: &str) -> Result<RawPedRecord> {
        let expected = self.widths.record_len();
        if line.len() != expected {
            return Err(ReadError::RecordLength{line: line_no, expected, found: line.len()}).loc("While splitting fixed-width pedigree record")
        }
        let mut cursor = 0usize;
        let mut take = |width: usize| -> String {
            let field = line[cursor..cursor + width].to_string();
            cursor += width;
            field
        };

        let famid = (self.widths.famid_len > 0).then(|| take(self.widths.famid_len));
        let id = take(self.widths.id_len);
        let father = take(self.widths.id_len);
        let mother = take(self.widths.id_len);
        let sex = take(self.widths.sex_len);
        let twin = (self.widths.twin_len > 0).then(|| take(self.widths.twin_len));
        let hhid = (self.widths.hhid_len > 0).then(|| take(self.widths.hhid_len));

        Ok(RawPedRecord{line_no, famid, id, father, mother, sex, twin, hhid})
    }
}

impl Iterator for PedigreeReader {
    type Item = Result<RawPedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw_line = self.lines.next()?;
            self.line_no += 1;
            let line = match raw_line.map_err(|e| ReadError::Line(self.line_no, e)) {
                Ok(line) => line,
                Err(e) => return Some(Err(e).loc("While reading pedigree file")),
            };
            if line.trim().is_empty() {
                continue
            }
            return Some(self.split_record(self.line_no, &line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn widths() -> PedigreeFieldWidths {
        PedigreeFieldWidths{famid_len: 0, id_len: 5, sex_len: 1, twin_len: 1, hhid_len: 0}
    }

    fn record_line(id: &str, father: &str, mother: &str, sex: &str, twin: &str) -> String {
        format!("{:<5}{:<5}{:<5}{:<1}{:<1}", id, father, mother, sex, twin)
    }

    #[test]
    fn splits_well_formed_record() -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new()?;
        let line = record_line("0001", "0000", "0000", "1", " ");
        assert_eq!(line.len(), widths().record_len());
        writeln!(tmp, "{line}")?;
        let records: Vec<_> = PedigreeReader::new(tmp.path(), widths())?.collect::<Result<_>>()?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "0001 ");
        assert_eq!(records[0].father, "0000 ");
        assert_eq!(records[0].sex, "1");
        Ok(())
    }

    #[test]
    fn rejects_mismatched_record_length() -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new()?;
        writeln!(tmp, "too short")?;
        let err = PedigreeReader::new(tmp.path(), widths())?.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("record length") || format!("{err:?}").contains("RecordLength"));
        Ok(())
    }

    #[test]
    fn skips_blank_lines() -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new()?;
        writeln!(tmp, "{}", record_line("0001", "0000", "0000", "1", " "))?;
        writeln!(tmp)?;
        writeln!(tmp, "{}", record_line("0002", "0000", "0000", "2", " "))?;
        let records: Vec<_> = PedigreeReader::new(tmp.path(), widths())?.collect::<Result<_>>()?;
        assert_eq!(records.len(), 2);
        Ok(())
    }
}
