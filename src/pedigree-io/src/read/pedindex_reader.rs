use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::Result;
use located_error::LocatedError;

use super::error::ReadError;

/// One canonically-indexed row, as read back from a previously-written `pedindex.out`.
#[derive(Debug, Clone)]
pub struct PedIndexEntry {
    pub ibdid: usize,
    pub fa_ibdid: usize,
    pub mo_ibdid: usize,
    pub sex: char,
    pub twin: usize,
    pub ped_id: usize,
    pub gen: usize,
    pub original_id: String,
}

/// Reads a `pedindex.out` file (tab-separated, as produced by `write_pedindex_out`) back into
/// structured rows.
///
/// # Errors
/// Returns an error if the file cannot be opened, a line fails to parse, or a line doesn't carry
/// exactly 8 tab-separated fields.
pub fn read_pedindex(path: impl AsRef<Path>) -> Result<Vec<PedIndexEntry>> {
    let file = File::open(path.as_ref()).map_err(ReadError::Open).loc("While opening pedindex.out")?;
    let mut entries = Vec::new();

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| ReadError::Line(line_no + 1, e)).loc("While reading pedindex.out")?;
        if line.trim().is_empty() {
            continue
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 8 {
            return Err(ReadError::RecordLength { line: line_no + 1, expected: 8, found: fields.len() })
                .loc("While splitting a pedindex.out row")
        }
        let parse_usize = |s: &str| s.trim().parse::<usize>().map_err(|_| ReadError::MalformedLocusInfo(line_no + 1));
        entries.push(PedIndexEntry {
            ibdid: parse_usize(fields[0])?,
            fa_ibdid: parse_usize(fields[1])?,
            mo_ibdid: parse_usize(fields[2])?,
            sex: fields[3].trim().chars().next().unwrap_or('U'),
            twin: parse_usize(fields[4])?,
            ped_id: parse_usize(fields[5])?,
            gen: parse_usize(fields[6])?,
            original_id: fields[7].trim().to_string(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_back_a_written_row() -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new()?;
        writeln!(tmp, "1\t0\t0\tM\t0\t1\t0\tF1")?;
        let entries = read_pedindex(tmp.path())?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original_id, "F1");
        assert_eq!(entries[0].sex, 'M');
        Ok(())
    }

    #[test]
    fn rejects_malformed_row() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "too\tfew\tfields\n").unwrap();
        assert!(read_pedindex(tmp.path()).is_err());
    }
}
