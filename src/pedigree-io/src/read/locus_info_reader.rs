use std::{fs::File, io::{BufRead, BufReader}, path::Path};

use anyhow::Result;
use located_error::LocatedError;

use super::error::ReadError;

/// One pre-loaded locus: its name and `(allele, frequency)` pairs, in file order.
#[derive(Debug, Clone)]
pub struct LocusInfoEntry {
    pub name: String,
    pub alleles: Vec<(String, f64)>,
}

/// Parses a locus-info file of the form `name (allele freq)*`, one locus per line.
///
/// # Errors
/// Returns an error if the file cannot be opened, or if a line has an odd number of
/// allele/frequency tokens after the locus name.
pub fn read_locus_info(path: impl AsRef<Path>) -> Result<Vec<LocusInfoEntry>> {
    let file = File::open(path.as_ref()).map_err(ReadError::Open).loc("While opening locus-info file")?;
    let mut entries = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| ReadError::Line(line_no, e)).loc("While reading locus-info file")?;
        if line.trim().is_empty() {
            continue
        }
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default().to_string();
        let rest: Vec<&str> = tokens.collect();
        if rest.len() % 2 != 0 {
            return Err(ReadError::MalformedLocusInfo(line_no)).loc("While parsing locus-info file")
        }
        let mut alleles = Vec::with_capacity(rest.len() / 2);
        for pair in rest.chunks_exact(2) {
            let allele = pair[0].to_string();
            let freq: f64 = pair[1].parse().map_err(|_| ReadError::MalformedLocusInfo(line_no)).loc("While parsing allele frequency")?;
            alleles.push((allele, freq));
        }
        entries.push(LocusInfoEntry{name, alleles});
    }
    Ok(entries)
}
