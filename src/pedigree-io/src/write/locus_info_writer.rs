use std::path::Path;
use anyhow::Result;

use super::generic_writer::GenericWriter;

/// One locus's name and its `(allele, frequency)` pairs, ready for the locus-info file.
#[derive(Debug, Clone)]
pub struct LocusInfoRecord {
    pub name: String,
    pub alleles: Vec<(String, f64)>,
}

impl LocusInfoRecord {
    fn format(&self) -> String {
        let pairs: Vec<String> = self.alleles.iter().map(|(allele, freq)| format!("{allele} {freq:.6}")).collect();
        format!("{} {}", self.name, pairs.join(" "))
    }
}

/// Write a locus-info file of the form `name (allele freq)*`, one locus per line: the same
/// format [`read_locus_info`](crate::read::read_locus_info) consumes.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_locus_info(path: &Path, records: &[LocusInfoRecord]) -> Result<()> {
    let mut writer = GenericWriter::new(Some(path))?;
    writer.write_iter(records.iter().map(LocusInfoRecord::format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_name_then_allele_frequency_pairs() {
        let rec = LocusInfoRecord { name: "D1S1".to_string(), alleles: vec![("1".to_string(), 0.3), ("2".to_string(), 0.7)] };
        assert_eq!(rec.format(), "D1S1 1 0.300000 2 0.700000");
    }
}
