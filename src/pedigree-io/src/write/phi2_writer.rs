use std::path::Path;
use anyhow::Result;

use super::generic_writer::GenericWriter;

/// One non-zero kinship pair, ready for the `phi2` file.
#[derive(Debug, Clone, Copy)]
pub struct Phi2Record {
    pub i: usize,
    pub j: usize,
    pub phi: f64,
    pub delta7: f64,
}

impl Phi2Record {
    fn format(self) -> String {
        format!("{:>8} {:>8} {:>10.7} {:>10.7}", self.i, self.j, self.phi, self.delta7)
    }
}

/// Write the plain-text `phi2` kinship record stream (gzip compression is an external,
/// out-of-scope step applied downstream).
///
/// Fields are single-space separated (`%8d %8d %10.7f %10.7f`), matching the external format the
/// original `ibdprep` tool produces; this bypasses [`GenericWriter`]'s `" - "` pretty-print
/// convention, which would otherwise collapse these fields' legitimate spaces into tabs.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_phi2(path: &Path, records: &[Phi2Record]) -> Result<()> {
    let mut writer = GenericWriter::new(Some(path))?;
    writer.write_iter(records.iter().map(|r| r.format()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_seven_decimal_places() {
        let rec = Phi2Record{i: 3, j: 1, phi: 0.5, delta7: 0.25};
        let expected = format!("{:>8} {:>8} {:>10.7} {:>10.7}", 3, 1, 0.5_f64, 0.25_f64);
        assert_eq!(rec.format(), expected);
        assert!(rec.format().contains("0.5000000"));
    }

    #[test]
    fn separates_fields_with_single_spaces_not_dashes() {
        let rec = Phi2Record{i: 3, j: 1, phi: 0.5, delta7: 0.25};
        assert!(!rec.format().contains(" - "));
    }
}
