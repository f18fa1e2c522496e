use std::path::Path;
use anyhow::Result;

use super::generic_writer::GenericWriter;

/// One canonically-indexed row destined for `pedindex.out`.
#[derive(Debug, Clone)]
pub struct PedIndexRecord {
    pub ibdid: usize,
    pub fa_ibdid: usize,
    pub mo_ibdid: usize,
    pub sex: char,
    pub twin: usize,
    pub ped_id: usize,
    pub gen: usize,
    pub original_id: String,
}

impl PedIndexRecord {
    fn format(&self, twin_width: usize) -> String {
        format!(
            "{:>8} {:>8} {:>8} {} {:0twin_width$} {:>8} {:>8} {}",
            self.ibdid, self.fa_ibdid, self.mo_ibdid, self.sex, self.twin, self.ped_id, self.gen, self.original_id,
            twin_width = twin_width,
        )
    }
}

/// Write `pedindex.out`: one canonical-order line per individual.
///
/// `twin_width` is 3 when the pedigree set has at most 999 twin groups, 5 otherwise (per
/// `pedindex.cde`). Fields are single-space separated, matching the external format the original
/// `ibdprep` tool produces; this bypasses [`GenericWriter`]'s `" - "` pretty-print convention,
/// which would otherwise collapse these fields' legitimate spaces into tabs.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_pedindex_out(path: &Path, records: &[PedIndexRecord], twin_width: usize) -> Result<()> {
    let mut writer = GenericWriter::new(Some(path))?;
    writer.write_iter(records.iter().map(|r| r.format(twin_width)))
}

/// Write the `pedindex.cde` field descriptor for `pedindex.out`.
///
/// Unlike `pedindex.out` itself, this descriptor is prose, not a fixed external record format, so
/// it keeps the `" - "` pretty-print convention `GenericWriter` strips to a tab.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_pedindex_cde(path: &Path, twin_width: usize) -> Result<()> {
    let mut writer = GenericWriter::new(Some(path))?;
    writer.write_iter([
        "ibdid - Sequential index of this individual".to_string(),
        "fa_ibdid - Sequential index of the father (0 if founder)".to_string(),
        "mo_ibdid - Sequential index of the mother (0 if founder)".to_string(),
        "sex - M/F/U".to_string(),
        format!("mztwin - {twin_width}-digit monozygotic twin-group index (0 if untwinned)"),
        "pedigree - Index of the connected pedigree this individual belongs to".to_string(),
        "generation - Topological generation depth within its pedigree".to_string(),
        "id - Original (input) individual identifier".to_string(),
    ])
}
