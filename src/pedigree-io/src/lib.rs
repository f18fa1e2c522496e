//! Fixed-width file I/O for the pedigree engine: raw record readers, the optional locus-info
//! reader, and the writers for every persisted output (`pedindex.out`, `pedindex.cde`, `phi2`,
//! the run summaries, and the error/warning log sinks).

pub mod parse;
pub mod read;
pub mod write;
