use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to open file: {0}")]
    Open(#[source] std::io::Error),

    #[error("I/O error while reading line {0}: {1}")]
    Line(usize, #[source] std::io::Error),

    #[error("line {line}: record length {found} does not match the configured field widths (expected {expected})")]
    RecordLength{line: usize, expected: usize, found: usize},

    #[error("line {0}: locus-info entry has an odd number of allele/frequency tokens")]
    MalformedLocusInfo(usize),
}
