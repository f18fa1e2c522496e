mod error;
pub use error::ReadError;

mod pedigree_reader;
pub use pedigree_reader::{PedigreeFieldWidths, PedigreeReader, RawPedRecord};

mod marker_reader;
pub use marker_reader::{MarkerFieldWidths, MarkerReader, RawMarkerRecord};

mod locus_info_reader;
pub use locus_info_reader::{read_locus_info, LocusInfoEntry};

mod pedindex_reader;
pub use pedindex_reader::{read_pedindex, PedIndexEntry};
