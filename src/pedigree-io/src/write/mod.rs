mod generic_writer;
pub use generic_writer::{GenericWriter, WriterError, WRITER_SEPARATOR};

mod pedindex_writer;
pub use pedindex_writer::{write_pedindex_cde, write_pedindex_out, PedIndexRecord};

mod phi2_writer;
pub use phi2_writer::{write_phi2, Phi2Record};

mod info_writer;
pub use info_writer::append_summary_line;

mod sink_writer;
pub use sink_writer::flush_sink;

mod locus_info_writer;
pub use locus_info_writer::{write_locus_info, LocusInfoRecord};
