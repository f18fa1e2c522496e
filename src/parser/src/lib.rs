use std::{
    ffi::OsStr,
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
};

use located_error::*;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use log::debug;
use anyhow::Result;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="pedigree-rs", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// pedigree-rs: reconstruct pedigrees and compute kinship from raw records
pub struct Cli {
    /// Set the verbosity level (-v -vv -vvv)
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use --quiet/-q to disable them.
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emitted and redirected to the console, even when verbose mode
    /// is off. Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli {
    /// Serialize command line arguments to a `.yaml` file, for reproducibility.
    ///
    /// File naming follows the convention `{current time}-{subcommand}.yaml`, written at the
    /// root of the user-provided output directory.
    ///
    /// # Errors
    /// Returns a [`ParserError::Serialize`] if `serde_yaml` fails to render `Self`, or if the
    /// resulting file cannot be written.
    pub fn serialize(&self) -> Result<()> {
        let serialized = serde_yaml::to_string(self)
            .map_err(|err| ParserError::Serialize(err.to_string()))?;

        debug!("\n---- Command line args ----\n{serialized}\n---");

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let (output_dir, label) = match &self.commands {
            Commands::Index(args)   => (&args.output_dir, "index"),
            Commands::Markers(args) => (&args.output_dir, "markers"),
            Commands::FromYaml { .. } => return Ok(()),
        };
        let output_file = output_dir.join(format!("{current_time}-{label}.yaml"));
        std::fs::write(&output_file, serialized)
            .map_err(|e| ParserError::Serialize(format!("{}: {e}", output_file.display())))?;
        Ok(())
    }

    /// Deserialize a previously-serialized `.yaml` file back into a [`Cli`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or does not deserialize into `Self`.
    pub fn deserialize(yaml: PathBuf) -> Result<Self> {
        let file = std::fs::File::open(&yaml).loc("While opening configuration file")?;
        serde_yaml::from_reader(file).loc("While deserializing configuration file")
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    /// Ingest a raw fixed-width pedigree file: validate, link, partition, assign generations,
    /// detect loops, canonically index, and compute the kinship (phi2) matrix.
    Index(IndexArgs),

    /// Ingest a marker-data file against an already-indexed pedigree (`pedindex.out`).
    Markers(MarkerArgs),

    /// Re-run a previous invocation using its serialized `.yaml` configuration file.
    FromYaml {
        yaml: PathBuf,
    },
}

#[derive(Parser, Debug, Serialize, Deserialize)]
pub struct IndexArgs {
    /// Path to the fixed-width pedigree definition file.
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub ped: PathBuf,

    /// Width, in characters, of the individual/father/mother ID fields.
    #[clap(long, default_value("5"))]
    pub id_len: usize,

    /// Width, in characters, of the sex field.
    #[clap(long, default_value("1"))]
    pub sex_len: usize,

    /// Width, in characters, of the twin-group field.
    #[clap(long, default_value("1"))]
    pub twin_len: usize,

    /// Width, in characters, of the household-id field. 0 disables the field.
    #[clap(long, default_value("0"))]
    pub hhid_len: usize,

    /// Width, in characters, of an optional leading family-id field. 0 disables the field.
    #[clap(long, default_value("0"))]
    pub famid_len: usize,

    /// Output directory where `pedindex.out`, `pedindex.cde`, `phi2`, `pedigree.info`,
    /// `ibdprep.err` and `ibdprep.wrn` will be written.
    #[clap(short, long, default_value("pedigree-output"), parse(try_from_os_str=valid_output_dir))]
    pub output_dir: PathBuf,

    /// Overwrite existing output files.
    #[clap(short='w', long)]
    pub overwrite: bool,
}

#[derive(Parser, Debug, Serialize, Deserialize)]
pub struct MarkerArgs {
    /// Path to the already-produced `pedindex.out` file describing the canonical pedigree.
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub pedindex: PathBuf,

    /// Path to the fixed-width marker-data file.
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub markers: PathBuf,

    /// Width, in characters, of the ID field within the marker file.
    #[clap(long, default_value("5"))]
    pub id_len: usize,

    /// Width, in characters, of a single genotype field.
    #[clap(long, default_value("4"))]
    pub gtype_len: usize,

    /// Number of loci (genotype fields) present in the marker file.
    #[clap(long)]
    pub loci: usize,

    /// Treat every locus as X-linked (hemizygous males).
    #[clap(long)]
    pub x_linked: bool,

    /// Optional pre-computed locus-info file (`name (allele freq)*` per line).
    /// When omitted, allele frequencies are estimated from the observed genotypes.
    #[clap(long, required(false), parse(try_from_os_str=valid_input_file))]
    pub locus_info: Option<PathBuf>,

    /// Width, in characters, of an optional leading family-id field within the marker file.
    /// 0 disables the field.
    #[clap(long, default_value("0"))]
    pub famid_len: usize,

    /// Output directory where `marker.info`, the generated locus-info file, `ibdprep.err`
    /// and `ibdprep.wrn` will be written.
    #[clap(short, long, default_value("pedigree-output"), parse(try_from_os_str=valid_output_dir))]
    pub output_dir: PathBuf,

    /// Overwrite existing output files.
    #[clap(short='w', long)]
    pub overwrite: bool,
}

impl IndexArgs {
    /// Sanity-check that configured field widths can form a non-empty record.
    ///
    /// # Errors
    /// Returns [`ParserError::ZeroRecordLength`] if every field width is zero.
    pub fn check_widths(&self) -> Result<(), ParserError> {
        if self.id_len == 0 {
            return Err(ParserError::ZeroRecordLength)
        }
        Ok(())
    }

    pub fn can_write_file(&self, pathbuf: &Path) -> Result<bool> {
        can_write_file(pathbuf, self.overwrite)
    }
}

impl MarkerArgs {
    pub fn can_write_file(&self, pathbuf: &Path) -> Result<bool> {
        can_write_file(pathbuf, self.overwrite)
    }
}

fn can_write_file(pathbuf: &Path, overwrite: bool) -> Result<bool> {
    if !overwrite && pathbuf.exists() {
        return Err(ParserError::CannotOverwrite(pathbuf.display().to_string()))
            .loc("While parsing command line arguments")
    }
    Ok(true)
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(&self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(*self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: &FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(*entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, &FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    if ! Path::new(s).exists() {
        std::fs::create_dir_all(s)?;
    }
    assert_filesystem_entity_is_valid(s, &FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}
