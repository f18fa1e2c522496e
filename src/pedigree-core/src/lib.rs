use log::info;
use located_error::prelude::*;

pub mod allele;
pub mod canonical;
pub mod error_sink;
pub mod family;
pub mod family_builder;
pub mod generation;
pub mod ident;
pub mod individual;
pub mod ingest;
pub mod kinship;
pub mod loops;
pub mod marker;
pub mod partition;
pub mod pedigree;
pub mod twin;

use error_sink::{ErrorSink, WarningSink};
use family::FamilyArena;
use individual::IndividualArena;
use pedigree::PedigreeSummary;
use pedigree_io::{
    read::{read_pedindex, MarkerFieldWidths, MarkerReader, PedigreeFieldWidths, PedigreeReader},
    write::{
        append_summary_line, flush_sink, write_locus_info, write_pedindex_cde, write_pedindex_out, write_phi2,
        LocusInfoRecord, PedIndexRecord, Phi2Record,
    },
};

/// Everything produced by the `index` phase: a reconstructed forest of pedigrees, its canonical
/// individual arena, and its kinship matrix, ready to be written to disk.
pub struct IndexOutcome {
    pub arena: IndividualArena,
    pub families: FamilyArena,
    pub summaries: Vec<PedigreeSummary>,
    pub kinship: kinship::KinshipMatrix,
    pub errors: ErrorSink,
    pub warnings: WarningSink,
}

/// Runs the full reconstruction pipeline: ingest raw records, resolve families and twin groups,
/// partition into connected pedigrees, assign generations, detect inbreeding loops, assign
/// canonical indices, and compute the kinship matrix.
///
/// Errors accumulated along the way are returned in `errors`, not propagated immediately: every
/// phase runs to completion so a single invocation surfaces as many problems as possible. The
/// caller is expected to treat a non-empty `errors` sink as fatal once the pipeline returns.
///
/// # Errors
/// Returns an error if the pedigree file cannot be opened or a record's line length doesn't
/// match the configured field widths.
pub fn reconstruct(args: &parser::IndexArgs) -> anyhow::Result<IndexOutcome> {
    args.check_widths().loc("While validating --id-len/--famid-len")?;

    let widths = PedigreeFieldWidths {
        famid_len: args.famid_len,
        id_len: args.id_len,
        sex_len: args.sex_len,
        twin_len: args.twin_len,
        hhid_len: args.hhid_len,
    };
    let reader = PedigreeReader::new(&args.ped, widths).loc("While opening the pedigree file")?;

    info!("Ingesting pedigree records from {}", args.ped.display());
    let ingest::IngestOutcome { mut arena, mut ident, links, mut errors, mut warnings } =
        ingest::ingest_records(reader)?;

    if !errors.is_empty() {
        return Ok(aborted_outcome(arena, errors, warnings))
    }

    info!("Resolving nuclear families...");
    let families = family_builder::build_families(&mut arena, &mut ident, &links, &mut warnings);

    if !errors.is_empty() {
        return Ok(aborted_outcome(arena, errors, warnings))
    }

    info!("Assigning twin groups...");
    twin::assign_twin_groups(&mut arena, &families, &mut errors);

    if !errors.is_empty() {
        return Ok(aborted_outcome(arena, errors, warnings))
    }

    info!("Partitioning into connected pedigrees...");
    let pedigrees = partition::partition_pedigrees(&mut arena, &families);

    info!("Assigning generation depths...");
    if let Err(e) = generation::assign_generations(&mut arena, &families) {
        errors.push(e.to_string());
    }

    info!("Detecting inbreeding loops...");
    let nlbrk = loops::count_loops(&arena, &families, &pedigrees);

    info!("Assigning canonical indices...");
    canonical::assign_canonical_indices(&mut arena, &families);

    info!("Computing kinship matrix...");
    let kinship = kinship::compute_kinship(&arena, &families);

    let mut family_counts = vec![0usize; pedigrees.len()];
    for family in families.as_slice() {
        if let Some(pedigree) = arena.get(family.father).pedigree {
            family_counts[pedigree] += 1;
        }
    }
    let summaries = pedigree::summarize_pedigrees(&arena, &pedigrees, &family_counts, &nlbrk, &kinship);

    Ok(IndexOutcome { arena, families, summaries, kinship, errors, warnings })
}

/// Builds the `IndexOutcome` returned when a phase boundary finds a non-empty error sink: later
/// phases never run, since each one assumes the previous phase's invariants hold.
fn aborted_outcome(arena: IndividualArena, errors: ErrorSink, warnings: WarningSink) -> IndexOutcome {
    let families = FamilyArena::new();
    let kinship = kinship::compute_kinship(&arena, &families);
    IndexOutcome { families, summaries: Vec::new(), kinship, arena, errors, warnings }
}

/// Writes the `index` phase's outputs to `args.output_dir`: `pedindex.out`, `pedindex.cde`,
/// `phi2`, `pedigree.info`, and the error/warning sinks (`ibdprep.err`/`ibdprep.wrn`).
///
/// # Errors
/// Returns an error if any output file cannot be created or written.
pub fn write_index_outputs(args: &parser::IndexArgs, outcome: &IndexOutcome) -> anyhow::Result<()> {
    let out_path = args.output_dir.join("pedindex.out");
    let cde_path = args.output_dir.join("pedindex.cde");
    let phi2_path = args.output_dir.join("phi2");
    let info_path = args.output_dir.join("pedigree.info");
    let err_path = args.output_dir.join("ibdprep.err");
    let wrn_path = args.output_dir.join("ibdprep.wrn");

    for path in [&out_path, &cde_path, &phi2_path] {
        args.can_write_file(path).loc("While checking output file")?;
    }

    let max_twin_group = outcome.arena.as_slice().iter().filter_map(|i| i.twin_group).max();
    let twin_width = if max_twin_group.is_some_and(|g| g + 1 > 999) { 5 } else { 3 };

    let records: Vec<PedIndexRecord> = arena_to_pedindex_records(outcome);
    write_pedindex_out(&out_path, &records, twin_width)?;
    write_pedindex_cde(&cde_path, twin_width)?;

    let mut phi2_records = Vec::new();
    for a in outcome.arena.iter_ids() {
        for b in outcome.arena.iter_ids() {
            if b.0 > a.0 { continue }
            let phi = outcome.kinship.phi2(a, b);
            if phi == 0.0 { continue }
            let delta7 = outcome.kinship.delta7(a, b, &outcome.arena, &outcome.families);
            let ai = outcome.arena.get(a).canonical_index.unwrap_or(0);
            let bi = outcome.arena.get(b).canonical_index.unwrap_or(0);
            phi2_records.push(Phi2Record { i: ai, j: bi, phi, delta7 });
        }
    }
    write_phi2(&phi2_path, &phi2_records)?;

    append_summary_line(
        &info_path,
        &format!(
            "pedigree={} individuals={} families={} errors={} warnings={}",
            args.ped.display(),
            outcome.arena.len(),
            outcome.families.len(),
            outcome.errors.len(),
            outcome.warnings.len(),
        ),
    )?;

    flush_sink(&err_path, outcome.errors.messages())?;
    flush_sink(&wrn_path, outcome.warnings.messages())?;
    Ok(())
}

fn arena_to_pedindex_records(outcome: &IndexOutcome) -> Vec<PedIndexRecord> {
    let mut records: Vec<_> = outcome
        .arena
        .iter_ids()
        .filter_map(|id| {
            let individual = outcome.arena.get(id);
            let canonical_index = individual.canonical_index?;
            let father_ibdid = individual
                .family
                .map(|family_id| outcome.arena.get(outcome.families.get(family_id).father).canonical_index.unwrap_or(0))
                .unwrap_or(0);
            let mother_ibdid = individual
                .family
                .map(|family_id| outcome.arena.get(outcome.families.get(family_id).mother).canonical_index.unwrap_or(0))
                .unwrap_or(0);
            Some(PedIndexRecord {
                ibdid: canonical_index,
                fa_ibdid: father_ibdid,
                mo_ibdid: mother_ibdid,
                sex: individual.sex.as_char(),
                twin: individual.twin_group.map_or(0, |g| g + 1),
                ped_id: individual.pedigree.map_or(0, |p| p + 1),
                gen: individual.generation.unwrap_or(0),
                original_id: individual.original_id.clone(),
            })
        })
        .collect();
    records.sort_by_key(|r| r.ibdid);
    records
}

/// Everything produced by the `markers` phase.
pub struct MarkerOutcome {
    pub table: marker::MarkerTable,
    pub interner: allele::AlleleInterner,
    pub locus_info: Vec<LocusInfoRecord>,
    pub errors: ErrorSink,
    pub warnings: WarningSink,
}

/// Rebuilds a minimal individual arena from a previously-written `pedindex.out` (sex and twin
/// group are all the marker phase needs), then ingests a marker-data file against it.
///
/// Individuals are looked up by their bare original id: the `markers` phase assumes the same
/// family-id prefixing convention was used (or omitted) consistently across both the `index` and
/// `markers` invocations for a given pedigree.
///
/// # Errors
/// Returns an error if `pedindex.out` or the marker file cannot be read.
pub fn reconstruct_markers(args: &parser::MarkerArgs) -> anyhow::Result<MarkerOutcome> {
    let pedindex_entries = read_pedindex(&args.pedindex).loc("While reading pedindex.out")?;

    let mut arena = IndividualArena::new();
    let mut ident = ident::IdentTable::new();
    for entry in &pedindex_entries {
        let sex = match entry.sex {
            'M' => individual::Sex::Male,
            'F' => individual::Sex::Female,
            _ => individual::Sex::Unknown,
        };
        let individual = individual::Individual {
            original_id: entry.original_id.clone(),
            key: entry.original_id.clone(),
            sex,
            twin_token: None,
            hhid_token: None,
            family: None,
            pedigree: Some(entry.ped_id),
            generation: Some(entry.gen),
            canonical_index: Some(entry.ibdid),
            twin_group: (entry.twin > 0).then(|| entry.twin - 1),
            synthesised: false,
        };
        let id = arena.push(individual);
        ident.insert(entry.original_id.clone(), id);
    }

    let loci: Vec<String> = if let Some(path) = &args.locus_info {
        pedigree_io::read::read_locus_info(path).loc("While reading locus-info file")?.into_iter().map(|e| e.name).collect()
    } else {
        (0..args.loci).map(|i| format!("locus_{i}")).collect()
    };

    let widths = MarkerFieldWidths {
        famid_len: args.famid_len,
        id_len: args.id_len,
        gtype_len: args.gtype_len,
        loci: args.loci,
    };
    let reader = MarkerReader::new(&args.markers, widths).loc("While opening marker file")?;

    let mut interner = allele::AlleleInterner::new();
    let mut errors = ErrorSink::new();
    let mut warnings = WarningSink::new();

    let table = marker::ingest_markers(reader, loci, args.x_linked, &ident, &arena, &mut interner, &mut errors)?;
    marker::check_twin_consistency(&arena, &table, &mut errors);

    let locus_info = if !errors.is_empty() || args.locus_info.is_some() {
        Vec::new()
    } else {
        estimate_locus_info(&table, &interner)
    };

    Ok(MarkerOutcome { table, interner, locus_info, errors, warnings })
}

fn estimate_locus_info(table: &marker::MarkerTable, interner: &allele::AlleleInterner) -> Vec<LocusInfoRecord> {
    (0..table.loci.len())
        .map(|locus_index| {
            let mut counts: std::collections::HashMap<allele::AlleleId, usize> = std::collections::HashMap::new();
            for row in table.genotypes.values() {
                let genotype = &row[locus_index];
                for allele in [genotype.first, genotype.second].into_iter().flatten() {
                    *counts.entry(allele).or_insert(0) += 1;
                }
            }
            let frequencies = marker::estimate_allele_frequencies(&counts, 6);
            let mut alleles: Vec<(String, f64)> = frequencies
                .into_iter()
                .map(|(id, freq)| (interner.code(id).to_string(), freq))
                .collect();
            alleles.sort_by(|a, b| a.0.cmp(&b.0));
            LocusInfoRecord { name: table.loci[locus_index].clone(), alleles }
        })
        .collect()
}

/// Writes the `markers` phase's outputs: an estimated locus-info file (skipped if one was
/// provided on input), `marker.info`, and the error/warning sinks.
///
/// # Errors
/// Returns an error if any output file cannot be created or written.
pub fn write_marker_outputs(args: &parser::MarkerArgs, outcome: &MarkerOutcome) -> anyhow::Result<()> {
    let info_path = args.output_dir.join("marker.info");
    let err_path = args.output_dir.join("ibdprep.err");
    let wrn_path = args.output_dir.join("ibdprep.wrn");

    if args.locus_info.is_none() {
        let locus_info_path = args.output_dir.join("locus.info");
        args.can_write_file(&locus_info_path).loc("While checking output file")?;
        write_locus_info(&locus_info_path, &outcome.locus_info)?;
    }

    append_summary_line(
        &info_path,
        &format!(
            "markers={} individuals={} loci={} errors={} warnings={}",
            args.markers.display(),
            outcome.table.genotypes.len(),
            outcome.table.loci.len(),
            outcome.errors.len(),
            outcome.warnings.len(),
        ),
    )?;

    flush_sink(&err_path, outcome.errors.messages())?;
    flush_sink(&wrn_path, outcome.warnings.messages())?;
    Ok(())
}
