use std::collections::HashMap;

use thiserror::Error;

use crate::{
    allele::{AlleleId, AlleleInterner},
    error_sink::ErrorSink,
    ident::IdentTable,
    individual::{IndividualArena, IndividualId, Sex},
};
use pedigree_io::read::RawMarkerRecord;

#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("line {0}: individual '{1}' is not present in the pedigree index")]
    UnknownIndividual(usize, String),
    #[error("line {0}: expected genotypes for {1} loci, found {2}")]
    LocusCountMismatch(usize, usize, usize),
    #[error("line {0}: allele token '{1}' is neither uniformly numeric nor alphabetic-with-suffix")]
    InvalidAlleleToken(usize, String),
    #[error("line {0}: autosomal locus requires both alleles present or both blank")]
    UnbalancedAutosomalGenotype(usize),
    #[error("line {0}: X-linked female genotype requires both alleles present or both blank")]
    UnbalancedXLinkedFemaleGenotype(usize),
}

/// A single locus genotype: two allele calls, or one for a hemizygous X-linked male.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genotype {
    pub first: Option<AlleleId>,
    pub second: Option<AlleleId>,
}

impl Genotype {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }
}

/// Genotypes for every individual, one row of loci per individual, keyed by arena index.
#[derive(Debug, Default)]
pub struct MarkerTable {
    pub loci: Vec<String>,
    pub genotypes: HashMap<IndividualId, Vec<Genotype>>,
}

/// Splits a raw genotype field into its two allele tokens.
///
/// Parentheses are treated as spaces. A `/` or interior whitespace marks an explicit "divided"
/// form (`"5 /12"`, `"A/B"`), split on that delimiter regardless of the two halves' lengths.
/// Lacking either, the field is assumed to be an undivided, equal-length concatenation of the two
/// codes (`"101103"` → `"101"`, `"103"`) and is split at its midpoint. `"0"` and `"-"` normalise
/// to the empty (missing) token.
fn split_genotype_field(field: &str) -> (String, String) {
    let cleaned: String = field.chars().map(|c| if c == '(' || c == ')' { ' ' } else { c }).collect();
    let trimmed = cleaned.trim();

    let (a, b) = if let Some(pos) = trimmed.find('/') {
        (trimmed[..pos].trim(), trimmed[pos + 1..].trim())
    } else if let Some(pos) = trimmed.find(char::is_whitespace) {
        (trimmed[..pos].trim(), trimmed[pos..].trim())
    } else {
        let mid = trimmed.len() / 2;
        (trimmed[..mid].trim(), trimmed[mid..].trim())
    };

    (normalize_allele_token(a), normalize_allele_token(b))
}

fn normalize_allele_token(token: &str) -> String {
    if token.is_empty() || token == "0" || token == "-" {
        String::new()
    } else {
        token.to_string()
    }
}

/// A non-blank allele token must be uniformly numeric, or uniformly alphabetic with an optional
/// trailing run of digits and/or prime marks (e.g. `"A"`, `"A1"`, `"A'"`).
fn is_valid_allele_token(token: &str) -> bool {
    if token.is_empty() {
        return true
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return true
    }
    let base = token.trim_end_matches(|c: char| c.is_ascii_digit() || c == '\'');
    !base.is_empty() && base.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_missing_code(code: &str) -> bool {
    code.is_empty() || code.chars().all(|c| c == '0' || c == ' ')
}

/// Ingests raw marker records into a [`MarkerTable`], resolving individuals against `ident` and
/// interning allele codes into `interner`.
///
/// An X-linked locus carried by a male individual is expected to be hemizygous: both allele
/// halves of the field must agree (or one may be blank). A mismatch is recorded as an error
/// rather than silently picking one call, since it usually indicates a genotyping or column
/// alignment problem upstream.
///
/// # Errors
/// Propagates I/O errors from the underlying reader.
pub fn ingest_markers(
    records: impl Iterator<Item = anyhow::Result<RawMarkerRecord>>,
    loci: Vec<String>,
    x_linked: bool,
    ident: &IdentTable,
    arena: &IndividualArena,
    interner: &mut AlleleInterner,
    errors: &mut ErrorSink,
) -> anyhow::Result<MarkerTable> {
    let mut table = MarkerTable { loci: loci.clone(), genotypes: HashMap::new() };

    for record in records {
        let record = record?;
        let line = record.line_no;
        let key = crate::ident::make_key(record.famid.as_deref(), record.id.trim());

        let Some(individual_id) = ident.get(&key) else {
            errors.push(MarkerError::UnknownIndividual(line, key).to_string());
            continue
        };

        if record.genotypes.len() != loci.len() {
            errors.push(MarkerError::LocusCountMismatch(line, loci.len(), record.genotypes.len()).to_string());
            continue
        }

        let is_male = arena.get(individual_id).sex == Sex::Male;
        let mut row = Vec::with_capacity(loci.len());
        for field in &record.genotypes {
            let (a, b) = split_genotype_field(field);
            let a_missing = is_missing_code(&a);
            let b_missing = is_missing_code(&b);

            for token in [&a, &b] {
                if !is_valid_allele_token(token) {
                    errors.push(MarkerError::InvalidAlleleToken(line, token.clone()).to_string());
                }
            }

            if x_linked && is_male && !a_missing && !b_missing && a != b {
                errors.push(format!("line {line}: hemizygous X-linked male has conflicting allele calls '{a}'/'{b}'"));
            } else if x_linked && !is_male && a_missing != b_missing {
                errors.push(MarkerError::UnbalancedXLinkedFemaleGenotype(line).to_string());
            } else if !x_linked && a_missing != b_missing {
                errors.push(MarkerError::UnbalancedAutosomalGenotype(line).to_string());
            }

            let first = (!a_missing).then(|| interner.intern(&a));
            let second = if x_linked && is_male {
                first
            } else {
                (!b_missing).then(|| interner.intern(&b))
            };
            row.push(Genotype { first, second });
        }
        table.genotypes.insert(individual_id, row);
    }

    Ok(table)
}

/// Validates that every member of each twin group carries an identical genotype at every locus.
pub fn check_twin_consistency(arena: &IndividualArena, table: &MarkerTable, errors: &mut ErrorSink) {
    let mut by_group: HashMap<usize, Vec<IndividualId>> = HashMap::new();
    for id in arena.iter_ids() {
        if let Some(group) = arena.get(id).twin_group {
            by_group.entry(group).or_default().push(id);
        }
    }
    for (group, members) in by_group {
        let Some(first) = members.first().and_then(|id| table.genotypes.get(id)) else { continue };
        for other in &members[1..] {
            let Some(genotypes) = table.genotypes.get(other) else { continue };
            if genotypes != first {
                errors.push(format!("twin group {group}: members carry differing genotypes"));
            }
        }
    }
}

/// Estimates allele frequencies at a locus from observed genotype counts, rounded to `decimals`
/// places. The highest-count allele absorbs whatever rounding error keeps the others from
/// summing exactly to 1.0, so the returned frequencies always sum to 1.0 exactly.
#[must_use]
pub fn estimate_allele_frequencies(counts: &HashMap<AlleleId, usize>, decimals: u32) -> HashMap<AlleleId, f64> {
    let total: usize = counts.values().sum();
    if total == 0 {
        return HashMap::new()
    }
    let scale = 10f64.powi(decimals as i32);
    let mut frequencies: HashMap<AlleleId, f64> = counts
        .iter()
        .map(|(&id, &count)| (id, ((count as f64 / total as f64) * scale).round() / scale))
        .collect();

    let sum: f64 = frequencies.values().sum();
    let residual = 1.0 - sum;
    if let Some((&majority, _)) = counts.iter().max_by_key(|(_, &count)| count) {
        if let Some(freq) = frequencies.get_mut(&majority) {
            *freq += residual;
        }
    }
    frequencies
}
