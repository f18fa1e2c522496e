use crate::{
    individual::{IndividualArena, IndividualId},
    kinship::KinshipMatrix,
};

/// Summary statistics for one connected pedigree (family tree), derived after partitioning,
/// generation assignment, loop detection, and kinship computation have all run.
#[derive(Debug, Clone)]
pub struct PedigreeSummary {
    pub sequence: usize,
    pub individual_count: usize,
    pub founder_count: usize,
    pub family_count: usize,
    pub nlbrk: usize,
    pub start_canonical_index: usize,
    /// `true` iff some member's kinship diagonal `phi2(i,i) > 1`. Distinct from [`Self::has_loops`]:
    /// a pedigree can be inbred with `nlbrk == 0` reported by an approximate loop-breaker count,
    /// so this is computed independently from the kinship matrix rather than aliased to it.
    pub inbred: bool,
}

impl PedigreeSummary {
    #[must_use]
    pub fn has_loops(&self) -> bool { self.nlbrk > 0 }

    #[must_use]
    pub fn is_inbred(&self) -> bool { self.inbred }
}

/// Builds one [`PedigreeSummary`] per connected component, in discovery order.
#[must_use]
pub fn summarize_pedigrees(
    arena: &IndividualArena,
    pedigrees: &[Vec<IndividualId>],
    family_counts: &[usize],
    nlbrk: &[usize],
    kinship: &KinshipMatrix,
) -> Vec<PedigreeSummary> {
    pedigrees
        .iter()
        .enumerate()
        .map(|(sequence, members)| {
            let founder_count = members.iter().filter(|&&id| arena.get(id).is_founder()).count();
            let start_canonical_index = members
                .iter()
                .filter_map(|&id| arena.get(id).canonical_index)
                .min()
                .unwrap_or(0);
            let inbred = members.iter().any(|&id| kinship.phi2(id, id) > 1.0);
            PedigreeSummary {
                sequence,
                individual_count: members.len(),
                founder_count,
                family_count: family_counts.get(sequence).copied().unwrap_or(0),
                nlbrk: nlbrk.get(sequence).copied().unwrap_or(0),
                start_canonical_index,
                inbred,
            }
        })
        .collect()
}
