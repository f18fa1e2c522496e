use std::collections::HashMap;

use crate::{
    family::{FamilyArena, FamilyId},
    individual::{IndividualArena, IndividualId},
};

/// Assigns each individual a canonical sequential index (1-based), the order in which
/// `PEDINDEX`-style output is written.
///
/// Individuals sort by the 4-tuple `(pedigree, generation, family-sequence-within-pedigree,
/// within-family-sequence)`: grouping by pedigree keeps each family tree contiguous in the
/// output, ordering by generation keeps parents ahead of their children, family-sequence orders
/// siblings' families by the order those families were created (itself lexicographic in
/// father/mother key, per [`crate::family_builder::build_families`]), and within-family-sequence
/// preserves each family's input order for its children.
///
/// Founders are not a child of any family, so they have no family-sequence of their own; they
/// sort ahead of every family-sequence in their generation (sequence 0), with the individual's
/// arena discovery order as the final, always-available tie-break.
pub fn assign_canonical_indices(arena: &mut IndividualArena, families: &FamilyArena) {
    let mut family_rank: HashMap<(usize, FamilyId), usize> = HashMap::new();
    let mut families_by_pedigree: HashMap<usize, Vec<FamilyId>> = HashMap::new();
    for family_id in families.iter_ids() {
        let father = families.get(family_id).father;
        if let Some(pedigree) = arena.get(father).pedigree {
            families_by_pedigree.entry(pedigree).or_default().push(family_id);
        }
    }
    for (pedigree, mut family_ids) in families_by_pedigree {
        family_ids.sort_by_key(|id| id.0);
        for (rank, family_id) in family_ids.into_iter().enumerate() {
            family_rank.insert((pedigree, family_id), rank);
        }
    }

    let mut order: Vec<IndividualId> = arena.iter_ids().collect();
    order.sort_by_key(|&id| {
        let individual = arena.get(id);
        let pedigree = individual.pedigree.unwrap_or(usize::MAX);
        let family_sequence = individual
            .family
            .and_then(|family_id| family_rank.get(&(pedigree, family_id)).copied())
            .map_or(0, |rank| rank + 1);
        let within_family_sequence = individual
            .family
            .map(|family_id| families.get(family_id).children.iter().position(|&child| child == id).unwrap_or(0))
            .unwrap_or(0);
        (
            pedigree,
            individual.generation.unwrap_or(usize::MAX),
            family_sequence,
            within_family_sequence,
            id.0,
        )
    });

    for (index, id) in order.into_iter().enumerate() {
        arena.get_mut(id).canonical_index = Some(index + 1);
    }
}
