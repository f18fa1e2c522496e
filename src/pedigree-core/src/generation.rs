use thiserror::Error;

use crate::{family::FamilyArena, individual::IndividualArena};

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("ancestry cycle detected: generation levels did not converge after {0} passes")]
    Unresolved(usize),
}

/// Assigns each individual a generation depth: founders sit at generation 0, and every other
/// individual sits one generation below the deeper of its two parents.
///
/// Computed as a fixed point over repeated passes (Algorithm B) rather than a single top-down
/// walk, because a pedigree's input order gives no guarantee that a parent record precedes its
/// child's. A guard (Algorithm A) caps the number of passes at `n + 1`: a well-formed forest of
/// ancestries converges in at most `n` passes, so exceeding that bound means the parent graph
/// contains a cycle.
///
/// # Errors
/// Returns [`GenerationError::Unresolved`] if generations fail to converge, indicating a cyclic
/// ancestry (an individual that is, transitively, its own ancestor).
pub fn assign_generations(arena: &mut IndividualArena, families: &FamilyArena) -> Result<(), GenerationError> {
    let n = arena.len();
    let mut generations: Vec<Option<usize>> = vec![None; n];

    for id in arena.iter_ids() {
        if arena.get(id).is_founder() {
            generations[id.0] = Some(0);
        }
    }

    let max_passes = n + 1;
    for _ in 0..max_passes {
        let mut changed = false;
        for family in families.as_slice() {
            let (Some(father_gen), Some(mother_gen)) = (generations[family.father.0], generations[family.mother.0]) else { continue };
            let child_gen = father_gen.max(mother_gen) + 1;
            for &child in &family.children {
                if generations[child.0] != Some(child_gen) {
                    generations[child.0] = Some(child_gen);
                    changed = true;
                }
            }
        }
        if !changed {
            break
        }
    }

    if generations.iter().any(Option::is_none) {
        return Err(GenerationError::Unresolved(max_passes))
    }

    for id in arena.iter_ids() {
        arena.get_mut(id).generation = generations[id.0];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{family::Family, individual::{Individual, IndividualId, Sex}};

    fn founder(key: &str) -> Individual {
        Individual {
            original_id: key.to_string(),
            key: key.to_string(),
            sex: Sex::Unknown,
            twin_token: None,
            hhid_token: None,
            family: None,
            pedigree: None,
            generation: None,
            canonical_index: None,
            twin_group: None,
            synthesised: false,
        }
    }

    #[test]
    fn trio_assigns_generation_one_to_the_child() -> Result<(), GenerationError> {
        let mut arena = IndividualArena::new();
        for key in ["F", "M", "C"] { arena.push(founder(key)); }
        arena.get_mut(IndividualId(2)).family = Some(crate::family::FamilyId(0));
        let mut families = FamilyArena::new();
        let mut fam = Family::new(IndividualId(0), IndividualId(1));
        fam.children.push(IndividualId(2));
        families.push(fam);

        assign_generations(&mut arena, &families)?;
        assert_eq!(arena.get(IndividualId(0)).generation, Some(0));
        assert_eq!(arena.get(IndividualId(2)).generation, Some(1));
        Ok(())
    }

    #[test]
    fn grandchild_sits_two_generations_below_founders() -> Result<(), GenerationError> {
        let mut arena = IndividualArena::new();
        for key in ["F1", "M1", "C1", "M2", "G1"] { arena.push(founder(key)); }
        arena.get_mut(IndividualId(2)).family = Some(crate::family::FamilyId(0));
        arena.get_mut(IndividualId(4)).family = Some(crate::family::FamilyId(1));
        let mut families = FamilyArena::new();
        let mut fam1 = Family::new(IndividualId(0), IndividualId(1));
        fam1.children.push(IndividualId(2));
        families.push(fam1);
        let mut fam2 = Family::new(IndividualId(2), IndividualId(3));
        fam2.children.push(IndividualId(4));
        families.push(fam2);

        assign_generations(&mut arena, &families)?;
        assert_eq!(arena.get(IndividualId(4)).generation, Some(2));
        Ok(())
    }
}
