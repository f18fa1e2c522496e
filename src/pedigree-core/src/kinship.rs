use std::collections::HashMap;

use crate::{
    family::FamilyArena,
    individual::{IndividualArena, IndividualId},
};

/// A dense, symmetric kinship (`phi2`) matrix, indexed by canonical order position rather than
/// raw [`IndividualId`] so that MZ-twin folding can collapse a twin group onto a single
/// representative row/column.
pub struct KinshipMatrix {
    index_of: HashMap<IndividualId, usize>,
    phi2: Vec<Vec<f64>>,
}

impl KinshipMatrix {
    #[must_use]
    pub fn phi2(&self, a: IndividualId, b: IndividualId) -> f64 {
        self.phi2[self.index_of[&a]][self.index_of[&b]]
    }

    /// Condensed identity coefficient 7: the probability that both alleles at a locus are
    /// identical by descent between `a` and `b`, under the assumption that neither is inbred.
    ///
    /// A self-pair, or a pair in the same twin group, is identical by descent at every locus by
    /// definition, so both are reported as 1.0 before the parents formula is even considered.
    #[must_use]
    pub fn delta7(&self, a: IndividualId, b: IndividualId, arena: &IndividualArena, families: &FamilyArena) -> f64 {
        if a == b {
            return 1.0
        }
        let same_twin_group = arena.get(a).twin_group.is_some() && arena.get(a).twin_group == arena.get(b).twin_group;
        if same_twin_group {
            return 1.0
        }

        let parents = |id: IndividualId| -> Option<(IndividualId, IndividualId)> {
            let family = families.get(arena.get(id).family?);
            Some((family.father, family.mother))
        };
        let (Some((fa, ma)), Some((fb, mb))) = (parents(a), parents(b)) else { return 0.0 };
        0.25 * (self.phi2(fa, fb) * self.phi2(ma, mb) + self.phi2(fa, mb) * self.phi2(ma, fb))
    }
}

/// Computes the full kinship matrix for a pedigree, in a single pass over individuals ordered by
/// ascending generation (so every parent is processed before its children):
///
/// - `phi2(i, i) = 1` for a founder.
/// - `phi2(i, i) = 1 + phi2(father, mother)` otherwise.
/// - `phi2(i, j) = (phi2(father, j) + phi2(mother, j)) / 2` for `i != j`, `i` non-founder.
///
/// MZ twins (individuals sharing a `twin_group`) are folded onto a single representative before
/// the matrix is built: since they share identical parents, their self- and cross-kinship equal
/// that of their representative.
#[must_use]
pub fn compute_kinship(arena: &IndividualArena, families: &crate::family::FamilyArena) -> KinshipMatrix {
    let representative_of = |id: IndividualId| -> IndividualId {
        let individual = arena.get(id);
        match individual.twin_group {
            None => id,
            Some(group) => arena
                .iter_ids()
                .find(|&other| arena.get(other).twin_group == Some(group))
                .unwrap_or(id),
        }
    };

    let mut representatives: Vec<IndividualId> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut all_ids: Vec<IndividualId> = arena.iter_ids().collect();
    all_ids.sort_by_key(|id| arena.get(*id).generation.unwrap_or(usize::MAX));
    for id in &all_ids {
        let rep = representative_of(*id);
        if seen.insert(rep) {
            representatives.push(rep);
        }
    }
    representatives.sort_by_key(|id| arena.get(*id).generation.unwrap_or(usize::MAX));

    let n = representatives.len();
    let mut index_of = HashMap::with_capacity(n);
    for (idx, id) in representatives.iter().enumerate() {
        index_of.insert(*id, idx);
    }

    let parent_ids = |id: IndividualId| -> Option<(IndividualId, IndividualId)> {
        let family_id = arena.get(id).family?;
        let family = families.get(family_id);
        Some((representative_of(family.father), representative_of(family.mother)))
    };

    let mut phi2 = vec![vec![0.0; n]; n];
    for i in 0..n {
        let individual_id = representatives[i];
        match parent_ids(individual_id) {
            None => phi2[i][i] = 1.0,
            Some((father, mother)) => {
                let fi = index_of[&father];
                let mi = index_of[&mother];
                phi2[i][i] = 1.0 + phi2[fi][mi];
                for j in 0..i {
                    let value = 0.5 * (phi2[fi][j] + phi2[mi][j]);
                    phi2[i][j] = value;
                    phi2[j][i] = value;
                }
            }
        }
    }

    // Full (unfolded) index map: every individual resolves to its representative's row/column.
    let mut index_of_all = HashMap::with_capacity(arena.len());
    for id in arena.iter_ids() {
        let rep = representative_of(id);
        index_of_all.insert(id, index_of[&rep]);
    }

    KinshipMatrix { index_of: index_of_all, phi2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        family::{Family, FamilyArena},
        individual::{Individual, Sex},
    };

    fn founder(key: &str) -> Individual {
        Individual {
            original_id: key.to_string(),
            key: key.to_string(),
            sex: Sex::Unknown,
            twin_token: None,
            hhid_token: None,
            family: None,
            pedigree: None,
            generation: Some(0),
            canonical_index: None,
            twin_group: None,
            synthesised: false,
        }
    }

    #[test]
    fn full_sibs_share_a_phi2_of_one_half() {
        let mut arena = IndividualArena::new();
        arena.push(founder("F"));
        arena.push(founder("M"));
        let mut c1 = founder("C1"); c1.generation = Some(1); c1.family = Some(crate::family::FamilyId(0));
        let mut c2 = founder("C2"); c2.generation = Some(1); c2.family = Some(crate::family::FamilyId(0));
        arena.push(c1);
        arena.push(c2);

        let mut families = FamilyArena::new();
        let mut fam = Family::new(IndividualId(0), IndividualId(1));
        fam.children = vec![IndividualId(2), IndividualId(3)];
        families.push(fam);

        let matrix = compute_kinship(&arena, &families);
        assert_eq!(matrix.phi2(IndividualId(0), IndividualId(0)), 1.0);
        assert_eq!(matrix.phi2(IndividualId(2), IndividualId(2)), 1.0);
        assert_eq!(matrix.phi2(IndividualId(2), IndividualId(3)), 0.5);
    }

    #[test]
    fn mz_twins_fold_to_identical_kinship() {
        let mut arena = IndividualArena::new();
        arena.push(founder("F"));
        arena.push(founder("M"));
        let mut t1 = founder("T1"); t1.generation = Some(1); t1.family = Some(crate::family::FamilyId(0)); t1.twin_group = Some(0);
        let mut t2 = founder("T2"); t2.generation = Some(1); t2.family = Some(crate::family::FamilyId(0)); t2.twin_group = Some(0);
        arena.push(t1);
        arena.push(t2);

        let mut families = FamilyArena::new();
        let mut fam = Family::new(IndividualId(0), IndividualId(1));
        fam.children = vec![IndividualId(2), IndividualId(3)];
        families.push(fam);

        let matrix = compute_kinship(&arena, &families);
        assert_eq!(matrix.phi2(IndividualId(2), IndividualId(3)), matrix.phi2(IndividualId(2), IndividualId(2)));
    }

    #[test]
    fn delta7_of_a_self_pair_is_always_one() {
        let mut arena = IndividualArena::new();
        arena.push(founder("F"));
        arena.push(founder("M"));
        let mut c = founder("C"); c.generation = Some(1); c.family = Some(crate::family::FamilyId(0));
        arena.push(c);

        let mut families = FamilyArena::new();
        let mut fam = Family::new(IndividualId(0), IndividualId(1));
        fam.children = vec![IndividualId(2)];
        families.push(fam);

        let matrix = compute_kinship(&arena, &families);
        assert_eq!(matrix.delta7(IndividualId(2), IndividualId(2), &arena, &families), 1.0);
    }

    #[test]
    fn delta7_within_a_twin_group_is_always_one() {
        let mut arena = IndividualArena::new();
        arena.push(founder("F"));
        arena.push(founder("M"));
        let mut t1 = founder("T1"); t1.generation = Some(1); t1.family = Some(crate::family::FamilyId(0)); t1.twin_group = Some(0);
        let mut t2 = founder("T2"); t2.generation = Some(1); t2.family = Some(crate::family::FamilyId(0)); t2.twin_group = Some(0);
        arena.push(t1);
        arena.push(t2);

        let mut families = FamilyArena::new();
        let mut fam = Family::new(IndividualId(0), IndividualId(1));
        fam.children = vec![IndividualId(2), IndividualId(3)];
        families.push(fam);

        let matrix = compute_kinship(&arena, &families);
        assert_eq!(matrix.delta7(IndividualId(2), IndividualId(3), &arena, &families), 1.0);
    }
}
