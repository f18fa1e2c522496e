use crate::{
    family::FamilyArena,
    individual::{IndividualArena, IndividualId},
};

/// Counts independent marriage/inbreeding loops per pedigree, via edge-contraction on the
/// family-incidence multigraph: one node per individual, one node per nuclear family, with an
/// edge linking each family to its father, its mother, and each of its children.
///
/// A pedigree with no shared ancestry beyond simple parent/child links forms a tree in this
/// incidence graph (`arcs' == nodes' - 1`). Each inbreeding loop (e.g. a first-cousin marriage)
/// adds exactly one excess edge, so the cyclomatic number `arcs' - nodes' + 1` directly counts
/// independent loops in the connected component.
#[must_use]
pub fn count_loops(arena: &IndividualArena, families: &FamilyArena, pedigrees: &[Vec<IndividualId>]) -> Vec<usize> {
    let mut nodes = vec![0usize; pedigrees.len()];
    let mut arcs = vec![0usize; pedigrees.len()];

    for individual_id in arena.iter_ids() {
        if let Some(pedigree) = arena.get(individual_id).pedigree {
            nodes[pedigree] += 1;
        }
    }

    for family in families.as_slice() {
        let Some(pedigree) = arena.get(family.father).pedigree else { continue };
        nodes[pedigree] += 1;
        arcs[pedigree] += 2 + family.children.len();
    }

    nodes.iter().zip(arcs.iter())
        .map(|(&n, &a)| (a as isize - n as isize + 1).max(0) as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        family::Family,
        individual::{Individual, Sex},
        partition::partition_pedigrees,
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
            generation: None,
            canonical_index: None,
            twin_group: None,
            synthesised: false,
        }
    }

    #[test]
    fn a_simple_trio_has_no_loops() {
        let mut arena = IndividualArena::new();
        for key in ["F", "M", "C"] { arena.push(founder(key)); }
        let mut families = FamilyArena::new();
        let mut fam = Family::new(IndividualId(0), IndividualId(1));
        fam.children.push(IndividualId(2));
        families.push(fam);
        let pedigrees = partition_pedigrees(&mut arena, &families);
        let counts = count_loops(&arena, &families, &pedigrees);
        assert_eq!(counts, vec![0]);
    }

    #[test]
    fn a_first_cousin_marriage_creates_one_loop() {
        let mut arena = IndividualArena::new();
        for key in ["GF", "GM", "U1", "U2", "SpouseA", "SpouseB", "P1", "P2", "Child"] {
            arena.push(founder(key));
        }
        let gf = IndividualId(0); let gm = IndividualId(1);
        let u1 = IndividualId(2); let u2 = IndividualId(3);
        let spouse_a = IndividualId(4); let spouse_b = IndividualId(5);
        let p1 = IndividualId(6); let p2 = IndividualId(7);
        let child = IndividualId(8);

        let mut families = FamilyArena::new();
        let mut grandparents = Family::new(gf, gm);
        grandparents.children = vec![u1, u2];
        families.push(grandparents);

        let mut fam_u1 = Family::new(u1, spouse_a);
        fam_u1.children.push(p1);
        families.push(fam_u1);

        let mut fam_u2 = Family::new(u2, spouse_b);
        fam_u2.children.push(p2);
        families.push(fam_u2);

        let mut cousins = Family::new(p1, p2);
        cousins.children.push(child);
        families.push(cousins);

        let pedigrees = partition_pedigrees(&mut arena, &families);
        assert_eq!(pedigrees.len(), 1);
        let counts = count_loops(&arena, &families, &pedigrees);
        assert_eq!(counts, vec![1]);
    }
}
