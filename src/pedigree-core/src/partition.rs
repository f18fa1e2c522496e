use std::collections::HashMap;

use crate::{
    family::FamilyArena,
    individual::{IndividualArena, IndividualId},
};

/// Union-find over individuals, unioning every parent/child/spouse pair implied by the family
/// arena. Connected components are assigned sequential pedigree numbers in order of first
/// discovery, mirroring the traversal order of the input file.
///
/// This re-architects a depth-first walk of parent/child/sibling edges into disjoint-set union:
/// both compute identical connected components, but union-find needs no explicit recursion stack
/// and so cannot overflow on a deeply-nested pedigree.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Partition individuals into connected pedigrees, writing each individual's `pedigree` field.
/// Returns pedigrees in discovery order, each as the list of individuals it contains.
pub fn partition_pedigrees(arena: &mut IndividualArena, families: &FamilyArena) -> Vec<Vec<IndividualId>> {
    let n = arena.len();
    let mut dsu = DisjointSet::new(n);

    for family in families.as_slice() {
        dsu.union(family.father.0, family.mother.0);
        for &child in &family.children {
            dsu.union(family.father.0, child.0);
        }
    }

    let mut root_to_pedigree: HashMap<usize, usize> = HashMap::new();
    let mut pedigrees: Vec<Vec<IndividualId>> = Vec::new();

    for id in arena.iter_ids() {
        let root = dsu.find(id.0);
        let pedigree_index = *root_to_pedigree.entry(root).or_insert_with(|| {
            pedigrees.push(Vec::new());
            pedigrees.len() - 1
        });
        pedigrees[pedigree_index].push(id);
        arena.get_mut(id).pedigree = Some(pedigree_index);
    }

    pedigrees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{family::Family, individual::{Individual, Sex}};

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
    fn two_disjoint_trios_form_two_pedigrees() {
        let mut arena = IndividualArena::new();
        for key in ["F1", "M1", "C1", "F2", "M2", "C2"] {
            arena.push(founder(key));
        }
        let mut families = FamilyArena::new();
        let mut fam1 = Family::new(IndividualId(0), IndividualId(1));
        fam1.children.push(IndividualId(2));
        families.push(fam1);
        let mut fam2 = Family::new(IndividualId(3), IndividualId(4));
        fam2.children.push(IndividualId(5));
        families.push(fam2);

        let pedigrees = partition_pedigrees(&mut arena, &families);
        assert_eq!(pedigrees.len(), 2);
        assert_eq!(arena.get(IndividualId(0)).pedigree, arena.get(IndividualId(2)).pedigree);
        assert_ne!(arena.get(IndividualId(0)).pedigree, arena.get(IndividualId(3)).pedigree);
    }

    #[test]
    fn an_unconnected_individual_is_its_own_pedigree() {
        let mut arena = IndividualArena::new();
        arena.push(founder("Solo"));
        let families = FamilyArena::new();
        let pedigrees = partition_pedigrees(&mut arena, &families);
        assert_eq!(pedigrees.len(), 1);
        assert_eq!(pedigrees[0], vec![IndividualId(0)]);
    }
}
