use crate::individual::IndividualId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FamilyId(pub usize);

/// A nuclear family: one father, one mother, and their children in input order.
#[derive(Debug, Clone)]
pub struct Family {
    pub father: IndividualId,
    pub mother: IndividualId,
    pub children: Vec<IndividualId>,
    pub pedigree: Option<usize>,
}

impl Family {
    #[must_use]
    pub fn new(father: IndividualId, mother: IndividualId) -> Self {
        Self { father, mother, children: Vec::new(), pedigree: None }
    }
}

/// Grow-on-demand arena of nuclear families, indexed by [`FamilyId`].
#[derive(Debug, Default)]
pub struct FamilyArena {
    families: Vec<Family>,
}

impl FamilyArena {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, family: Family) -> FamilyId {
        let id = FamilyId(self.families.len());
        self.families.push(family);
        id
    }

    #[must_use]
    pub fn get(&self, id: FamilyId) -> &Family { &self.families[id.0] }

    pub fn get_mut(&mut self, id: FamilyId) -> &mut Family { &mut self.families[id.0] }

    #[must_use]
    pub fn len(&self) -> usize { self.families.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.families.is_empty() }

    pub fn iter_ids(&self) -> impl Iterator<Item = FamilyId> {
        (0..self.families.len()).map(FamilyId)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Family] { &self.families }
}
