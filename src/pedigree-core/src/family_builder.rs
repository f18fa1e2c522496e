use std::collections::HashMap;

use crate::{
    error_sink::WarningSink,
    family::{Family, FamilyArena, FamilyId},
    ident::IdentTable,
    individual::{Individual, IndividualArena, IndividualId, Sex},
    ingest::ParentLink,
};

/// Resolve ingested parent links into nuclear families, synthesising a founder individual for
/// any parent that is referenced by id but never appears as its own record.
///
/// Families are materialised in lexicographic (father-ID, mother-ID) order, not input order: this
/// gives family creation a deterministic sequence independent of record order, which the
/// canonical indexer relies on for its family-sequence-within-pedigree tie-break. Children are
/// then attached to their family in a second pass, in input order.
///
/// `links[i]` must correspond to the individual at `IndividualId(i)`.
pub fn build_families(
    arena: &mut IndividualArena,
    ident: &mut IdentTable,
    links: &[ParentLink],
    warnings: &mut WarningSink,
) -> FamilyArena {
    let mut families = FamilyArena::new();
    let mut by_parents: HashMap<(IndividualId, IndividualId), FamilyId> = HashMap::new();

    let mut distinct_pairs: Vec<(&str, &str)> = links
        .iter()
        .filter_map(|link| match (&link.father_key, &link.mother_key) {
            (Some(father_key), Some(mother_key)) => Some((father_key.as_str(), mother_key.as_str())),
            _ => None,
        })
        .collect();
    distinct_pairs.sort_unstable();
    distinct_pairs.dedup();

    for (father_key, mother_key) in distinct_pairs {
        let father = resolve_or_synthesise(arena, ident, father_key, Sex::Male, warnings);
        let mother = resolve_or_synthesise(arena, ident, mother_key, Sex::Female, warnings);
        by_parents.entry((father, mother)).or_insert_with(|| families.push(Family::new(father, mother)));
    }

    for (index, link) in links.iter().enumerate() {
        let child = IndividualId(index);
        let (Some(father_key), Some(mother_key)) = (&link.father_key, &link.mother_key) else { continue };

        let father = ident.get(father_key).expect("parent resolved in the lexicographic-pair pass above");
        let mother = ident.get(mother_key).expect("parent resolved in the lexicographic-pair pass above");
        let family_id = by_parents[&(father, mother)];
        families.get_mut(family_id).children.push(child);
        arena.get_mut(child).family = Some(family_id);
    }

    families
}

fn resolve_or_synthesise(
    arena: &mut IndividualArena,
    ident: &mut IdentTable,
    key: &str,
    sex: Sex,
    warnings: &mut WarningSink,
) -> IndividualId {
    if let Some(id) = ident.get(key) {
        return id
    }
    warnings.push(format!("parent '{key}' is not listed as its own record; synthesising a founder"));
    let individual = Individual {
        original_id: key.to_string(),
        key: key.to_string(),
        sex,
        twin_token: None,
        hhid_token: None,
        family: None,
        pedigree: None,
        generation: None,
        canonical_index: None,
        twin_group: None,
        synthesised: true,
    };
    let id = IndividualId(arena.len());
    arena.push(individual);
    ident.insert(key.to_string(), id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn founder(key: &str, sex: Sex) -> Individual {
        Individual {
            original_id: key.to_string(),
            key: key.to_string(),
            sex,
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
    fn siblings_share_one_family() {
        let mut arena = IndividualArena::new();
        let mut ident = IdentTable::new();
        let father = arena.push(founder("F", Sex::Male));
        let mother = arena.push(founder("M", Sex::Female));
        ident.insert("F".into(), father);
        ident.insert("M".into(), mother);
        let child_a = arena.push(founder("A", Sex::Male));
        let child_b = arena.push(founder("B", Sex::Female));
        assert_eq!(child_a, IndividualId(2));
        assert_eq!(child_b, IndividualId(3));

        let parent_link = ParentLink { father_key: Some("F".into()), mother_key: Some("M".into()) };
        let links = vec![ParentLink::default(), ParentLink::default(), parent_link.clone(), parent_link];
        let mut warnings = WarningSink::new();
        let families = build_families(&mut arena, &mut ident, &links, &mut warnings);

        assert_eq!(families.len(), 1);
        assert_eq!(families.get(FamilyId(0)).children, vec![child_a, child_b]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_parent_is_synthesised_with_a_warning() {
        let mut arena = IndividualArena::new();
        let mut ident = IdentTable::new();
        let child = arena.push(founder("A", Sex::Male));
        assert_eq!(child, IndividualId(0));
        let links = vec![ParentLink { father_key: Some("F".into()), mother_key: Some("M".into()) }];
        let mut warnings = WarningSink::new();
        let families = build_families(&mut arena, &mut ident, &links, &mut warnings);

        assert_eq!(families.len(), 1);
        assert_eq!(warnings.len(), 2);
        assert_eq!(arena.len(), 3);
        assert!(arena.get(IndividualId(1)).synthesised);
        assert!(arena.get(IndividualId(2)).synthesised);
    }
}
