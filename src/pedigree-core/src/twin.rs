use std::collections::HashMap;

use crate::{
    error_sink::ErrorSink,
    family::FamilyArena,
    individual::{IndividualArena, IndividualId, Sex},
};

/// Groups individuals sharing a (family, twin token) pair into sequentially-numbered twin groups.
///
/// Two individuals belong to the same twin group only if they share both a nuclear family and a
/// twin token; same-token individuals from different families never collide because the grouping
/// key is derived from the family, not the token alone. A twin group whose members don't all
/// share the same sex is flagged as an error: MZ twins cannot differ in sex.
pub fn assign_twin_groups(arena: &mut IndividualArena, families: &FamilyArena, errors: &mut ErrorSink) {
    let mut groups: HashMap<(Option<usize>, String), Vec<IndividualId>> = HashMap::new();

    for id in arena.iter_ids() {
        let individual = arena.get(id);
        let Some(token) = &individual.twin_token else { continue };
        let family_key = individual.family.map(|f| f.0);
        groups.entry((family_key, token.clone())).or_default().push(id);
    }

    let mut next_group = 0usize;
    let mut ordered: Vec<_> = groups.into_iter().collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    for ((_family, token), members) in ordered {
        if members.len() < 2 {
            continue
        }
        let mut sexes: Vec<Sex> = members.iter().map(|id| arena.get(*id).sex).collect();
        sexes.dedup();
        if sexes.len() > 1 {
            errors.push(format!("twin group '{token}' contains members of differing sex"));
        }
        let group_index = next_group;
        next_group += 1;
        for id in members {
            arena.get_mut(id).twin_group = Some(group_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Individual;

    fn individual(key: &str, sex: Sex, twin: Option<&str>) -> Individual {
        Individual {
            original_id: key.to_string(),
            key: key.to_string(),
            sex,
            twin_token: twin.map(str::to_string),
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
    fn pairs_same_family_same_token_into_one_group() {
        let mut arena = IndividualArena::new();
        arena.push(individual("A", Sex::Male, Some("1")));
        arena.push(individual("B", Sex::Male, Some("1")));
        let families = FamilyArena::new();
        let mut errors = ErrorSink::new();
        assign_twin_groups(&mut arena, &families, &mut errors);
        assert!(errors.is_empty());
        assert_eq!(arena.get(IndividualId(0)).twin_group, Some(0));
        assert_eq!(arena.get(IndividualId(1)).twin_group, Some(0));
    }

    #[test]
    fn singleton_token_gets_no_group() {
        let mut arena = IndividualArena::new();
        arena.push(individual("A", Sex::Male, Some("1")));
        let families = FamilyArena::new();
        let mut errors = ErrorSink::new();
        assign_twin_groups(&mut arena, &families, &mut errors);
        assert_eq!(arena.get(IndividualId(0)).twin_group, None);
    }

    #[test]
    fn mismatched_sex_within_a_twin_group_is_an_error() {
        let mut arena = IndividualArena::new();
        arena.push(individual("A", Sex::Male, Some("1")));
        arena.push(individual("B", Sex::Female, Some("1")));
        let families = FamilyArena::new();
        let mut errors = ErrorSink::new();
        assign_twin_groups(&mut arena, &families, &mut errors);
        assert_eq!(errors.len(), 1);
    }
}
