use thiserror::Error;

use crate::{
    error_sink::{ErrorSink, WarningSink},
    ident::{make_key, IdentTable},
    individual::{Individual, IndividualArena, IndividualId, Sex},
};
use pedigree_io::read::RawPedRecord;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("ingest phase recorded {0} error(s); see the error sink for detail")]
    PhaseAborted(usize),
}

/// A father/mother key pair pending resolution by the family builder. `None` on both sides means
/// the individual is a founder.
#[derive(Debug, Clone, Default)]
pub struct ParentLink {
    pub father_key: Option<String>,
    pub mother_key: Option<String>,
}

pub struct IngestOutcome {
    pub arena: IndividualArena,
    pub ident: IdentTable,
    pub links: Vec<ParentLink>,
    pub errors: ErrorSink,
    pub warnings: WarningSink,
}

/// A field is "blank" when every character is a space, a tab, or the digit `0`.
#[must_use]
pub fn is_blank(field: &str) -> bool {
    field.chars().all(|c| c == ' ' || c == '\t' || c == '0')
}

fn parse_sex(field: &str) -> Option<Sex> {
    match field.trim() {
        "1" | "M" | "m" => Some(Sex::Male),
        "2" | "F" | "f" => Some(Sex::Female),
        "" | "0" | "U" | "u" => Some(Sex::Unknown),
        _ => None,
    }
}

/// Ingest a stream of raw pedigree records: validate field values and register individuals,
/// without yet resolving parent links into families (that is the family builder's job).
///
/// # Errors
/// Propagates I/O errors from the underlying reader. Record-level validation problems are
/// accumulated into the returned `errors`/`warnings` sinks rather than short-circuiting ingest,
/// to maximise diagnostic yield from a single run.
pub fn ingest_records(
    records: impl Iterator<Item = anyhow::Result<RawPedRecord>>,
) -> anyhow::Result<IngestOutcome> {
    let mut arena = IndividualArena::new();
    let mut ident = IdentTable::new();
    let mut links = Vec::new();
    let mut errors = ErrorSink::new();
    let mut warnings = WarningSink::new();

    for record in records {
        let record = record?;
        let line = record.line_no;

        let id = record.id.trim().to_string();
        let key = make_key(record.famid.as_deref(), &id);

        let sex = match parse_sex(&record.sex) {
            Some(sex) => sex,
            None => {
                errors.push(format!("line {line}: invalid sex code '{}'", record.sex.trim()));
                Sex::Unknown
            }
        };

        let father_raw = record.father.trim().to_string();
        let mother_raw = record.mother.trim().to_string();
        let father_blank = is_blank(&father_raw);
        let mother_blank = is_blank(&mother_raw);

        let (father_key, mother_key) = match (father_blank, mother_blank) {
            (true, true) => (None, None),
            (false, false) => {
                let fkey = make_key(record.famid.as_deref(), &father_raw);
                let mkey = make_key(record.famid.as_deref(), &mother_raw);
                (Some(fkey), Some(mkey))
            }
            _ => {
                errors.push(format!("line {line}: individual {id} has exactly one parent specified"));
                (None, None)
            }
        };

        if let Some(fkey) = &father_key {
            if *fkey == key {
                errors.push(format!("line {line}: individual {id} is listed as their own father"));
            }
        }
        if let Some(mkey) = &mother_key {
            if *mkey == key {
                errors.push(format!("line {line}: individual {id} is listed as their own mother"));
            }
        }
        if let (Some(fkey), Some(mkey)) = (&father_key, &mother_key) {
            if fkey == mkey {
                errors.push(format!("line {line}: father and mother of {id} are the same individual"));
            }
        }

        let twin_token = record.twin.as_deref().and_then(|t| (!is_blank(t)).then(|| t.trim().to_string()));
        let hhid_token = record.hhid.as_deref().and_then(|t| (!is_blank(t)).then(|| t.trim().to_string()));

        let individual = Individual {
            original_id: id,
            key: key.clone(),
            sex,
            twin_token,
            hhid_token,
            family: None,
            pedigree: None,
            generation: None,
            canonical_index: None,
            twin_group: None,
            synthesised: false,
        };

        let new_id = IndividualId(arena.len());
        if !ident.insert(key.clone(), new_id) {
            errors.push(format!("line {line}: duplicate individual identifier '{key}'"));
            continue
        }
        arena.push(individual);
        links.push(ParentLink { father_key, mother_key });
    }

    Ok(IngestOutcome { arena, ident, links, errors, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(line_no: usize, id: &str, father: &str, mother: &str, sex: &str) -> anyhow::Result<RawPedRecord> {
        Ok(RawPedRecord {
            line_no,
            famid: None,
            id: id.to_string(),
            father: father.to_string(),
            mother: mother.to_string(),
            sex: sex.to_string(),
            twin: None,
            hhid: None,
        })
    }

    #[test]
    fn founder_has_no_parent_keys() -> anyhow::Result<()> {
        let records = vec![rec(1, "F1", "0", "0", "1")];
        let outcome = ingest_records(records.into_iter())?;
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.links[0].father_key, None);
        assert_eq!(outcome.links[0].mother_key, None);
        Ok(())
    }

    #[test]
    fn one_blank_parent_is_an_error() -> anyhow::Result<()> {
        let records = vec![rec(1, "C1", "F1", "0", "1")];
        let outcome = ingest_records(records.into_iter())?;
        assert!(!outcome.errors.is_empty());
        Ok(())
    }

    #[test]
    fn self_parentage_is_an_error() -> anyhow::Result<()> {
        let records = vec![rec(1, "F1", "F1", "M1", "1")];
        let outcome = ingest_records(records.into_iter())?;
        assert!(!outcome.errors.is_empty());
        Ok(())
    }

    #[test]
    fn duplicate_id_is_an_error_and_skipped() -> anyhow::Result<()> {
        let records = vec![rec(1, "F1", "0", "0", "1"), rec(2, "F1", "0", "0", "1")];
        let outcome = ingest_records(records.into_iter())?;
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.arena.len(), 1);
        Ok(())
    }

    #[test]
    fn invalid_sex_code_defaults_to_unknown_and_errors() -> anyhow::Result<()> {
        let records = vec![rec(1, "F1", "0", "0", "X")];
        let outcome = ingest_records(records.into_iter())?;
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.arena.get(IndividualId(0)).sex, Sex::Unknown);
        Ok(())
    }
}
