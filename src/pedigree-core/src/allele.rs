use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlleleId(pub usize);

/// Interns allele codes into dense ids, so downstream frequency tables and genotype storage
/// don't repeatedly clone allele strings.
#[derive(Debug, Default)]
pub struct AlleleInterner {
    by_code: BTreeMap<String, AlleleId>,
    codes: Vec<String>,
}

impl AlleleInterner {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn intern(&mut self, code: &str) -> AlleleId {
        if let Some(&id) = self.by_code.get(code) {
            return id
        }
        let id = AlleleId(self.codes.len());
        self.codes.push(code.to_string());
        self.by_code.insert(code.to_string(), id);
        id
    }

    #[must_use]
    pub fn code(&self, id: AlleleId) -> &str { &self.codes[id.0] }

    #[must_use]
    pub fn len(&self) -> usize { self.codes.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.codes.is_empty() }

    /// All interned codes, sorted numerically if every one of them parses as an integer,
    /// lexicographically otherwise. Mixed numeric/non-numeric allele panels fall back to
    /// lexicographic order rather than silently misordering the numeric ones.
    #[must_use]
    pub fn sorted_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.codes.iter().map(String::as_str).collect();
        let all_numeric = codes.iter().all(|c| c.parse::<i64>().is_ok());
        if all_numeric {
            codes.sort_by_key(|c| c.parse::<i64>().expect("validated numeric above"));
        } else {
            codes.sort_unstable();
        }
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_the_same_code_twice_returns_the_same_id() {
        let mut interner = AlleleInterner::new();
        let a = interner.intern("101");
        let b = interner.intern("103");
        let a_again = interner.intern("101");
        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn sorts_numeric_codes_numerically_not_lexicographically() {
        let mut interner = AlleleInterner::new();
        interner.intern("100");
        interner.intern("9");
        interner.intern("20");
        assert_eq!(interner.sorted_codes(), vec!["9", "20", "100"]);
    }

    #[test]
    fn falls_back_to_lexicographic_order_for_non_numeric_codes() {
        let mut interner = AlleleInterner::new();
        interner.intern("B");
        interner.intern("A");
        assert_eq!(interner.sorted_codes(), vec!["A", "B"]);
    }
}
