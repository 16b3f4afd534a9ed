use std::collections::HashSet;

use crate::domain::RecipientId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Unique recipients parsed from free text, in first-seen order.
///
/// Tokens are split on newlines and commas, trimmed, and empty tokens dropped. Duplicates are
/// compared by exact trimmed text.
pub struct CandidateSet {
    ids: Vec<RecipientId>,
    duplicates: usize,
}

impl CandidateSet {
    pub fn parse(input: &str) -> Self {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut duplicates = 0;

        for token in input.split(['\n', ',']) {
            let Ok(id) = RecipientId::new(token) else {
                continue;
            };
            if seen.insert(id.clone()) {
                ids.push(id);
            } else {
                duplicates += 1;
            }
        }

        Self { ids, duplicates }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of non-empty tokens dropped as repeats of an earlier token.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn as_slice(&self) -> &[RecipientId] {
        &self.ids
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecipientId> {
        self.ids.iter()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a RecipientId;
    type IntoIter = std::slice::Iter<'a, RecipientId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(set: &CandidateSet) -> Vec<&str> {
        set.iter().map(RecipientId::raw).collect()
    }

    #[test]
    fn splits_trims_and_dedupes_in_first_seen_order() {
        let set = CandidateSet::parse("55911111111, 55922222222,55911111111\n 55933333333");
        assert_eq!(raw(&set), ["55911111111", "55922222222", "55933333333"]);
        assert_eq!(set.duplicates(), 1);
    }

    #[test]
    fn drops_empty_tokens_and_handles_crlf() {
        let set = CandidateSet::parse(",,\r\n  \n5511,\r\n5522\r\n,");
        assert_eq!(raw(&set), ["5511", "5522"]);
        assert_eq!(set.duplicates(), 0);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(CandidateSet::parse("").is_empty());
        assert!(CandidateSet::parse(" \n , \n").is_empty());
    }

    #[test]
    fn no_semantic_number_normalization() {
        let set = CandidateSet::parse("+5511, 5511, 55 11");
        assert_eq!(raw(&set), ["+5511", "5511", "55 11"]);
    }

    #[test]
    fn size_matches_distinct_trimmed_tokens() {
        let input = "a, b ,a,\nc\n\n b,d,c";
        let set = CandidateSet::parse(input);
        let distinct = input
            .split(['\n', ','])
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect::<HashSet<_>>();
        assert_eq!(set.len(), distinct.len());
        assert_eq!(set.duplicates(), 3);
    }
}
