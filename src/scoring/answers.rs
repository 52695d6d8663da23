use crate::error::Result;
use crate::types::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selected option keys per criterion id. Absent criteria are unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    selections: BTreeMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer after resolving `input` against the catalog
    /// (option key, label or 1-based position). Returns the stored key.
    pub fn answer(&mut self, catalog: &Catalog, criterion_id: &str, input: &str) -> Result<String> {
        let (_, criterion) = catalog.criterion(criterion_id)?;
        let option = criterion.resolve_option(input)?;
        self.selections
            .insert(criterion.id.clone(), option.key.clone());
        Ok(option.key.clone())
    }

    /// Stores an option key without catalog checks; the scoring engine
    /// rejects unknown keys.
    pub fn insert(&mut self, criterion_id: impl Into<String>, option_key: impl Into<String>) {
        self.selections
            .insert(criterion_id.into(), option_key.into());
    }

    pub fn clear(&mut self, criterion_id: &str) -> bool {
        self.selections.remove(criterion_id).is_some()
    }

    pub fn get(&self, criterion_id: &str) -> Option<&str> {
        self.selections.get(criterion_id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .map(|(criterion, option)| (criterion.as_str(), option.as_str()))
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            selections: iter
                .into_iter()
                .map(|(criterion, option)| (criterion.into(), option.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::error::SiteScoreError;

    #[test]
    fn answer_resolves_labels_to_keys() {
        let catalog = catalog::builtin("standard").expect("standard loads");
        let mut answers = AnswerSet::new();
        let key = answers
            .answer(&catalog, "parking", "ample parking")
            .expect("label resolves");
        assert_eq!(key, "ample");
        assert_eq!(answers.get("parking"), Some("ample"));
    }

    #[test]
    fn answer_rejects_unknown_criterion_and_option() {
        let catalog = catalog::builtin("standard").expect("standard loads");
        let mut answers = AnswerSet::new();
        assert!(matches!(
            answers.answer(&catalog, "helipad", "yes"),
            Err(SiteScoreError::UnknownCriterion(_))
        ));
        assert!(matches!(
            answers.answer(&catalog, "parking", "valet"),
            Err(SiteScoreError::UnknownOption { .. })
        ));
        assert!(answers.is_empty());
    }

    #[test]
    fn clear_reports_whether_an_answer_was_removed() {
        let mut answers: AnswerSet = [("parking", "ample")].into_iter().collect();
        assert!(answers.clear("parking"));
        assert!(!answers.clear("parking"));
    }
}
