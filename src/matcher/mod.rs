//! Keyword inclusion/exclusion rules.
//!
//! Terms and entry text are both folded with
//! [`normalize_for_match`](crate::normalizer::normalize_for_match) before
//! comparison, so `"climático"` matches `"CLIMATICO"`.
//!
//! The default [`MatchMode::Substring`] does plain containment with no word
//! boundaries: a short term such as `"art"` also matches `"party"`.
//! [`MatchMode::WordBoundary`] avoids that at the cost of missing inflected
//! forms.

use crate::domain::Entry;
use crate::normalizer::{normalize_for_match, strip_html};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    Substring,
    WordBoundary,
}

/// A keyword in its configured surface form and its folded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub original: String,
    pub normalized: String,
}

impl Term {
    pub fn new(original: &str) -> Option<Self> {
        let original = original.trim();
        let normalized = normalize_for_match(original);
        if normalized.trim().is_empty() {
            return None;
        }
        Some(Self {
            original: original.to_string(),
            normalized,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// An exclude term hit; carries the term as configured.
    Excluded { term: String },
    /// The include list is non-empty and none of its terms hit.
    Missed,
    /// Deliverable. `terms` holds every include term that hit, as configured;
    /// it is empty when the include list is empty.
    Matched { terms: Vec<String> },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeywordRules {
    include: Vec<Term>,
    exclude: Vec<Term>,
    mode: MatchMode,
}

impl KeywordRules {
    /// Build rules from raw term lists. Blank terms and terms that fold to the
    /// same text as an earlier one are dropped.
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            include: collect_terms(include),
            exclude: collect_terms(exclude),
            mode: MatchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn include(&self) -> &[Term] {
        &self.include
    }

    pub fn exclude(&self) -> &[Term] {
        &self.exclude
    }

    /// Evaluate an entry. Exclusion is checked first and always wins.
    pub fn evaluate(&self, entry: &Entry) -> MatchResult {
        self.evaluate_text(&haystack(entry))
    }

    /// Evaluate already-normalized text.
    pub fn evaluate_text(&self, haystack: &str) -> MatchResult {
        if let Some(term) = self.exclude.iter().find(|t| self.contains(haystack, t)) {
            return MatchResult::Excluded {
                term: term.original.clone(),
            };
        }

        if self.include.is_empty() {
            return MatchResult::Matched { terms: Vec::new() };
        }

        let terms: Vec<String> = self
            .include
            .iter()
            .filter(|t| self.contains(haystack, t))
            .map(|t| t.original.clone())
            .collect();

        if terms.is_empty() {
            MatchResult::Missed
        } else {
            MatchResult::Matched { terms }
        }
    }

    fn contains(&self, haystack: &str, term: &Term) -> bool {
        match self.mode {
            MatchMode::Substring => haystack.contains(term.normalized.as_str()),
            MatchMode::WordBoundary => contains_word(haystack, &term.normalized),
        }
    }
}

fn collect_terms<I, S>(raw: I) -> Vec<Term>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut terms: Vec<Term> = Vec::new();
    for term in raw.into_iter().filter_map(|s| Term::new(s.as_ref())) {
        if !terms.iter().any(|t| t.normalized == term.normalized) {
            terms.push(term);
        }
    }
    terms
}

/// Normalized title, snippet, categories and link joined by spaces.
pub fn haystack(entry: &Entry) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3 + entry.categories.len());
    if let Some(title) = &entry.title {
        parts.push(title.clone());
    }
    if let Some(summary) = &entry.summary {
        parts.push(strip_html(summary));
    }
    parts.extend(entry.categories.iter().cloned());
    if let Some(link) = &entry.link {
        parts.push(link.clone());
    }
    normalize_for_match(&parts.join(" "))
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    let is_word = |c: Option<char>| c.is_some_and(char::is_alphanumeric);
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !is_word(before) && !is_word(after)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, summary: &str) -> Entry {
        Entry {
            title: Some(title.into()),
            summary: Some(summary.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let rules = KeywordRules::new(["storm"], ["sport"]);
        let result = rules.evaluate(&entry("Storm disrupts sport events", ""));
        assert_eq!(
            result,
            MatchResult::Excluded {
                term: "sport".into()
            }
        );
        assert!(!result.is_match());
    }

    #[test]
    fn test_collects_all_include_terms_in_original_form() {
        let rules = KeywordRules::new(["Lluvia", "Cambio Climático", "sequía"], Vec::<String>::new());
        let result = rules.evaluate(&entry(
            "La LLUVIA no llega",
            "<p>El cambio climatico agrava la sequia</p>",
        ));
        assert_eq!(
            result,
            MatchResult::Matched {
                terms: vec!["Lluvia".into(), "Cambio Climático".into(), "sequía".into()]
            }
        );
    }

    #[test]
    fn test_include_miss() {
        let rules = KeywordRules::new(["volcano"], Vec::<String>::new());
        assert_eq!(
            rules.evaluate(&entry("Quiet day", "nothing happened")),
            MatchResult::Missed
        );
    }

    #[test]
    fn test_empty_include_matches_everything_not_excluded() {
        let rules = KeywordRules::new(Vec::<String>::new(), ["horoscope"]);
        assert_eq!(
            rules.evaluate(&entry("Anything", "")),
            MatchResult::Matched { terms: vec![] }
        );
        assert!(!rules.evaluate(&entry("Daily Horoscope", "")).is_match());
    }

    #[test]
    fn test_haystack_covers_categories_and_link() {
        let rules = KeywordRules::new(["energia", "renewables"], Vec::<String>::new());
        let e = Entry {
            title: Some("Quarterly report".into()),
            categories: vec!["Energía".into()],
            link: Some("https://example.com/renewables/report".into()),
            ..Default::default()
        };
        assert_eq!(
            rules.evaluate(&e),
            MatchResult::Matched {
                terms: vec!["energia".into(), "renewables".into()]
            }
        );
    }

    #[test]
    fn test_substring_mode_over_matches_inside_words() {
        let rules = KeywordRules::new(["art"], Vec::<String>::new());
        assert!(rules.evaluate(&entry("Party tonight", "")).is_match());
    }

    #[test]
    fn test_word_boundary_mode() {
        let rules =
            KeywordRules::new(["art", "sol"], Vec::<String>::new()).with_mode(MatchMode::WordBoundary);
        assert!(!rules.evaluate(&entry("Party tonight", "")).is_match());
        assert!(rules.evaluate(&entry("Modern art, again", "")).is_match());
        assert_eq!(
            rules.evaluate_text("el sol. solar"),
            MatchResult::Matched {
                terms: vec!["sol".into()]
            }
        );
    }

    #[test]
    fn test_blank_and_duplicate_terms_dropped() {
        let rules = KeywordRules::new(["  ", "Perú", "peru", ""], Vec::<String>::new());
        assert_eq!(rules.include().len(), 1);
        assert_eq!(rules.include()[0].original, "Perú");
        assert_eq!(rules.include()[0].normalized, "peru");
    }
}
