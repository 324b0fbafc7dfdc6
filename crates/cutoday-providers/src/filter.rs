//! Sponsor allow-list.
//!
//! A shared upstream account can carry events for many organizations. The
//! allow-list scopes a provider to the sponsors this site is meant to show.
//! Matching is on the sponsor name, exact and case-sensitive.

use std::collections::HashSet;

/// Restricts events to a configured set of sponsor names.
///
/// An empty filter allows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorFilter {
    allowed: HashSet<String>,
}

impl SponsorFilter {
    /// Creates a filter from sponsor names. Empty names are ignored.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: names
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.is_empty())
                .collect(),
        }
    }

    /// Returns true if no restriction is configured.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Returns true if an event with this sponsor should be kept.
    ///
    /// With a non-empty filter, events without a sponsor name are dropped.
    pub fn allows(&self, sponsor: Option<&str>) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        sponsor.is_some_and(|name| self.allowed.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_allows_everything() {
        let filter = SponsorFilter::default();
        assert!(filter.is_empty());
        assert!(filter.allows(Some("Anyone")));
        assert!(filter.allows(None));
    }

    #[test]
    fn exact_match_only() {
        let filter = SponsorFilter::new(["Utah Votes"]);
        assert!(filter.allows(Some("Utah Votes")));
        assert!(!filter.allows(Some("utah votes")));
        assert!(!filter.allows(Some("Utah Votes ")));
        assert!(!filter.allows(Some("Other Org")));
    }

    #[test]
    fn missing_sponsor_rejected_when_restricted() {
        let filter = SponsorFilter::new(vec!["Utah Votes".to_string()]);
        assert!(!filter.allows(None));
    }

    #[test]
    fn empty_names_ignored() {
        let filter = SponsorFilter::new(["", ""]);
        assert!(filter.is_empty());
    }
}
