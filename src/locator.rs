//! Element locators
//!
//! A [`Locator`] is a description of how to find elements, not a handle to
//! them. Drivers resolve it against the live DOM on every call, so a locator
//! declared before its element exists is still valid once it appears.

use std::fmt;

/// Re-resolvable reference to zero or more elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: String,
    index: Option<usize>,
}

impl Locator {
    /// Locate by CSS selector
    pub fn css<S: Into<String>>(selector: S) -> Self {
        Self {
            selector: selector.into(),
            index: None,
        }
    }

    /// Locate anything matching any of the selectors (CSS selector list)
    pub fn any_of<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = selectors
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Self::css(joined)
    }

    /// Restrict to the match at `index` (zero based)
    pub fn nth(&self, index: usize) -> Self {
        Self {
            selector: self.selector.clone(),
            index: Some(index),
        }
    }

    /// Restrict to the first match
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Descendants of this locator's matches
    pub fn descendant(&self, selector: &str) -> Self {
        let scoped = self
            .parts()
            .map(|outer| format!("{} {}", outer, selector.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        Self::css(scoped)
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Individual selectors of a selector list
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.selector.split(',').map(str::trim).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{} >> nth={}", self.selector, i),
            None => f.write_str(&self.selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_of_joins_and_skips_blanks() {
        let locator = Locator::any_of([".a", " ", ".b "]);
        assert_eq!(locator.selector(), ".a, .b");
        assert_eq!(locator.parts().collect::<Vec<_>>(), vec![".a", ".b"]);
    }

    #[test]
    fn test_nth_keeps_selector() {
        let rows = Locator::css("table tbody tr");
        let third = rows.nth(2);
        assert_eq!(third.selector(), rows.selector());
        assert_eq!(third.index(), Some(2));
        assert_eq!(rows.index(), None);
        assert_eq!(third.to_string(), "table tbody tr >> nth=2");
    }

    #[test]
    fn test_descendant_scopes_every_part() {
        let table = Locator::css("table.data, .grid");
        let rows = table.descendant("tbody tr");
        assert_eq!(rows.selector(), "table.data tbody tr, .grid tbody tr");
    }
}
