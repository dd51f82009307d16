use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into the original query string.
///
/// Shared by tokens, AST nodes, diagnostics and suggestion replacement
/// ranges so every consumer speaks the same coordinates.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("[{start}, {end})")]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl Location {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width location at `offset`.
    pub const fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Like `contains` but also true when `offset` sits right after the node.
    pub const fn touches(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// True when `other` lies entirely within `self`.
    pub const fn covers(&self, other: &Location) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &Location) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Smallest location spanning both.
    pub fn join(&self, other: &Location) -> Location {
        Location::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Slice of `text` under this location, clamped to the text bounds.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        let end = self.end.min(text.len());
        let start = self.start.min(end);
        text.get(start..end).unwrap_or_default()
    }
}

impl From<(usize, usize)> for Location {
    fn from((start, end): (usize, usize)) -> Self {
        Location::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment() {
        let loc = Location::new(5, 9);
        assert!(loc.contains(5));
        assert!(!loc.contains(9));
        assert!(loc.touches(9));
        assert!(loc.covers(&Location::new(6, 9)));
        assert!(!loc.covers(&Location::new(4, 6)));
    }

    #[test]
    fn overlap_and_join() {
        let a = Location::new(0, 4);
        let b = Location::new(4, 8);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Location::new(3, 5)));
        assert_eq!(a.join(&b), Location::new(0, 8));
    }

    #[test]
    fn slicing_is_clamped() {
        let text = "FROM logs";
        assert_eq!(Location::new(5, 9).slice(text), "logs");
        assert_eq!(Location::new(5, 40).slice(text), "logs");
        assert_eq!(Location::new(40, 50).slice(text), "");
    }

    #[test]
    fn display_and_serde() {
        let loc = Location::new(3, 7);
        assert_eq!(loc.to_string(), "[3, 7)");
        assert_eq!(
            serde_json::to_string(&loc).unwrap(),
            r#"{"start":3,"end":7}"#
        );
    }
}
