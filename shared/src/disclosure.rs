//! Disclosure Controller: how many leading filtered items are revealed.
//!
//! The rendering layer watches a trailing sentinel and reports proximity;
//! the controller decides whether that is worth another page. Proximity
//! bursts are collapsed to one step per frame id.

use crate::PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclosure {
    count: usize,
    page_size: usize,
    /// Last frame/batch id that produced an advance.
    last_frame: Option<u64>,
}

impl Default for Disclosure {
    fn default() -> Self {
        Disclosure::new(PAGE_SIZE)
    }
}

impl Disclosure {
    /// A zero page size falls back to the default.
    pub fn new(page_size: usize) -> Self {
        let page_size = if page_size == 0 { PAGE_SIZE } else { page_size };
        Disclosure {
            count: page_size,
            page_size,
            last_frame: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Raw reveal count. May exceed the filtered length right after a
    /// reset; use `revealed` for slicing.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of items to show out of `len`.
    pub fn revealed(&self, len: usize) -> usize {
        self.count.min(len)
    }

    pub fn has_more(&self, len: usize) -> bool {
        self.count < len
    }

    /// Reveal one more page, capped at `len`. No-op once everything is
    /// revealed. Returns true if the count changed.
    pub fn advance(&mut self, len: usize) -> bool {
        if !self.has_more(len) {
            return false;
        }
        self.count = (self.count + self.page_size).min(len);
        true
    }

    /// Proximity signal from the sentinel. Advances at most once per
    /// `frame` id; repeated signals for the same frame are dropped.
    pub fn on_proximity(&mut self, frame: u64, len: usize) -> bool {
        if self.last_frame == Some(frame) {
            return false;
        }
        if self.advance(len) {
            self.last_frame = Some(frame);
            true
        } else {
            false
        }
    }

    /// Back to one page.
    pub fn reset(&mut self) {
        self.count = self.page_size;
        self.last_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one_page() {
        let d = Disclosure::default();
        assert_eq!(d.count(), 30);
        assert_eq!(d.revealed(100), 30);
        assert_eq!(d.revealed(2), 2);
        assert!(d.has_more(31));
        assert!(!d.has_more(30));
    }

    #[test]
    fn test_advance_converges_and_is_monotonic() {
        let mut d = Disclosure::new(30);
        let len = 95;
        let mut previous = d.count();
        let mut steps = 0;
        while d.advance(len) {
            assert!(d.count() >= previous);
            previous = d.count();
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(d.count(), len);
        assert!(!d.advance(len));
        assert_eq!(d.count(), len);
    }

    #[test]
    fn test_advance_never_shrinks_when_list_is_short() {
        let mut d = Disclosure::new(30);
        assert!(!d.advance(2));
        assert_eq!(d.count(), 30);
        assert_eq!(d.revealed(2), 2);
    }

    #[test]
    fn test_proximity_burst_advances_once_per_frame() {
        let mut d = Disclosure::new(10);
        assert!(d.on_proximity(1, 100));
        assert!(!d.on_proximity(1, 100));
        assert!(!d.on_proximity(1, 100));
        assert_eq!(d.count(), 20);
        assert!(d.on_proximity(2, 100));
        assert_eq!(d.count(), 30);
    }

    #[test]
    fn test_reset_returns_to_one_page() {
        let mut d = Disclosure::new(10);
        d.on_proximity(7, 100);
        d.reset();
        assert_eq!(d.count(), 10);
        assert!(d.on_proximity(7, 100));
    }

    #[test]
    fn test_zero_page_size_uses_default() {
        assert_eq!(Disclosure::new(0).page_size(), PAGE_SIZE);
    }
}
