//! Viewport observation for the end-of-feed sentinel.

use std::cell::Cell;
use std::rc::Rc;

/// Marker row placed after the last feed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sentinel {
    /// Rows before the end of the content at which the sentinel already counts
    /// as visible. `0` means the row right after the last line.
    pub lead: usize,
}

/// Something that can report when a sentinel scrolls into view.
pub trait ViewportObserver {
    /// Watches `sentinel` until the returned subscription is cancelled or dropped.
    fn observe(&mut self, sentinel: Sentinel) -> Subscription;
}

/// Handle to one observation. Dropping it releases the observation.
#[derive(Debug)]
pub struct Subscription {
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug)]
struct Watch {
    sentinel: Sentinel,
    active: Rc<Cell<bool>>,
    visible: bool,
}

/// A scrollable window of `height` rows over `content_len` rows of content,
/// followed by one sentinel row.
#[derive(Debug, Default)]
pub struct ListViewport {
    content_len: usize,
    offset: usize,
    height: usize,
    watches: Vec<Watch>,
}

impl ListViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn content_len(&self) -> usize {
        self.content_len
    }

    pub fn set_content_len(&mut self, len: usize) {
        self.content_len = len;
        self.clamp();
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.clamp();
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.offset = self.offset.saturating_add_signed(delta);
        self.clamp();
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Content plus the sentinel row.
    fn total_rows(&self) -> usize {
        self.content_len + 1
    }

    fn max_offset(&self) -> usize {
        self.total_rows().saturating_sub(self.height)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    fn is_visible(&self, sentinel: &Sentinel) -> bool {
        if self.height == 0 {
            return false;
        }
        let row = self.content_len.saturating_sub(sentinel.lead);
        row < self.offset + self.height
    }

    /// Re-evaluates every live watch. Returns `true` if any sentinel went from
    /// hidden to visible since the last call.
    pub fn sync(&mut self) -> bool {
        self.watches.retain(|w| w.active.get());

        let mut fired = false;
        for i in 0..self.watches.len() {
            let visible = self.is_visible(&self.watches[i].sentinel);
            let watch = &mut self.watches[i];
            if visible && !watch.visible {
                fired = true;
            }
            watch.visible = visible;
        }
        fired
    }
}

impl ViewportObserver for ListViewport {
    fn observe(&mut self, sentinel: Sentinel) -> Subscription {
        let active = Rc::new(Cell::new(true));
        self.watches.push(Watch {
            sentinel,
            active: Rc::clone(&active),
            visible: false,
        });
        Subscription { active }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(content_len: usize, height: usize) -> ListViewport {
        let mut vp = ListViewport::new();
        vp.set_height(height);
        vp.set_content_len(content_len);
        vp
    }

    #[test]
    fn test_fires_once_per_transition() {
        let mut vp = viewport(20, 5);
        let _sub = vp.observe(Sentinel::default());
        assert!(!vp.sync());

        vp.scroll_to_bottom();
        assert!(vp.sync());
        assert!(!vp.sync());

        vp.scroll_by(-1);
        assert!(!vp.sync());
        vp.scroll_by(-10);
        assert!(!vp.sync());
        vp.scroll_by(20);
        assert!(vp.sync());
    }

    #[test]
    fn test_new_subscription_fires_if_already_visible() {
        let mut vp = viewport(2, 10);
        let first = vp.observe(Sentinel::default());
        assert!(vp.sync());
        assert!(!vp.sync());

        drop(first);
        let _second = vp.observe(Sentinel::default());
        assert!(vp.sync());
    }

    #[test]
    fn test_cancelled_subscription_never_fires() {
        let mut vp = viewport(20, 5);
        let sub = vp.observe(Sentinel::default());
        sub.cancel();
        assert!(!sub.is_active());
        vp.scroll_to_bottom();
        assert!(!vp.sync());
    }

    #[test]
    fn test_dropped_subscription_is_released() {
        let mut vp = viewport(20, 5);
        {
            let _sub = vp.observe(Sentinel::default());
        }
        vp.scroll_to_bottom();
        assert!(!vp.sync());
        assert!(vp.watches.is_empty());
    }

    #[test]
    fn test_growing_content_hides_sentinel() {
        let mut vp = viewport(10, 5);
        let _sub = vp.observe(Sentinel::default());
        vp.scroll_to_bottom();
        assert!(vp.sync());

        vp.set_content_len(30);
        assert_eq!(vp.content_len(), 30);
        assert!(!vp.sync());
        vp.scroll_to_bottom();
        assert!(vp.sync());
    }

    #[test]
    fn test_lead_rows() {
        let mut vp = viewport(20, 5);
        let _sub = vp.observe(Sentinel { lead: 3 });
        vp.scroll_by(12);
        assert!(!vp.sync());
        vp.scroll_by(1);
        assert!(vp.sync());
    }

    #[test]
    fn test_zero_height_sees_nothing() {
        let mut vp = viewport(0, 0);
        let _sub = vp.observe(Sentinel::default());
        assert!(!vp.sync());
    }

    #[test]
    fn test_scroll_clamps() {
        let mut vp = viewport(10, 4);
        vp.scroll_by(-3);
        assert_eq!(vp.offset(), 0);
        vp.scroll_by(100);
        assert_eq!(vp.offset(), 7);
        vp.set_content_len(5);
        assert_eq!(vp.offset(), 2);
        vp.scroll_to_top();
        assert_eq!(vp.offset(), 0);
    }
}
