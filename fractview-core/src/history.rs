use crate::viewport::Viewport;

/// Upper bound on stored snapshots; the oldest entry is dropped beyond it.
pub const MAX_HISTORY: usize = 200;

/// Stack of previously displayed viewports. Undo pops; there is no redo.
#[derive(Debug, Clone, Default)]
pub struct ViewHistory {
    entries: Vec<Viewport>,
}

impl ViewHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, viewport: Viewport) {
        self.entries.push(viewport);
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
    }

    pub fn pop(&mut self) -> Option<Viewport> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&Viewport> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex;

    fn vp(scale: f64) -> Viewport {
        Viewport::new(Complex::ZERO, scale, 10, 10).unwrap()
    }

    #[test]
    fn lifo_order() {
        let mut h = ViewHistory::new();
        h.push(vp(1.0));
        h.push(vp(2.0));
        assert_eq!(h.peek(), Some(&vp(2.0)));
        assert_eq!(h.pop(), Some(vp(2.0)));
        assert_eq!(h.pop(), Some(vp(1.0)));
        assert_eq!(h.pop(), None);
        assert!(h.is_empty());
    }

    #[test]
    fn oldest_entry_dropped_at_capacity() {
        let mut h = ViewHistory::new();
        for i in 0..MAX_HISTORY + 5 {
            h.push(vp(1.0 + i as f64));
        }
        assert_eq!(h.len(), MAX_HISTORY);
        let mut last = None;
        while let Some(v) = h.pop() {
            last = Some(v);
        }
        assert_eq!(last, Some(vp(6.0)));
    }
}
