use crate::geometry::{Insets, IntRect};

/// Drawable area of a view laid out at `assigned`, in view-local coordinates.
pub fn outer_bounds(assigned: IntRect, padding: Insets) -> IntRect {
    IntRect::new(
        padding.left,
        padding.top,
        assigned.width().saturating_sub(padding.right),
        assigned.height().saturating_sub(padding.bottom),
    )
}

/// Outer bounds cached against the rectangle they were computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsCache {
    assigned: Option<IntRect>,
    bounds: IntRect,
}

impl BoundsCache {
    pub fn bounds(&self) -> IntRect {
        self.bounds
    }

    /// Recomputes the bounds if `assigned` moved or resized. Returns whether it did.
    pub fn update(&mut self, assigned: IntRect, padding: Insets) -> bool {
        if self.assigned == Some(assigned) {
            return false;
        }
        self.assigned = Some(assigned);
        self.bounds = outer_bounds(assigned, padding);
        true
    }

    /// Forces the next `update` to recompute, e.g. after a padding change.
    pub fn invalidate(&mut self) {
        self.assigned = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_subtract_padding() {
        let bounds = outer_bounds(IntRect::new(100, 50, 1100, 650), Insets::new(10, 20, 30, 40));
        assert_eq!(bounds, IntRect::new(10, 20, 970, 560));
    }

    #[test]
    fn bounds_are_position_independent() {
        let padding = Insets::uniform(5);
        assert_eq!(
            outer_bounds(IntRect::new(0, 0, 200, 100), padding),
            outer_bounds(IntRect::new(300, 300, 500, 400), padding),
        );
    }

    #[test]
    fn extreme_padding_saturates() {
        let bounds = outer_bounds(IntRect::from_size(900, 524), Insets::uniform(i32::MIN));
        assert_eq!(bounds, IntRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX));
    }

    #[test]
    fn cache_skips_unchanged_rect() {
        let mut cache = BoundsCache::default();
        let rect = IntRect::from_size(400, 300);
        assert!(cache.update(rect, Insets::default()));
        assert!(!cache.update(rect, Insets::uniform(50)));
        assert_eq!(cache.bounds(), IntRect::from_size(400, 300));
        assert!(cache.update(IntRect::new(1, 0, 401, 300), Insets::default()));
        cache.invalidate();
        assert!(cache.update(IntRect::new(1, 0, 401, 300), Insets::uniform(50)));
        assert_eq!(cache.bounds(), IntRect::new(50, 50, 350, 250));
    }
}
