// ── Outside-interaction tracking for the suggestion dropdown ──
//
// Press and release are tracked separately: a drag that starts inside the
// input (e.g. selecting text) and ends outside must not close the list.

/// Where a pointer event landed relative to the input and its dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRegion {
    Inside,
    Outside,
}

/// Decides whether a completed pointer gesture counts as an outside click.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutsideClickTracker {
    pressed: Option<PointerRegion>,
}

impl OutsideClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where the pointer went down.
    pub fn pointer_down(&mut self, region: PointerRegion) {
        self.pressed = Some(region);
    }

    /// Record the release. Returns `true` when the dropdown should close:
    /// both press and release happened outside.
    pub fn pointer_up(&mut self, region: PointerRegion) -> bool {
        let pressed = self.pressed.take();
        pressed == Some(PointerRegion::Outside) && region == PointerRegion::Outside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_click_dismisses() {
        let mut tracker = OutsideClickTracker::new();
        tracker.pointer_down(PointerRegion::Outside);
        assert!(tracker.pointer_up(PointerRegion::Outside));
    }

    #[test]
    fn drag_out_of_input_keeps_dropdown() {
        let mut tracker = OutsideClickTracker::new();
        tracker.pointer_down(PointerRegion::Inside);
        assert!(!tracker.pointer_up(PointerRegion::Outside));
    }

    #[test]
    fn drag_into_input_keeps_dropdown() {
        let mut tracker = OutsideClickTracker::new();
        tracker.pointer_down(PointerRegion::Outside);
        assert!(!tracker.pointer_up(PointerRegion::Inside));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut tracker = OutsideClickTracker::new();
        assert!(!tracker.pointer_up(PointerRegion::Outside));

        tracker.pointer_down(PointerRegion::Outside);
        assert!(tracker.pointer_up(PointerRegion::Outside));
        // press state is consumed by the release
        assert!(!tracker.pointer_up(PointerRegion::Outside));
    }
}
