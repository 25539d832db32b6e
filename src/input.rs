use glam::Vec2;

/// Latest pointer position, normalized to `[-0.5, 0.5]` on both axes with the
/// origin at the center of the viewport. Overwritten on every move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub cursor: Vec2,
}

impl InputState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer move in window pixels. A degenerate viewport leaves
    /// the cursor untouched.
    pub fn set_pointer(&mut self, x: f32, y: f32, viewport_w: f32, viewport_h: f32) {
        if !(viewport_w > 0.0 && viewport_h > 0.0) || !x.is_finite() || !y.is_finite() {
            return;
        }
        let normalized = Vec2::new(x / viewport_w - 0.5, y / viewport_h - 0.5);
        self.cursor = normalized.clamp(Vec2::splat(-0.5), Vec2::splat(0.5));
    }
}
