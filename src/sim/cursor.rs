// cursor.rs - Custom cursor ring
//
// A dot pinned to the pointer and a ring that lags behind it with
// exponential smoothing. Hovering something clickable swells the ring.

use crate::geom::Point;

const RING_EASE: f32 = 0.12;
const DOT_RADIUS: f32 = 3.0;
const RING_SIZE: f32 = 36.0;
const RING_SIZE_HOVER: f32 = 48.0;

#[derive(Debug, Clone, Default)]
pub struct CursorFollower {
    mouse: Point,
    ring: Point,
    hovering: bool,
}

impl CursorFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.mouse = [x, y];
    }

    pub fn set_hover(&mut self, on: bool) {
        self.hovering = on;
    }

    pub fn tick(&mut self) {
        self.ring[0] += (self.mouse[0] - self.ring[0]) * RING_EASE;
        self.ring[1] += (self.mouse[1] - self.ring[1]) * RING_EASE;
    }

    pub fn mouse(&self) -> Point { self.mouse }
    pub fn ring(&self) -> Point { self.ring }
    pub fn hovering(&self) -> bool { self.hovering }

    pub fn ring_size(&self) -> f32 {
        if self.hovering { RING_SIZE_HOVER } else { RING_SIZE }
    }

    pub fn ring_opacity(&self) -> f32 {
        if self.hovering { 0.6 } else { 1.0 }
    }

    /// CSS transform for the dot, centred on the pointer.
    pub fn dot_transform(&self) -> String {
        format!("translate({}px, {}px)", self.mouse[0] - DOT_RADIUS, self.mouse[1] - DOT_RADIUS)
    }

    /// CSS transform for the ring, centred on its smoothed position.
    pub fn ring_transform(&self) -> String {
        let half = RING_SIZE * 0.5;
        format!("translate({}px, {}px)", self.ring[0] - half, self.ring[1] - half)
    }
}
