// agent.rs - The paper plane
//
// Heading is never set directly while wandering. Each tick builds a target
// heading from layered forces and the real heading eases towards it.

use std::f32::consts::PI;

use super::Viewport;
use crate::config::FlightConfig;
use crate::geom::{Point, steer, wrap_angle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scripted glide in from the left edge.
    Entering,
    /// Free flight for the rest of the session.
    Wandering,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub pos: Point,
    pub heading: f32,
    /// Heading before the last steering step (used for banking).
    pub prev_heading: f32,
    pub frame: u32,
    pub phase: Phase,
}

impl Agent {
    pub fn entering(pos: Point, heading: f32) -> Self {
        Self { pos, heading, prev_heading: heading, frame: 0, phase: Phase::Entering }
    }

    pub fn wandering(pos: Point, heading: f32) -> Self {
        Self { phase: Phase::Wandering, ..Self::entering(pos, heading) }
    }

    /// One step of the entry run. Returns true on the tick it ends.
    pub(crate) fn enter(&mut self, cfg: &FlightConfig, view: Viewport) -> bool {
        self.pos[0] += cfg.entry_dx;
        self.pos[1] += cfg.entry_dy;
        self.heading = cfg.entry_heading;
        self.prev_heading = cfg.entry_heading;

        if self.pos[0] > view.width * cfg.entry_threshold {
            self.phase = Phase::Wandering;
            return true;
        }
        false
    }

    /// Desired heading for this tick.
    pub fn target_heading(
        &self,
        cfg: &FlightConfig,
        view: Viewport,
        pointer: Option<Point>,
        jitter: f32,
    ) -> f32 {
        let [x, y] = self.pos;
        let (w, h) = (view.width, view.height);
        let f = self.frame as f32;

        // Organic drift, independent of position
        let mut tgt = self.heading
            + cfg.wander_scale
                * ((f * 0.013).sin() * 0.02
                    + (f * 0.004).sin() * 0.035
                    + (f * 0.0025).cos() * 0.025);

        // Soft edges: weak far out, sharp right at the wall
        let m = cfg.margin;
        let push = |depth: f32| (depth / m).powf(1.5) * cfg.edge_push;
        if x < m { tgt = steer(tgt, 0.0, push(m - x)); }
        if x > w - m { tgt = steer(tgt, PI, push(x - (w - m))); }
        if y < m { tgt = steer(tgt, PI * 0.4, push(m - y)); }
        if y > h - m { tgt = steer(tgt, -PI * 0.4, push(y - (h - m))); }

        tgt += jitter;

        if let Some([px, py]) = pointer {
            let (dx, dy) = (x - px, y - py);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > 1.0 && dist < cfg.repel_radius {
                let k = 1.0 - dist / cfg.repel_radius;
                tgt = steer(tgt, dy.atan2(dx), k * k * cfg.repel_strength);
            }
        }

        // Hard edge wins over everything above
        let e = cfg.hard_edge;
        if x < e || x > w - e || y < e || y > h - e {
            let [cx, cy] = view.center();
            tgt = steer(tgt, (cy - y).atan2(cx - x), cfg.hard_edge_pull);
        }

        tgt
    }

    /// Ease towards `target` and move forward.
    pub(crate) fn fly(&mut self, target: f32, cfg: &FlightConfig) {
        self.prev_heading = self.heading;
        self.heading = steer(self.heading, target, cfg.steer_rate);

        let speed = cfg.speed_at(self.heading);
        let (sin, cos) = self.heading.sin_cos();
        self.pos[0] += cos * speed;
        self.pos[1] += sin * speed;
    }

    /// Signed change of heading over the last tick.
    pub fn turn_rate(&self) -> f32 {
        wrap_angle(self.heading - self.prev_heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Viewport {
        Viewport::new(1024.0, 768.0).unwrap()
    }

    #[test]
    fn entry_pins_heading_until_threshold() {
        let cfg = FlightConfig::default();
        let mut a = Agent::entering([-100.0, 300.0], 0.7);
        let mut ticks = 0;
        while !a.enter(&cfg, view()) {
            ticks += 1;
            assert_eq!(a.heading, -0.1);
            assert_eq!(a.phase, Phase::Entering);
        }
        // -100 + 2.5 * 90 = 125 is the first x past 1024 * 0.12
        assert_eq!(ticks + 1, 90);
        assert_eq!(a.phase, Phase::Wandering);
        assert!((a.pos[1] - (300.0 - 0.2 * 90.0)).abs() < 1e-2);
    }

    #[test]
    fn open_sky_target_is_close_to_heading() {
        let cfg = FlightConfig::default();
        let a = Agent { frame: 10, ..Agent::wandering([512.0, 384.0], 0.3) };
        let t = a.target_heading(&cfg, view(), None, 0.0);
        assert!((t - 0.3).abs() < 0.1);
    }

    #[test]
    fn left_margin_pulls_towards_right() {
        let cfg = FlightConfig::default();
        // Flying straight at the left wall
        let a = Agent::wandering([50.0, 384.0], PI * 0.99);
        let far = Agent::wandering([500.0, 384.0], PI * 0.99);
        let near_t = a.target_heading(&cfg, view(), None, 0.0);
        let far_t = far.target_heading(&cfg, view(), None, 0.0);
        assert!(wrap_angle(near_t - far_t).abs() > 0.01);
    }

    #[test]
    fn hard_edge_points_at_centre() {
        let cfg = FlightConfig::default();
        let a = Agent::wandering([10.0, 384.0], PI);
        let t = a.target_heading(&cfg, view(), None, 0.3);
        assert!(wrap_angle(t).abs() < 1e-4, "target {t}");

        let a = Agent::wandering([1014.0, 758.0], 0.0);
        let t = a.target_heading(&cfg, view(), None, 0.0);
        let want = (384.0f32 - 758.0).atan2(512.0 - 1014.0);
        assert!(wrap_angle(t - want).abs() < 1e-4);
    }

    #[test]
    fn pointer_inside_radius_deflects() {
        let cfg = FlightConfig::default();
        let a = Agent::wandering([500.0, 400.0], 0.0);
        let free = a.target_heading(&cfg, view(), None, 0.0);
        // Pointer directly below: push straight up (negative heading)
        let pushed = a.target_heading(&cfg, view(), Some([500.0, 450.0]), 0.0);
        assert!(pushed < free);
        // Out of range or right on top of the plane: nothing
        assert_eq!(a.target_heading(&cfg, view(), Some([500.0, 700.0]), 0.0), free);
        assert_eq!(a.target_heading(&cfg, view(), Some([500.5, 400.0]), 0.0), free);
    }

    #[test]
    fn fly_moves_along_heading() {
        let cfg = FlightConfig::simple();
        let mut a = Agent::wandering([0.0, 0.0], 0.0);
        a.fly(0.0, &cfg);
        assert_eq!(a.pos, [1.8, 0.0]);
        assert_eq!(a.turn_rate(), 0.0);

        a.fly(1.0, &cfg);
        assert!((a.heading - 0.04).abs() < 1e-6);
        assert!((a.turn_rate() - 0.04).abs() < 1e-6);
    }
}
