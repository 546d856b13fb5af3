// sparkle.rs - Glitter shed behind the plane
//
// Structure-of-Arrays with a tiny fixed cap. Slot order is age order, so
// when the set is full the oldest sparkle is dropped and everything shifts
// down one slot. Dead sparkles are not removed; they sit at zero life until
// a newer one pushes them out.

use super::FlightSim;
use crate::geom::{Point, to_world};

pub const NUM_SPARKLES: usize = 4;

pub struct Sparkles {
    // Position
    pub x: [f32; NUM_SPARKLES],
    pub y: [f32; NUM_SPARKLES],

    // Velocity
    pub vx: [f32; NUM_SPARKLES],
    pub vy: [f32; NUM_SPARKLES],

    // Lifetime in ticks
    pub age: [u32; NUM_SPARKLES],
    pub max_life: [f32; NUM_SPARKLES],

    pub size: [f32; NUM_SPARKLES],

    // Count
    pub n: usize,
}

impl Sparkles {
    pub fn new() -> Self {
        Self {
            x: [0.0; NUM_SPARKLES],
            y: [0.0; NUM_SPARKLES],
            vx: [0.0; NUM_SPARKLES],
            vy: [0.0; NUM_SPARKLES],
            age: [0; NUM_SPARKLES],
            max_life: [1.0; NUM_SPARKLES],
            size: [0.0; NUM_SPARKLES],
            n: 0,
        }
    }

    /// Add a sparkle, dropping the oldest when full.
    pub fn spawn(&mut self, pos: Point, vel: Point, max_life: f32, size: f32) {
        if self.n == NUM_SPARKLES {
            self.x.copy_within(1.., 0);
            self.y.copy_within(1.., 0);
            self.vx.copy_within(1.., 0);
            self.vy.copy_within(1.., 0);
            self.age.copy_within(1.., 0);
            self.max_life.copy_within(1.., 0);
            self.size.copy_within(1.., 0);
            self.n -= 1;
        }

        let i = self.n;
        self.x[i] = pos[0];
        self.y[i] = pos[1];
        self.vx[i] = vel[0];
        self.vy[i] = vel[1];
        self.age[i] = 0;
        self.max_life[i] = max_life.max(1.0);
        self.size[i] = size;
        self.n += 1;
    }

    /// Shed one sparkle from around the plane body.
    pub fn emit(&mut self, plane: Point, heading: f32, size_mult: f32, rng: &mut u32) {
        let ox = -20.0 - FlightSim::rand(rng) * 20.0;
        let oy = (FlightSim::rand(rng) - 0.5) * 20.0;
        let pos = to_world(plane, heading, [ox, oy]);

        // Drifts a little, mostly upwards
        let vx = (FlightSim::rand(rng) - 0.5) * 0.3;
        let vy = (FlightSim::rand(rng) - 0.5) * 0.3 - 0.2;

        let max_life = 60.0 + FlightSim::rand(rng) * 40.0;
        let size = size_mult + FlightSim::rand(rng) * size_mult;
        self.spawn(pos, [vx, vy], max_life, size);
    }

    pub fn update(&mut self) {
        for i in 0..self.n {
            self.x[i] += self.vx[i];
            self.y[i] += self.vy[i];
            self.age[i] = self.age[i].saturating_add(1);
        }
    }

    /// Remaining life, 1 at birth falling linearly to exactly 0.
    pub fn life(&self, i: usize) -> f32 {
        (1.0 - self.age[i] as f32 / self.max_life[i]).max(0.0)
    }

    pub fn radius(&self, i: usize) -> f32 {
        self.size[i] * self.life(i)
    }

    pub fn opacity(&self, i: usize) -> f32 {
        self.life(i) * 0.8
    }
}

impl Default for Sparkles {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_set_drops_oldest() {
        let mut s = Sparkles::new();
        for i in 0..NUM_SPARKLES + 2 {
            s.spawn([i as f32, 0.0], [0.0, 0.0], 60.0, 2.0);
        }
        assert_eq!(s.n, NUM_SPARKLES);
        assert_eq!(s.x, [2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn life_hits_exactly_zero_and_stays() {
        let mut s = Sparkles::new();
        s.spawn([0.0, 0.0], [0.5, -0.25], 60.0, 3.0);
        assert_eq!(s.life(0), 1.0);
        for _ in 0..59 {
            s.update();
        }
        assert!(s.life(0) > 0.0);
        s.update();
        assert_eq!(s.life(0), 0.0);
        for _ in 0..100 {
            s.update();
            assert_eq!(s.life(0), 0.0);
            assert_eq!(s.radius(0), 0.0);
            assert_eq!(s.opacity(0), 0.0);
        }
        // Still drifting, just invisible
        assert_eq!(s.x[0], 0.5 * 160.0);
    }

    #[test]
    fn fractional_lifetime_clamps() {
        let mut s = Sparkles::new();
        s.spawn([0.0, 0.0], [0.0, 0.0], 60.5, 3.0);
        for _ in 0..61 {
            s.update();
        }
        assert_eq!(s.life(0), 0.0);
    }

    #[test]
    fn emit_lands_behind_the_plane() {
        let mut s = Sparkles::new();
        let mut rng = 0x1234_5678;
        for _ in 0..50 {
            s.emit([500.0, 300.0], 0.0, 2.5, &mut rng);
            let i = s.n - 1;
            assert!(s.x[i] >= 460.0 && s.x[i] <= 480.0);
            assert!(s.y[i] >= 290.0 && s.y[i] <= 310.0);
            assert!(s.vy[i] < 0.0);
            assert!(s.max_life[i] >= 60.0 && s.max_life[i] < 100.0);
            assert!(s.size[i] >= 2.5 && s.size[i] < 5.0);
        }
    }
}
