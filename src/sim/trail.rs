// trail.rs - Bounded tail history
//
// Oldest point first, newest last. Capacity is a couple of hundred points at
// most, so eviction just shifts the vector.

use crate::geom::Point;

// Up-front allocation; longer trails grow on demand
const PREALLOC: usize = 256;

pub struct Trail {
    pts: Vec<Point>,
    cap: usize,
}

impl Trail {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { pts: Vec::with_capacity(cap.min(PREALLOC)), cap }
    }

    /// Append a point, evicting the oldest once full.
    pub fn push(&mut self, p: Point) {
        if self.pts.len() >= self.cap {
            let excess = self.pts.len() + 1 - self.cap;
            self.pts.drain(..excess);
        }
        self.pts.push(p);
    }

    pub fn points(&self) -> &[Point] { &self.pts }
    pub fn len(&self) -> usize { self.pts.len() }
    pub fn is_empty(&self) -> bool { self.pts.is_empty() }
    pub fn capacity(&self) -> usize { self.cap }
    pub fn oldest(&self) -> Option<Point> { self.pts.first().copied() }
    pub fn newest(&self) -> Option<Point> { self.pts.last().copied() }

    /// Point at a fraction of the way from oldest to newest.
    pub fn at_fraction(&self, t: f32) -> Option<Point> {
        let i = (self.pts.len() as f32 * t).floor() as usize;
        self.pts.get(i.min(self.pts.len().saturating_sub(1))).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut t = Trail::new(3);
        for i in 0..5 {
            t.push([i as f32, 0.0]);
        }
        assert_eq!(t.len(), 3);
        assert_eq!(t.points(), &[[2.0, 0.0], [3.0, 0.0], [4.0, 0.0]]);
        assert_eq!(t.oldest(), Some([2.0, 0.0]));
        assert_eq!(t.newest(), Some([4.0, 0.0]));
    }

    #[test]
    fn huge_capacity_allocates_lazily() {
        let mut t = Trail::new(usize::MAX);
        assert_eq!(t.capacity(), usize::MAX);
        t.push([1.0, 2.0]);
        assert_eq!(t.points(), &[[1.0, 2.0]]);

        assert_eq!(Trail::new(0).capacity(), 1);
    }

    #[test]
    fn fraction_index_floors() {
        let mut t = Trail::new(100);
        assert_eq!(t.at_fraction(0.25), None);
        for i in 0..41 {
            t.push([i as f32, 0.0]);
        }
        // floor(41 * 0.25) = 10
        assert_eq!(t.at_fraction(0.25), Some([10.0, 0.0]));
        assert_eq!(t.at_fraction(0.0), Some([0.0, 0.0]));
    }
}
