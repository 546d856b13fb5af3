// angle.rs - Heading arithmetic
//
// Headings are radians in screen space: 0 points right, +π/2 points down.

use std::f32::consts::{PI, TAU};

use super::Point;

/// Wrap an angle difference into (-π, π].
#[inline]
pub fn wrap_angle(mut d: f32) -> f32 {
    if !d.is_finite() { return 0.0; }
    if d > PI || d <= -PI {
        d = d.rem_euclid(TAU);
        if d > PI { d -= TAU; }
    }
    d
}

/// Move `cur` a fraction `amt` of the shortest way towards `tgt`.
#[inline]
pub fn steer(cur: f32, tgt: f32, amt: f32) -> f32 {
    cur + wrap_angle(tgt - cur) * amt
}

/// Map a point from a frame rotated by `heading` and anchored at `origin`.
#[inline]
pub fn to_world(origin: Point, heading: f32, local: Point) -> Point {
    let (sin, cos) = heading.sin_cos();
    [
        origin[0] + local[0] * cos - local[1] * sin,
        origin[1] + local[0] * sin + local[1] * cos,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wrap_edges() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((wrap_angle(1.5 * PI) + 0.5 * PI).abs() < 1e-5);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
    }

    #[test]
    fn steer_takes_short_way_round() {
        // 170° to -170° is a 20° turn through π, not 340° back
        let cur = 170f32.to_radians();
        let tgt = -170f32.to_radians();
        let next = steer(cur, tgt, 0.5);
        assert!((next - 180f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn tail_anchor_rotates_with_heading() {
        let p = to_world([10.0, 20.0], 0.0, [-52.0, 4.0]);
        assert_eq!(p, [-42.0, 24.0]);

        let p = to_world([0.0, 0.0], PI / 2.0, [-52.0, 0.0]);
        assert!(p[0].abs() < 1e-4);
        assert!((p[1] + 52.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn wrapped_delta_in_half_open_range(d in -100.0f32..100.0) {
            let w = wrap_angle(d);
            prop_assert!(w > -PI - 1e-6 && w <= PI + 1e-6, "{d} -> {w}");
            // same direction modulo a full turn
            let back = (w - d).rem_euclid(TAU);
            prop_assert!(back < 1e-3 || TAU - back < 1e-3);
        }

        #[test]
        fn steer_converges_monotonically(
            cur in -10.0f32..10.0,
            tgt in -PI..PI,
            amt in 0.01f32..1.0,
        ) {
            let mut h = cur;
            let mut gap = wrap_angle(tgt - h).abs();
            for _ in 0..50 {
                h = steer(h, tgt, amt);
                let next = wrap_angle(tgt - h).abs();
                prop_assert!(next <= gap + 1e-4, "gap grew {gap} -> {next}");
                gap = next;
            }
        }
    }
}
