// curve.rs - SVG path builders
//
// Trail smoothing turns each run of four points into one cubic Bézier
// (uniform Catmull-Rom, tension 1/6), so the curve passes through every
// sample without a visible kink.

use std::fmt::Write;

use super::Point;

/// Smooth interpolating path through `pts`.
///
/// Fewer than two points draw nothing, two draw a straight line, and `n`
/// points draw a move followed by `n - 1` cubic segments. The ends reuse the
/// boundary point in place of the missing neighbour.
pub fn catmull_rom_path(pts: &[Point]) -> String {
    let n = pts.len();
    if n < 2 { return String::new(); }

    let mut d = String::with_capacity(n * 48);
    let [x0, y0] = pts[0];
    if n == 2 {
        let [x1, y1] = pts[1];
        let _ = write!(d, "M{x0},{y0} L{x1},{y1}");
        return d;
    }

    let _ = write!(d, "M{x0},{y0}");
    for i in 0..n - 1 {
        let p0 = pts[i.saturating_sub(1)];
        let p1 = pts[i];
        let p2 = pts[(i + 1).min(n - 1)];
        let p3 = pts[(i + 2).min(n - 1)];

        let c1x = p1[0] + (p2[0] - p0[0]) / 6.0;
        let c1y = p1[1] + (p2[1] - p0[1]) / 6.0;
        let c2x = p2[0] - (p3[0] - p1[0]) / 6.0;
        let c2y = p2[1] - (p3[1] - p1[1]) / 6.0;

        let _ = write!(d, " C{c1x},{c1y} {c2x},{c2y} {},{}", p2[0], p2[1]);
    }
    d
}

/// Small closed heart centred on (cx, cy); `size` is roughly its height.
pub fn heart_path(cx: f32, cy: f32, size: f32) -> String {
    let s = size / 14.0;
    format!(
        "M{},{} C{},{} {},{} {},{} C{},{} {},{} {},{} Z",
        cx, cy + 3.0 * s,
        cx, cy + s, cx - 5.0 * s, cy - 4.0 * s, cx, cy - 2.0 * s,
        cx + 5.0 * s, cy - 4.0 * s, cx, cy + s, cx, cy + 3.0 * s,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_inputs() {
        assert_eq!(catmull_rom_path(&[]), "");
        assert_eq!(catmull_rom_path(&[[1.0, 2.0]]), "");
        assert_eq!(catmull_rom_path(&[[0.0, 0.0], [10.0, 5.5]]), "M0,0 L10,5.5");
    }

    #[test]
    fn one_cubic_per_gap() {
        for n in 3..20 {
            let pts: Vec<Point> = (0..n).map(|i| [i as f32 * 3.0, (i % 4) as f32]).collect();
            let d = catmull_rom_path(&pts);
            assert!(d.starts_with("M0,0"));
            assert_eq!(d.matches('M').count(), 1);
            assert_eq!(d.matches(" C").count(), n - 1, "n = {n}: {d}");
            assert!(!d.contains('L'));
        }
    }

    #[test]
    fn control_points_on_straight_line() {
        // Evenly spaced collinear samples give evenly spaced control points
        let d = catmull_rom_path(&[[0.0, 0.0], [6.0, 0.0], [12.0, 0.0]]);
        assert_eq!(d, "M0,0 C1,0 4,0 6,0 C8,0 11,0 12,0");
    }

    #[test]
    fn heart_is_closed_and_centred() {
        let d = heart_path(100.0, 50.0, 14.0);
        assert!(d.starts_with("M100,53 "));
        assert!(d.ends_with("100,53 Z"));
        assert_eq!(d, "M100,53 C100,51 95,46 100,48 C105,46 100,51 100,53 Z");
    }
}
