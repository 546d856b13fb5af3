// render.rs - Push simulation state out to the overlay
//
// The engine never holds DOM nodes. It names a handful of targets and writes
// string attributes to them through `Surface`; the host decides what a
// "marker" or an "opacity" is.
//
// Targets (flight overlay):
//   overlay         svg root, viewBox
//   trail           dotted path, d + stroke styling
//   trail-gradient  linear gradient, x1 y1 x2 y2
//   label           greeting text, x y opacity text
//   marker          heart path, d opacity
//   plane           group, transform
//   sparkle-N       circles, cx cy r opacity
//
// Targets (cursor):
//   cursor-ring     transform width height opacity
//   cursor-dot      transform

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::LabelConfig;
use crate::geom::{Point, catmull_rom_path, heart_path};
use crate::sim::{Agent, CursorFollower, FlightSim, NUM_SPARKLES, Trail, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Overlay,
    Trail,
    TrailGradient,
    Label,
    Marker,
    Plane,
    Sparkle(u8),
    CursorRing,
    CursorDot,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlay => f.write_str("overlay"),
            Self::Trail => f.write_str("trail"),
            Self::TrailGradient => f.write_str("trail-gradient"),
            Self::Label => f.write_str("label"),
            Self::Marker => f.write_str("marker"),
            Self::Plane => f.write_str("plane"),
            Self::Sparkle(i) => write!(f, "sparkle-{i}"),
            Self::CursorRing => f.write_str("cursor-ring"),
            Self::CursorDot => f.write_str("cursor-dot"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attr {
    D,
    X,
    Y,
    X1,
    Y1,
    X2,
    Y2,
    Cx,
    Cy,
    R,
    Width,
    Height,
    Opacity,
    Transform,
    ViewBox,
    StrokeWidth,
    StrokeDasharray,
    /// Text content rather than an attribute.
    Text,
}

impl Attr {
    pub fn name(self) -> &'static str {
        match self {
            Self::D => "d",
            Self::X => "x",
            Self::Y => "y",
            Self::X1 => "x1",
            Self::Y1 => "y1",
            Self::X2 => "x2",
            Self::Y2 => "y2",
            Self::Cx => "cx",
            Self::Cy => "cy",
            Self::R => "r",
            Self::Width => "width",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::Transform => "transform",
            Self::ViewBox => "viewBox",
            Self::StrokeWidth => "stroke-width",
            Self::StrokeDasharray => "stroke-dasharray",
            Self::Text => "text",
        }
    }
}

/// Something attributes can be written to.
pub trait Surface {
    fn has_target(&self, target: Target) -> bool;
    fn set_attr(&mut self, target: Target, attr: Attr, value: &str);

    fn set_num(&mut self, target: Target, attr: Attr, value: f32) {
        self.set_attr(target, attr, &value.to_string());
    }
}

/// In-memory surface keeping the last value of every attribute.
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    targets: BTreeSet<Target>,
    attrs: BTreeMap<(Target, Attr), String>,
    writes: usize,
}

impl AttrMap {
    pub fn new(targets: impl IntoIterator<Item = Target>) -> Self {
        Self { targets: targets.into_iter().collect(), ..Self::default() }
    }

    pub fn get(&self, target: Target, attr: Attr) -> Option<&str> {
        self.attrs.get(&(target, attr)).map(String::as_str)
    }

    pub fn get_num(&self, target: Target, attr: Attr) -> Option<f32> {
        self.get(target, attr)?.parse().ok()
    }

    /// Attributes written to one target, in `Attr` order.
    pub fn attrs_of(&self, target: Target) -> impl Iterator<Item = (Attr, &str)> + '_ {
        self.attrs
            .range((target, Attr::D)..=(target, Attr::Text))
            .map(|((_, a), v)| (*a, v.as_str()))
    }

    pub fn targets(&self) -> impl Iterator<Item = Target> + '_ {
        self.targets.iter().copied()
    }

    /// Total number of writes since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Surface for AttrMap {
    fn has_target(&self, target: Target) -> bool {
        self.targets.contains(&target)
    }

    fn set_attr(&mut self, target: Target, attr: Attr, value: &str) {
        self.writes += 1;
        self.attrs.insert((target, attr), value.to_owned());
    }
}

// ============================================================================
// Flight overlay
// ============================================================================

pub fn flight_targets() -> Vec<Target> {
    let mut t = vec![
        Target::Overlay,
        Target::Trail,
        Target::TrailGradient,
        Target::Label,
        Target::Marker,
        Target::Plane,
    ];
    t.extend((0..NUM_SPARKLES as u8).map(Target::Sparkle));
    t
}

pub fn cursor_targets() -> Vec<Target> {
    vec![Target::CursorRing, Target::CursorDot]
}

/// Where the greeting sits this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub x: f32,
    pub y: f32,
    pub marker: Point,
    pub visible: bool,
}

/// Pin the label to a point a quarter of the way along the trail, kept
/// inside the padded viewport.
pub fn place_label(trail: &Trail, view: Viewport, cfg: &LabelConfig) -> Option<LabelPlacement> {
    if trail.len() <= cfg.min_trail { return None; }
    let [px, py] = trail.at_fraction(cfg.fraction)?;

    // max then min so a padding wider than the screen still yields a number
    let tx = px.max(cfg.pad_x).min(view.width - cfg.pad_x);
    let ty = py.max(cfg.pad_top).min(view.height - cfg.pad_bottom);
    let y = ty - cfg.lift;
    Some(LabelPlacement {
        x: tx,
        y,
        marker: [tx + cfg.marker_offset, y],
        visible: trail.len() > cfg.show_trail,
    })
}

/// Bob, rock and bank the plane around its simulated pose.
pub fn plane_transform(agent: &Agent, scale: f32) -> String {
    let f = agent.frame as f32;
    let bob = (f * 0.04).sin() * 3.0;
    let rock = (f * 0.025).sin() * 3.0;
    // Lean into turns; a 0.01 rad/tick turn is a 6° bank
    let bank = agent.turn_rate() * 600.0;
    let deg = agent.heading.to_degrees() + rock + bank;
    format!(
        "translate({},{}) rotate({}) scale({})",
        agent.pos[0],
        agent.pos[1] + bob,
        deg,
        scale
    )
}

pub fn view_box(view: Viewport) -> String {
    format!("0 0 {} {}", view.width, view.height)
}

/// One-off writes when the overlay comes up.
pub fn begin_flight(sim: &FlightSim, surface: &mut dyn Surface) {
    let cfg = sim.config();
    surface.set_attr(Target::Overlay, Attr::ViewBox, &view_box(sim.viewport()));
    surface.set_num(Target::Trail, Attr::StrokeWidth, cfg.trail_width);
    surface.set_attr(Target::Trail, Attr::StrokeDasharray, &cfg.trail_dash);
    surface.set_attr(Target::Label, Attr::Text, &cfg.label.text);
    surface.set_num(Target::Label, Attr::Opacity, 0.0);
    surface.set_num(Target::Marker, Attr::Opacity, 0.0);
    for i in 0..NUM_SPARKLES as u8 {
        surface.set_num(Target::Sparkle(i), Attr::Opacity, 0.0);
    }
}

/// Per-frame writes.
pub fn draw_flight(sim: &FlightSim, surface: &mut dyn Surface) {
    let cfg = sim.config();
    let trail = sim.trail();

    // Trail
    if trail.len() > cfg.trail_min_render {
        surface.set_attr(Target::Trail, Attr::D, &catmull_rom_path(trail.points()));
        if let (Some([x1, y1]), Some([x2, y2])) = (trail.oldest(), trail.newest()) {
            surface.set_num(Target::TrailGradient, Attr::X1, x1);
            surface.set_num(Target::TrailGradient, Attr::Y1, y1);
            surface.set_num(Target::TrailGradient, Attr::X2, x2);
            surface.set_num(Target::TrailGradient, Attr::Y2, y2);
        }
    }

    // Label + marker
    if let Some(label) = place_label(trail, sim.viewport(), &cfg.label) {
        surface.set_num(Target::Label, Attr::X, label.x);
        surface.set_num(Target::Label, Attr::Y, label.y);
        let [mx, my] = label.marker;
        surface.set_attr(Target::Marker, Attr::D, &heart_path(mx, my, cfg.label.marker_size));
        let (lo, mo) = if label.visible {
            (cfg.label.label_opacity, cfg.label.marker_opacity)
        } else {
            (0.0, 0.0)
        };
        surface.set_num(Target::Label, Attr::Opacity, lo);
        surface.set_num(Target::Marker, Attr::Opacity, mo);
    }

    // Sparkles
    let sparkles = sim.sparkles();
    for i in 0..NUM_SPARKLES {
        let t = Target::Sparkle(i as u8);
        if i < sparkles.n {
            surface.set_num(t, Attr::Cx, sparkles.x[i]);
            surface.set_num(t, Attr::Cy, sparkles.y[i]);
            surface.set_num(t, Attr::R, sparkles.radius(i));
            surface.set_num(t, Attr::Opacity, sparkles.opacity(i));
        } else {
            surface.set_num(t, Attr::Opacity, 0.0);
        }
    }

    // Plane
    surface.set_attr(Target::Plane, Attr::Transform, &plane_transform(sim.agent(), cfg.plane_scale));
}

// ============================================================================
// Cursor
// ============================================================================

pub fn draw_cursor(cursor: &CursorFollower, surface: &mut dyn Surface) {
    draw_cursor_dot(cursor, surface);
    surface.set_attr(Target::CursorRing, Attr::Transform, &cursor.ring_transform());
}

pub fn draw_cursor_dot(cursor: &CursorFollower, surface: &mut dyn Surface) {
    surface.set_attr(Target::CursorDot, Attr::Transform, &cursor.dot_transform());
}

pub fn draw_cursor_hover(cursor: &CursorFollower, surface: &mut dyn Surface) {
    let size = format!("{}px", cursor.ring_size());
    surface.set_attr(Target::CursorRing, Attr::Width, &size);
    surface.set_attr(Target::CursorRing, Attr::Height, &size);
    surface.set_num(Target::CursorRing, Attr::Opacity, cursor.ring_opacity());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlightConfig;

    fn view() -> Viewport {
        Viewport::new(1024.0, 768.0).unwrap()
    }

    fn trail_of(n: usize, f: impl Fn(usize) -> Point) -> Trail {
        let mut t = Trail::new(500);
        for i in 0..n {
            t.push(f(i));
        }
        t
    }

    #[test]
    fn target_names() {
        assert_eq!(Target::Sparkle(3).to_string(), "sparkle-3");
        assert_eq!(Target::TrailGradient.to_string(), "trail-gradient");
        assert_eq!(Attr::ViewBox.name(), "viewBox");
        assert_eq!(flight_targets().len(), 6 + NUM_SPARKLES);
    }

    #[test]
    fn label_waits_for_trail() {
        let cfg = LabelConfig::default();
        let short = trail_of(40, |i| [i as f32 * 10.0, 300.0]);
        assert_eq!(place_label(&short, view(), &cfg), None);

        let mid = trail_of(41, |i| [i as f32 * 10.0 + 200.0, 300.0]);
        let p = place_label(&mid, view(), &cfg).unwrap();
        assert_eq!(p.x, 300.0);
        assert_eq!(p.y, 282.0);
        assert_eq!(p.marker, [358.0, 282.0]);
        assert!(!p.visible);

        let long = trail_of(81, |_| [500.0, 300.0]);
        assert!(place_label(&long, view(), &cfg).unwrap().visible);
    }

    #[test]
    fn label_clamped_inside_viewport() {
        let cfg = LabelConfig::default();
        let off = trail_of(100, |_| [-300.0, 5000.0]);
        let p = place_label(&off, view(), &cfg).unwrap();
        assert_eq!(p.x, 60.0);
        assert_eq!(p.y, 768.0 - 40.0 - 18.0);
    }

    #[test]
    fn level_plane_transform() {
        let agent = Agent::wandering([100.0, 200.0], 0.0);
        assert_eq!(plane_transform(&agent, 0.7), "translate(100,200) rotate(0) scale(0.7)");
    }

    #[test]
    fn draw_writes_every_sparkle_slot() {
        let mut sim = FlightSim::new(FlightConfig::default(), view(), false, 1).unwrap();
        let mut map = AttrMap::new(flight_targets());
        begin_flight(&sim, &mut map);
        assert_eq!(map.get(Target::Overlay, Attr::ViewBox), Some("0 0 1024 768"));
        assert_eq!(map.get(Target::Trail, Attr::StrokeDasharray), Some("3 10"));

        sim.tick();
        draw_flight(&sim, &mut map);
        // One point is not enough for a path
        assert_eq!(map.get(Target::Trail, Attr::D), None);
        for i in 0..NUM_SPARKLES as u8 {
            assert_eq!(map.get_num(Target::Sparkle(i), Attr::Opacity), Some(0.0));
        }
        assert!(map.get(Target::Plane, Attr::Transform).unwrap().starts_with("translate(-97.5,"));

        for _ in 0..300 {
            sim.tick();
        }
        draw_flight(&sim, &mut map);
        let d = map.get(Target::Trail, Attr::D).unwrap();
        assert_eq!(d.matches(" C").count(), sim.trail().len() - 1);
        assert_eq!(map.get_num(Target::Label, Attr::Opacity), Some(0.9));
        assert!(map.get_num(Target::Sparkle(0), Attr::R).is_some());
        let x1 = map.get_num(Target::TrailGradient, Attr::X1).unwrap();
        assert_eq!(x1, sim.trail().oldest().unwrap()[0]);
    }

    #[test]
    fn cursor_writes() {
        let mut c = CursorFollower::new();
        let mut map = AttrMap::new(cursor_targets());
        c.pointer_moved(10.0, 10.0);
        c.set_hover(true);
        draw_cursor(&c, &mut map);
        draw_cursor_hover(&c, &mut map);
        assert_eq!(map.get(Target::CursorDot, Attr::Transform), Some("translate(7px, 7px)"));
        assert_eq!(map.get(Target::CursorRing, Attr::Width), Some("48px"));
        assert_eq!(map.attrs_of(Target::CursorRing).count(), 4);
    }
}
