// config.rs - Flight tuning
//
// Two device tiers share one set of knobs. Phones get a shorter trail, a wider
// edge margin and a smaller, calmer plane. Any field can be overridden from
// JSON; missing fields fall back to the tier defaults.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};

/// Viewports narrower than this are treated as phones.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Longest trail any config may ask for.
pub const MAX_TRAIL: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Desktop,
    Mobile,
}

impl DeviceTier {
    pub fn for_width(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT { Self::Mobile } else { Self::Desktop }
    }
}

/// How forward speed reacts to heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedModel {
    /// Same speed in every direction.
    Constant,
    /// Faster when diving, slower when climbing.
    Glide,
}

/// Placement of the greeting label and its heart marker along the trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub text: String,
    /// Fractional index into the trail (0 = oldest point).
    pub fraction: f32,
    /// Trail length before the label is positioned at all.
    pub min_trail: usize,
    /// Trail length before the label becomes visible.
    pub show_trail: usize,
    pub pad_x: f32,
    pub pad_top: f32,
    pub pad_bottom: f32,
    /// Vertical lift of the label above the trail point.
    pub lift: f32,
    pub marker_offset: f32,
    pub marker_size: f32,
    pub label_opacity: f32,
    pub marker_opacity: f32,
}

impl LabelConfig {
    fn for_tier(tier: DeviceTier) -> Self {
        let (pad_x, pad_y) = match tier {
            DeviceTier::Desktop => (60.0, 40.0),
            DeviceTier::Mobile => (80.0, 80.0),
        };
        Self {
            text: "Hi there".into(),
            fraction: 0.25,
            min_trail: 40,
            show_trail: 80,
            pad_x,
            pad_top: pad_y,
            pad_bottom: pad_y,
            lift: 18.0,
            marker_offset: 58.0,
            marker_size: 14.0,
            label_opacity: 0.9,
            marker_opacity: 0.75,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self::for_tier(DeviceTier::Desktop)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    // Motion
    pub speed: f32,
    pub glide: f32,
    pub speed_model: SpeedModel,
    pub steer_rate: f32,
    pub wander_scale: f32,

    // Entry run
    pub entry_dx: f32,
    pub entry_dy: f32,
    pub entry_heading: f32,
    /// Fraction of the viewport width that ends the entry run.
    pub entry_threshold: f32,

    // Edges
    pub margin: f32,
    pub edge_push: f32,
    pub hard_edge: f32,
    pub hard_edge_pull: f32,

    // Jitter
    pub jitter_interval: u32,
    pub jitter: f32,

    // Pointer
    pub repel_radius: f32,
    pub repel_strength: f32,

    // Trail
    pub trail_max: usize,
    pub trail_min_render: usize,
    pub tail_offset: [f32; 2],
    pub trail_width: f32,
    pub trail_dash: String,

    // Sparkles
    pub sparkle_interval: u32,
    pub sparkle_size: f32,

    // Plane
    pub plane_scale: f32,

    pub label: LabelConfig,
}

impl FlightConfig {
    /// Tier-tuned defaults with glide speed.
    pub fn for_tier(tier: DeviceTier) -> Self {
        let mobile = tier == DeviceTier::Mobile;
        Self {
            speed: 1.8,
            glide: 0.4,
            speed_model: SpeedModel::Glide,
            steer_rate: 0.04,
            wander_scale: if mobile { 0.6 } else { 1.0 },

            entry_dx: 2.5,
            entry_dy: -0.2,
            entry_heading: -0.1,
            entry_threshold: 0.12,

            margin: if mobile { 120.0 } else { 100.0 },
            edge_push: 0.1,
            hard_edge: 30.0,
            hard_edge_pull: 1.0,

            jitter_interval: 60,
            jitter: 0.4,

            repel_radius: 150.0,
            repel_strength: 0.12,

            trail_max: if mobile { 100 } else { 180 },
            trail_min_render: 4,
            tail_offset: [-52.0, 4.0],
            trail_width: if mobile { 2.0 } else { 3.0 },
            trail_dash: if mobile { "2 8" } else { "3 10" }.into(),

            sparkle_interval: 35,
            sparkle_size: if mobile { 1.5 } else { 2.5 },

            plane_scale: if mobile { 0.7 } else { 1.0 },

            label: LabelConfig::for_tier(tier),
        }
    }

    pub fn for_viewport(width: f32) -> Self {
        let tier = DeviceTier::for_width(width);
        debug!(?tier, width, "picked device tier");
        Self::for_tier(tier)
    }

    /// Fallback flavour: constant speed, desktop constants on every device.
    pub fn simple() -> Self {
        Self {
            speed_model: SpeedModel::Constant,
            ..Self::for_tier(DeviceTier::Desktop)
        }
    }

    /// Speed for the given heading under the configured model.
    pub fn speed_at(&self, heading: f32) -> f32 {
        match self.speed_model {
            SpeedModel::Constant => self.speed,
            // sin > 0 is downward in screen space
            SpeedModel::Glide => self.speed + heading.sin() * self.glide,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Merge a partial JSON override onto the tier defaults.
    pub fn from_json_with(tier: DeviceTier, json: &str) -> Result<Self> {
        let mut base = serde_json::to_value(Self::for_tier(tier))?;
        let patch: serde_json::Value = serde_json::from_str(json)?;
        merge(&mut base, patch);
        let cfg: Self = serde_json::from_value(base)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        fn bad(field: &'static str, reason: &'static str) -> Result<()> {
            Err(EngineError::InvalidConfig { field, reason })
        }

        if !(self.speed > 0.0) {
            return bad("speed", "must be positive");
        }
        if self.speed_model == SpeedModel::Glide && !(self.glide.abs() < self.speed) {
            return bad("glide", "must be smaller than speed");
        }
        if !(self.steer_rate > 0.0 && self.steer_rate <= 1.0) {
            return bad("steer_rate", "must be in (0, 1]");
        }
        if !(self.entry_threshold > 0.0 && self.entry_threshold < 1.0) {
            return bad("entry_threshold", "must be in (0, 1)");
        }
        if !(self.entry_dx > 0.0) {
            return bad("entry_dx", "must be positive");
        }
        if !(self.margin > 0.0) {
            return bad("margin", "must be positive");
        }
        if !(self.hard_edge >= 0.0 && self.hard_edge < self.margin) {
            return bad("hard_edge", "must be in [0, margin)");
        }
        if !(self.hard_edge_pull > 0.0 && self.hard_edge_pull <= 1.0) {
            return bad("hard_edge_pull", "must be in (0, 1]");
        }
        if self.jitter_interval == 0 {
            return bad("jitter_interval", "must be non-zero");
        }
        if !(self.repel_radius > 0.0) {
            return bad("repel_radius", "must be positive");
        }
        if self.trail_max < 2 {
            return bad("trail_max", "must hold at least two points");
        }
        if self.trail_max > MAX_TRAIL {
            return bad("trail_max", "must be at most 10000 points");
        }
        if self.sparkle_interval == 0 {
            return bad("sparkle_interval", "must be non-zero");
        }
        if !(self.label.fraction >= 0.0 && self.label.fraction < 1.0) {
            return bad("label.fraction", "must be in [0, 1)");
        }
        Ok(())
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self::for_tier(DeviceTier::Desktop)
    }
}

fn merge(base: &mut serde_json::Value, patch: serde_json::Value) {
    use serde_json::Value;
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (k, v) in patch {
                merge(base.entry(k).or_insert(Value::Null), v);
            }
        }
        (slot, v) => *slot = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_split_at_breakpoint() {
        assert_eq!(DeviceTier::for_width(767.0), DeviceTier::Mobile);
        assert_eq!(DeviceTier::for_width(768.0), DeviceTier::Desktop);
        assert_eq!(FlightConfig::for_viewport(360.0).trail_max, 100);
        assert_eq!(FlightConfig::for_viewport(1440.0).trail_max, 180);
    }

    #[test]
    fn defaults_validate() {
        FlightConfig::for_tier(DeviceTier::Desktop).validate().unwrap();
        FlightConfig::for_tier(DeviceTier::Mobile).validate().unwrap();
        FlightConfig::simple().validate().unwrap();
    }

    #[test]
    fn glide_is_faster_downhill() {
        let cfg = FlightConfig::default();
        let down = cfg.speed_at(std::f32::consts::FRAC_PI_2);
        let up = cfg.speed_at(-std::f32::consts::FRAC_PI_2);
        assert!((down - 2.2).abs() < 1e-5);
        assert!((up - 1.4).abs() < 1e-5);

        let simple = FlightConfig::simple();
        assert_eq!(simple.speed_at(1.0), simple.speed);
    }

    #[test]
    fn partial_override_keeps_tier_defaults() {
        let cfg = FlightConfig::from_json_with(
            DeviceTier::Mobile,
            r#"{ "speed": 2.0, "label": { "text": "Hello" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.speed, 2.0);
        assert_eq!(cfg.label.text, "Hello");
        assert_eq!(cfg.label.pad_x, 80.0);
        assert_eq!(cfg.margin, 120.0);
    }

    #[test]
    fn full_json_defaults_missing_fields() {
        let cfg = FlightConfig::from_json(r#"{ "speed_model": "constant" }"#).unwrap();
        assert_eq!(cfg.speed_model, SpeedModel::Constant);
        assert_eq!(cfg.trail_max, 180);
    }

    #[test]
    fn rejects_bad_values() {
        let err = FlightConfig::from_json(r#"{ "trail_max": 1 }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { field: "trail_max", .. }));

        let err = FlightConfig::from_json_with(
            DeviceTier::Desktop,
            r#"{ "trail_max": 18446744073709551615 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { field: "trail_max", .. }));
        FlightConfig::from_json(r#"{ "trail_max": 10000 }"#).unwrap();

        let err = FlightConfig::from_json(r#"{ "jitter_interval": 0 }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { field: "jitter_interval", .. }));

        let err = FlightConfig::from_json(r#"{ "steer_rate": 0.0 }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { field: "steer_rate", .. }));

        let err = FlightConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
