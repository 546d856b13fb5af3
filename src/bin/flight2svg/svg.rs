// svg.rs - Serialise the overlay attribute map

use std::fmt::Write;

use paperplane_engine::render::{Attr, AttrMap, Target};
use paperplane_engine::sim::NUM_SPARKLES;

const PLANE: &str = r##"<polygon points="-48,2 -58,-6 -54,10" fill="#9aa7bd"/><polygon points="0,2 -48,2 -44,16" fill="#c9d3e3"/><polygon points="0,-1 -66,-26 -48,1" fill="#f4f7fb"/><polygon points="-14,-1 -58,-22 -44,0" fill="#dfe6f1"/><line x1="0" y1="0" x2="-48" y2="2" stroke="#9aa7bd"/>"##;

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Attributes of one target as ` name="value"` pairs, text content excluded.
fn attrs(map: &AttrMap, target: Target) -> String {
    let mut out = String::new();
    for (attr, value) in map.attrs_of(target) {
        if attr == Attr::Text { continue; }
        let _ = write!(out, r#" {}="{}""#, attr.name(), escape(value));
    }
    out
}

pub fn document(map: &AttrMap, label: &str) -> String {
    let mut doc = String::new();
    let _ = writeln!(doc, r#"<svg xmlns="http://www.w3.org/2000/svg"{}>"#, attrs(map, Target::Overlay));
    let _ = writeln!(
        doc,
        r##"<defs><linearGradient id="trail-grad" gradientUnits="userSpaceOnUse"{}><stop offset="0%" stop-color="#5b8def" stop-opacity="0"/><stop offset="100%" stop-color="#5b8def"/></linearGradient></defs>"##,
        attrs(map, Target::TrailGradient)
    );
    let _ = writeln!(
        doc,
        r#"<path fill="none" stroke="url(#trail-grad)" stroke-linecap="round"{}/>"#,
        attrs(map, Target::Trail)
    );
    let _ = writeln!(doc, r##"<path fill="#e25d7a"{}/>"##, attrs(map, Target::Marker));
    let _ = writeln!(
        doc,
        r#"<text text-anchor="middle"{}>{}</text>"#,
        attrs(map, Target::Label),
        escape(label)
    );
    for i in 0..NUM_SPARKLES as u8 {
        let _ = writeln!(doc, r##"<circle fill="#ffd66b"{}/>"##, attrs(map, Target::Sparkle(i)));
    }
    let _ = writeln!(doc, "<g{}>{PLANE}</g>", attrs(map, Target::Plane));
    doc.push_str("</svg>\n");
    doc
}
