// flight2svg - Fly the paper plane offline and write the overlay as SVG
//
// Drives the same animator the browser uses, on a hand-cranked host, then
// serialises the final attribute state.
//
// Usage: cargo run --bin flight2svg -- [--width 1024] [--height 768] [--frames 600]
//                                      [--seed N] [--tier desktop|mobile] [--simple]
//                                      [--config tuning.json] [--pointer X,Y] [-o out.svg]

mod svg;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use paperplane_engine::config::{DeviceTier, FlightConfig};
use paperplane_engine::driver::{Activation, Animator, ManualHost, run_frames};
use paperplane_engine::render::{AttrMap, flight_targets};
use paperplane_engine::sim::{FlightSim, Viewport};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Tier {
    Desktop,
    Mobile,
}

impl From<Tier> for DeviceTier {
    fn from(t: Tier) -> Self {
        match t {
            Tier::Desktop => DeviceTier::Desktop,
            Tier::Mobile => DeviceTier::Mobile,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "flight2svg", about = "Render the paper plane overlay after N frames")]
struct Args {
    #[arg(long, default_value_t = 1024.0)]
    width: f32,

    #[arg(long, default_value_t = 768.0)]
    height: f32,

    #[arg(long, default_value_t = 600)]
    frames: usize,

    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Device tier; picked from the width when omitted.
    #[arg(long, value_enum)]
    tier: Option<Tier>,

    /// Constant-speed fallback flight.
    #[arg(long, conflicts_with = "config")]
    simple: bool,

    /// JSON tuning overrides merged over the tier defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Park a pointer at X,Y for the whole run.
    #[arg(long, value_parser = parse_point)]
    pointer: Option<(f32, f32)>,

    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn parse_point(s: &str) -> std::result::Result<(f32, f32), String> {
    let (x, y) = s.split_once(',').ok_or("expected X,Y")?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Err(e) = run(Args::parse()) {
        eprintln!("flight2svg: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let view = Viewport::new(args.width, args.height)?;
    let tier = args.tier.map(DeviceTier::from).unwrap_or(DeviceTier::for_width(view.width));

    let cfg = if args.simple {
        FlightConfig::simple()
    } else if let Some(path) = &args.config {
        FlightConfig::from_json_with(tier, &fs::read_to_string(path)?)?
    } else {
        FlightConfig::for_tier(tier)
    };
    let label = cfg.label.text.clone();

    let sim = FlightSim::new(cfg, view, args.pointer.is_some(), args.seed)?;
    let mut anim = Animator::new(sim, ManualHost::new(), AttrMap::new(flight_targets()), false);
    if let Activation::Skipped(why) = anim.start() {
        return Err(format!("animator did not start: {why:?}").into());
    }
    if let Some((x, y)) = args.pointer {
        anim.pointer_moved(x, y);
    }

    run_frames(&mut anim, args.frames);
    let agent = anim.effect().agent();
    info!(
        frames = anim.frames(),
        x = agent.pos[0],
        y = agent.pos[1],
        phase = ?agent.phase,
        trail = anim.effect().trail().len(),
        "flight finished"
    );

    let doc = svg::document(anim.surface(), &label);
    match &args.out {
        Some(path) => {
            fs::write(path, doc)?;
            info!(path = %path.display(), "wrote svg");
        }
        None => print!("{doc}"),
    }
    Ok(())
}
