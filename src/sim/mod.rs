// sim/ - Paper plane simulation
//
// One owned struct holds everything that changes per tick. The host only
// ever calls `tick`, feeds pointer and resize input, and reads state back
// for rendering.

mod agent;
mod cursor;
mod sparkle;
mod trail;

pub use agent::{Agent, Phase};
pub use cursor::CursorFollower;
pub use sparkle::{NUM_SPARKLES, Sparkles};
pub use trail::Trail;

use tracing::debug;

use crate::config::FlightConfig;
use crate::error::{EngineError, Result};
use crate::geom::{Point, to_world};

/// Where the plane starts its entry run, left of the screen.
pub const ENTRY_X: f32 = -100.0;

const DEFAULT_SEED: u32 = 0xDEADBEEF;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(EngineError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn center(&self) -> Point {
        [self.width * 0.5, self.height * 0.5]
    }
}

/// Flight simulation state
pub struct FlightSim {
    cfg: FlightConfig,
    view: Viewport,

    agent: Agent,
    trail: Trail,
    sparkles: Sparkles,

    // Last pointer position, only tracked on fine-pointer devices
    pointer: Option<Point>,
    fine_pointer: bool,

    rng: u32,
}

impl FlightSim {
    /// Plane off-screen left, somewhere in the middle fifth vertically.
    /// Fails when `cfg` does not validate.
    pub fn new(cfg: FlightConfig, view: Viewport, fine_pointer: bool, seed: u32) -> Result<Self> {
        let mut rng = if seed == 0 { DEFAULT_SEED } else { seed };
        let y = view.height * 0.4 + Self::rand(&mut rng) * view.height * 0.2;
        let agent = Agent::entering([ENTRY_X, y], cfg.entry_heading);
        Self::with_agent(cfg, view, agent, fine_pointer, rng)
    }

    /// Start from an arbitrary agent state.
    pub fn with_agent(
        cfg: FlightConfig,
        view: Viewport,
        agent: Agent,
        fine_pointer: bool,
        seed: u32,
    ) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            trail: Trail::new(cfg.trail_max),
            cfg,
            view,
            agent,
            sparkles: Sparkles::new(),
            pointer: None,
            fine_pointer,
            rng: if seed == 0 { DEFAULT_SEED } else { seed },
        })
    }

    pub fn tick(&mut self) {
        let agent = &mut self.agent;
        agent.frame = agent.frame.wrapping_add(1);

        match agent.phase {
            Phase::Entering => {
                if agent.enter(&self.cfg, self.view) {
                    debug!(frame = agent.frame, x = agent.pos[0], "entry run finished");
                }
            }
            Phase::Wandering => {
                let jitter = if agent.frame % self.cfg.jitter_interval == 0 {
                    (Self::rand(&mut self.rng) - 0.5) * self.cfg.jitter
                } else {
                    0.0
                };
                let pointer = if self.fine_pointer { self.pointer } else { None };
                let target = agent.target_heading(&self.cfg, self.view, pointer, jitter);
                agent.fly(target, &self.cfg);

                if agent.frame % self.cfg.sparkle_interval == 0 {
                    self.sparkles.emit(
                        agent.pos,
                        agent.heading,
                        self.cfg.sparkle_size,
                        &mut self.rng,
                    );
                }
            }
        }

        // The trail records the tail of the plane, not its nose
        let tail = to_world(self.agent.pos, self.agent.heading, self.cfg.tail_offset);
        self.trail.push(tail);

        self.sparkles.update();
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.fine_pointer {
            self.pointer = Some([x, y]);
        }
    }

    /// New bounds for steering; the flight itself carries on untouched.
    pub fn resize(&mut self, view: Viewport) {
        self.view = view;
    }

    // Random number generator (xorshift32)
    #[inline(always)]
    pub fn rand(rng: &mut u32) -> f32 {
        *rng ^= *rng << 13;
        *rng ^= *rng >> 17;
        *rng ^= *rng << 5;
        (*rng >> 8) as f32 * (1.0 / 16777216.0)
    }

    pub fn config(&self) -> &FlightConfig { &self.cfg }
    pub fn viewport(&self) -> Viewport { self.view }
    pub fn agent(&self) -> &Agent { &self.agent }
    pub fn trail(&self) -> &Trail { &self.trail }
    pub fn sparkles(&self) -> &Sparkles { &self.sparkles }
    pub fn pointer(&self) -> Option<Point> { self.pointer }
    pub fn fine_pointer(&self) -> bool { self.fine_pointer }
}
