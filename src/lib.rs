use wasm_bindgen::prelude::*;
use js_sys::{Function, Reflect};
use tracing::warn;

pub mod config;
pub mod driver;
pub mod error;
pub mod geom;
pub mod render;
pub mod sim;

use config::{DeviceTier, FlightConfig};
use driver::{Activation, Animator, Environment, FrameHandle, Host, HostEvent};
use error::EngineError;
use render::{Attr, Surface, Target};
use sim::{CursorFollower, FlightSim, Phase, Viewport};

// ============================================================================
// PAPER PLANE - Wandering easter-egg flight over the page
// ============================================================================
//
// The page hands us one host object:
//
//   {
//     requestFrame(): number          // schedule world.frame(), return id
//     cancelFrame(id: number)
//     listen(event: string)           // "pointermove" | "resize" | "hover"
//     unlisten(event: string)
//     hasTarget(name: string): bool   // "plane", "sparkle-0", ...
//     setAttr(name, attr, value)      // attr "text" means textContent
//   }

fn host_fn(obj: &JsValue, name: &'static str) -> Result<Function, EngineError> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
        .ok_or(EngineError::MissingHostFn(name))
}

pub struct JsHost {
    this: JsValue,
    request: Function,
    cancel: Function,
    listen: Function,
    unlisten: Function,
}

impl JsHost {
    pub fn from_object(obj: &JsValue) -> Result<Self, EngineError> {
        Ok(Self {
            this: obj.clone(),
            request: host_fn(obj, "requestFrame")?,
            cancel: host_fn(obj, "cancelFrame")?,
            listen: host_fn(obj, "listen")?,
            unlisten: host_fn(obj, "unlisten")?,
        })
    }
}

impl Host for JsHost {
    fn request_frame(&mut self) -> FrameHandle {
        match self.request.call0(&self.this) {
            Ok(id) => FrameHandle(id.as_f64().unwrap_or(0.0) as u64),
            Err(e) => {
                warn!(?e, "requestFrame threw");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.cancel.call1(&self.this, &JsValue::from_f64(handle.0 as f64)) {
            warn!(?e, "cancelFrame threw");
        }
    }

    fn listen(&mut self, event: HostEvent) {
        if let Err(e) = self.listen.call1(&self.this, &JsValue::from_str(event.name())) {
            warn!(?e, event = event.name(), "listen threw");
        }
    }

    fn unlisten(&mut self, event: HostEvent) {
        if let Err(e) = self.unlisten.call1(&self.this, &JsValue::from_str(event.name())) {
            warn!(?e, event = event.name(), "unlisten threw");
        }
    }
}

pub struct JsSurface {
    this: JsValue,
    has: Function,
    set: Function,
}

impl JsSurface {
    pub fn from_object(obj: &JsValue) -> Result<Self, EngineError> {
        Ok(Self {
            this: obj.clone(),
            has: host_fn(obj, "hasTarget")?,
            set: host_fn(obj, "setAttr")?,
        })
    }
}

impl Surface for JsSurface {
    fn has_target(&self, target: Target) -> bool {
        self.has
            .call1(&self.this, &JsValue::from_str(&target.to_string()))
            .map(|v| v.as_bool().unwrap_or(false))
            .unwrap_or(false)
    }

    fn set_attr(&mut self, target: Target, attr: Attr, value: &str) {
        let res = self.set.call3(
            &self.this,
            &JsValue::from_str(&target.to_string()),
            &JsValue::from_str(attr.name()),
            &JsValue::from_str(value),
        );
        if let Err(e) = res {
            warn!(?e, %target, attr = attr.name(), "setAttr threw");
        }
    }
}

fn random_seed() -> u32 {
    (js_sys::Math::random() * u32::MAX as f64) as u32
}

#[wasm_bindgen]
pub struct FlightWorld {
    anim: Animator<FlightSim, JsHost, JsSurface>,
}

#[wasm_bindgen]
impl FlightWorld {
    /// `config` is an optional JSON override merged over the tier defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        host: JsValue,
        width: f32,
        height: f32,
        reduced_motion: bool,
        fine_pointer: bool,
        config: Option<String>,
    ) -> Result<FlightWorld, JsError> {
        let env = Environment {
            viewport: Viewport::new(width, height)?,
            reduced_motion,
            fine_pointer,
        };
        let cfg = match config {
            Some(json) => FlightConfig::from_json_with(DeviceTier::for_width(width), &json)?,
            None => FlightConfig::for_viewport(width),
        };
        let sim = FlightSim::new(cfg, env.viewport, env.fine_pointer, random_seed())?;
        let anim = Animator::new(
            sim,
            JsHost::from_object(&host)?,
            JsSurface::from_object(&host)?,
            env.reduced_motion,
        );
        Ok(Self { anim })
    }

    /// False when reduced motion is on or the overlay markup is incomplete.
    pub fn start(&mut self) -> bool {
        self.anim.start() == Activation::Started
    }

    pub fn frame(&mut self) {
        self.anim.frame();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.anim.pointer_moved(x, y);
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsError> {
        self.anim.resized(Viewport::new(width, height)?);
        Ok(())
    }

    pub fn teardown(&mut self) {
        self.anim.teardown();
    }

    pub fn running(&self) -> bool { self.anim.is_running() }
    pub fn wandering(&self) -> bool { self.anim.effect().agent().phase == Phase::Wandering }
    pub fn trail_len(&self) -> usize { self.anim.effect().trail().len() }
}

#[wasm_bindgen]
pub struct CursorWorld {
    anim: Animator<CursorFollower, JsHost, JsSurface>,
}

#[wasm_bindgen]
impl CursorWorld {
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue) -> Result<CursorWorld, JsError> {
        let anim = Animator::new(
            CursorFollower::new(),
            JsHost::from_object(&host)?,
            JsSurface::from_object(&host)?,
            false,
        );
        Ok(Self { anim })
    }

    pub fn start(&mut self) -> bool {
        self.anim.start() == Activation::Started
    }

    pub fn frame(&mut self) {
        self.anim.frame();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.anim.pointer_moved(x, y);
    }

    pub fn hover(&mut self, on: bool) {
        self.anim.hover(on);
    }

    pub fn teardown(&mut self) {
        self.anim.teardown();
    }
}
