// driver.rs - Frame loop lifecycle
//
// The host owns the clock and the input listeners; the animator owns the
// effect. Frames are never scheduled from inside a frame by recursion: the
// animator asks the host for exactly one pending frame at a time and keeps
// its handle, so teardown can always cancel it.

use tracing::{debug, info, warn};

use crate::render::{self, Surface, Target};
use crate::sim::{CursorFollower, FlightSim, Viewport};

/// Opaque id of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Input the animator can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    PointerMove,
    Resize,
    Hover,
}

impl HostEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::PointerMove => "pointermove",
            Self::Resize => "resize",
            Self::Hover => "hover",
        }
    }
}

/// Display clock and input subscriptions.
pub trait Host {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn listen(&mut self, event: HostEvent);
    fn unlisten(&mut self, event: HostEvent);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn request_frame(&mut self) -> FrameHandle { (**self).request_frame() }
    fn cancel_frame(&mut self, handle: FrameHandle) { (**self).cancel_frame(handle) }
    fn listen(&mut self, event: HostEvent) { (**self).listen(event) }
    fn unlisten(&mut self, event: HostEvent) { (**self).unlisten(event) }
}

/// What the page tells us once at start-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub viewport: Viewport,
    pub reduced_motion: bool,
    /// Mouse or trackpad rather than touch.
    pub fine_pointer: bool,
}

/// An animation the lifecycle can drive.
pub trait Effect {
    fn required_targets(&self) -> Vec<Target>;
    fn events(&self) -> Vec<HostEvent>;

    fn honors_reduced_motion(&self) -> bool {
        true
    }

    fn begin(&mut self, surface: &mut dyn Surface);
    fn step(&mut self);
    fn render(&self, surface: &mut dyn Surface);

    fn pointer_moved(&mut self, _x: f32, _y: f32, _surface: &mut dyn Surface) {}
    fn hover(&mut self, _on: bool, _surface: &mut dyn Surface) {}
    fn resized(&mut self, _view: Viewport, _surface: &mut dyn Surface) {}
}

impl Effect for FlightSim {
    fn required_targets(&self) -> Vec<Target> {
        render::flight_targets()
    }

    fn events(&self) -> Vec<HostEvent> {
        if self.fine_pointer() {
            vec![HostEvent::Resize, HostEvent::PointerMove]
        } else {
            vec![HostEvent::Resize]
        }
    }

    fn begin(&mut self, surface: &mut dyn Surface) {
        render::begin_flight(self, surface);
    }

    fn step(&mut self) {
        self.tick();
    }

    fn render(&self, surface: &mut dyn Surface) {
        render::draw_flight(self, surface);
    }

    fn pointer_moved(&mut self, x: f32, y: f32, _surface: &mut dyn Surface) {
        FlightSim::pointer_moved(self, x, y);
    }

    fn resized(&mut self, view: Viewport, surface: &mut dyn Surface) {
        self.resize(view);
        surface.set_attr(Target::Overlay, render::Attr::ViewBox, &render::view_box(view));
    }
}

impl Effect for CursorFollower {
    fn required_targets(&self) -> Vec<Target> {
        render::cursor_targets()
    }

    fn events(&self) -> Vec<HostEvent> {
        vec![HostEvent::PointerMove, HostEvent::Hover]
    }

    // The cursor replaces the system pointer, so it stays on regardless
    fn honors_reduced_motion(&self) -> bool {
        false
    }

    fn begin(&mut self, surface: &mut dyn Surface) {
        render::draw_cursor_hover(self, surface);
    }

    fn step(&mut self) {
        self.tick();
    }

    fn render(&self, surface: &mut dyn Surface) {
        render::draw_cursor(self, surface);
    }

    // The dot is pinned to the pointer, only the ring waits for a frame
    fn pointer_moved(&mut self, x: f32, y: f32, surface: &mut dyn Surface) {
        CursorFollower::pointer_moved(self, x, y);
        render::draw_cursor_dot(self, surface);
    }

    fn hover(&mut self, on: bool, surface: &mut dyn Surface) {
        self.set_hover(on);
        render::draw_cursor_hover(self, surface);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ReducedMotion,
    MissingTarget(Target),
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Skipped(SkipReason),
    Stopped,
}

pub struct Animator<E: Effect, H: Host, S: Surface> {
    effect: E,
    host: H,
    surface: S,
    reduced_motion: bool,

    state: Lifecycle,
    pending: Option<FrameHandle>,
    listening: Vec<HostEvent>,
    frames: u64,
}

impl<E: Effect, H: Host, S: Surface> Animator<E, H, S> {
    pub fn new(effect: E, host: H, surface: S, reduced_motion: bool) -> Self {
        Self {
            effect,
            host,
            surface,
            reduced_motion,
            state: Lifecycle::Idle,
            pending: None,
            listening: Vec::new(),
            frames: 0,
        }
    }

    pub fn start(&mut self) -> Activation {
        match self.state {
            Lifecycle::Idle => {}
            Lifecycle::Running => return Activation::Started,
            Lifecycle::Skipped(why) => return Activation::Skipped(why),
            Lifecycle::Stopped => return Activation::Skipped(SkipReason::TornDown),
        }

        if self.reduced_motion && self.effect.honors_reduced_motion() {
            return self.skip(SkipReason::ReducedMotion);
        }
        let missing = self
            .effect
            .required_targets()
            .into_iter()
            .find(|t| !self.surface.has_target(*t));
        if let Some(t) = missing {
            return self.skip(SkipReason::MissingTarget(t));
        }

        for ev in self.effect.events() {
            self.host.listen(ev);
            self.listening.push(ev);
        }
        self.effect.begin(&mut self.surface);
        self.pending = Some(self.host.request_frame());
        self.state = Lifecycle::Running;
        info!(listeners = self.listening.len(), "animation started");
        Activation::Started
    }

    fn skip(&mut self, why: SkipReason) -> Activation {
        warn!(?why, "animation not started");
        self.state = Lifecycle::Skipped(why);
        Activation::Skipped(why)
    }

    /// Frame callback from the host.
    pub fn frame(&mut self) {
        if self.state != Lifecycle::Running || self.pending.take().is_none() {
            return;
        }
        self.effect.step();
        self.effect.render(&mut self.surface);
        self.frames += 1;
        self.pending = Some(self.host.request_frame());
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.is_listening(HostEvent::PointerMove) {
            self.effect.pointer_moved(x, y, &mut self.surface);
        }
    }

    pub fn hover(&mut self, on: bool) {
        if self.is_listening(HostEvent::Hover) {
            self.effect.hover(on, &mut self.surface);
        }
    }

    pub fn resized(&mut self, view: Viewport) {
        if self.is_listening(HostEvent::Resize) {
            debug!(width = view.width, height = view.height, "viewport resized");
            self.effect.resized(view, &mut self.surface);
        }
    }

    /// Cancel the pending frame and drop every listener. Safe to repeat.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        for ev in self.listening.drain(..) {
            self.host.unlisten(ev);
        }
        if self.state == Lifecycle::Running {
            info!(frames = self.frames, "animation stopped");
            self.state = Lifecycle::Stopped;
        }
    }

    fn is_listening(&self, ev: HostEvent) -> bool {
        self.state == Lifecycle::Running && self.listening.contains(&ev)
    }

    pub fn state(&self) -> Lifecycle { self.state }
    pub fn is_running(&self) -> bool { self.state == Lifecycle::Running }
    pub fn frames(&self) -> u64 { self.frames }
    pub fn effect(&self) -> &E { &self.effect }
    pub fn host(&self) -> &H { &self.host }
    pub fn surface(&self) -> &S { &self.surface }
}

impl<E: Effect, H: Host, S: Surface> Drop for Animator<E, H, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Host driven by hand: frames fire only when the caller says so.
#[derive(Debug, Default)]
pub struct ManualHost {
    next: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
    listeners: Vec<HostEvent>,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested and not yet fired or cancelled.
    pub fn pending(&self) -> &[FrameHandle] { &self.pending }
    pub fn requested(&self) -> u64 { self.requested }
    pub fn cancelled(&self) -> u64 { self.cancelled }
    pub fn listeners(&self) -> &[HostEvent] { &self.listeners }

    /// Take the oldest pending frame, as the display would when it fires.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() { None } else { Some(self.pending.remove(0)) }
    }
}

impl Host for ManualHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.requested += 1;
        let h = FrameHandle(self.next);
        self.pending.push(h);
        h
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled += 1;
        self.pending.retain(|h| *h != handle);
    }

    fn listen(&mut self, event: HostEvent) {
        self.listeners.push(event);
    }

    fn unlisten(&mut self, event: HostEvent) {
        if let Some(i) = self.listeners.iter().position(|e| *e == event) {
            self.listeners.remove(i);
        }
    }
}

/// Run `frames` frames on a manual host, firing each pending callback.
pub fn run_frames<E: Effect, S: Surface>(anim: &mut Animator<E, ManualHost, S>, frames: usize) {
    for _ in 0..frames {
        if anim.host.fire().is_none() {
            break;
        }
        anim.frame();
    }
}
