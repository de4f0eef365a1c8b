use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::countdown::Countdown;
use crate::render::Renderer;
use crate::window::{DragState, Event, Window};

/// The handful of things the loop needs from a window system: a
/// non-blocking event source, somewhere to draw, and a way to move
pub trait Overlay {
    /// The next event we care about, or `None` once nothing is pending
    fn next_event(&mut self) -> Option<Event>;
    fn move_to(&mut self, x: i32, y: i32);
    fn draw(&mut self, text: &str);
    fn flush(&mut self);
}

/// An X11 window plus the renderer drawing into it
pub struct X11Overlay<'a> {
    pub window: &'a Window<'a>,
    pub renderer: &'a Renderer,
}

impl<'a> Overlay for X11Overlay<'a> {
    fn next_event(&mut self) -> Option<Event> {
        while self.window.has_events() {
            if let Some(e) = self.window.handle() {
                return Some(e);
            }
        }
        None
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.window.move_to(x, y);
    }

    fn draw(&mut self, text: &str) {
        self.renderer.draw(text);
    }

    fn flush(&mut self) {
        self.window.flush();
    }
}

/// One pass of the loop: drain events, then draw the frame for
/// `elapsed` and flush
pub fn step<O: Overlay>(
    overlay: &mut O,
    countdown: &mut Countdown,
    drag: &mut DragState,
    elapsed: Duration,
) {
    while let Some(event) = overlay.next_event() {
        match event {
            Event::ShowEvent => {
                let frame = countdown.frame_at(elapsed);
                overlay.draw(&frame.to_string());
            }
            Event::PressEvent { x, y } => drag.press(x, y),
            Event::DragEvent { x, y } => {
                if let Some((x, y)) = drag.target(x, y) {
                    overlay.move_to(x, y);
                }
            }
        }
    }

    let frame = countdown.frame_at(elapsed);
    overlay.draw(&frame.to_string());
    overlay.flush();
}

/// Step every `tick` until `shutdown` is raised. Nothing else stops it.
pub fn run<O: Overlay>(overlay: &mut O, mut countdown: Countdown, shutdown: &AtomicBool, tick: Duration) {
    let mut drag = DragState::default();
    while !shutdown.load(Ordering::Relaxed) {
        let elapsed = countdown.elapsed();
        step(overlay, &mut countdown, &mut drag, elapsed);
        thread::sleep(tick);
    }
}
