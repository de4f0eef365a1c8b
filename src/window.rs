use x11::xlib;

use std::ffi::CString;
use std::os::raw::{c_int, c_uchar, c_ulong};
use std::{mem, ptr};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub wd: i32,
    pub ht: i32,
}

pub struct Display {
    pub display: *mut xlib::Display,
    pub screen: i32,
}

impl Display {
    pub fn create() -> Result<Display, failure::Error> {
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            bail!("Unable to open X11 display");
        }
        let screen = unsafe { xlib::XDefaultScreen(display) };
        Ok(Display { display, screen })
    }

    /// The size of the whole X screen
    pub fn size(&self) -> Size {
        unsafe {
            Size {
                wd: xlib::XDisplayWidth(self.display, self.screen),
                ht: xlib::XDisplayHeight(self.display, self.screen),
            }
        }
    }

    /// Intern a string in the x server
    pub fn intern(&self, s: &str) -> Result<xlib::Atom, failure::Error> {
        let cstr = CString::new(s)?;
        Ok(unsafe { xlib::XInternAtom(self.display, cstr.as_ptr(), 0) })
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.display);
        }
    }
}

/// Where a window of the given size sits flush against the bottom-right
/// corner of the screen
pub fn overlay_origin(screen: Size, size: Size) -> (i32, i32) {
    (screen.wd - size.wd, screen.ht - size.ht)
}

/// All the state needed to keep around to run a transparent
/// overlay window
pub struct Window<'t> {
    pub display: &'t Display,
    pub window: xlib::Window,
    visual: *mut xlib::Visual,
    colormap: xlib::Colormap,
    pub width: i32,
    pub height: i32,
}

impl<'t> Window<'t> {
    /// Create an override-redirect, always-on-top window with a 32-bit
    /// visual, tucked into the bottom-right corner of the screen
    pub fn create_overlay(
        display: &'t Display,
        size: Size,
    ) -> Result<Window<'t>, failure::Error> {
        let screen = display.screen;
        let (x, y) = overlay_origin(display.size(), size);

        unsafe {
            let mut vinfo: xlib::XVisualInfo = mem::zeroed();
            if xlib::XMatchVisualInfo(display.display, screen, 32, xlib::TrueColor, &mut vinfo) == 0 {
                bail!("No 32 bit visual available");
            }

            let root = xlib::XRootWindow(display.display, screen);
            let colormap =
                xlib::XCreateColormap(display.display, root, vinfo.visual, xlib::AllocNone);

            let mut attrs: xlib::XSetWindowAttributes = mem::zeroed();
            attrs.colormap = colormap;
            attrs.background_pixel = 0;
            attrs.border_pixel = 0;
            attrs.override_redirect = xlib::True;

            let window = xlib::XCreateWindow(
                display.display,
                root,
                x,
                y,
                size.wd as u32,
                size.ht as u32,
                0,
                vinfo.depth,
                xlib::InputOutput as u32,
                vinfo.visual,
                xlib::CWColormap | xlib::CWBorderPixel | xlib::CWBackPixel | xlib::CWOverrideRedirect,
                &mut attrs,
            );
            debug!("created overlay window {:#x} at ({}, {})", window, x, y);

            let w = Window {
                display,
                window,
                visual: vinfo.visual,
                colormap,
                width: size.wd,
                height: size.ht,
            };
            w.change_property("_NET_WM_STATE", &["_NET_WM_STATE_ABOVE"])?;
            xlib::XSelectInput(
                display.display,
                window,
                xlib::ExposureMask | xlib::ButtonPressMask | xlib::ButtonMotionMask,
            );
            Ok(w)
        }
    }

    /// Map the window to the screen
    pub fn map(&self) {
        unsafe {
            xlib::XMapWindow(self.display.display, self.window);
        }
    }

    pub fn move_to(&self, x: i32, y: i32) {
        unsafe {
            xlib::XMoveWindow(self.display.display, self.window, x, y);
        }
    }

    /// Push everything we've drawn out to the server
    pub fn flush(&self) {
        unsafe {
            xlib::XFlush(self.display.display);
        }
    }

    /// Set an atom-list property, interning every value
    pub fn change_property(&self, prop: &str, vals: &[&str]) -> Result<(), failure::Error> {
        let prop = self.display.intern(prop)?;
        let atoms: Result<Vec<xlib::Atom>, failure::Error> =
            vals.iter().map(|s| self.display.intern(s)).collect();
        let atoms = atoms?;
        unsafe {
            xlib::XChangeProperty(
                self.display.display,
                self.window,
                prop,
                xlib::XA_ATOM,
                32,
                xlib::PropModeReplace,
                atoms.as_ptr() as *const c_uchar,
                atoms.len() as c_int,
            );
        }
        Ok(())
    }

    /// Allocate a named color in this window's colormap. The
    /// allocation is given back when the `Color` goes away.
    pub fn alloc_color<'w>(&'w self, name: &str) -> Result<Color<'w>, failure::Error> {
        let cname = CString::new(name)?;
        let mut screen_def: xlib::XColor = unsafe { mem::zeroed() };
        let mut exact_def: xlib::XColor = unsafe { mem::zeroed() };
        let status = unsafe {
            xlib::XAllocNamedColor(
                self.display.display,
                self.colormap,
                cname.as_ptr(),
                &mut screen_def,
                &mut exact_def,
            )
        };
        if status == 0 {
            bail!("Failed to allocate color {}", name);
        }
        Ok(Color {
            display: self.display,
            colormap: self.colormap,
            pixel: screen_def.pixel,
            red: screen_def.red,
            green: screen_def.green,
            blue: screen_def.blue,
        })
    }

    /// Get the Cairo drawing surface corresponding to the whole
    /// window
    pub fn cairo_surface(&self) -> cairo::Surface {
        unsafe {
            let s = cairo_sys::cairo_xlib_surface_create(
                self.display.display,
                self.window,
                self.visual,
                self.width,
                self.height,
            );
            cairo::Surface::from_raw_none(s)
        }
    }

    /// Read a single event, wrapping it as an 'Event'. This will
    /// only return values for events we care about
    pub fn handle(&self) -> Option<Event> {
        let mut e: xlib::XEvent = unsafe { mem::zeroed() };
        unsafe { xlib::XNextEvent(self.display.display, &mut e) };
        match e.get_type() {
            xlib::Expose => Some(Event::ShowEvent),
            xlib::ButtonPress => {
                let xbutton: xlib::XButtonEvent = From::from(e);
                if xbutton.button == xlib::Button1 {
                    Some(Event::PressEvent { x: xbutton.x, y: xbutton.y })
                } else {
                    None
                }
            }
            xlib::MotionNotify => {
                let xmotion: xlib::XMotionEvent = From::from(e);
                if xmotion.state & xlib::Button1Mask != 0 {
                    Some(Event::DragEvent { x: xmotion.x_root, y: xmotion.y_root })
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// True if there are any pending events. Never blocks.
    pub fn has_events(&self) -> bool {
        unsafe { xlib::XPending(self.display.display) != 0 }
    }

    pub fn size(&self) -> Size {
        Size {
            wd: self.width,
            ht: self.height,
        }
    }
}

impl<'t> Drop for Window<'t> {
    fn drop(&mut self) {
        unsafe {
            xlib::XDestroyWindow(self.display.display, self.window);
            xlib::XFreeColormap(self.display.display, self.colormap);
        }
    }
}

/// A color cell allocated out of a window's colormap
pub struct Color<'w> {
    display: &'w Display,
    colormap: xlib::Colormap,
    pixel: c_ulong,
    red: u16,
    green: u16,
    blue: u16,
}

impl<'w> Color<'w> {
    /// The color as cairo wants it
    pub fn rgb(&self) -> (f64, f64, f64) {
        (
            self.red as f64 / 65535.0,
            self.green as f64 / 65535.0,
            self.blue as f64 / 65535.0,
        )
    }
}

impl<'w> Drop for Color<'w> {
    fn drop(&mut self) {
        unsafe {
            xlib::XFreeColors(self.display.display, self.colormap, &mut self.pixel, 1, 0);
        }
    }
}

/// An ADT of only the events we care about, wrapped in a high-level
/// way
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// primary button went down at window-relative coordinates
    PressEvent { x: i32, y: i32 },
    /// pointer moved with the primary button held, in root coordinates
    DragEvent { x: i32, y: i32 },
    ShowEvent,
}

/// Where inside the window the pointer grabbed it. Set on every press
/// and never cleared; a drag just reuses whatever the last press left.
#[derive(Debug, Default, Clone, Copy)]
pub struct DragState {
    anchor: Option<(i32, i32)>,
}

impl DragState {
    pub fn press(&mut self, x: i32, y: i32) {
        self.anchor = Some((x, y));
    }

    /// The new top-left corner for the window, given the pointer's
    /// root position
    pub fn target(&self, root_x: i32, root_y: i32) -> Option<(i32, i32)> {
        self.anchor.map(|(x, y)| (root_x - x, root_y - y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_sits_in_bottom_right_corner() {
        let screen = Size { wd: 1920, ht: 1080 };
        let size = Size { wd: 200, ht: 200 };
        assert_eq!(overlay_origin(screen, size), (1720, 880));
    }

    #[test]
    fn overlay_spans_the_whole_screen_not_one_monitor() {
        // two 1920x1080 monitors side by side make one 3840x1080 screen
        let screen = Size { wd: 3840, ht: 1080 };
        let size = Size { wd: 200, ht: 200 };
        assert_eq!(overlay_origin(screen, size), (3640, 880));
    }

    #[test]
    fn drag_without_press_goes_nowhere() {
        let drag = DragState::default();
        assert_eq!(drag.target(500, 500), None);
    }

    #[test]
    fn drag_keeps_grab_point_under_pointer() {
        let mut drag = DragState::default();
        drag.press(30, 40);
        assert_eq!(drag.target(1000, 700), Some((970, 660)));
        assert_eq!(drag.target(10, 20), Some((-20, -20)));
    }

    #[test]
    fn later_press_replaces_anchor() {
        let mut drag = DragState::default();
        drag.press(30, 40);
        drag.press(100, 5);
        assert_eq!(drag.target(1000, 700), Some((900, 695)));
    }
}
