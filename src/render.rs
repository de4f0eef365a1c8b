use cairo::prelude::SurfaceExt;
use pango::{ContextExt, LayoutExt};
use tracing::debug;

use crate::font::FontSpec;
use crate::window::Size;

/// The inked area of some text, relative to where the layout is placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub x: i32,
    pub y: i32,
    pub wd: i32,
    pub ht: i32,
}

/// Where to put a layout so that its ink ends up in the middle of
/// `area`. This centers what you see, not the baseline, and always
/// lands on a whole pixel.
pub fn centered_origin(area: Size, ink: Extents) -> (f64, f64) {
    (
        ((area.wd - ink.wd) / 2 - ink.x) as f64,
        ((area.ht - ink.ht) / 2 - ink.y) as f64,
    )
}

pub struct Renderer {
    ctx: cairo::Context,
    layout: pango::Layout,
    color: (f64, f64, f64),
    size: Size,
}

impl Renderer {
    pub fn new(
        surface: &cairo::Surface,
        size: Size,
        font: &str,
        color: (f64, f64, f64),
    ) -> Result<Renderer, failure::Error> {
        let ctx = cairo::Context::new(surface);
        let desc = FontSpec::parse(font)?.description();

        let pctx = pangocairo::functions::create_context(&ctx)
            .ok_or(format_err!("Unable to create a pango context"))?;
        if pctx.load_font(&desc).is_none() {
            bail!("Failed to load font {}", font);
        }
        debug!("loaded font {}", font);

        let layout = pangocairo::functions::create_layout(&ctx)
            .ok_or(format_err!("Unable to create a pango layout"))?;
        layout.set_font_description(&desc);

        Ok(Renderer {
            ctx,
            layout,
            color,
            size,
        })
    }

    /// Wipe the whole surface to transparent and draw `text` in the
    /// middle of it
    pub fn draw(&self, text: &str) {
        self.ctx.set_operator(cairo::Operator::Source);
        self.ctx.set_source_rgba(0.0, 0.0, 0.0, 0.0);
        self.ctx.paint();
        self.ctx.set_operator(cairo::Operator::Over);

        self.layout.set_text(text);
        let (ink, _) = self.layout.get_pixel_extents();
        let (x, y) = centered_origin(
            self.size,
            Extents {
                x: ink.x,
                y: ink.y,
                wd: ink.width,
                ht: ink.height,
            },
        );

        let (r, g, b) = self.color;
        self.ctx.set_source_rgb(r, g, b);
        self.ctx.move_to(x, y);
        pangocairo::functions::show_layout(&self.ctx, &self.layout);
        self.ctx.get_target().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Size = Size { wd: 200, ht: 200 };

    #[test]
    fn centers_ink_not_layout() {
        let ink = Extents { x: 2, y: 10, wd: 100, ht: 30 };
        assert_eq!(centered_origin(AREA, ink), (48.0, 75.0));
    }

    #[test]
    fn odd_leftover_lands_on_whole_pixels() {
        let ink = Extents { x: 0, y: 0, wd: 101, ht: 25 };
        let (x, y) = centered_origin(AREA, ink);
        assert_eq!((x, y), (49.0, 87.0));
        assert_eq!(x.fract(), 0.0);
        assert_eq!(y.fract(), 0.0);
    }

    #[test]
    fn text_wider_than_area_overhangs_both_sides() {
        let ink = Extents { x: 0, y: 4, wd: 260, ht: 20 };
        let (x, y) = centered_origin(AREA, ink);
        assert_eq!(x, -30.0);
        assert_eq!(y, 86.0);
    }
}
