//! HTML canvas surface (wasm32 only)

use web_sys::CanvasRenderingContext2d;

use super::arcs::{ArcInstruction, DrawingSurface};
use super::ticks::TickInstruction;
use crate::face::Viewport;
use crate::theme::StrokeEffect;

const BACKGROUND: &str = "#121212";
const GLOW_BLUR: f64 = 10.0;
const LABEL_FONT_SCALE: f64 = 0.4;
const BADGE_SCALE: f64 = 0.5;

/// Draws arcs with a 2D canvas context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    center: (f64, f64),
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            center: (0.0, 0.0),
        }
    }

    fn stroke_arc(&self, i: &ArcInstruction) {
        let band = i.band();
        if band.is_empty() {
            return;
        }
        let (cx, cy) = self.center;
        let ctx = &self.ctx;
        ctx.save();

        let light = i.swatch.light.to_css();
        match i.effect {
            StrokeEffect::Flat => ctx.set_stroke_style_str(&light),
            StrokeEffect::Glow => {
                ctx.set_stroke_style_str(&light);
                ctx.set_shadow_color(&light);
                ctx.set_shadow_blur(GLOW_BLUR);
            }
            StrokeEffect::Gloss => {
                let inner = f64::from(band.inner_radius());
                let outer = f64::from(band.outer_radius());
                let gradient =
                    ctx.create_linear_gradient(cx - inner, cy - inner, cx + outer, cy + outer);
                let stops = gradient
                    .add_color_stop(0.0, &light)
                    .and_then(|_| gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0.8)"));
                if stops.is_ok() {
                    ctx.set_stroke_style_canvas_gradient(&gradient);
                } else {
                    ctx.set_stroke_style_str(&light);
                }
            }
        }

        ctx.begin_path();
        if let Err(e) = ctx.arc(
            cx,
            cy,
            f64::from(band.radius),
            f64::from(band.start_radians()),
            f64::from(band.end_radians()),
        ) {
            log::warn!("Canvas arc failed for {}: {:?}", i.key, e);
        }
        ctx.set_line_width(f64::from(i.line_width));
        ctx.stroke();
        ctx.restore();
    }

    fn badge(&self, i: &ArcInstruction, text: &str) {
        let (cx, cy) = self.center;
        let anchor = i.band().label_anchor();
        let (x, y) = (cx + f64::from(anchor.x), cy + f64::from(anchor.y));
        let width = f64::from(i.line_width);
        let ctx = &self.ctx;

        ctx.begin_path();
        if let Err(e) = ctx.arc(x, y, width * BADGE_SCALE, 0.0, std::f64::consts::TAU) {
            log::warn!("Canvas badge failed for {}: {:?}", i.key, e);
        }
        ctx.set_fill_style_str(&i.swatch.dark.to_css());
        ctx.fill();
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(1.0);
        ctx.stroke();

        ctx.set_fill_style_str("#ffffff");
        ctx.set_font(&format!("{}px sans-serif", (width * LABEL_FONT_SCALE).round()));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        if let Err(e) = ctx.fill_text(text, x, y) {
            log::warn!("Canvas label failed for {}: {:?}", i.key, e);
        }
    }
}

impl DrawingSurface for CanvasSurface {
    fn begin_frame(&mut self, viewport: Viewport) {
        let (w, h) = (f64::from(viewport.width), f64::from(viewport.height));
        self.center = (w / 2.0, h / 2.0);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_arc(&mut self, instruction: &ArcInstruction) {
        self.stroke_arc(instruction);
    }

    fn draw_tick(&mut self, tick: &TickInstruction) {
        let (cx, cy) = self.center;
        let (inner, outer) = tick.endpoints();
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(cx + f64::from(inner.x), cy + f64::from(inner.y));
        ctx.line_to(cx + f64::from(outer.x), cy + f64::from(outer.y));
        ctx.set_stroke_style_str(BACKGROUND);
        ctx.set_line_width(f64::from(tick.line_width));
        ctx.stroke();
    }

    fn draw_label(&mut self, instruction: &ArcInstruction, text: &str) {
        self.badge(instruction, text);
    }
}
