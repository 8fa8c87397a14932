//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, BezPath, Size, Stroke};
use papaya_core::Scene as WidgetScene;
use papaya_core::scene::DrawItem;
use papaya_core::shapes::{FontWeight, Text};
use papaya_core::{Shape, ShapeStyle};
use parley::layout::{Layout, PositionedLayoutItem};
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::Scene;

/// Font families tried in order for every text shape.
const FONT_STACK: &str = "system-ui, sans-serif";

/// Vello-based renderer for the widget scene.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (cached to avoid re-scanning fonts).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer using the system font collection.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_item(&mut self, item: &DrawItem<'_>, transform: Affine) {
        let style = item.shape.style();
        if style.is_invisible() {
            return;
        }
        let transform = transform * Affine::translate(item.offset);
        match item.shape {
            Shape::Text(text) => self.render_text(text, transform),
            shape => self.render_path(&shape.to_path(), style, transform),
        }
    }

    /// Render a shape path with the given style.
    fn render_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine) {
        if let Some(fill_color) = style.fill_with_opacity() {
            self.scene
                .fill(Fill::NonZero, transform, fill_color, None, path);
        }

        if style.stroke_width > 0.0 {
            let mut stroke = Stroke::new(style.stroke_width);
            let dashes = style.stroke_style.dash_pattern();
            if !dashes.is_empty() {
                stroke = stroke.with_dashes(0.0, dashes);
            }
            self.scene
                .stroke(&stroke, transform, style.stroke_with_opacity(), None, path);
        }
    }

    /// Shape a text shape with Parley, caching its measured size on the shape.
    fn layout_text(&mut self, text: &Text, brush: &Brush) -> Layout<Brush> {
        let weight = match text.font_weight {
            FontWeight::Regular => parley::FontWeight::NORMAL,
            FontWeight::Bold => parley::FontWeight::BOLD,
        };

        let mut builder =
            self.layout_cx
                .ranged_builder(&mut self.font_cx, text.content(), 1.0, false);
        builder.push_default(StyleProperty::FontSize(text.font_size() as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontWeight(weight));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            FONT_STACK.into(),
        )));
        let mut layout = builder.build(text.content());
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let size = Size::new(layout.width() as f64, layout.height() as f64);
        // Without a usable font the approximation is a better guess than zero.
        if size.width > 0.0 {
            text.set_cached_size(size.width, size.height);
        }
        layout
    }

    /// Render a text shape. Its color is the style's fill.
    fn render_text(&mut self, text: &Text, transform: Affine) {
        if text.content().is_empty() {
            return;
        }
        let color = text
            .style
            .fill_with_opacity()
            .unwrap_or(Color::from_rgba8(0, 0, 0, 255));
        let brush = Brush::Solid(color);
        let layout = self.layout_text(text, &brush);

        // Parley layouts have y=0 at the top, the shape position is the top-left.
        let text_transform = transform * Affine::translate((text.position.x, text.position.y));

        // Adapted from Parley's vello example.
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let transform = Affine::scale(ctx.scale_factor);
        for item in ctx.scene.draw_list() {
            self.render_item(&item, transform);
        }
    }

    fn measure_text(&mut self, scene: &WidgetScene) -> usize {
        let brush = Brush::Solid(Color::from_rgba8(0, 0, 0, 255));
        let mut measured = 0;
        for item in scene.draw_list() {
            if let Shape::Text(text) = item.shape {
                if !text.content().is_empty() {
                    self.layout_text(text, &brush);
                    measured += 1;
                }
            }
        }
        log::debug!("Measured {} text shape(s)", measured);
        measured
    }
}
