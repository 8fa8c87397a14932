//! Visual attributes produced by a widget for one interaction state.

use crate::scene::{Scene, SceneResult};
use crate::shapes::{ShapeId, ShapeStyle};
use kurbo::Vec2;

/// Style and paint offset for one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintOp {
    pub shape: ShapeId,
    pub style: ShapeStyle,
    pub offset: Vec2,
}

/// The full set of visual attributes for a widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paint {
    ops: Vec<PaintOp>,
}

impl Paint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(self, shape: ShapeId, style: ShapeStyle) -> Self {
        self.style_offset(shape, style, Vec2::ZERO)
    }

    pub fn style_offset(mut self, shape: ShapeId, style: ShapeStyle, offset: Vec2) -> Self {
        self.push(shape, style, offset);
        self
    }

    pub fn push(&mut self, shape: ShapeId, style: ShapeStyle, offset: Vec2) {
        self.ops.push(PaintOp {
            shape,
            style,
            offset,
        });
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Style for `shape`, if painted.
    pub fn style_of(&self, shape: ShapeId) -> Option<&ShapeStyle> {
        self.ops.iter().rev().find(|op| op.shape == shape).map(|op| &op.style)
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Write every attribute into the scene.
    pub fn apply(&self, scene: &mut Scene) -> SceneResult<()> {
        for op in &self.ops {
            scene.set_style(op.shape, op.style.clone())?;
            scene.set_paint_offset(op.shape, op.offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, SerializableColor};
    use kurbo::Point;

    #[test]
    fn test_apply_sets_style_and_offset() {
        let mut scene = Scene::new();
        let group = scene.create_group(None).unwrap();
        let shape = scene
            .add_shape(group, Rectangle::new(Point::ZERO, 10.0, 10.0))
            .unwrap();

        let style = ShapeStyle::filled(SerializableColor::hex(0xc0c0c0));
        Paint::new()
            .style_offset(shape, style.clone(), Vec2::new(1.0, 1.0))
            .apply(&mut scene)
            .unwrap();

        assert_eq!(scene.shape(shape).map(|s| s.style().clone()), Some(style));
        assert_eq!(scene.bbox(shape).map(|b| b.origin()), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_style_of_uses_last_entry() {
        let shape = uuid::Uuid::new_v4();
        let paint = Paint::new()
            .style(shape, ShapeStyle::default())
            .style(shape, ShapeStyle::invisible());
        assert_eq!(paint.style_of(shape), Some(&ShapeStyle::invisible()));
    }
}
