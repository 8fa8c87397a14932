//! Retained shape scene with input listeners.
//!
//! A [`Scene`] is a tree of groups holding [`Shape`]s. Each group carries a
//! translation relative to its parent, which is how widgets are positioned.
//! Shapes can be registered as input surfaces: [`Scene::hit_test`] reports the
//! topmost listened shape under a point together with the owning widget and
//! the tag the widget attached to it.

use crate::shapes::{Shape, ShapeId, ShapeStyle};
use crate::widget::WidgetId;
use kurbo::{Point, Rect, Vec2};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for shape groups.
pub type GroupId = Uuid;

/// Errors from scene operations.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown group: {0}")]
    UnknownGroup(GroupId),
    #[error("unknown shape: {0}")]
    UnknownShape(ShapeId),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Handle of one input listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

/// Capability to subscribe widgets to input on individual shapes.
pub trait InputSurface {
    /// Deliver input hitting `shape` to `owner`, tagged with `tag`.
    fn listen(&mut self, shape: ShapeId, owner: WidgetId, tag: usize) -> SceneResult<ListenerHandle>;

    /// Drop a registration. Returns false if it was not registered.
    fn unlisten(&mut self, handle: ListenerHandle) -> bool;
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub handle: ListenerHandle,
    pub shape: ShapeId,
    pub owner: WidgetId,
    pub tag: usize,
}

/// A shape ready for drawing, with its accumulated translation.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub shape: &'a Shape,
    pub offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Shape(ShapeId),
    Group(GroupId),
}

#[derive(Debug, Clone)]
struct Group {
    parent: Option<GroupId>,
    offset: Vec2,
    items: Vec<Item>,
}

#[derive(Debug, Clone)]
struct Node {
    shape: Shape,
    group: GroupId,
    paint_offset: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    shape: ShapeId,
    owner: WidgetId,
    tag: usize,
}

/// The shape tree all widgets of a container draw into.
#[derive(Debug, Default)]
pub struct Scene {
    groups: HashMap<GroupId, Group>,
    roots: Vec<GroupId>,
    nodes: HashMap<ShapeId, Node>,
    listeners: BTreeMap<ListenerHandle, Listener>,
    next_listener: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty group, on top of its siblings.
    pub fn create_group(&mut self, parent: Option<GroupId>) -> SceneResult<GroupId> {
        let id = Uuid::new_v4();
        match parent {
            Some(parent_id) => self
                .groups
                .get_mut(&parent_id)
                .ok_or(SceneError::UnknownGroup(parent_id))?
                .items
                .push(Item::Group(id)),
            None => self.roots.push(id),
        }
        self.groups.insert(
            id,
            Group {
                parent,
                offset: Vec2::ZERO,
                items: Vec::new(),
            },
        );
        Ok(id)
    }

    pub fn contains_group(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn shape_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Set the translation of a group relative to its parent.
    pub fn set_group_offset(&mut self, id: GroupId, offset: Vec2) -> SceneResult<()> {
        self.groups
            .get_mut(&id)
            .ok_or(SceneError::UnknownGroup(id))?
            .offset = offset;
        Ok(())
    }

    pub fn group_offset(&self, id: GroupId) -> Option<Vec2> {
        self.groups.get(&id).map(|g| g.offset)
    }

    /// Translation of a group relative to the scene origin.
    pub fn world_offset(&self, id: GroupId) -> Option<Vec2> {
        let mut group = self.groups.get(&id)?;
        let mut offset = group.offset;
        while let Some(parent) = group.parent {
            group = self.groups.get(&parent)?;
            offset += group.offset;
        }
        Some(offset)
    }

    /// Remove everything inside a group but keep the group itself.
    ///
    /// Listeners still attached to removed shapes are dropped and counted.
    pub fn clear_group(&mut self, id: GroupId) -> SceneResult<usize> {
        let items = std::mem::take(
            &mut self
                .groups
                .get_mut(&id)
                .ok_or(SceneError::UnknownGroup(id))?
                .items,
        );
        let mut removed = Vec::new();
        for item in items {
            self.collect_item(item, &mut removed);
        }
        Ok(self.drop_listeners_for(&removed))
    }

    /// Remove a group, its shapes and its child groups.
    pub fn remove_group(&mut self, id: GroupId) -> SceneResult<usize> {
        let parent = self
            .groups
            .get(&id)
            .ok_or(SceneError::UnknownGroup(id))?
            .parent;
        match parent.and_then(|p| self.groups.get_mut(&p)) {
            Some(parent) => parent.items.retain(|item| *item != Item::Group(id)),
            None => self.roots.retain(|root| *root != id),
        }
        let mut removed = Vec::new();
        self.collect_item(Item::Group(id), &mut removed);
        Ok(self.drop_listeners_for(&removed))
    }

    fn collect_item(&mut self, item: Item, removed: &mut Vec<ShapeId>) {
        match item {
            Item::Shape(shape) => {
                self.nodes.remove(&shape);
                removed.push(shape);
            }
            Item::Group(group) => {
                if let Some(group) = self.groups.remove(&group) {
                    for child in group.items {
                        self.collect_item(child, removed);
                    }
                }
            }
        }
    }

    fn drop_listeners_for(&mut self, shapes: &[ShapeId]) -> usize {
        let before = self.listeners.len();
        self.listeners
            .retain(|_, listener| !shapes.contains(&listener.shape));
        let dropped = before - self.listeners.len();
        if dropped > 0 {
            log::warn!("Dropped {} listener(s) attached to removed shapes", dropped);
        }
        dropped
    }

    /// Add a shape on top of the group's existing content.
    pub fn add_shape(&mut self, group: GroupId, shape: impl Into<Shape>) -> SceneResult<ShapeId> {
        let shape = shape.into();
        let id = shape.id();
        self.groups
            .get_mut(&group)
            .ok_or(SceneError::UnknownGroup(group))?
            .items
            .push(Item::Shape(id));
        self.nodes.insert(
            id,
            Node {
                shape,
                group,
                paint_offset: Vec2::ZERO,
            },
        );
        Ok(id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.nodes.get(&id).map(|n| &n.shape)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.nodes.get_mut(&id).map(|n| &mut n.shape)
    }

    /// Like [`Scene::shape_mut`], failing on unknown ids.
    pub fn expect_shape_mut(&mut self, id: ShapeId) -> SceneResult<&mut Shape> {
        self.shape_mut(id).ok_or(SceneError::UnknownShape(id))
    }

    pub fn set_style(&mut self, id: ShapeId, style: ShapeStyle) -> SceneResult<()> {
        *self.expect_shape_mut(id)?.style_mut() = style;
        Ok(())
    }

    /// Extra translation applied when drawing only; hit testing ignores it.
    pub fn set_paint_offset(&mut self, id: ShapeId, offset: Vec2) -> SceneResult<()> {
        self.nodes
            .get_mut(&id)
            .ok_or(SceneError::UnknownShape(id))?
            .paint_offset = offset;
        Ok(())
    }

    /// Bounding box of a shape in scene coordinates.
    pub fn bbox(&self, id: ShapeId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        let offset = self.world_offset(node.group)? + node.paint_offset;
        Some(node.shape.bounds() + offset)
    }

    /// All shapes in painting order, back to front.
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.walk(*root, Vec2::ZERO, &mut out);
        }
        out
    }

    fn walk<'a>(&'a self, id: GroupId, base: Vec2, out: &mut Vec<DrawItem<'a>>) {
        let Some(group) = self.groups.get(&id) else {
            return;
        };
        let offset = base + group.offset;
        for item in &group.items {
            match item {
                Item::Shape(shape) => {
                    if let Some(node) = self.nodes.get(shape) {
                        out.push(DrawItem {
                            shape: &node.shape,
                            offset: offset + node.paint_offset,
                        });
                    }
                }
                Item::Group(child) => self.walk(*child, offset, out),
            }
        }
    }

    /// Topmost listened shape under `point` (scene coordinates).
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        let mut by_shape: HashMap<ShapeId, (ListenerHandle, Listener)> = HashMap::new();
        for (handle, listener) in &self.listeners {
            by_shape.entry(listener.shape).or_insert((*handle, *listener));
        }
        if by_shape.is_empty() {
            return None;
        }

        let mut stack = Vec::new();
        for root in &self.roots {
            self.walk_ids(*root, Vec2::ZERO, &mut stack);
        }
        stack.into_iter().rev().find_map(|(shape_id, offset)| {
            let (handle, listener) = by_shape.get(&shape_id)?;
            let node = self.nodes.get(&shape_id)?;
            node.shape.hit_test(point - offset, 0.0).then_some(Hit {
                handle: *handle,
                shape: shape_id,
                owner: listener.owner,
                tag: listener.tag,
            })
        })
    }

    fn walk_ids(&self, id: GroupId, base: Vec2, out: &mut Vec<(ShapeId, Vec2)>) {
        let Some(group) = self.groups.get(&id) else {
            return;
        };
        let offset = base + group.offset;
        for item in &group.items {
            match item {
                Item::Shape(shape) => out.push((*shape, offset)),
                Item::Group(child) => self.walk_ids(*child, offset, out),
            }
        }
    }

    /// Total number of listener registrations.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listener registrations owned by a widget.
    pub fn listeners_for(&self, owner: WidgetId) -> usize {
        self.listeners
            .values()
            .filter(|listener| listener.owner == owner)
            .count()
    }
}

impl InputSurface for Scene {
    fn listen(&mut self, shape: ShapeId, owner: WidgetId, tag: usize) -> SceneResult<ListenerHandle> {
        if !self.nodes.contains_key(&shape) {
            return Err(SceneError::UnknownShape(shape));
        }
        self.next_listener += 1;
        let handle = ListenerHandle(self.next_listener);
        self.listeners.insert(handle, Listener { shape, owner, tag });
        Ok(handle)
    }

    fn unlisten(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(&handle).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Rectangle};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rectangle {
        Rectangle::new(Point::new(x, y), w, h)
    }

    #[test]
    fn test_group_offsets_accumulate() {
        let mut scene = Scene::new();
        let outer = scene.create_group(None).unwrap();
        let inner = scene.create_group(Some(outer)).unwrap();
        scene.set_group_offset(outer, Vec2::new(10.0, 20.0)).unwrap();
        scene.set_group_offset(inner, Vec2::new(1.0, 2.0)).unwrap();
        assert_eq!(scene.world_offset(inner), Some(Vec2::new(11.0, 22.0)));

        let id = scene.add_shape(inner, rect(0.0, 0.0, 5.0, 5.0)).unwrap();
        assert_eq!(scene.bbox(id), Some(Rect::new(11.0, 22.0, 16.0, 27.0)));
    }

    #[test]
    fn test_unknown_group_rejected() {
        let mut scene = Scene::new();
        let missing = Uuid::new_v4();
        assert!(matches!(
            scene.create_group(Some(missing)),
            Err(SceneError::UnknownGroup(_))
        ));
        assert!(scene.add_shape(missing, rect(0.0, 0.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_hit_test_prefers_topmost_listened_shape() {
        let mut scene = Scene::new();
        let group = scene.create_group(None).unwrap();
        let owner = Uuid::new_v4();
        let below = scene.add_shape(group, rect(0.0, 0.0, 100.0, 100.0)).unwrap();
        let above = scene.add_shape(group, rect(0.0, 0.0, 50.0, 50.0)).unwrap();
        // Not listened, never reported even though it is on top.
        scene.add_shape(group, rect(0.0, 0.0, 10.0, 10.0)).unwrap();

        scene.listen(below, owner, 1).unwrap();
        scene.listen(above, owner, 2).unwrap();

        assert_eq!(scene.hit_test(Point::new(5.0, 5.0)).map(|h| h.tag), Some(2));
        assert_eq!(scene.hit_test(Point::new(75.0, 75.0)).map(|h| h.tag), Some(1));
        assert!(scene.hit_test(Point::new(150.0, 5.0)).is_none());
    }

    #[test]
    fn test_hit_test_honours_group_offset() {
        let mut scene = Scene::new();
        let group = scene.create_group(None).unwrap();
        scene.set_group_offset(group, Vec2::new(100.0, 0.0)).unwrap();
        let owner = Uuid::new_v4();
        let shape = scene
            .add_shape(group, Circle::new(Point::new(8.0, 8.0), 8.0))
            .unwrap();
        scene.listen(shape, owner, 0).unwrap();
        assert!(scene.hit_test(Point::new(8.0, 8.0)).is_none());
        assert_eq!(
            scene.hit_test(Point::new(108.0, 8.0)).map(|h| h.owner),
            Some(owner)
        );
    }

    #[test]
    fn test_paint_offset_does_not_move_hit_area() {
        let mut scene = Scene::new();
        let group = scene.create_group(None).unwrap();
        let owner = Uuid::new_v4();
        let shape = scene.add_shape(group, rect(0.0, 0.0, 10.0, 10.0)).unwrap();
        scene.listen(shape, owner, 0).unwrap();
        scene.set_paint_offset(shape, Vec2::new(1.0, 1.0)).unwrap();
        assert!(scene.hit_test(Point::new(0.5, 0.5)).is_some());
        assert_eq!(scene.bbox(shape), Some(Rect::new(1.0, 1.0, 11.0, 11.0)));
    }

    #[test]
    fn test_listen_unknown_shape_fails() {
        let mut scene = Scene::new();
        assert!(matches!(
            scene.listen(Uuid::new_v4(), Uuid::new_v4(), 0),
            Err(SceneError::UnknownShape(_))
        ));
    }

    #[test]
    fn test_unlisten() {
        let mut scene = Scene::new();
        let group = scene.create_group(None).unwrap();
        let owner = Uuid::new_v4();
        let shape = scene.add_shape(group, rect(0.0, 0.0, 10.0, 10.0)).unwrap();
        let handle = scene.listen(shape, owner, 0).unwrap();
        assert_eq!(scene.listeners_for(owner), 1);
        assert!(scene.unlisten(handle));
        assert!(!scene.unlisten(handle));
        assert_eq!(scene.listener_count(), 0);
    }

    #[test]
    fn test_clear_group_drops_dangling_listeners() {
        let mut scene = Scene::new();
        let group = scene.create_group(None).unwrap();
        let child = scene.create_group(Some(group)).unwrap();
        let owner = Uuid::new_v4();
        let shape = scene.add_shape(child, rect(0.0, 0.0, 10.0, 10.0)).unwrap();
        scene.listen(shape, owner, 0).unwrap();

        assert_eq!(scene.clear_group(group).unwrap(), 1);
        assert!(scene.contains_group(group));
        assert!(!scene.contains_group(child));
        assert_eq!(scene.shape_count(), 0);
        assert_eq!(scene.listener_count(), 0);
    }

    #[test]
    fn test_remove_group_detaches_from_roots() {
        let mut scene = Scene::new();
        let a = scene.create_group(None).unwrap();
        let b = scene.create_group(None).unwrap();
        scene.add_shape(a, rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        scene.add_shape(b, rect(0.0, 0.0, 1.0, 1.0)).unwrap();

        assert_eq!(scene.remove_group(a).unwrap(), 0);
        assert_eq!(scene.group_count(), 1);
        assert_eq!(scene.draw_list().len(), 1);
        assert!(scene.remove_group(a).is_err());
    }

    #[test]
    fn test_draw_list_order() {
        let mut scene = Scene::new();
        let a = scene.create_group(None).unwrap();
        let first = scene.add_shape(a, rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        let nested = scene.create_group(Some(a)).unwrap();
        let second = scene.add_shape(nested, rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        let third = scene.add_shape(a, rect(0.0, 0.0, 1.0, 1.0)).unwrap();

        let ids: Vec<ShapeId> = scene.draw_list().iter().map(|d| d.shape.id()).collect();
        assert_eq!(ids, vec![first, second, third]);
    }
}
