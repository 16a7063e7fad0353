//! The view hierarchy seen by the engine.
//!
//! The engine never owns views. Hosts expose their tree through
//! [`ViewHierarchy`]; [`ViewTree`] is an in-memory implementation for hosts
//! without a tree of their own and for tests.
//!
//! Coordinates follow a translation-only model: a child's origin is its
//! offset inside the parent's content, and the parent's scroll offset shifts
//! that content.

use std::collections::HashMap;

use horizon_gesture_core::{Point, Size, ViewTag};

/// How a view participates in hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerEventsConfig {
    /// The view and its descendants may be targets.
    #[default]
    Auto,
    /// Neither the view nor its descendants are targets.
    None,
    /// Only the view itself is a target.
    BoxOnly,
    /// Only descendants are targets.
    BoxNone,
}

/// Horizontal layout direction of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// What a handler needs to know about the view it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetInfo {
    /// Size of the view.
    pub size: Size,
    /// Layout direction, used to mirror hit slop.
    pub layout_direction: LayoutDirection,
}

/// Read-only access to a host's view tree.
pub trait ViewHierarchy {
    /// Size and layout direction of a view, or `None` if it doesn't exist.
    fn target(&self, view: ViewTag) -> Option<TargetInfo>;

    /// Parent of a view.
    fn parent(&self, view: ViewTag) -> Option<ViewTag>;

    /// Children of a view in drawing order.
    fn children(&self, view: ViewTag) -> Vec<ViewTag>;

    /// Origin of a view inside its parent's content.
    fn origin(&self, view: ViewTag) -> Point;

    /// Scroll offset of a view's content.
    fn scroll_offset(&self, _view: ViewTag) -> Point {
        Point::ZERO
    }

    /// Hit testing mode of a view.
    fn pointer_events(&self, _view: ViewTag) -> PointerEventsConfig {
        PointerEventsConfig::Auto
    }

    /// Whether a view is visible and opaque enough to be traversed.
    fn can_receive_events(&self, _view: ViewTag, _minimum_alpha: f32) -> bool {
        true
    }

    /// Whether hit testing ignores points outside the view.
    ///
    /// A view that doesn't clip lets handlers with outward hit slop, or
    /// children drawn outside it, receive touches beyond its bounds.
    fn clips_children(&self, _view: ViewTag) -> bool {
        true
    }

    /// Translate a point from `parent` content space into `child` space.
    fn child_point(&self, parent: ViewTag, child: ViewTag, point: Point) -> Point {
        point + self.scroll_offset(parent) - self.origin(child)
    }

    /// Whether `view` is `root` or one of its descendants.
    fn is_attached_under(&self, view: ViewTag, root: ViewTag) -> bool {
        let mut current = Some(view);
        while let Some(tag) = current {
            if tag == root {
                return true;
            }
            current = self.parent(tag);
        }
        false
    }

    /// Translate a point from `root` space into `view` space.
    ///
    /// Returns `None` if `view` isn't under `root`.
    fn to_local(&self, view: ViewTag, root: ViewTag, point: Point) -> Option<Point> {
        let mut path = Vec::new();
        let mut current = view;
        while current != root {
            path.push(current);
            current = self.parent(current)?;
        }

        let mut parent = root;
        let mut local = point;
        for child in path.into_iter().rev() {
            local = self.child_point(parent, child, local);
            parent = child;
        }
        Some(local)
    }
}

/// A view in a [`ViewTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub tag: ViewTag,
    pub origin: Point,
    pub size: Size,
    pub scroll: Point,
    pub pointer_events: PointerEventsConfig,
    pub visible: bool,
    pub alpha: f32,
    pub clips_children: bool,
    pub layout_direction: LayoutDirection,
    parent: Option<ViewTag>,
    children: Vec<ViewTag>,
}

impl ViewNode {
    /// A visible, opaque, clipping view.
    pub fn new(tag: ViewTag, origin: Point, size: Size) -> Self {
        Self {
            tag,
            origin,
            size,
            scroll: Point::ZERO,
            pointer_events: PointerEventsConfig::Auto,
            visible: true,
            alpha: 1.0,
            clips_children: true,
            layout_direction: LayoutDirection::Ltr,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_pointer_events(mut self, pointer_events: PointerEventsConfig) -> Self {
        self.pointer_events = pointer_events;
        self
    }

    pub fn with_scroll(mut self, scroll: Point) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_layout_direction(mut self, layout_direction: LayoutDirection) -> Self {
        self.layout_direction = layout_direction;
        self
    }

    pub fn with_clips_children(mut self, clips_children: bool) -> Self {
        self.clips_children = clips_children;
        self
    }

    pub fn with_visibility(mut self, visible: bool, alpha: f32) -> Self {
        self.visible = visible;
        self.alpha = alpha;
        self
    }

    pub fn parent(&self) -> Option<ViewTag> {
        self.parent
    }

    pub fn children(&self) -> &[ViewTag] {
        &self.children
    }
}

/// In-memory view tree.
#[derive(Debug, Clone, Default)]
pub struct ViewTree {
    nodes: HashMap<ViewTag, ViewNode>,
}

impl ViewTree {
    /// Create a tree with a single root view.
    pub fn new(root: ViewTag, size: Size) -> Self {
        let mut tree = Self::default();
        tree.insert_root(ViewNode::new(root, Point::ZERO, size));
        tree
    }

    /// Insert a parentless view.
    pub fn insert_root(&mut self, node: ViewNode) {
        self.nodes.insert(node.tag, node);
    }

    /// Insert `node` as the last child of `parent`.
    ///
    /// Returns false if `parent` doesn't exist. Re-inserting a tag detaches
    /// the previous view first.
    pub fn insert(&mut self, parent: ViewTag, mut node: ViewNode) -> bool {
        if !self.nodes.contains_key(&parent) {
            return false;
        }
        self.remove(node.tag);

        let tag = node.tag;
        node.parent = Some(parent);
        self.nodes.insert(tag, node);
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(tag);
        }
        true
    }

    /// Remove a view and its subtree.
    pub fn remove(&mut self, tag: ViewTag) -> Option<ViewNode> {
        let node = self.nodes.remove(&tag)?;
        if let Some(parent) = node.parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent.children.retain(|child| *child != tag);
        }
        for child in node.children.clone() {
            self.remove(child);
        }
        Some(node)
    }

    pub fn get(&self, tag: ViewTag) -> Option<&ViewNode> {
        self.nodes.get(&tag)
    }

    pub fn get_mut(&mut self, tag: ViewTag) -> Option<&mut ViewNode> {
        self.nodes.get_mut(&tag)
    }

    pub fn contains(&self, tag: ViewTag) -> bool {
        self.nodes.contains_key(&tag)
    }
}

impl ViewHierarchy for ViewTree {
    fn target(&self, view: ViewTag) -> Option<TargetInfo> {
        self.nodes.get(&view).map(|node| TargetInfo {
            size: node.size,
            layout_direction: node.layout_direction,
        })
    }

    fn parent(&self, view: ViewTag) -> Option<ViewTag> {
        self.nodes.get(&view).and_then(|node| node.parent)
    }

    fn children(&self, view: ViewTag) -> Vec<ViewTag> {
        self.nodes
            .get(&view)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn origin(&self, view: ViewTag) -> Point {
        self.nodes
            .get(&view)
            .map(|node| node.origin)
            .unwrap_or_default()
    }

    fn scroll_offset(&self, view: ViewTag) -> Point {
        self.nodes
            .get(&view)
            .map(|node| node.scroll)
            .unwrap_or_default()
    }

    fn pointer_events(&self, view: ViewTag) -> PointerEventsConfig {
        self.nodes
            .get(&view)
            .map(|node| node.pointer_events)
            .unwrap_or_default()
    }

    fn can_receive_events(&self, view: ViewTag, minimum_alpha: f32) -> bool {
        self.nodes
            .get(&view)
            .is_some_and(|node| node.visible && node.alpha >= minimum_alpha)
    }

    fn clips_children(&self, view: ViewTag) -> bool {
        self.nodes.get(&view).is_none_or(|node| node.clips_children)
    }
}
