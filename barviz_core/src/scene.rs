// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained node tree.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use barviz_text::TextMeasurer;
use hashbrown::HashMap;
use kurbo::{Rect, Vec2};

use crate::NodeId;
use crate::node::{Node, NodeKind};

/// A tree of SVG nodes with stable ids.
///
/// All operations taking a [`NodeId`] tolerate stale ids: lookups return `None`
/// and mutations return `false`.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    root: Option<NodeId>,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole tree with a single root node.
    pub fn set_root(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.clear();
        let id = self.alloc_id();
        self.nodes.insert(id, Node::new(id, kind, None));
        self.root = Some(id);
        id
    }

    /// Returns the root node id, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the scene holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a new node as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.alloc_id();
        self.nodes.insert(id, Node::new(id, kind, Some(parent)));
        self.nodes.get_mut(&parent)?.children.push(id);
        Some(id)
    }

    /// Removes `id` and its whole subtree, detaching it from its parent.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if let Some(parent) = node.parent
            && let Some(p) = self.nodes.get_mut(&parent)
        {
            p.children.retain(|c| *c != id);
        }
        for d in self.descendants(id) {
            self.nodes.remove(&d);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        true
    }

    /// Returns a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Returns a mutable node by id.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Returns the children of `id` in paint order (empty for unknown ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Replaces the class list of `id` with the whitespace-separated `classes`.
    pub fn set_class(&mut self, id: NodeId, classes: &str) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.classes = classes.split_whitespace().map(String::from).collect();
        true
    }

    /// Sets the translation of `id`.
    pub fn set_translate(&mut self, id: NodeId, translate: impl Into<Vec2>) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.translate = translate.into();
        true
    }

    /// Returns `id` followed by all of its descendants, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&id) {
            return out;
        }
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            let children = self.children(next);
            stack.extend(children.iter().rev().copied());
        }
        out
    }

    /// Returns the descendants of `id` (excluding `id`) that carry `class`.
    pub fn select_all(&self, id: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .skip(1)
            .filter(|d| self.nodes.get(d).is_some_and(|n| n.has_class(class)))
            .collect()
    }

    /// Returns the `<text>` nodes under every descendant of `id` carrying `class`.
    ///
    /// This is the `selectAll(".tick text")` of the scene graph.
    pub fn select_text_in(&self, id: NodeId, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        for owner in self.select_all(id, class) {
            for d in self.descendants(owner).into_iter().skip(1) {
                if self
                    .nodes
                    .get(&d)
                    .is_some_and(|n| matches!(n.kind, NodeKind::Text(_)))
                    && !out.contains(&d)
                {
                    out.push(d);
                }
            }
        }
        out
    }

    /// Returns the summed translation from `id` up to (excluding) `ancestor`.
    ///
    /// Returns `None` if `ancestor` is not an ancestor of `id` (or `id` itself).
    pub fn offset_within(&self, id: NodeId, ancestor: NodeId) -> Option<Vec2> {
        let mut offset = Vec2::ZERO;
        let mut cur = id;
        while cur != ancestor {
            let node = self.nodes.get(&cur)?;
            offset += node.translate;
            cur = node.parent?;
        }
        Some(offset)
    }

    /// Returns the bounding box of `id` in its own coordinate system.
    ///
    /// This matches SVG `getBBox`: children contribute through their
    /// translations, `id`'s own translation is not applied.
    pub fn bbox(&self, id: NodeId, measurer: &dyn TextMeasurer) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        let mut out = node.kind.own_bounds(measurer);
        for child in &node.children {
            let Some(b) = self.bbox(*child, measurer) else {
                continue;
            };
            let translate = self.nodes.get(child).map_or(Vec2::ZERO, |n| n.translate);
            let b = b + translate;
            out = Some(out.map_or(b, |r| r.union(b)));
        }
        out
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use barviz_text::HeuristicTextMeasurer;
    use kurbo::Rect;

    use super::*;
    use crate::node::{RectNode, SvgRoot, TextNode};

    fn scene_with_group() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let svg = scene.set_root(NodeKind::Svg(SvgRoot {
            width: 100.0,
            height: 50.0,
        }));
        let g = scene.append(svg, NodeKind::Group).expect("root exists");
        (scene, svg, g)
    }

    #[test]
    fn remove_detaches_subtree() {
        let (mut scene, _svg, g) = scene_with_group();
        let tip = scene.append(g, NodeKind::Group).expect("g exists");
        let rect = scene
            .append(tip, NodeKind::Rect(RectNode::new(Rect::new(0.0, 0.0, 5.0, 5.0))))
            .expect("tip exists");
        assert_eq!(scene.len(), 4);

        assert!(scene.remove(tip), "tip is live");
        assert_eq!(scene.len(), 2);
        assert!(scene.node(rect).is_none(), "subtree removed");
        assert!(scene.children(g).is_empty(), "detached from parent");
        assert!(!scene.remove(tip), "second removal is a no-op");
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let (mut scene, _svg, g) = scene_with_group();
        let a = scene.append(g, NodeKind::Group).expect("g exists");
        scene.remove(a);
        let b = scene.append(g, NodeKind::Group).expect("g exists");
        assert_ne!(a, b);
        assert!(scene.node(a).is_none(), "stale id stays dead");
    }

    #[test]
    fn select_all_matches_class_tokens() {
        let (mut scene, _svg, g) = scene_with_group();
        let a = scene.append(g, NodeKind::Group).expect("g exists");
        let b = scene.append(g, NodeKind::Group).expect("g exists");
        scene.set_class(a, "bar theft");
        scene.set_class(b, "barrier");
        assert_eq!(scene.select_all(g, "bar"), alloc::vec![a]);
        assert_eq!(scene.node(a).expect("live").class_attr(), "bar theft");
    }

    #[test]
    fn select_text_in_finds_nested_text() {
        let (mut scene, _svg, g) = scene_with_group();
        let axis = scene.append(g, NodeKind::Group).expect("g exists");
        let tick = scene.append(axis, NodeKind::Group).expect("axis exists");
        scene.set_class(tick, "tick");
        let text = scene
            .append(tick, NodeKind::Text(TextNode::new("A", 10.0)))
            .expect("tick exists");
        assert_eq!(scene.select_text_in(g, "tick"), alloc::vec![text]);
    }

    #[test]
    fn bbox_includes_child_translations_but_not_own() {
        let (mut scene, svg, g) = scene_with_group();
        scene.set_translate(g, (60.0, 20.0));
        let row = scene.append(g, NodeKind::Group).expect("g exists");
        scene.set_translate(row, (0.0, 10.0));
        scene
            .append(row, NodeKind::Rect(RectNode::new(Rect::new(5.0, 0.0, 25.0, 8.0))))
            .expect("row exists");

        let m = HeuristicTextMeasurer;
        assert_eq!(scene.bbox(row, &m), Some(Rect::new(5.0, 0.0, 25.0, 8.0)));
        assert_eq!(scene.bbox(g, &m), Some(Rect::new(5.0, 10.0, 25.0, 18.0)));
        assert_eq!(scene.bbox(svg, &m), Some(Rect::new(65.0, 30.0, 85.0, 38.0)));
        assert_eq!(scene.offset_within(row, svg), Some(Vec2::new(60.0, 30.0)));
        assert_eq!(scene.offset_within(svg, row), None);
    }
}
