//! # View tree
//!
//! A retained hierarchy of rectangular views. Each node has a `frame` in its
//! parent's coordinate space and a `bounds_origin` that shifts the coordinate
//! space of its own children (the scroll offset of a scrolling view).
//!
//! The canvas that hosts a drag is just a node of this tree; floating views
//! are attached to it as children and removed again when the drag ends.
//!
//! All methods take `&self` and only hold the inner borrow for the duration
//! of the call, so views can share one `Rc<ViewTree>` and call into it from
//! any callback.

use std::cell::RefCell;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::{Rect, SceneNode, TreeError, Vec2};

new_key_type! {
    pub struct ViewId;
}

#[derive(Clone, Debug)]
struct Node {
    frame: Rect,
    bounds_origin: Vec2,
    parent: Option<ViewId>,
    children: SmallVec<[ViewId; 4]>,
    alpha: f32,
    hidden: bool,
    content: Vec<SceneNode>,
}

impl Node {
    fn new(frame: Rect, parent: Option<ViewId>) -> Self {
        Self {
            frame,
            bounds_origin: Vec2::ZERO,
            parent,
            children: SmallVec::new(),
            alpha: 1.0,
            hidden: false,
            content: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct ViewTree {
    nodes: RefCell<SlotMap<ViewId, Node>>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&self, frame: Rect) -> ViewId {
        self.nodes.borrow_mut().insert(Node::new(frame, None))
    }

    pub fn try_add_child(&self, parent: ViewId, frame: Rect) -> Result<ViewId, TreeError> {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes.contains_key(parent) {
            return Err(TreeError::UnknownView(parent));
        }
        let id = nodes.insert(Node::new(frame, Some(parent)));
        nodes[parent].children.push(id);
        Ok(id)
    }

    /// Adds a child, or a detached root if `parent` is gone.
    pub fn add_child(&self, parent: ViewId, frame: Rect) -> ViewId {
        self.try_add_child(parent, frame).unwrap_or_else(|e| {
            log::warn!("add_child: {e}; inserting as a detached root");
            self.add_root(frame)
        })
    }

    /// Removes `id` and its whole subtree. Returns false if it was not present.
    pub fn remove(&self, id: ViewId) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes.get(id).map(|n| n.parent) else {
            return false;
        };
        if let Some(p) = parent.and_then(|p| nodes.get_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = nodes.remove(next) {
                stack.extend(node.children);
            }
        }
        true
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.borrow().get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ViewId) -> Vec<ViewId> {
        self.nodes
            .borrow()
            .get(id)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    pub fn try_frame(&self, id: ViewId) -> Result<Rect, TreeError> {
        self.nodes
            .borrow()
            .get(id)
            .map(|n| n.frame)
            .ok_or(TreeError::UnknownView(id))
    }

    /// Frame in the parent's space; zero rect for unknown views.
    pub fn frame(&self, id: ViewId) -> Rect {
        self.try_frame(id).unwrap_or_default()
    }

    pub fn set_frame(&self, id: ViewId, frame: Rect) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(id) {
            n.frame = frame;
        }
    }

    /// The view's own coordinate space: scroll offset plus frame size.
    pub fn bounds(&self, id: ViewId) -> Rect {
        self.nodes
            .borrow()
            .get(id)
            .map(|n| Rect::from_origin_size(n.bounds_origin, n.frame.size()))
            .unwrap_or_default()
    }

    pub fn bounds_origin(&self, id: ViewId) -> Vec2 {
        self.nodes
            .borrow()
            .get(id)
            .map(|n| n.bounds_origin)
            .unwrap_or_default()
    }

    pub fn set_bounds_origin(&self, id: ViewId, origin: Vec2) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(id) {
            n.bounds_origin = origin;
        }
    }

    pub fn alpha(&self, id: ViewId) -> f32 {
        self.nodes.borrow().get(id).map_or(0.0, |n| n.alpha)
    }

    pub fn set_alpha(&self, id: ViewId, alpha: f32) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(id) {
            n.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    pub fn is_hidden(&self, id: ViewId) -> bool {
        self.nodes.borrow().get(id).is_none_or(|n| n.hidden)
    }

    pub fn set_hidden(&self, id: ViewId, hidden: bool) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(id) {
            n.hidden = hidden;
        }
    }

    pub fn content(&self, id: ViewId) -> Vec<SceneNode> {
        self.nodes
            .borrow()
            .get(id)
            .map(|n| n.content.clone())
            .unwrap_or_default()
    }

    pub fn set_content(&self, id: ViewId, content: Vec<SceneNode>) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(id) {
            n.content = content;
        }
    }

    pub fn is_ancestor(&self, ancestor: ViewId, id: ViewId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = nodes.get(p).and_then(|n| n.parent);
        }
        false
    }

    /// Maps a rect in `id`'s local space into `ancestor`'s local space by
    /// walking up the parent chain.
    ///
    /// If the chain runs out before reaching `ancestor` the partial
    /// conversion is returned; that only happens when the view was never
    /// placed inside `ancestor`.
    pub fn rect_to_ancestor(&self, id: ViewId, ancestor: ViewId, rect: Rect) -> Rect {
        self.try_rect_to_ancestor(id, ancestor, rect)
            .unwrap_or_else(|(partial, e)| {
                log::debug!("rect_to_ancestor: {e}; using partial conversion");
                partial
            })
    }

    fn try_rect_to_ancestor(
        &self,
        id: ViewId,
        ancestor: ViewId,
        rect: Rect,
    ) -> Result<Rect, (Rect, TreeError)> {
        let nodes = self.nodes.borrow();
        let mut out = rect;
        let mut cur = id;
        while cur != ancestor {
            let Some(node) = nodes.get(cur) else {
                return Err((out, TreeError::UnknownView(cur)));
            };
            out = out.translate(node.frame.origin() - node.bounds_origin);
            match node.parent {
                Some(p) => cur = p,
                None => {
                    return Err((
                        out,
                        TreeError::NotAnAncestor {
                            view: id,
                            ancestor,
                        },
                    ));
                }
            }
        }
        Ok(out)
    }

    /// The view's frame expressed in `ancestor`'s space.
    pub fn frame_in(&self, id: ViewId, ancestor: ViewId) -> Rect {
        let frame = self.frame(id);
        match self.parent(id) {
            Some(parent) => self.rect_to_ancestor(parent, ancestor, frame),
            None => frame,
        }
    }

    fn origin_in_root(&self, id: ViewId) -> Vec2 {
        let nodes = self.nodes.borrow();
        let mut acc = Vec2::ZERO;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(node) = nodes.get(c) else { break };
            acc = acc + node.frame.origin() - node.bounds_origin;
            cur = node.parent;
        }
        acc
    }

    /// Converts a point between the local spaces of two views sharing a root.
    pub fn convert_point(&self, p: Vec2, from: ViewId, to: ViewId) -> Vec2 {
        p + self.origin_in_root(from) - self.origin_in_root(to)
    }

    pub fn convert_rect(&self, rect: Rect, from: ViewId, to: ViewId) -> Rect {
        rect.with_origin(self.convert_point(rect.origin(), from, to))
    }
}
