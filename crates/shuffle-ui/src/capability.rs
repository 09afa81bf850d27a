//! # Drag and drop capabilities
//!
//! A view takes part in drag and drop by implementing [`Draggable`] (it can
//! originate a drag), [`Droppable`] (it can receive one) or both. The
//! manager never inspects view types at runtime: the capabilities of each
//! view are recorded once, when it is registered as a [`Participant`].
//!
//! Points and rects handed to a capability are always in that view's own
//! (bounds) coordinate space, i.e. content coordinates for a scrolling view.
//!
//! Data items are compared by value. Indices shift while items are being
//! reordered, so a view locates an item by searching its backing store for
//! an equal value.

use std::rc::Rc;

use bitflags::bitflags;
use shuffle_core::*;

/// Floating visual clone of a dragged cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Representation {
    pub frame: Rect,
    pub alpha: f32,
    /// Painted cell, relative to the frame's origin.
    pub content: Vec<SceneNode>,
}

impl Representation {
    pub fn new(frame: Rect, content: Vec<SceneNode>) -> Self {
        Self {
            frame,
            alpha: 1.0,
            content,
        }
    }
}

pub trait ViewHandle {
    fn view_id(&self) -> ViewId;
}

pub trait Draggable<T>: ViewHandle {
    fn can_drag_at_point(&self, point: Vec2) -> bool;

    /// Snapshot of the cell under `point`, framed where the cell sits.
    fn representation_at_point(&self, point: Vec2) -> Option<Representation>;

    /// Decorates the representation (border, shadow). Identity by default.
    fn styling_representation(&self, representation: Representation) -> Representation {
        representation
    }

    fn data_item_at_point(&self, point: Vec2) -> Option<T>;

    /// The item was accepted by another view; remove it from this one.
    fn drag_data_item(&self, item: &T);

    fn start_dragging_at_point(&self, _point: Vec2) {}

    /// The drag was cancelled; put the item back where the drag started.
    /// Called after any other view has given the item up.
    fn restore_data_item(&self, _item: &T) {}

    fn stop_dragging(&self) {}
}

pub trait Droppable<T>: ViewHandle {
    fn can_drop_at_rect(&self, rect: Rect) -> bool;

    /// The item is entering this view at `rect`.
    fn will_move_item(&self, item: &T, rect: Rect);

    /// The item moved while over this view.
    fn did_move_item(&self, item: &T, rect: Rect);

    /// The item left this view for another one.
    fn did_move_out_item(&self, item: &T);

    /// The drag ended over this view.
    fn drop_data_item(&self, item: &T, rect: Rect);
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const DRAGGABLE = 1;
        const DROPPABLE = 1 << 1;
    }
}

/// A registered view together with the capabilities it exposes.
pub struct Participant<T> {
    id: ViewId,
    capabilities: Capabilities,
    draggable: Option<Rc<dyn Draggable<T>>>,
    droppable: Option<Rc<dyn Droppable<T>>>,
}

impl<T> Clone for Participant<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            capabilities: self.capabilities,
            draggable: self.draggable.clone(),
            droppable: self.droppable.clone(),
        }
    }
}

impl<T: 'static> Participant<T> {
    pub fn draggable(view: Rc<dyn Draggable<T>>) -> Self {
        Self {
            id: view.view_id(),
            capabilities: Capabilities::DRAGGABLE,
            draggable: Some(view),
            droppable: None,
        }
    }

    pub fn droppable(view: Rc<dyn Droppable<T>>) -> Self {
        Self {
            id: view.view_id(),
            capabilities: Capabilities::DROPPABLE,
            draggable: None,
            droppable: Some(view),
        }
    }

    pub fn both<V>(view: Rc<V>) -> Self
    where
        V: Draggable<T> + Droppable<T> + 'static,
    {
        let draggable: Rc<dyn Draggable<T>> = view.clone();
        let droppable: Rc<dyn Droppable<T>> = view.clone();
        Self {
            id: ViewHandle::view_id(&*view),
            capabilities: Capabilities::DRAGGABLE | Capabilities::DROPPABLE,
            draggable: Some(draggable),
            droppable: Some(droppable),
        }
    }
}

impl<T> Participant<T> {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn as_draggable(&self) -> Option<&Rc<dyn Draggable<T>>> {
        self.draggable.as_ref()
    }

    pub fn as_droppable(&self) -> Option<&Rc<dyn Droppable<T>>> {
        self.droppable.as_ref()
    }
}

impl<T> std::fmt::Debug for Participant<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("id", &self.id)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
