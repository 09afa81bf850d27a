//! # Drag session controller
//!
//! `DragDropManager` owns the single drag session of a canvas. It is fed
//! either raw pointer events ([`DragDropManager::handle_pointer`] plus a
//! per-frame [`DragDropManager::tick`]) or, when the host has its own
//! gesture recognition, the session entry points directly:
//!
//! ```text
//! should_receive_touch ─► begin ─► update* ─► end | cancel
//!        Idle         Candidate   Dragging          Idle
//! ```
//!
//! Participants are consulted in registration order, which makes every
//! tie (two droppable views with the same overlap) resolve to the view
//! registered first.

use std::rc::Rc;

use shuffle_core::*;

use crate::capability::{Draggable, Droppable, Participant, Representation, ViewHandle};
use crate::gestures::{GesturePhase, LongPress, LongPressRecognizer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    /// A touch landed on a draggable item; waiting for the long press.
    Candidate,
    /// The representation is on the canvas and follows the pointer.
    Dragging,
}

/// State of one drag, from touch-down to release.
#[derive(Clone, Debug)]
pub struct DragSession<T> {
    offset: Vec2,
    source: usize,
    source_id: ViewId,
    over: Option<usize>,
    over_id: Option<ViewId>,
    representation: Representation,
    representation_view: Option<ViewId>,
    item: T,
}

impl<T> DragSession<T> {
    /// Pointer position minus the representation's origin.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn source(&self) -> ViewId {
        self.source_id
    }

    /// Droppable view the item is currently over.
    pub fn over(&self) -> Option<ViewId> {
        self.over_id
    }

    /// The floating representation, framed in canvas coordinates.
    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    pub fn item(&self) -> &T {
        &self.item
    }
}

enum SessionState<T> {
    Idle,
    Candidate(DragSession<T>),
    Dragging(DragSession<T>),
}

pub struct DragDropManager<T: Clone + PartialEq + 'static> {
    tree: Rc<ViewTree>,
    main_loop: Rc<MainLoop>,
    canvas: ViewId,
    participants: Vec<Participant<T>>,
    recognizer: LongPressRecognizer,
    config: DragConfig,
    state: SessionState<T>,
}

impl<T: Clone + PartialEq + 'static> DragDropManager<T> {
    pub fn new(
        tree: Rc<ViewTree>,
        main_loop: Rc<MainLoop>,
        canvas: ViewId,
        participants: Vec<Participant<T>>,
        config: DragConfig,
    ) -> Self {
        for p in &participants {
            if !tree.is_ancestor(canvas, p.id()) {
                log::warn!("view {:?} is not inside the drag canvas", p.id());
            }
        }
        Self {
            tree,
            main_loop,
            canvas,
            participants,
            recognizer: LongPressRecognizer::new(&config),
            config,
            state: SessionState::Idle,
        }
    }

    /// Appends a participant; it ranks after every view registered before it.
    pub fn register(&mut self, participant: Participant<T>) {
        self.participants.push(participant);
    }

    pub fn participants(&self) -> &[Participant<T>] {
        &self.participants
    }

    pub fn canvas(&self) -> ViewId {
        self.canvas
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            SessionState::Idle => DragPhase::Idle,
            SessionState::Candidate(_) => DragPhase::Candidate,
            SessionState::Dragging(_) => DragPhase::Dragging,
        }
    }

    pub fn session(&self) -> Option<&DragSession<T>> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Candidate(s) | SessionState::Dragging(s) => Some(s),
        }
    }

    /// Canvas node showing the representation while dragging.
    pub fn representation_view(&self) -> Option<ViewId> {
        self.session().and_then(|s| s.representation_view)
    }

    fn draggable(&self, index: usize) -> Option<Rc<dyn Draggable<T>>> {
        self.participants.get(index)?.as_draggable().cloned()
    }

    fn droppable(&self, index: usize) -> Option<Rc<dyn Droppable<T>>> {
        self.participants.get(index)?.as_droppable().cloned()
    }

    /// Feeds a pointer event (canvas coordinates). Returns true if the
    /// event belongs to a press this manager is tracking.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let now = self.main_loop.now();
        if event.event == PointerEventKind::Down {
            if self.recognizer.is_tracking() || !matches!(self.state, SessionState::Idle) {
                return false;
            }
            if !self.should_receive_touch(event.position) {
                return false;
            }
            self.recognizer.press(event.position, now);
            return true;
        }

        let tracking = self.recognizer.is_tracking();
        if let Some(press) = self.recognizer.handle_pointer(event, now) {
            self.apply(press);
        }
        tracking
    }

    /// Recognizes a press held long enough without moving. Call every frame.
    pub fn tick(&mut self) {
        if let Some(press) = self.recognizer.poll(self.main_loop.now()) {
            self.apply(press);
        }
    }

    fn apply(&mut self, press: LongPress) {
        match press.phase {
            GesturePhase::Began => self.begin(press.position),
            GesturePhase::Changed => self.update(press.position),
            GesturePhase::Ended => self.end(),
            GesturePhase::Cancelled => self.cancel(),
            GesturePhase::Failed => {
                if matches!(self.state, SessionState::Candidate(_)) {
                    log::debug!("drag: press failed, dropping candidate");
                }
                self.state = SessionState::Idle;
            }
        }
    }

    /// Decides whether a touch at `point` (canvas coordinates) starts a drag.
    ///
    /// The first registered draggable view that can drag at the point and
    /// resolves both a representation and a data item becomes the source.
    pub fn should_receive_touch(&mut self, point: Vec2) -> bool {
        if !matches!(self.state, SessionState::Idle) {
            return false;
        }

        for (index, participant) in self.participants.iter().enumerate() {
            let Some(draggable) = participant.as_draggable() else {
                continue;
            };
            let id = participant.id();
            let local = self.tree.convert_point(point, self.canvas, id);
            if !self.tree.bounds(id).contains(local) || !draggable.can_drag_at_point(local) {
                continue;
            }
            let (Some(mut representation), Some(item)) = (
                draggable.representation_at_point(local),
                draggable.data_item_at_point(local),
            ) else {
                continue;
            };

            representation.frame = self
                .tree
                .rect_to_ancestor(id, self.canvas, representation.frame);
            representation.alpha = self.config.representation_alpha;
            let representation = draggable.styling_representation(representation);

            let over = participant.as_droppable().map(|_| index);
            let session = DragSession {
                offset: point - representation.frame.origin(),
                source: index,
                source_id: id,
                over,
                over_id: over.map(|_| id),
                representation,
                representation_view: None,
                item,
            };
            log::debug!("drag: candidate on {id:?} at {point:?}");
            self.state = SessionState::Candidate(session);
            return true;
        }
        false
    }

    /// Long press recognized: puts the representation on the canvas.
    pub fn begin(&mut self, point: Vec2) {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let SessionState::Candidate(mut session) = state else {
            self.state = state;
            return;
        };

        let rep = &session.representation;
        let node = self.tree.add_child(self.canvas, rep.frame);
        self.tree.set_alpha(node, rep.alpha);
        self.tree.set_content(node, rep.content.clone());
        session.representation_view = Some(node);

        if let Some(source) = self.draggable(session.source) {
            let local = self.tree.convert_point(point, self.canvas, session.source_id);
            source.start_dragging_at_point(local);
        }
        log::debug!("drag: began from {:?}", session.source_id);
        self.state = SessionState::Dragging(session);
    }

    /// Pointer moved to `point` (canvas coordinates) while dragging.
    pub fn update(&mut self, point: Vec2) {
        let SessionState::Dragging(session) = &mut self.state else {
            return;
        };

        let frame = session
            .representation
            .frame
            .with_origin(point - session.offset);
        session.representation.frame = frame;
        if let Some(node) = session.representation_view {
            self.tree.set_frame(node, frame);
        }

        let candidates = self
            .participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.as_droppable().is_some())
            .map(|(i, p)| (i, self.tree.frame_in(p.id(), self.canvas)));
        let Some((target, area)) = best_overlap(candidates, &frame) else {
            log::trace!("drag: no droppable under {frame:?}");
            return;
        };
        let Some(droppable) = self.participants[target].as_droppable().cloned() else {
            return;
        };
        let target_id = self.participants[target].id();
        let local = self.tree.convert_rect(frame, self.canvas, target_id);
        if !droppable.can_drop_at_rect(local) {
            log::trace!("drag: {target_id:?} refuses {local:?}");
            return;
        }
        log::trace!("drag: over {target_id:?} (overlap {area})");

        if session.over != Some(target) {
            if let Some(prev) = session
                .over
                .and_then(|i| self.participants.get(i))
                .and_then(|p| p.as_droppable())
            {
                prev.did_move_out_item(&session.item);
            }
            droppable.will_move_item(&session.item, local);
            log::debug!("drag: moved from {:?} to {target_id:?}", session.over_id);
            session.over = Some(target);
            session.over_id = Some(target_id);
        }
        droppable.did_move_item(&session.item, local);
    }

    /// Gesture released. Commits the move when it ended over another view.
    pub fn end(&mut self) {
        self.recognizer.reset();
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let session = match state {
            SessionState::Idle => return,
            SessionState::Candidate(_) => {
                log::debug!("drag: released before the press was recognized");
                return;
            }
            SessionState::Dragging(session) => session,
        };

        if let Some(over) = session.over
            && over != session.source
            && let (Some(source), Some(target)) =
                (self.draggable(session.source), self.droppable(over))
        {
            source.drag_data_item(&session.item);
            let rect = self.drop_rect(&session, target.view_id());
            target.drop_data_item(&session.item, rect);
            log::debug!("drag: dropped on {:?}", session.over_id);
        } else {
            log::debug!("drag: ended on its source; nothing to commit");
        }
        self.teardown(&session);
    }

    /// Platform cancellation: undoes the live moves and cleans up, leaving
    /// every store as it was at touch-down.
    pub fn cancel(&mut self) {
        self.recognizer.reset();
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let SessionState::Dragging(session) = state else {
            return;
        };

        if let Some(over) = session.over
            && over != session.source
            && let Some(target) = self.droppable(over)
        {
            target.did_move_out_item(&session.item);
        }
        if let Some(source) = self.draggable(session.source) {
            source.restore_data_item(&session.item);
        }
        log::debug!("drag: cancelled");
        self.teardown(&session);
    }

    fn drop_rect(&self, session: &DragSession<T>, target: ViewId) -> Rect {
        self.tree
            .convert_rect(session.representation.frame, self.canvas, target)
    }

    fn teardown(&self, session: &DragSession<T>) {
        if let Some(node) = session.representation_view {
            self.tree.remove(node);
        }
        if let Some(source) = self.draggable(session.source) {
            source.stop_dragging();
        }
    }

    /// The floating representation in canvas coordinates, faded to its alpha.
    pub fn paint_representation(&self) -> Vec<SceneNode> {
        let Some(node) = self.representation_view() else {
            return Vec::new();
        };
        let frame = self.tree.frame(node);
        let alpha = self.tree.alpha(node);
        self.tree
            .content(node)
            .iter()
            .map(|n| n.offset(frame.x, frame.y).faded(alpha))
            .collect()
    }
}

impl<T: Clone + PartialEq + 'static> Drop for DragDropManager<T> {
    fn drop(&mut self) {
        if matches!(self.state, SessionState::Dragging(_)) {
            self.cancel();
        }
    }
}
