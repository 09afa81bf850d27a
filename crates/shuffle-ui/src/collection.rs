//! # Drag-and-drop collection view
//!
//! A scrolling grid of cells backed by a [`CollectionDataSource`]. It is both
//! [`Draggable`] and [`Droppable`]: cells can be picked up from it, and items
//! dragged over it are inserted, reordered and removed live.
//!
//! ## Batch updates
//!
//! Every structural change is applied to the data source first and only then
//! announced as a [`CellUpdate`]. At most one animated batch is in flight per
//! view: while `animating` is set, further updates are recorded as
//! unanimated and the in-flight completion reloads the view to reconcile.
//! Completions are tasks on the shared [`MainLoop`], due
//! `batch_update_duration` after the batch started.
//!
//! ## Coordinates
//!
//! Points and rects passed to the capabilities are in content coordinates:
//! the view's bounds origin is its scroll offset.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use shuffle_core::*;

use crate::capability::{Draggable, Droppable, Representation, ViewHandle};
use crate::data_source::CollectionDataSource;
use crate::layout::{FlowLayout, ScrollDirection};
use crate::paging::{PagingAreas, next_page_offset};
use crate::scroll::ScrollState;

/// Structural change announced to the view after the store was mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellUpdate {
    Insert(usize),
    Delete(usize),
    Move { from: usize, to: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateRecord {
    pub update: CellUpdate,
    /// False when issued while another batch was still in flight.
    pub animated: bool,
}

/// Where a rect lands relative to the cells of the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DropSlot {
    Empty,
    PastEnd,
    Cell(usize),
}

pub struct DragDropCollectionView<D: CollectionDataSource> {
    me: Weak<Self>,
    id: ViewId,
    tree: Rc<ViewTree>,
    main_loop: Rc<MainLoop>,
    config: DragConfig,
    layout: Cell<FlowLayout>,
    data: RefCell<D>,
    scroll: ScrollState,
    paging_areas: Cell<PagingAreas>,
    presented_len: Cell<usize>,
    dragging_index: Cell<Option<usize>>,
    origin_index: Cell<Option<usize>>,
    animating: Cell<bool>,
    paging: Cell<bool>,
    journal: RefCell<Vec<UpdateRecord>>,
    reloads: Cell<usize>,
}

impl<D: CollectionDataSource + 'static> DragDropCollectionView<D> {
    /// Creates the view as a child of `parent` in `tree`.
    pub fn new(
        tree: Rc<ViewTree>,
        main_loop: Rc<MainLoop>,
        parent: ViewId,
        frame: Rect,
        layout: FlowLayout,
        data: D,
        config: DragConfig,
    ) -> Rc<Self> {
        let id = tree.add_child(parent, frame);
        let presented = data.len();
        let view = Rc::new_cyclic(|me| Self {
            me: me.clone(),
            id,
            tree,
            main_loop,
            scroll: ScrollState::new(config.scroll_animation()),
            config,
            layout: Cell::new(layout),
            data: RefCell::new(data),
            paging_areas: Cell::new(PagingAreas::default()),
            presented_len: Cell::new(presented),
            dragging_index: Cell::new(None),
            origin_index: Cell::new(None),
            animating: Cell::new(false),
            paging: Cell::new(false),
            journal: RefCell::new(Vec::new()),
            reloads: Cell::new(0),
        });
        view.relayout();
        view
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn data(&self) -> std::cell::Ref<'_, D> {
        self.data.borrow()
    }

    /// Mutates the store outside of a drag. Call [`reload_data`] afterwards.
    ///
    /// [`reload_data`]: Self::reload_data
    pub fn with_data<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(&mut self.data.borrow_mut())
    }

    pub fn layout(&self) -> FlowLayout {
        self.layout.get()
    }

    pub fn set_layout(&self, layout: FlowLayout) {
        self.layout.set(layout);
        self.relayout();
    }

    pub fn frame(&self) -> Rect {
        self.tree.frame(self.id)
    }

    pub fn set_frame(&self, frame: Rect) {
        self.tree.set_frame(self.id, frame);
        self.relayout();
    }

    pub fn is_horizontal(&self) -> bool {
        self.layout.get().is_horizontal()
    }

    fn viewport(&self) -> Size {
        self.tree.frame(self.id).size()
    }

    pub fn content_size(&self) -> Size {
        self.layout
            .get()
            .content_size(self.data.borrow().len(), self.viewport())
    }

    pub fn content_offset(&self) -> Vec2 {
        self.scroll.get()
    }

    /// Scrolls to `offset` (clamped). Hit testing sees the new offset
    /// immediately; painting eases towards it when `animated`.
    pub fn set_content_offset(&self, offset: Vec2, animated: bool) {
        let off = self
            .scroll
            .set_offset(offset, animated, self.main_loop.now());
        self.tree.set_bounds_origin(self.id, off);
    }

    pub fn paging_areas(&self) -> PagingAreas {
        self.paging_areas.get()
    }

    pub fn is_paging(&self) -> bool {
        self.paging.get()
    }

    pub fn is_animating(&self) -> bool {
        self.animating.get()
    }

    /// Index of the hidden cell standing in for the dragged item.
    pub fn dragging_index(&self) -> Option<usize> {
        self.dragging_index.get()
    }

    /// Number of cells the view currently shows.
    pub fn presented_len(&self) -> usize {
        self.presented_len.get()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.get()
    }

    /// Drains the structural updates issued since the last call.
    pub fn take_updates(&self) -> Vec<UpdateRecord> {
        std::mem::take(&mut *self.journal.borrow_mut())
    }

    fn relayout(&self) {
        let viewport = self.viewport();
        let layout = self.layout.get();
        self.scroll.set_viewport(viewport);
        self.scroll
            .set_content(layout.content_size(self.data.borrow().len(), viewport));
        self.tree.set_bounds_origin(self.id, self.scroll.get());
        self.paging_areas.set(PagingAreas::new(
            viewport,
            layout.direction,
            self.config.paging_margin,
        ));
    }

    /// Drops any pending visual state and shows the store as it is.
    pub fn reload_data(&self) {
        self.presented_len.set(self.data.borrow().len());
        self.reloads.set(self.reloads.get() + 1);
        self.relayout();
        log::trace!("view {:?}: reload ({} items)", self.id, self.presented_len.get());
    }

    /// Visible cells as `(index, frame)` in content coordinates.
    pub fn visible_cells(&self) -> Vec<(usize, Rect)> {
        let bounds = self.tree.bounds(self.id);
        let layout = self.layout.get();
        let viewport = bounds.size();
        let count = self.data.borrow().len();
        layout
            .visible_range(bounds, count, viewport)
            .map(|i| (i, layout.frame_for_index(i, viewport)))
            .filter(|(_, frame)| frame.intersects(&bounds))
            .collect()
    }

    pub fn index_at_point(&self, point: Vec2) -> Option<usize> {
        self.layout
            .get()
            .index_at_point(point, self.data.borrow().len(), self.viewport())
    }

    pub fn frame_for_index(&self, index: usize) -> Rect {
        self.layout.get().frame_for_index(index, self.viewport())
    }

    fn drop_slot(&self, rect: Rect) -> Option<DropSlot> {
        let visible = self.visible_cells();
        if visible.is_empty() {
            return Some(DropSlot::Empty);
        }
        let content = self.content_size();
        let past_end = match self.layout.get().direction {
            ScrollDirection::Horizontal => rect.x > content.width,
            ScrollDirection::Vertical => rect.y > content.height,
        };
        if past_end {
            return Some(DropSlot::PastEnd);
        }
        best_overlap(visible, &rect).map(|(i, _)| DropSlot::Cell(i))
    }

    /// Position of the cell `rect` overlaps the most, if it accepts drops.
    ///
    /// An empty view resolves to 0 and a rect past the end of the content to
    /// the last position.
    pub fn index_for_cell_overlapping_rect(&self, rect: Rect) -> Option<usize> {
        let data = self.data.borrow();
        match self.drop_slot(rect)? {
            DropSlot::Empty => Some(0),
            DropSlot::PastEnd => {
                let last = data.len().checked_sub(1)?;
                data.is_droppable(last).then_some(last)
            }
            DropSlot::Cell(i) => data.is_droppable(i).then_some(i),
        }
    }

    /// Announces a change already applied to the store.
    fn perform_update(&self, update: CellUpdate) {
        let presented = self.presented_len.get();
        let expected = match update {
            CellUpdate::Insert(_) => presented + 1,
            CellUpdate::Delete(_) => presented.saturating_sub(1),
            CellUpdate::Move { .. } => presented,
        };
        let actual = self.data.borrow().len();
        if expected != actual {
            log::warn!(
                "view {:?}: {update:?} leaves {actual} items, expected {expected}; reloading",
                self.id
            );
            self.reload_data();
            return;
        }
        self.presented_len.set(expected);
        self.relayout();

        if self.animating.get() {
            log::trace!("view {:?}: {update:?} while a batch is in flight", self.id);
            self.journal.borrow_mut().push(UpdateRecord {
                update,
                animated: false,
            });
            return;
        }

        self.animating.set(true);
        self.journal.borrow_mut().push(UpdateRecord {
            update,
            animated: true,
        });
        let me = self.me.clone();
        self.main_loop
            .post_after(self.config.batch_update_duration, move || {
                if let Some(view) = me.upgrade() {
                    view.finish_batch(update);
                }
            });
    }

    fn finish_batch(&self, update: CellUpdate) {
        self.animating.set(false);
        // an insert completing mid-drag keeps the hidden placeholder
        if matches!(update, CellUpdate::Insert(_)) && self.dragging_index.get().is_some() {
            return;
        }
        self.reload_data();
    }

    /// Scrolls half a page when `rect` (relative to the visible area) touches
    /// a paging strip. Suppressed until the cooldown after a page elapses.
    pub fn check_for_edges_and_scroll(&self, rect: Rect) {
        if self.paging.get() {
            return;
        }
        let Some(next) = next_page_offset(
            &self.paging_areas.get(),
            rect,
            self.layout.get().direction,
            self.content_offset(),
            self.viewport(),
            self.content_size(),
        ) else {
            return;
        };

        log::debug!("view {:?}: paging to {:?}", self.id, next);
        self.paging.set(true);
        self.set_content_offset(next, true);
        let me = self.me.clone();
        self.main_loop.post_after(self.config.paging_cooldown, move || {
            if let Some(view) = me.upgrade() {
                view.paging.set(false);
            }
        });
    }

    fn cell_bounds(&self, index: usize) -> Rect {
        Rect::from_origin_size(Vec2::ZERO, self.frame_for_index(index).size())
    }

    /// Paints the visible cells, clipped to the view, in the parent's space.
    /// The cell being dragged is left out.
    pub fn paint(&self) -> Vec<SceneNode> {
        let frame = self.frame();
        let offset = self.scroll.presentation(self.main_loop.now());
        let hidden = self.dragging_index.get();
        let data = self.data.borrow();

        let mut out = vec![SceneNode::PushClip {
            rect: frame,
            radius: 0.0,
        }];
        for (i, cell) in self.visible_cells() {
            if Some(i) == hidden {
                continue;
            }
            let dx = frame.x + cell.x - offset.x;
            let dy = frame.y + cell.y - offset.y;
            out.extend(
                data.paint_cell(i, self.cell_bounds(i))
                    .iter()
                    .map(|n| n.offset(dx, dy)),
            );
        }
        out.push(SceneNode::PopClip);
        out
    }
}

impl<D: CollectionDataSource + 'static> ViewHandle for DragDropCollectionView<D> {
    fn view_id(&self) -> ViewId {
        self.id
    }
}

impl<D: CollectionDataSource + 'static> Draggable<D::Item> for DragDropCollectionView<D> {
    fn can_drag_at_point(&self, point: Vec2) -> bool {
        self.index_at_point(point)
            .is_some_and(|i| self.data.borrow().is_draggable(i))
    }

    fn representation_at_point(&self, point: Vec2) -> Option<Representation> {
        let index = self.index_at_point(point)?;
        let content = self.data.borrow().paint_cell(index, self.cell_bounds(index));
        Some(Representation::new(self.frame_for_index(index), content))
    }

    fn styling_representation(&self, mut representation: Representation) -> Representation {
        self.data.borrow().style_representation(&mut representation);
        representation
    }

    fn data_item_at_point(&self, point: Vec2) -> Option<D::Item> {
        let index = self.index_at_point(point)?;
        self.data.borrow().item_at(index)
    }

    fn drag_data_item(&self, item: &D::Item) {
        let Some(index) = self.data.borrow().index_of(item) else {
            log::trace!("view {:?}: dragged item already gone", self.id);
            self.reload_data();
            return;
        };
        let removed = self.data.borrow_mut().delete_item(index);
        match removed {
            Ok(_) => self.perform_update(CellUpdate::Delete(index)),
            Err(e) => log::warn!("view {:?}: drag_data_item: {e}", self.id),
        }
    }

    fn start_dragging_at_point(&self, point: Vec2) {
        let index = self.index_at_point(point);
        self.dragging_index.set(index);
        self.origin_index.set(index);
        self.reload_data();
    }

    fn restore_data_item(&self, item: &D::Item) {
        let Some(origin) = self.origin_index.take() else {
            return;
        };
        let (existing, len) = {
            let data = self.data.borrow();
            (data.index_of(item), data.len())
        };
        match existing {
            Some(from) => {
                let to = origin.min(len.saturating_sub(1));
                if from == to {
                    return;
                }
                let moved = self.data.borrow_mut().move_item(from, to);
                match moved {
                    Ok(()) => self.perform_update(CellUpdate::Move { from, to }),
                    Err(e) => log::warn!("view {:?}: restore_data_item: {e}", self.id),
                }
            }
            None => {
                let to = origin.min(len);
                let inserted = self.data.borrow_mut().insert_item(item.clone(), to);
                match inserted {
                    Ok(()) => self.perform_update(CellUpdate::Insert(to)),
                    Err(e) => log::warn!("view {:?}: restore_data_item: {e}", self.id),
                }
            }
        }
    }

    fn stop_dragging(&self) {
        self.dragging_index.set(None);
        self.origin_index.set(None);
        self.reload_data();
    }
}

impl<D: CollectionDataSource + 'static> Droppable<D::Item> for DragDropCollectionView<D> {
    fn can_drop_at_rect(&self, rect: Rect) -> bool {
        self.index_for_cell_overlapping_rect(rect).is_some()
    }

    fn will_move_item(&self, item: &D::Item, rect: Rect) {
        if self.data.borrow().index_of(item).is_some() {
            return;
        }
        let index = match self.drop_slot(rect) {
            // past the last cell appends
            Some(DropSlot::PastEnd) => self.data.borrow().len(),
            _ => match self.index_for_cell_overlapping_rect(rect) {
                Some(i) => i,
                None => return,
            },
        };
        let inserted = self.data.borrow_mut().insert_item(item.clone(), index);
        if let Err(e) = inserted {
            log::warn!("view {:?}: will_move_item: {e}", self.id);
            return;
        }
        self.dragging_index.set(Some(index));
        self.perform_update(CellUpdate::Insert(index));
    }

    fn did_move_item(&self, item: &D::Item, rect: Rect) {
        let existing = self.data.borrow().index_of(item);
        if let (Some(from), Some(to)) = (existing, self.index_for_cell_overlapping_rect(rect))
            && from != to
        {
            let moved = self.data.borrow_mut().move_item(from, to);
            match moved {
                Ok(()) => {
                    self.dragging_index.set(Some(to));
                    self.perform_update(CellUpdate::Move { from, to });
                }
                Err(e) => log::warn!("view {:?}: did_move_item: {e}", self.id),
            }
        }

        let visible = rect.translate(Vec2::ZERO - self.content_offset());
        self.check_for_edges_and_scroll(visible);
    }

    fn did_move_out_item(&self, item: &D::Item) {
        let existing = self.data.borrow().index_of(item);
        if let Some(index) = existing {
            let removed = self.data.borrow_mut().delete_item(index);
            match removed {
                Ok(_) => self.perform_update(CellUpdate::Delete(index)),
                Err(e) => log::warn!("view {:?}: did_move_out_item: {e}", self.id),
            }
        }
        self.dragging_index.set(None);
        self.reload_data();
    }

    fn drop_data_item(&self, _item: &D::Item, _rect: Rect) {
        self.dragging_index.set(None);
        self.reload_data();
    }
}
