//! Drag and drop between collection views.
//!
//! - [`DragDropCollectionView`] is a scrolling grid over a
//!   [`CollectionDataSource`] that can both give and receive items.
//! - [`DragDropManager`] owns the drag session for a canvas: it picks the
//!   source on touch-down, moves the floating representation, finds the
//!   droppable view under it and sequences the capability callbacks.
//! - Any other view can take part by implementing [`Draggable`] and/or
//!   [`Droppable`] and registering a [`Participant`].
//!
//! Everything runs on one thread. Deferred work (batch-update completions,
//! the paging cooldown) is posted to the shared `MainLoop`, so hosts call
//! `MainLoop::run_due` once per frame next to [`DragDropManager::tick`].

pub mod capability;
pub mod collection;
pub mod data_source;
pub mod gestures;
pub mod layout;
pub mod manager;
pub mod paging;
pub mod scroll;

#[cfg(test)]
mod tests;

pub use capability::{Capabilities, Draggable, Droppable, Participant, Representation, ViewHandle};
pub use collection::{CellUpdate, DragDropCollectionView, UpdateRecord};
pub use data_source::{CollectionDataSource, VecDataSource};
pub use gestures::{GesturePhase, LongPress, LongPressRecognizer};
pub use layout::{FlowLayout, ScrollDirection};
pub use manager::{DragDropManager, DragPhase, DragSession};
pub use paging::PagingAreas;
pub use scroll::ScrollState;
