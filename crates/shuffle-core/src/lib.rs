//! # Shuffle core
//!
//! The toolkit substrate the drag-and-drop layer in `shuffle-ui` runs on.
//! Nothing here knows about dragging; it provides:
//!
//! - `geometry`: `Vec2`, `Size`, `Rect`, overlap area and `best_overlap`.
//! - `view_tree`: a retained hierarchy of views with frames, scroll
//!   offsets and coordinate conversion between any two views.
//! - `runloop`: the single-threaded [`MainLoop`] that runs delayed work
//!   (animation completions, cooldown timers).
//! - `animation`: clocks, easing and `AnimatedValue`.
//! - `config`: [`DragConfig`], every tunable of the drag layer.
//!
//! ## Coordinates
//!
//! A view's `frame` lives in its parent's space. Its own children live in
//! its *bounds* space, which is shifted by `bounds_origin` (the scroll
//! offset). Converting a rect from a scrolled list to the canvas therefore
//! subtracts the list's offset:
//!
//! ```rust
//! use shuffle_core::*;
//!
//! let tree = ViewTree::new();
//! let canvas = tree.add_root(Rect::new(0.0, 0.0, 320.0, 640.0));
//! let list = tree.add_child(canvas, Rect::new(0.0, 100.0, 320.0, 200.0));
//! tree.set_bounds_origin(list, Vec2::new(0.0, 50.0));
//!
//! let cell = Rect::new(0.0, 60.0, 80.0, 80.0);
//! let on_canvas = tree.rect_to_ancestor(list, canvas, cell);
//! assert_eq!(on_canvas.origin(), Vec2::new(0.0, 110.0));
//! ```
//!
//! ## Time
//!
//! Every component reads time from a [`Clock`] handed to it, never from a
//! global. Hosts use [`SystemClock`]; tests drive a [`ManualClock`] and call
//! [`MainLoop::run_due`] to fire whatever became due.

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod runloop;
pub mod scene;
pub mod view_tree;

pub use animation::{AnimatedValue, AnimationSpec, Clock, Easing, Interpolate, ManualClock, SystemClock};
pub use color::Color;
pub use config::DragConfig;
pub use error::{StoreError, TreeError};
pub use geometry::{Rect, Size, Vec2, best_overlap};
pub use input::{PointerEvent, PointerEventKind, PointerId, PointerKind};
pub use runloop::{MainLoop, TaskId};
pub use scene::{Scene, SceneNode};
pub use view_tree::{ViewId, ViewTree};
