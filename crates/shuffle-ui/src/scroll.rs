//! # Scroll model
//!
//! `ScrollState` keeps two offsets for a scrolling view:
//!
//! - the *model* offset, which is applied immediately and is what hit
//!   testing and coordinate conversion see;
//! - the *presentation* offset, which eases towards the model offset when a
//!   scroll is animated and is what painting uses.
//!
//! Offsets are clamped to `[0, content - viewport]` on each axis.

use std::cell::{Cell, RefCell};

use shuffle_core::*;
use web_time::Instant;

pub struct ScrollState {
    offset: Cell<Vec2>,
    viewport: Cell<Size>,
    content: Cell<Size>,
    presentation: RefCell<AnimatedValue<Vec2>>,
}

impl ScrollState {
    pub fn new(spec: AnimationSpec) -> Self {
        Self {
            offset: Cell::new(Vec2::ZERO),
            viewport: Cell::new(Size::default()),
            content: Cell::new(Size::default()),
            presentation: RefCell::new(AnimatedValue::new(Vec2::ZERO, spec)),
        }
    }

    pub fn set_viewport(&self, size: Size) {
        self.viewport.set(size);
        self.clamp();
    }

    pub fn set_content(&self, size: Size) {
        self.content.set(size);
        self.clamp();
    }

    pub fn viewport(&self) -> Size {
        self.viewport.get()
    }

    pub fn content(&self) -> Size {
        self.content.get()
    }

    pub fn max_offset(&self) -> Vec2 {
        let vp = self.viewport.get();
        let c = self.content.get();
        Vec2::new((c.width - vp.width).max(0.0), (c.height - vp.height).max(0.0))
    }

    fn clamped(&self, off: Vec2) -> Vec2 {
        let max = self.max_offset();
        Vec2::new(off.x.clamp(0.0, max.x), off.y.clamp(0.0, max.y))
    }

    fn clamp(&self) {
        let off = self.clamped(self.offset.get());
        if off != self.offset.get() {
            self.offset.set(off);
            self.presentation.borrow_mut().snap_to(off);
        }
    }

    pub fn get(&self) -> Vec2 {
        self.offset.get()
    }

    /// Sets the model offset and returns it after clamping.
    pub fn set_offset(&self, off: Vec2, animated: bool, now: Instant) -> Vec2 {
        let off = self.clamped(off);
        self.offset.set(off);
        let mut p = self.presentation.borrow_mut();
        if animated {
            p.set_target(off, now);
        } else {
            p.snap_to(off);
        }
        off
    }

    /// Offset to paint with, advancing any running animation.
    pub fn presentation(&self, now: Instant) -> Vec2 {
        let mut p = self.presentation.borrow_mut();
        p.update(now);
        *p.get()
    }

    pub fn is_animating(&self) -> bool {
        self.presentation.borrow().is_animating()
    }
}
