//! Edge paging: while an item is dragged over a scrolling view, pushing the
//! representation past one of the view's edges scrolls the view by half a
//! page in that direction.

use shuffle_core::*;

use crate::layout::ScrollDirection;

/// Trigger strips lying just outside the leading and trailing edges of a
/// view, along its scroll axis. Rects are relative to the visible area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PagingAreas {
    pub leading: Rect,
    pub trailing: Rect,
}

impl PagingAreas {
    pub fn new(size: Size, direction: ScrollDirection, margin: f32) -> Self {
        match direction {
            ScrollDirection::Horizontal => Self {
                leading: Rect::new(-margin, 0.0, margin, size.height),
                trailing: Rect::new(size.width, 0.0, margin, size.height),
            },
            ScrollDirection::Vertical => Self {
                leading: Rect::new(0.0, -margin, size.width, margin),
                trailing: Rect::new(0.0, size.height, size.width, margin),
            },
        }
    }
}

/// Offset to page to when `rect` (relative to the visible area) touches a
/// trigger strip, or `None` if no scroll is needed.
///
/// The step is half the visible extent, clamped to the scrollable range.
pub fn next_page_offset(
    areas: &PagingAreas,
    rect: Rect,
    direction: ScrollDirection,
    offset: Vec2,
    visible: Size,
    content: Size,
) -> Option<Vec2> {
    let (current, half, max) = match direction {
        ScrollDirection::Horizontal => (
            offset.x,
            visible.width * 0.5,
            (content.width - visible.width).max(0.0),
        ),
        ScrollDirection::Vertical => (
            offset.y,
            visible.height * 0.5,
            (content.height - visible.height).max(0.0),
        ),
    };

    let next = if rect.intersects(&areas.leading) {
        (current - half).max(0.0)
    } else if rect.intersects(&areas.trailing) {
        (current + half).min(max)
    } else {
        return None;
    };

    if next == current {
        return None;
    }
    Some(match direction {
        ScrollDirection::Horizontal => Vec2::new(next, offset.y),
        ScrollDirection::Vertical => Vec2::new(offset.x, next),
    })
}
