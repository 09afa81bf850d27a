use std::ops::Range;

use shuffle_core::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    #[default]
    Vertical,
    Horizontal,
}

/// Grid flow layout: fixed-size items fill lines across the cross axis and
/// lines stack along the scroll direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowLayout {
    pub item_size: Size,
    pub spacing: f32,
    pub inset: f32,
    pub direction: ScrollDirection,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self {
            item_size: Size::new(80.0, 80.0),
            spacing: 8.0,
            inset: 8.0,
            direction: ScrollDirection::Vertical,
        }
    }
}

impl FlowLayout {
    pub fn vertical(item_size: Size) -> Self {
        Self {
            item_size,
            ..Self::default()
        }
    }

    pub fn horizontal(item_size: Size) -> Self {
        Self {
            item_size,
            direction: ScrollDirection::Horizontal,
            ..Self::default()
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.direction == ScrollDirection::Horizontal
    }

    /// (main, cross) extents of one item.
    fn item_extents(&self) -> (f32, f32) {
        match self.direction {
            ScrollDirection::Vertical => (self.item_size.height, self.item_size.width),
            ScrollDirection::Horizontal => (self.item_size.width, self.item_size.height),
        }
    }

    fn cross_extent(&self, viewport: Size) -> f32 {
        match self.direction {
            ScrollDirection::Vertical => viewport.width,
            ScrollDirection::Horizontal => viewport.height,
        }
    }

    pub fn items_per_line(&self, viewport: Size) -> usize {
        let (_, item_cross) = self.item_extents();
        let available = self.cross_extent(viewport) - 2.0 * self.inset + self.spacing;
        let per = (available / (item_cross + self.spacing)).floor();
        if per.is_finite() && per >= 1.0 {
            per as usize
        } else {
            1
        }
    }

    pub fn frame_for_index(&self, index: usize, viewport: Size) -> Rect {
        let per_line = self.items_per_line(viewport);
        let line = (index / per_line) as f32;
        let slot = (index % per_line) as f32;
        let (item_main, item_cross) = self.item_extents();
        let main = self.inset + line * (item_main + self.spacing);
        let cross = self.inset + slot * (item_cross + self.spacing);
        match self.direction {
            ScrollDirection::Vertical => {
                Rect::new(cross, main, self.item_size.width, self.item_size.height)
            }
            ScrollDirection::Horizontal => {
                Rect::new(main, cross, self.item_size.width, self.item_size.height)
            }
        }
    }

    pub fn content_size(&self, count: usize, viewport: Size) -> Size {
        let per_line = self.items_per_line(viewport);
        let lines = count.div_ceil(per_line) as f32;
        let (item_main, _) = self.item_extents();
        let main = if lines > 0.0 {
            2.0 * self.inset + lines * item_main + (lines - 1.0) * self.spacing
        } else {
            2.0 * self.inset
        };
        let cross = self.cross_extent(viewport);
        match self.direction {
            ScrollDirection::Vertical => Size::new(cross, main),
            ScrollDirection::Horizontal => Size::new(main, cross),
        }
    }

    pub fn index_at_point(&self, p: Vec2, count: usize, viewport: Size) -> Option<usize> {
        let (item_main, item_cross) = self.item_extents();
        let (pm, pc) = match self.direction {
            ScrollDirection::Vertical => (p.y, p.x),
            ScrollDirection::Horizontal => (p.x, p.y),
        };
        if pm < self.inset || pc < self.inset {
            return None;
        }
        let line = ((pm - self.inset) / (item_main + self.spacing)).floor() as usize;
        let slot = ((pc - self.inset) / (item_cross + self.spacing)).floor() as usize;
        let per_line = self.items_per_line(viewport);
        if slot >= per_line {
            return None;
        }
        let index = line * per_line + slot;
        (index < count && self.frame_for_index(index, viewport).contains(p)).then_some(index)
    }

    /// Indices whose frames overlap `visible` (content coordinates).
    pub fn visible_range(&self, visible: Rect, count: usize, viewport: Size) -> Range<usize> {
        let (item_main, _) = self.item_extents();
        let (start, end) = match self.direction {
            ScrollDirection::Vertical => (visible.y, visible.max_y()),
            ScrollDirection::Horizontal => (visible.x, visible.max_x()),
        };
        let stride = item_main + self.spacing;
        let first_line = ((start - self.inset) / stride).floor().max(0.0) as usize;
        let last_line = ((end - self.inset) / stride).ceil().max(0.0) as usize;
        let per_line = self.items_per_line(viewport);
        let first = (first_line * per_line).min(count);
        let last = (last_line * per_line).min(count);
        first..last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(200.0, 300.0);

    fn layout() -> FlowLayout {
        FlowLayout {
            item_size: Size::new(80.0, 80.0),
            spacing: 10.0,
            inset: 10.0,
            direction: ScrollDirection::Vertical,
        }
    }

    #[test]
    fn vertical_grid_places_two_per_line() {
        let l = layout();
        assert_eq!(l.items_per_line(VIEWPORT), 2);
        assert_eq!(l.frame_for_index(0, VIEWPORT), Rect::new(10.0, 10.0, 80.0, 80.0));
        assert_eq!(l.frame_for_index(1, VIEWPORT), Rect::new(100.0, 10.0, 80.0, 80.0));
        assert_eq!(l.frame_for_index(2, VIEWPORT), Rect::new(10.0, 100.0, 80.0, 80.0));
        assert_eq!(l.content_size(5, VIEWPORT), Size::new(200.0, 280.0));
        assert_eq!(l.content_size(0, VIEWPORT), Size::new(200.0, 20.0));
    }

    #[test]
    fn horizontal_lines_stack_along_x() {
        let l = FlowLayout {
            direction: ScrollDirection::Horizontal,
            ..layout()
        };
        let viewport = Size::new(300.0, 100.0);
        assert_eq!(l.items_per_line(viewport), 1);
        assert_eq!(l.frame_for_index(2, viewport), Rect::new(190.0, 10.0, 80.0, 80.0));
        assert_eq!(l.content_size(3, viewport), Size::new(280.0, 100.0));
    }

    #[test]
    fn point_resolves_only_inside_cells() {
        let l = layout();
        assert_eq!(l.index_at_point(Vec2::new(50.0, 50.0), 5, VIEWPORT), Some(0));
        assert_eq!(l.index_at_point(Vec2::new(150.0, 120.0), 5, VIEWPORT), Some(3));
        // gutter between cells
        assert_eq!(l.index_at_point(Vec2::new(95.0, 50.0), 5, VIEWPORT), None);
        // slot exists in the grid but no item there
        assert_eq!(l.index_at_point(Vec2::new(150.0, 200.0), 5, VIEWPORT), None);
        assert_eq!(l.index_at_point(Vec2::new(2.0, 2.0), 5, VIEWPORT), None);
    }

    #[test]
    fn visible_range_covers_partially_shown_lines() {
        let l = layout();
        let visible = Rect::new(0.0, 150.0, 200.0, 100.0);
        // lines 1 (y 100..180) and 2 (y 190..270)
        assert_eq!(l.visible_range(visible, 20, VIEWPORT), 2..6);
        assert_eq!(l.visible_range(visible, 3, VIEWPORT), 2..3);
    }
}
