use crate::{Color, Rect};

/// Display list produced by painting views.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
    },
    Border {
        rect: Rect,
        color: Color,
        width: f32,
        radius: f32,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        size: f32,
    },
    PushClip {
        rect: Rect,
        radius: f32,
    },
    PopClip,
}

impl SceneNode {
    /// Same node shifted by `(dx, dy)`.
    pub fn offset(&self, dx: f32, dy: f32) -> SceneNode {
        let shift = |r: &Rect| Rect::new(r.x + dx, r.y + dy, r.w, r.h);
        match self {
            SceneNode::Rect {
                rect,
                color,
                radius,
            } => SceneNode::Rect {
                rect: shift(rect),
                color: *color,
                radius: *radius,
            },
            SceneNode::Border {
                rect,
                color,
                width,
                radius,
            } => SceneNode::Border {
                rect: shift(rect),
                color: *color,
                width: *width,
                radius: *radius,
            },
            SceneNode::Text {
                rect,
                text,
                color,
                size,
            } => SceneNode::Text {
                rect: shift(rect),
                text: text.clone(),
                color: *color,
                size: *size,
            },
            SceneNode::PushClip { rect, radius } => SceneNode::PushClip {
                rect: shift(rect),
                radius: *radius,
            },
            SceneNode::PopClip => SceneNode::PopClip,
        }
    }

    /// Same node with its color's alpha scaled by `opacity`.
    pub fn faded(&self, opacity: f32) -> SceneNode {
        let mut out = self.clone();
        match &mut out {
            SceneNode::Rect { color, .. }
            | SceneNode::Border { color, .. }
            | SceneNode::Text { color, .. } => *color = color.faded(opacity),
            SceneNode::PushClip { .. } | SceneNode::PopClip => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_fade_leave_clips_colorless() {
        let node = SceneNode::Rect {
            rect: Rect::new(1.0, 2.0, 3.0, 4.0),
            color: Color::WHITE,
            radius: 0.0,
        };
        assert_eq!(
            node.offset(10.0, 20.0).faded(0.5),
            SceneNode::Rect {
                rect: Rect::new(11.0, 22.0, 3.0, 4.0),
                color: Color(255, 255, 255, 128),
                radius: 0.0,
            }
        );
        assert_eq!(SceneNode::PopClip.faded(0.1), SceneNode::PopClip);
    }
}
