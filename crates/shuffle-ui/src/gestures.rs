use std::time::Duration;

use shuffle_core::*;
use web_time::Instant;

/// Phase of a continuous gesture, as reported to the drag manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    /// The press never qualified (released early or moved too far).
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongPress {
    pub phase: GesturePhase,
    pub position: Vec2,
}

#[derive(Clone, Copy, Debug)]
enum Tracking {
    Idle,
    Pressed { since: Instant, origin: Vec2, last: Vec2 },
    Active { last: Vec2 },
}

/// Single-pointer long-press recognizer.
///
/// Fires `Began` once the pointer has stayed down for `minimum_press_duration`
/// without drifting further than `allowable_movement`, then `Changed` on
/// every move until release or cancellation.
pub struct LongPressRecognizer {
    minimum_press_duration: Duration,
    allowable_movement: f32,
    tracking: Tracking,
}

impl LongPressRecognizer {
    pub fn new(config: &DragConfig) -> Self {
        Self {
            minimum_press_duration: config.minimum_press_duration,
            allowable_movement: config.allowable_movement,
            tracking: Tracking::Idle,
        }
    }

    pub fn is_tracking(&self) -> bool {
        !matches!(self.tracking, Tracking::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.tracking, Tracking::Active { .. })
    }

    /// Starts tracking a press that the owner decided to accept.
    pub fn press(&mut self, position: Vec2, now: Instant) {
        self.tracking = Tracking::Pressed {
            since: now,
            origin: position,
            last: position,
        };
    }

    pub fn reset(&mut self) {
        self.tracking = Tracking::Idle;
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) -> Option<LongPress> {
        let position = event.position;
        match (event.event, self.tracking) {
            (PointerEventKind::Move, Tracking::Pressed { since, origin, .. }) => {
                let dx = position.x - origin.x;
                let dy = position.y - origin.y;
                if (dx * dx + dy * dy).sqrt() > self.allowable_movement {
                    self.tracking = Tracking::Idle;
                    return Some(LongPress {
                        phase: GesturePhase::Failed,
                        position,
                    });
                }
                self.tracking = Tracking::Pressed {
                    since,
                    origin,
                    last: position,
                };
                self.poll(now)
            }
            (PointerEventKind::Move, Tracking::Active { .. }) => {
                self.tracking = Tracking::Active { last: position };
                Some(LongPress {
                    phase: GesturePhase::Changed,
                    position,
                })
            }
            (PointerEventKind::Up, Tracking::Pressed { .. }) => {
                self.tracking = Tracking::Idle;
                Some(LongPress {
                    phase: GesturePhase::Failed,
                    position,
                })
            }
            (PointerEventKind::Up, Tracking::Active { .. }) => {
                self.tracking = Tracking::Idle;
                Some(LongPress {
                    phase: GesturePhase::Ended,
                    position,
                })
            }
            (PointerEventKind::Cancel, Tracking::Pressed { last, .. }) => {
                self.tracking = Tracking::Idle;
                Some(LongPress {
                    phase: GesturePhase::Failed,
                    position: last,
                })
            }
            (PointerEventKind::Cancel, Tracking::Active { last }) => {
                self.tracking = Tracking::Idle;
                Some(LongPress {
                    phase: GesturePhase::Cancelled,
                    position: last,
                })
            }
            _ => None,
        }
    }

    /// Recognizes a press that has been held long enough. Call once per frame.
    pub fn poll(&mut self, now: Instant) -> Option<LongPress> {
        if let Tracking::Pressed { since, last, .. } = self.tracking
            && now.saturating_duration_since(since) >= self.minimum_press_duration
        {
            self.tracking = Tracking::Active { last };
            return Some(LongPress {
                phase: GesturePhase::Began,
                position: last,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: PointerEventKind, x: f32, y: f32) -> PointerEvent {
        PointerEvent::touch(kind, Vec2::new(x, y))
    }

    fn phases(out: &[Option<LongPress>]) -> Vec<Option<GesturePhase>> {
        out.iter().map(|o| o.map(|l| l.phase)).collect()
    }

    #[test]
    fn hold_then_move_then_release() {
        let clock = ManualClock::new();
        let mut r = LongPressRecognizer::new(&DragConfig::default());
        r.press(Vec2::new(10.0, 10.0), clock.now());

        let mut out = vec![r.poll(clock.now())];
        clock.advance(Duration::from_millis(300));
        out.push(r.poll(clock.now()));
        out.push(r.handle_pointer(&ev(PointerEventKind::Move, 80.0, 90.0), clock.now()));
        out.push(r.handle_pointer(&ev(PointerEventKind::Up, 80.0, 90.0), clock.now()));

        assert_eq!(
            phases(&out),
            vec![
                None,
                Some(GesturePhase::Began),
                Some(GesturePhase::Changed),
                Some(GesturePhase::Ended)
            ]
        );
        assert!(!r.is_tracking());
    }

    #[test]
    fn small_jitter_still_recognizes_on_move() {
        let clock = ManualClock::new();
        let mut r = LongPressRecognizer::new(&DragConfig::default());
        r.press(Vec2::new(10.0, 10.0), clock.now());
        clock.advance(Duration::from_millis(400));
        let out = r.handle_pointer(&ev(PointerEventKind::Move, 13.0, 14.0), clock.now());
        assert_eq!(
            out,
            Some(LongPress {
                phase: GesturePhase::Began,
                position: Vec2::new(13.0, 14.0)
            })
        );
    }

    #[test]
    fn moving_too_far_or_releasing_early_fails() {
        let clock = ManualClock::new();
        let mut r = LongPressRecognizer::new(&DragConfig::default());
        r.press(Vec2::new(0.0, 0.0), clock.now());
        let out = r.handle_pointer(&ev(PointerEventKind::Move, 30.0, 0.0), clock.now());
        assert_eq!(out.map(|l| l.phase), Some(GesturePhase::Failed));

        r.press(Vec2::new(0.0, 0.0), clock.now());
        clock.advance(Duration::from_millis(100));
        let out = r.handle_pointer(&ev(PointerEventKind::Up, 0.0, 0.0), clock.now());
        assert_eq!(out.map(|l| l.phase), Some(GesturePhase::Failed));
        assert!(r.poll(clock.now() + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn platform_cancel_after_recognition_reports_cancelled() {
        let clock = ManualClock::new();
        let mut r = LongPressRecognizer::new(&DragConfig::default());
        r.press(Vec2::new(5.0, 5.0), clock.now());
        clock.advance(Duration::from_millis(300));
        r.poll(clock.now());
        let out = r.handle_pointer(&ev(PointerEventKind::Cancel, 0.0, 0.0), clock.now());
        assert_eq!(
            out,
            Some(LongPress {
                phase: GesturePhase::Cancelled,
                position: Vec2::new(5.0, 5.0)
            })
        );
    }
}
