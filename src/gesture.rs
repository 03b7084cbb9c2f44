//! Pointer gestures: swipe to move, rotate or drop; double tap to change the piece.

use crate::game::Command;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Distance a drag must exceed before it counts.
    pub threshold: i32,
    /// Upward swipes must travel this many thresholds to rotate.
    pub rotate_factor: i32,
    /// Two presses closer than this are a double tap.
    pub double_tap: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: 1,
            rotate_factor: 3,
            double_tap: Duration::from_millis(300),
        }
    }
}

/// Turns press/drag/release positions into game commands.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    config: GestureConfig,
    /// Where the current drag is measured from; moves after every recognised swipe.
    anchor: Option<(i32, i32)>,
    last_press: Option<Instant>,
}

impl SwipeTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            anchor: None,
            last_press: None,
        }
    }

    /// Pointer went down. A second press soon after the first is a double tap.
    pub fn press(&mut self, x: i32, y: i32, now: Instant) -> Option<Command> {
        self.anchor = Some((x, y));
        let double = self.last_press.is_some_and(|prev| {
            let gap = now.saturating_duration_since(prev);
            gap > Duration::ZERO && gap < self.config.double_tap
        });
        self.last_press = Some(now);
        double.then_some(Command::Respawn)
    }

    /// Pointer moved while down. The dominant axis decides the gesture.
    pub fn drag(&mut self, x: i32, y: i32) -> Option<Command> {
        let (ax, ay) = self.anchor?;
        let (dx, dy) = (x - ax, y - ay);
        let t = self.config.threshold;
        if dx.abs() > dy.abs() {
            let command = if dx > t {
                Command::MoveRight
            } else if dx < -t {
                Command::MoveLeft
            } else {
                return None;
            };
            self.anchor = Some((x, ay));
            Some(command)
        } else {
            let command = if dy < -t * self.config.rotate_factor {
                Command::Rotate
            } else if dy > t {
                Command::SoftDrop
            } else {
                return None;
            };
            self.anchor = Some((ax, y));
            Some(command)
        }
    }

    pub fn release(&mut self) {
        self.anchor = None;
    }
}
