//! Normalized input: held directions, action triggers and the touch joystick.

use crate::config::{JOYSTICK_DEAD_ZONE, JOYSTICK_RADIUS};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Kill,    // E
    Vent,    // Space
    Meeting, // R
}

impl Key {
    /// Maps a lowercase key name (as reported by a keyboard layer) to a game key.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "w" | "up" | "arrowup" => Some(Key::Up),
            "s" | "down" | "arrowdown" => Some(Key::Down),
            "a" | "left" | "arrowleft" => Some(Key::Left),
            "d" | "right" | "arrowright" => Some(Key::Right),
            "e" => Some(Key::Kill),
            " " | "space" => Some(Key::Vent),
            "r" => Some(Key::Meeting),
            _ => None,
        }
    }

    pub fn is_direction(self) -> bool {
        matches!(self, Key::Up | Key::Down | Key::Left | Key::Right)
    }
}

/// Directions currently held. Opposite directions may be held together and cancel out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn from_keys(keys: &HashSet<Key>) -> Self {
        HeldDirections {
            up: keys.contains(&Key::Up),
            down: keys.contains(&Key::Down),
            left: keys.contains(&Key::Left),
            right: keys.contains(&Key::Right),
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Per-axis sign of the displacement, each in {-1, 0, 1}.
    pub fn axes(&self) -> (f64, f64) {
        let mut x = 0.0;
        let mut y = 0.0;
        if self.up {
            y -= 1.0;
        }
        if self.down {
            y += 1.0;
        }
        if self.left {
            x -= 1.0;
        }
        if self.right {
            x += 1.0;
        }
        (x, y)
    }
}

/// On-screen joystick state, fed with touch deltas relative to the joystick center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Joystick {
    pub active: bool,
    pub knob_x: f64,
    pub knob_y: f64,
}

impl Joystick {
    pub fn start(&mut self) {
        self.active = true;
    }

    /// Moves the knob, clamped to the joystick radius.
    pub fn update(&mut self, delta_x: f64, delta_y: f64) {
        if !self.active {
            return;
        }
        let distance = (delta_x * delta_x + delta_y * delta_y).sqrt();
        if distance <= JOYSTICK_RADIUS {
            self.knob_x = delta_x;
            self.knob_y = delta_y;
        } else {
            let angle = delta_y.atan2(delta_x);
            self.knob_x = angle.cos() * JOYSTICK_RADIUS;
            self.knob_y = angle.sin() * JOYSTICK_RADIUS;
        }
    }

    pub fn end(&mut self) {
        *self = Joystick::default();
    }

    /// Knob offset beyond the dead zone becomes held directions.
    pub fn directions(&self) -> HeldDirections {
        let mut held = HeldDirections::default();
        if !self.active {
            return held;
        }
        if self.knob_x.abs() > JOYSTICK_DEAD_ZONE {
            if self.knob_x > 0.0 {
                held.right = true;
            } else {
                held.left = true;
            }
        }
        if self.knob_y.abs() > JOYSTICK_DEAD_ZONE {
            if self.knob_y > 0.0 {
                held.down = true;
            } else {
                held.up = true;
            }
        }
        held
    }
}
