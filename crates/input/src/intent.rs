/// A movement direction a key can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl MoveKey {
    /// Map a physical key code name (`"KeyW"`, `"ArrowUp"`, ...) to a
    /// movement direction.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(Self::Forward),
            "ArrowLeft" | "KeyA" => Some(Self::Left),
            "ArrowDown" | "KeyS" => Some(Self::Backward),
            "ArrowRight" | "KeyD" => Some(Self::Right),
            "KeyQ" => Some(Self::Up),
            "KeyE" => Some(Self::Down),
            _ => None,
        }
    }
}

/// Which movement keys are currently held.
///
/// Passed into the per-frame locomotion update; hosts build it from their
/// own key events instead of sharing mutable flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveIntent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: MoveKey, held: bool) {
        let flag = match key {
            MoveKey::Forward => &mut self.forward,
            MoveKey::Backward => &mut self.backward,
            MoveKey::Left => &mut self.left,
            MoveKey::Right => &mut self.right,
            MoveKey::Up => &mut self.up,
            MoveKey::Down => &mut self.down,
        };
        *flag = held;
    }

    /// Apply a key event by code name. Returns whether the key is bound.
    pub fn apply_key(&mut self, code: &str, pressed: bool) -> bool {
        match MoveKey::from_code(code) {
            Some(key) => {
                self.set(key, pressed);
                true
            }
            None => false,
        }
    }

    /// Signed `(x, y, z)` direction: x is right minus left, y is up minus
    /// down, z is forward minus backward. Not normalized.
    pub fn axes(&self) -> [f32; 3] {
        [
            axis(self.right, self.left),
            axis(self.up, self.down),
            axis(self.forward, self.backward),
        ]
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}
