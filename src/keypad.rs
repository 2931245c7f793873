use std::fmt;

pub const NUM_KEYS: usize = 16;

/// The hexadecimal keypad, one flag per key 0x0..=0xF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed_keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            pressed_keys: [false; NUM_KEYS],
        }
    }

    /// Only the low nibble of `key` is considered, so register values above 0xF
    /// still name a key.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed_keys[(key & 0xF) as usize]
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.pressed_keys[(key & 0xF) as usize] = pressed;
    }

    pub fn press_key(&mut self, key: u8) {
        self.set_key(key, true)
    }

    pub fn release_key(&mut self, key: u8) {
        self.set_key(key, false)
    }

    pub fn clear(&mut self) {
        self.pressed_keys = [false; NUM_KEYS];
    }

    /// The lowest numbered key currently held.
    pub fn first_pressed(&self) -> Option<u8> {
        self.pressed_keys
            .iter()
            .position(|&pressed| pressed)
            .map(|key| key as u8)
    }
}

impl fmt::Display for Keypad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.pressed_keys
                .map(|k| if k { "o" } else { " " })
                .join("")
        )
    }
}
