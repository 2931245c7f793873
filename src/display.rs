pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The original implementation of the Chip-8 language used a 64x32-pixel monochrome display with this format:
/// ( 0, 0)   (63, 0)
/// ( 0,31)   (63,31)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display([bool; DISPLAY_WIDTH * DISPLAY_HEIGHT]);

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    pub fn new() -> Self {
        Display([false; DISPLAY_WIDTH * DISPLAY_HEIGHT])
    }

    pub fn clear(&mut self) {
        for i in &mut self.0 {
            *i = false
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.0[self.compute_idx(x, y)]
    }

    /// Xors the pixel at position (`x`, `y`) and returns `true`
    /// if the pixel was cleared.
    pub fn xor_pixel(&mut self, x: usize, y: usize, value: bool) -> bool {
        let idx = self.compute_idx(x, y);
        let last_value = self.0[idx];
        let new_value = last_value ^ value;
        self.0[idx] = new_value;

        last_value && !new_value
    }

    /// Dxyn - DRW Vx, Vy, nibble
    ///
    /// XORs `sprite` onto the screen, one byte per row with the most significant bit
    /// leftmost. The origin is wrapped onto the screen first, then every pixel wraps
    /// around on its own, so a sprite crossing an edge reappears on the opposite side.
    ///
    /// Returns `true` if any lit pixel was erased.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let origin_x = x as usize % DISPLAY_WIDTH;
        let origin_y = y as usize % DISPLAY_HEIGHT;

        let mut collision = false;

        for (row, &byte) in sprite.iter().enumerate() {
            let py = (origin_y + row) % DISPLAY_HEIGHT;

            for col in 0..8 {
                let value = byte & (0b1000_0000u8 >> col) != 0;
                let px = (origin_x + col) % DISPLAY_WIDTH;

                if self.xor_pixel(px, py, value) {
                    collision = true;
                }
            }
        }

        collision
    }

    pub fn compute_idx(&self, x: usize, y: usize) -> usize {
        y * self.width() + x
    }

    /// Row-major pixel states, index = row * 64 + column.
    pub fn pixels(&self) -> &[bool] {
        &self.0
    }

    pub fn lit_pixels(&self) -> usize {
        self.0.iter().filter(|p| **p).count()
    }

    pub fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        DISPLAY_HEIGHT
    }
}
