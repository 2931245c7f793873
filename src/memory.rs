use crate::error::LoadError;

pub const MEMORY_SIZE: usize = 4096;
pub const START_ROM: usize = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - START_ROM;

/// Number of bytes per glyph in the built-in font.
pub const FONT_GLYPH_SIZE: u16 = 5;

const ADDRESS_MASK: u16 = (MEMORY_SIZE - 1) as u16;

pub(crate) const FONT_DATA: &[u8] = &[
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Wraps an address into the 4 KiB address space.
pub fn wrap(address: u16) -> u16 {
    address & ADDRESS_MASK
}

#[derive(Debug)]
pub(crate) struct Memory(pub [u8; MEMORY_SIZE]);

impl Memory {
    pub fn new() -> Self {
        let mut memory = Memory([0; MEMORY_SIZE]);
        memory.reset();
        memory
    }

    /// Zeroes everything and puts the font table back at 0x000.
    pub fn reset(&mut self) {
        self.0.fill(0);
        self.0[0..FONT_DATA.len()].copy_from_slice(FONT_DATA);
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        let rom_size = bytes.len();
        if rom_size > MAX_ROM_SIZE {
            return Err(LoadError::OversizeRom {
                size: rom_size,
                max: MAX_ROM_SIZE,
            });
        }

        self.0[START_ROM..START_ROM + rom_size].copy_from_slice(bytes);

        Ok(())
    }

    pub fn read(&self, address: u16) -> u8 {
        self.0[wrap(address) as usize]
    }

    pub fn write(&mut self, address: u16, value: u8) {
        self.0[wrap(address) as usize] = value;
    }

    /// Reads a big-endian instruction word. The caller guarantees `address <= 0xFFE`.
    pub fn read_word(&self, address: u16) -> u16 {
        let hi = self.read(address);
        let lo = self.read(address.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    /// Copies `len` bytes starting at `address`, wrapping past 0xFFF.
    pub fn slice_wrapping(&self, address: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|offset| self.read(address.wrapping_add(offset as u16)))
            .collect()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}
