use std::fmt;

/// The addressing fields of a 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub raw: u16,
    /// First nibble, selects the instruction family.
    pub group: u8,
    /// Second nibble, a register index.
    pub x: usize,
    /// Third nibble, a register index.
    pub y: usize,
    /// Fourth nibble, a 4-bit immediate.
    pub n: u8,
    /// Low byte, an 8-bit immediate.
    pub nn: u8,
    /// Low 12 bits, an address.
    pub nnn: u16,
}

impl From<u16> for Opcode {
    fn from(raw: u16) -> Self {
        Opcode {
            raw,
            group: ((raw & 0xF000) >> 12) as u8,
            x: ((raw & 0x0F00) >> 8) as usize,
            y: ((raw & 0x00F0) >> 4) as usize,
            n: (raw & 0x000F) as u8,
            nn: (raw & 0x00FF) as u8,
            nnn: raw & 0x0FFF,
        }
    }
}

/// One variant per instruction the machine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 - CLS
    Clear,
    /// 00EE - RET
    Return,
    /// 1nnn - JP addr
    Jump(u16),
    /// 2nnn - CALL addr
    Call(u16),
    /// 3xkk - SE Vx, byte
    SkipIfEqualImmediate(usize, u8),
    /// 4xkk - SNE Vx, byte
    SkipIfNotEqualImmediate(usize, u8),
    /// 5xyn - SE Vx, Vy (n is ignored)
    SkipIfEqualRegister(usize, usize),
    /// 6xkk - LD Vx, byte
    LoadImmediate(usize, u8),
    /// 7xkk - ADD Vx, byte
    AddImmediate(usize, u8),
    /// 8xy0 - LD Vx, Vy
    LoadRegister(usize, usize),
    /// 8xy1 - OR Vx, Vy
    Or(usize, usize),
    /// 8xy2 - AND Vx, Vy
    And(usize, usize),
    /// 8xy3 - XOR Vx, Vy
    Xor(usize, usize),
    /// 8xy4 - ADD Vx, Vy
    AddRegister(usize, usize),
    /// 8xy5 - SUB Vx, Vy
    Sub(usize, usize),
    /// 8xy6 - SHR Vx
    ShiftRight(usize),
    /// 8xy7 - SUBN Vx, Vy
    SubNegated(usize, usize),
    /// 8xyE - SHL Vx
    ShiftLeft(usize),
    /// 9xyn - SNE Vx, Vy (n is ignored)
    SkipIfNotEqualRegister(usize, usize),
    /// Annn - LD I, addr
    LoadIndex(u16),
    /// Bnnn - JP V0, addr
    JumpOffset(u16),
    /// Cxkk - RND Vx, byte
    Random(usize, u8),
    /// Dxyn - DRW Vx, Vy, nibble
    Draw(usize, usize, u8),
    /// Ex9E - SKP Vx
    SkipIfPressed(usize),
    /// ExA1 - SKNP Vx
    SkipIfNotPressed(usize),
    /// Fx07 - LD Vx, DT
    LoadDelay(usize),
    /// Fx0A - LD Vx, K
    WaitKey(usize),
    /// Fx15 - LD DT, Vx
    SetDelay(usize),
    /// Fx18 - LD ST, Vx
    SetSound(usize),
    /// Fx1E - ADD I, Vx
    AddIndex(usize),
    /// Fx29 - LD F, Vx
    LoadFont(usize),
    /// Fx33 - LD B, Vx
    StoreBcd(usize),
    /// Fx55 - LD [I], Vx
    StoreRegisters(usize),
    /// Fx65 - LD Vx, [I]
    LoadRegisters(usize),
    /// Any word without a defined meaning.
    Unknown(u16),
}

impl Instruction {
    pub fn decode(word: u16) -> Self {
        let Opcode {
            raw,
            group,
            x,
            y,
            n,
            nn,
            nnn,
        } = Opcode::from(word);

        match (group, n) {
            (0x0, _) => match raw {
                0x00E0 => Instruction::Clear,
                0x00EE => Instruction::Return,
                _ => Instruction::Unknown(raw),
            },
            (0x1, _) => Instruction::Jump(nnn),
            (0x2, _) => Instruction::Call(nnn),
            (0x3, _) => Instruction::SkipIfEqualImmediate(x, nn),
            (0x4, _) => Instruction::SkipIfNotEqualImmediate(x, nn),
            (0x5, _) => Instruction::SkipIfEqualRegister(x, y),
            (0x6, _) => Instruction::LoadImmediate(x, nn),
            (0x7, _) => Instruction::AddImmediate(x, nn),
            (0x8, 0x0) => Instruction::LoadRegister(x, y),
            (0x8, 0x1) => Instruction::Or(x, y),
            (0x8, 0x2) => Instruction::And(x, y),
            (0x8, 0x3) => Instruction::Xor(x, y),
            (0x8, 0x4) => Instruction::AddRegister(x, y),
            (0x8, 0x5) => Instruction::Sub(x, y),
            (0x8, 0x6) => Instruction::ShiftRight(x),
            (0x8, 0x7) => Instruction::SubNegated(x, y),
            (0x8, 0xE) => Instruction::ShiftLeft(x),
            (0x9, _) => Instruction::SkipIfNotEqualRegister(x, y),
            (0xA, _) => Instruction::LoadIndex(nnn),
            (0xB, _) => Instruction::JumpOffset(nnn),
            (0xC, _) => Instruction::Random(x, nn),
            (0xD, _) => Instruction::Draw(x, y, n),
            (0xE, _) => match nn {
                0x9E => Instruction::SkipIfPressed(x),
                0xA1 => Instruction::SkipIfNotPressed(x),
                _ => Instruction::Unknown(raw),
            },
            (0xF, _) => match nn {
                0x07 => Instruction::LoadDelay(x),
                0x0A => Instruction::WaitKey(x),
                0x15 => Instruction::SetDelay(x),
                0x18 => Instruction::SetSound(x),
                0x1E => Instruction::AddIndex(x),
                0x29 => Instruction::LoadFont(x),
                0x33 => Instruction::StoreBcd(x),
                0x55 => Instruction::StoreRegisters(x),
                0x65 => Instruction::LoadRegisters(x),
                _ => Instruction::Unknown(raw),
            },
            _ => Instruction::Unknown(raw),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump(addr) => write!(f, "JP {:#05X}", addr),
            Instruction::Call(addr) => write!(f, "CALL {:#05X}", addr),
            Instruction::SkipIfEqualImmediate(x, k) => write!(f, "SE V{:X}, {:#04X}", x, k),
            Instruction::SkipIfNotEqualImmediate(x, k) => write!(f, "SNE V{:X}, {:#04X}", x, k),
            Instruction::SkipIfEqualRegister(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::LoadImmediate(x, k) => write!(f, "LD V{:X}, {:#04X}", x, k),
            Instruction::AddImmediate(x, k) => write!(f, "ADD V{:X}, {:#04X}", x, k),
            Instruction::LoadRegister(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddRegister(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight(x) => write!(f, "SHR V{:X}", x),
            Instruction::SubNegated(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft(x) => write!(f, "SHL V{:X}", x),
            Instruction::SkipIfNotEqualRegister(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::LoadIndex(addr) => write!(f, "LD I, {:#05X}", addr),
            Instruction::JumpOffset(addr) => write!(f, "JP V0, {:#05X}", addr),
            Instruction::Random(x, k) => write!(f, "RND V{:X}, {:#04X}", x, k),
            Instruction::Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::SkipIfPressed(x) => write!(f, "SKP V{:X}", x),
            Instruction::SkipIfNotPressed(x) => write!(f, "SKNP V{:X}", x),
            Instruction::LoadDelay(x) => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey(x) => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay(x) => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound(x) => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex(x) => write!(f, "ADD I, V{:X}", x),
            Instruction::LoadFont(x) => write!(f, "LD F, V{:X}", x),
            Instruction::StoreBcd(x) => write!(f, "LD B, V{:X}", x),
            Instruction::StoreRegisters(x) => write!(f, "LD [I], V{:X}", x),
            Instruction::LoadRegisters(x) => write!(f, "LD V{:X}, [I]", x),
            Instruction::Unknown(raw) => write!(f, "??? {:#06X}", raw),
        }
    }
}
