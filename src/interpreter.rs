use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    display::Display,
    error::{LoadError, MachineFault},
    keypad::Keypad,
    memory::{self, Memory, FONT_DATA, FONT_GLYPH_SIZE, MEMORY_SIZE},
    opcode::Instruction,
    registers::{Registers, VF},
};

/// Highest address an instruction word can be fetched from. Only an odd PC (0xFFF)
/// lies beyond it, since every PC write is wrapped into the address space.
const LAST_FETCH_ADDRESS: u16 = (MEMORY_SIZE - 2) as u16;

#[derive(Debug)]
pub struct Interpreter {
    registers: Registers,
    memory: Memory,
    display: Display,
    keypad: Keypad,
    rng: ChaCha8Rng,
    fault: Option<MachineFault>,
    unknown_opcodes: u64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Creates an interpreter whose random instruction draws a reproducible sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Interpreter {
            registers: Registers::default(),
            memory: Memory::new(),
            display: Display::new(),
            keypad: Keypad::new(),
            rng,
            fault: None,
            unknown_opcodes: 0,
        }
    }

    pub fn with_rom(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut interpreter = Interpreter::new();
        interpreter.load(bytes)?;

        Ok(interpreter)
    }

    /// Copies a program into memory at 0x200.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        self.memory.load_rom(bytes)?;

        info!("Loaded ROM [size: {}]", bytes.len());
        debug!("Font table: {:02X?}", &self.memory.bytes()[..FONT_DATA.len()]);
        debug!(
            "ROM head: {:02X?}",
            &self.memory.bytes()[memory::START_ROM..memory::START_ROM + bytes.len().min(16)]
        );

        Ok(())
    }

    /// Puts the machine back into its power-on state. The loaded program is erased.
    pub fn reset(&mut self) {
        self.registers.reset();
        self.memory.reset();
        self.display.clear();
        self.keypad.clear();
        self.fault = None;
        self.unknown_opcodes = 0;

        info!("Machine reset");
    }

    /// Fetches, decodes and executes a single instruction.
    ///
    /// A fault halts the machine: the same fault is returned by every later call until
    /// [`Interpreter::reset`].
    pub fn step(&mut self) -> Result<(), MachineFault> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        let result = self.fetch().and_then(|word| self.execute(word));

        if let Err(fault) = result {
            debug!("Machine halted: {}", fault);
            self.fault = Some(fault);
        }

        result
    }

    /// Decrements both timers towards zero. Returns `true` when the sound timer
    /// expired on this tick.
    pub fn tick_timers(&mut self) -> bool {
        if self.registers.delay > 0 {
            self.registers.delay -= 1;
        }

        if self.registers.sound > 0 {
            self.registers.sound -= 1;
            if self.registers.sound == 0 {
                trace!("Sound timer expired");
                return true;
            }
        }

        false
    }

    fn fetch(&mut self) -> Result<u16, MachineFault> {
        let pc = self.registers.pc;
        if pc > LAST_FETCH_ADDRESS {
            return Err(MachineFault::ProgramCounterOutOfBounds { pc });
        }

        let word = self.memory.read_word(pc);
        self.registers.set_pc(pc + 2);

        Ok(word)
    }

    fn execute(&mut self, word: u16) -> Result<(), MachineFault> {
        let instruction = Instruction::decode(word);

        trace!(
            "{:#05X}: {:04X} {}",
            self.registers.instruction_address(),
            word,
            instruction
        );

        match instruction {
            Instruction::Clear => self.handle_clear(),
            Instruction::Return => self.handle_ret()?,
            Instruction::Jump(addr) => self.handle_jump(addr),
            Instruction::Call(addr) => self.handle_call(addr)?,
            Instruction::SkipIfEqualImmediate(x, k) => self.handle_skip_if_equal_immediate(x, k),
            Instruction::SkipIfNotEqualImmediate(x, k) => self.handle_skip_if_not_equal_immediate(x, k),
            Instruction::SkipIfEqualRegister(x, y) => self.handle_skip_if_equal_register(x, y),
            Instruction::LoadImmediate(x, k) => self.handle_load_register_immediate(x, k),
            Instruction::AddImmediate(x, k) => self.handle_add_register_immediate(x, k),
            Instruction::LoadRegister(x, y) => self.handle_load_register_register(x, y),
            Instruction::Or(x, y) => self.handle_or_register_register(x, y),
            Instruction::And(x, y) => self.handle_and_register_register(x, y),
            Instruction::Xor(x, y) => self.handle_xor_register_register(x, y),
            Instruction::AddRegister(x, y) => self.handle_add_register_register(x, y),
            Instruction::Sub(x, y) => self.handle_sub_register_register(x, y),
            Instruction::ShiftRight(x) => self.handle_shift_right_register_one(x),
            Instruction::SubNegated(x, y) => self.handle_sub_register_register_negated(x, y),
            Instruction::ShiftLeft(x) => self.handle_shift_left_register_one(x),
            Instruction::SkipIfNotEqualRegister(x, y) => self.handle_skip_if_not_equal_register(x, y),
            Instruction::LoadIndex(addr) => self.handle_load_immediate(addr),
            Instruction::JumpOffset(addr) => self.handle_jump_offset(addr),
            Instruction::Random(x, k) => self.handle_random(x, k),
            Instruction::Draw(x, y, n) => self.handle_draw_sprite(x, y, n),
            Instruction::SkipIfPressed(x) => self.handle_skip_if_pressed(x),
            Instruction::SkipIfNotPressed(x) => self.handle_skip_if_not_pressed(x),
            Instruction::LoadDelay(x) => self.handle_load_delay(x),
            Instruction::WaitKey(x) => self.handle_wait_key(x),
            Instruction::SetDelay(x) => self.handle_set_delay(x),
            Instruction::SetSound(x) => self.handle_set_sound(x),
            Instruction::AddIndex(x) => self.handle_add_index(x),
            Instruction::LoadFont(x) => self.handle_load_font(x),
            Instruction::StoreBcd(x) => self.handle_store_bcd(x),
            Instruction::StoreRegisters(x) => self.handle_store_registers(x),
            Instruction::LoadRegisters(x) => self.handle_load_registers(x),
            Instruction::Unknown(raw) => {
                self.unknown_opcodes += 1;
                warn!(
                    "Unknown instruction {:#06X} at {:#05X}",
                    raw,
                    self.registers.instruction_address()
                );
            }
        }

        Ok(())
    }

    fn skip_next(&mut self) {
        self.registers.set_pc(self.registers.pc + 2);
        trace!("skip: set PC to {:#05X}", self.registers.pc);
    }

    /// 00E0 - CLS
    /// Clear the display.
    fn handle_clear(&mut self) {
        self.display.clear();
    }

    /// 00EE - RET
    /// Return from a subroutine.
    ///
    /// The interpreter sets the program counter to the address at the top of the stack, then subtracts 1 from the stack pointer.
    fn handle_ret(&mut self) -> Result<(), MachineFault> {
        self.registers.pop()?;
        trace!("return: set PC to {:#05X}", self.registers.pc);

        Ok(())
    }

    /// 1nnn - JP addr
    /// Jump to location nnn.
    ///
    /// The interpreter sets the program counter to nnn.
    fn handle_jump(&mut self, n: u16) {
        self.registers.set_pc(n);
    }

    /// 2nnn - CALL addr
    /// Call subroutine at nnn.
    ///
    /// The interpreter increments the stack pointer, then puts the current PC on the top of the stack. The PC is then set to nnn.
    fn handle_call(&mut self, n: u16) -> Result<(), MachineFault> {
        self.registers.push(n)?;
        trace!("call: stack depth {}", self.registers.sp);

        Ok(())
    }

    /// 3xkk - SE Vx, byte
    /// Skip next instruction if Vx = kk.
    fn handle_skip_if_equal_immediate(&mut self, x: usize, k: u8) {
        if self.registers.vx[x] == k {
            self.skip_next();
        }
    }

    /// 4xkk - SNE Vx, byte
    /// Skip next instruction if Vx != kk.
    fn handle_skip_if_not_equal_immediate(&mut self, x: usize, k: u8) {
        if self.registers.vx[x] != k {
            self.skip_next();
        }
    }

    /// 5xy0 - SE Vx, Vy
    /// Skip next instruction if Vx = Vy.
    fn handle_skip_if_equal_register(&mut self, x: usize, y: usize) {
        if self.registers.vx[x] == self.registers.vx[y] {
            self.skip_next();
        }
    }

    /// 6xkk - LD Vx, byte
    /// Set Vx = kk.
    fn handle_load_register_immediate(&mut self, x: usize, k: u8) {
        self.registers.vx[x] = k;
    }

    /// 7xkk - ADD Vx, byte
    /// Set Vx = Vx + kk. VF is left alone.
    fn handle_add_register_immediate(&mut self, x: usize, k: u8) {
        let result = self.registers.vx[x].wrapping_add(k);
        self.registers.vx[x] = result;
    }

    /// 8xy0 - LD Vx, Vy
    fn handle_load_register_register(&mut self, x: usize, y: usize) {
        self.registers.vx[x] = self.registers.vx[y];
    }

    /// 8xy1 - OR Vx, Vy
    fn handle_or_register_register(&mut self, x: usize, y: usize) {
        self.registers.vx[x] |= self.registers.vx[y];
    }

    /// 8xy2 - AND Vx, Vy
    fn handle_and_register_register(&mut self, x: usize, y: usize) {
        self.registers.vx[x] &= self.registers.vx[y];
    }

    /// 8xy3 - XOR Vx, Vy
    fn handle_xor_register_register(&mut self, x: usize, y: usize) {
        self.registers.vx[x] ^= self.registers.vx[y];
    }

    /// 8xy4 - ADD Vx, Vy
    /// Set Vx = Vx + Vy, set VF = carry.
    ///
    /// The values of Vx and Vy are added together. If the result is greater than 8 bits
    /// (i.e., > 255,) VF is set to 1, otherwise 0. Only the lowest 8 bits of the result are kept, and stored in Vx.
    fn handle_add_register_register(&mut self, x: usize, y: usize) {
        let a = self.registers.vx[x];
        let b = self.registers.vx[y];

        let (result, overflow) = a.overflowing_add(b);

        self.registers.vx[x] = result;
        self.registers.set_flag(overflow);
    }

    /// 8xy5 - SUB Vx, Vy
    /// Set Vx = Vx - Vy, set VF = NOT borrow.
    ///
    /// If Vx >= Vy, then VF is set to 1, otherwise 0. Then Vy is subtracted from Vx, and the results stored in Vx.
    fn handle_sub_register_register(&mut self, x: usize, y: usize) {
        let a = self.registers.vx[x];
        let b = self.registers.vx[y];

        self.registers.vx[x] = a.wrapping_sub(b);
        self.registers.set_flag(a >= b);
    }

    /// 8xy6 - SHR Vx
    /// Set Vx = Vx SHR 1.
    ///
    /// If the least-significant bit of Vx is 1, then VF is set to 1, otherwise 0. Then Vx is divided by 2.
    /// Vy takes no part in this.
    fn handle_shift_right_register_one(&mut self, x: usize) {
        let a = self.registers.vx[x];

        self.registers.vx[x] = a >> 1;
        self.registers.set_flag(a & 1 == 1);
    }

    /// 8xy7 - SUBN Vx, Vy
    /// Set Vx = Vy - Vx, set VF = NOT borrow.
    ///
    /// If Vy >= Vx, then VF is set to 1, otherwise 0. Then Vx is subtracted from Vy, and the results stored in Vx.
    fn handle_sub_register_register_negated(&mut self, x: usize, y: usize) {
        let a = self.registers.vx[x];
        let b = self.registers.vx[y];

        self.registers.vx[x] = b.wrapping_sub(a);
        self.registers.set_flag(b >= a);
    }

    /// 8xyE - SHL Vx
    /// Set Vx = Vx SHL 1.
    ///
    /// If the most-significant bit of Vx is 1, then VF is set to 1, otherwise to 0. Then Vx is multiplied by 2.
    fn handle_shift_left_register_one(&mut self, x: usize) {
        let a = self.registers.vx[x];

        self.registers.vx[x] = a << 1;
        self.registers.set_flag(a & 0b1000_0000 != 0);
    }

    /// 9xy0 - SNE Vx, Vy
    /// Skip next instruction if Vx != Vy.
    fn handle_skip_if_not_equal_register(&mut self, x: usize, y: usize) {
        if self.registers.vx[x] != self.registers.vx[y] {
            self.skip_next();
        }
    }

    /// Annn - LD I, addr
    /// Set I = nnn.
    fn handle_load_immediate(&mut self, n: u16) {
        self.registers.i = n;
    }

    /// Bnnn - JP V0, addr
    /// Jump to location nnn + V0.
    ///
    /// A target past 0xFFF wraps around to the start of memory.
    fn handle_jump_offset(&mut self, n: u16) {
        self.registers.set_pc(n + self.registers.vx[0] as u16);
        trace!("jump_offset: set PC to {:#05X}", self.registers.pc);
    }

    /// Cxkk - RND Vx, byte
    /// Set Vx = random byte AND kk.
    fn handle_random(&mut self, x: usize, k: u8) {
        let random: u8 = self.rng.gen();
        self.registers.vx[x] = random & k;
    }

    /// Dxyn - DRW Vx, Vy, nibble
    /// Display n-byte sprite starting at memory location I at (Vx, Vy), set VF = collision.
    ///
    /// The interpreter reads n bytes from memory, starting at the address stored in I. These bytes
    /// are then displayed as sprites on screen at coordinates (Vx, Vy). Sprites are XORed onto the
    /// existing screen. If this causes any pixels to be erased, VF is set to 1, otherwise it is set
    /// to 0. If the sprite is positioned so part of it is outside the coordinates of the display, it
    /// wraps around to the opposite side of the screen.
    fn handle_draw_sprite(&mut self, x: usize, y: usize, n: u8) {
        let sprite = self.memory.slice_wrapping(self.registers.i, n as usize);

        let origin_x = self.registers.vx[x];
        let origin_y = self.registers.vx[y];

        let collision = self.display.draw_sprite(origin_x, origin_y, &sprite);
        self.registers.set_flag(collision);

        trace!(
            "draw: {} rows at ({}, {}) [collision: {}]",
            n,
            origin_x,
            origin_y,
            collision
        );
    }

    /// Ex9E - SKP Vx
    /// Skip next instruction if key with the value of Vx is pressed.
    fn handle_skip_if_pressed(&mut self, x: usize) {
        if self.keypad.is_pressed(self.registers.vx[x]) {
            self.skip_next();
        }
    }

    /// ExA1 - SKNP Vx
    /// Skip next instruction if key with the value of Vx is not pressed.
    fn handle_skip_if_not_pressed(&mut self, x: usize) {
        if !self.keypad.is_pressed(self.registers.vx[x]) {
            self.skip_next();
        }
    }

    /// Fx07 - LD Vx, DT
    fn handle_load_delay(&mut self, x: usize) {
        self.registers.vx[x] = self.registers.delay;
    }

    /// Fx0A - LD Vx, K
    /// Wait for a key press, store the value of the key in Vx.
    ///
    /// Nothing blocks here: without a held key the PC is rewound so the same
    /// instruction runs again on the next step.
    fn handle_wait_key(&mut self, x: usize) {
        match self.keypad.first_pressed() {
            Some(key) => {
                trace!("wait_key: got key {:X}", key);
                self.registers.vx[x] = key;
            }
            None => self.registers.pc = self.registers.instruction_address(),
        }
    }

    /// Fx15 - LD DT, Vx
    fn handle_set_delay(&mut self, x: usize) {
        self.registers.delay = self.registers.vx[x];
        trace!("set_delay: delay timer = {}", self.registers.delay);
    }

    /// Fx18 - LD ST, Vx
    fn handle_set_sound(&mut self, x: usize) {
        self.registers.sound = self.registers.vx[x];
        trace!("set_sound: sound timer = {}", self.registers.sound);
    }

    /// Fx1E - ADD I, Vx
    /// Set I = I + Vx, wrapped into the address space.
    fn handle_add_index(&mut self, x: usize) {
        let i = self.registers.i.wrapping_add(self.registers.vx[x] as u16);
        self.registers.i = memory::wrap(i);
        trace!("add_index: set I to {:#05X}", self.registers.i);
    }

    /// Fx29 - LD F, Vx
    /// Set I = location of sprite for digit Vx.
    fn handle_load_font(&mut self, x: usize) {
        self.registers.i = self.registers.vx[x] as u16 * FONT_GLYPH_SIZE;
    }

    /// Fx33 - LD B, Vx
    /// Store BCD representation of Vx in memory locations I, I+1, and I+2.
    fn handle_store_bcd(&mut self, x: usize) {
        let value = self.registers.vx[x];
        let i = self.registers.i;

        self.memory.write(i, value / 100);
        self.memory.write(i.wrapping_add(1), value / 10 % 10);
        self.memory.write(i.wrapping_add(2), value % 10);
    }

    /// Fx55 - LD [I], Vx
    /// Store registers V0 through Vx in memory starting at location I. I is left unchanged.
    fn handle_store_registers(&mut self, x: usize) {
        let i = self.registers.i;

        for idx in 0..=x {
            self.memory.write(i.wrapping_add(idx as u16), self.registers.vx[idx]);
        }

        trace!("store: V0..=V{:X} to {:#05X}", x, i);
    }

    /// Fx65 - LD Vx, [I]
    /// Read registers V0 through Vx from memory starting at location I. I is left unchanged.
    fn handle_load_registers(&mut self, x: usize) {
        let i = self.registers.i;

        for idx in 0..=x {
            self.registers.vx[idx] = self.memory.read(i.wrapping_add(idx as u16));
        }

        trace!("load: V0..=V{:X} from {:#05X}", x, i);
    }

    pub fn press_key(&mut self, key: u8) {
        self.keypad.press_key(key);
    }

    pub fn release_key(&mut self, key: u8) {
        self.keypad.release_key(key);
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keypad.set_key(key, pressed);
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.bytes()
    }

    pub fn read_memory(&self, address: u16) -> u8 {
        self.memory.read(address)
    }

    /// Writes a byte; addresses past 0xFFF wrap around.
    pub fn write_memory(&mut self, address: u16, value: u8) {
        self.memory.write(address, value);
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn set_pc(&mut self, address: u16) {
        self.registers.set_pc(address);
    }

    pub fn index(&self) -> u16 {
        self.registers.i
    }

    pub fn set_index(&mut self, address: u16) {
        self.registers.i = memory::wrap(address);
    }

    /// Value of register `V{x}`; `x` is taken modulo 16.
    pub fn v(&self, x: usize) -> u8 {
        self.registers.vx[x & VF]
    }

    pub fn set_v(&mut self, x: usize, value: u8) {
        self.registers.vx[x & VF] = value;
    }

    /// Occupied stack slots, oldest return address first.
    pub fn stack(&self) -> &[u16] {
        &self.registers.stack[..self.registers.sp as usize]
    }

    pub fn delay_timer(&self) -> u8 {
        self.registers.delay
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.registers.delay = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.registers.sound
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.registers.sound = value;
    }

    pub fn is_sound_active(&self) -> bool {
        self.registers.sound > 0
    }

    pub fn stack_depth(&self) -> usize {
        self.registers.sp as usize
    }

    pub fn fault(&self) -> Option<MachineFault> {
        self.fault
    }

    /// Number of instruction words executed that had no defined meaning.
    pub fn unknown_opcodes(&self) -> u64 {
        self.unknown_opcodes
    }
}
