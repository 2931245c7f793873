use crate::error::MachineFault;
use crate::memory::{self, START_ROM};

pub const STACK_SIZE: usize = 16;

/// Index of the flag register.
pub const VF: usize = 0xF;

#[derive(Debug)]
pub(crate) struct Registers {
    /// Chip-8 has 16 general purpose 8-bit registers, usually referred to as Vx, where x is a hexadecimal digit (0 through F).
    /// The VF register should not be used by any program, as it is used as a flag by some instructions.
    pub vx: [u8; 16],

    pub i: u16,
    /// The program counter (PC) should be 16-bit, and is used to store the currently executing address.
    pub pc: u16,
    /// The stack pointer (SP) counts the occupied stack slots.
    pub sp: u16,

    pub delay: u8,
    pub sound: u8,

    /// The stack is an array of 16 16-bit values, used to store the address that the interpreter shoud return to when finished with a subroutine. Chip-8 allows for up to 16 levels of nested subroutines.
    pub stack: [u16; STACK_SIZE],
}

impl Default for Registers {
    fn default() -> Self {
        Registers {
            vx: [0; 16],
            i: 0,
            pc: START_ROM as u16,
            sp: 0,
            delay: 0,
            sound: 0,
            stack: [0; STACK_SIZE],
        }
    }
}

impl Registers {
    pub fn reset(&mut self) {
        *self = Registers::default();
    }

    /// Address of the instruction being executed. The PC has already moved past it.
    pub fn instruction_address(&self) -> u16 {
        memory::wrap(self.pc.wrapping_sub(2))
    }

    /// Moves the PC, keeping it inside the address space.
    pub fn set_pc(&mut self, addr: u16) {
        self.pc = memory::wrap(addr);
    }

    /// Pushes the current PC and jumps to `addr`.
    pub fn push(&mut self, addr: u16) -> Result<(), MachineFault> {
        let sp = self.sp as usize;
        if sp >= STACK_SIZE {
            return Err(MachineFault::StackOverflow {
                pc: self.instruction_address(),
            });
        }

        self.stack[sp] = memory::wrap(self.pc);
        self.sp += 1;
        self.set_pc(addr);

        Ok(())
    }

    /// Pops the top of the stack into the PC.
    pub fn pop(&mut self) -> Result<(), MachineFault> {
        if self.sp == 0 {
            return Err(MachineFault::StackUnderflow {
                pc: self.instruction_address(),
            });
        }

        self.sp -= 1;
        self.pc = self.stack[self.sp as usize];

        Ok(())
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.vx[VF] = flag as u8;
    }
}
