//! CHIP-8 machine state as seen by the debugger.
//!
//! Instruction execution lives elsewhere; this crate only owns the register
//! file, memory and call stack, plus the ROM loader that fills them.

mod loader;

use rand::Rng;

pub use loader::{FileLoader, LoadError, Rom, RomLoader};

/// Total addressable memory
pub const MEMORY_SIZE: usize = 0x1000;

/// Address where programs are mapped and execution starts
pub const PROGRAM_START: u16 = 0x200;

/// Largest program image that fits between PROGRAM_START and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Address of the built-in hex digit font
pub const FONT_START: usize = 0x050;

/// Number of general purpose registers (v0..v15)
pub const NUM_V_REGISTERS: usize = 16;

/// Depth of the call stack
pub const STACK_DEPTH: usize = 16;

const FONT: [u8; 80] = [
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

/// How memory is filled on reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryInit {
    #[default]
    Zero,
    Random,
}

/// CHIP-8 interpreter state.
///
/// Register fields are public: the debugger reads and writes them directly
/// and no cross-field consistency is enforced here.
pub struct Chip8 {
    pub v: [u8; NUM_V_REGISTERS],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    memory: Box<[u8; MEMORY_SIZE]>,
    memory_init: MemoryInit,
}

impl Chip8 {
    pub fn new(memory_init: MemoryInit) -> Self {
        let mut vm = Chip8 {
            v: [0; NUM_V_REGISTERS],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory: Box::new([0; MEMORY_SIZE]),
            memory_init,
        };
        vm.reset();
        vm
    }

    /// Return the machine to its power-on state
    pub fn reset(&mut self) {
        self.v = [0; NUM_V_REGISTERS];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.stack = [0; STACK_DEPTH];

        match self.memory_init {
            MemoryInit::Zero => self.memory.fill(0),
            MemoryInit::Random => rand::thread_rng().fill(&mut self.memory[..]),
        }
        self.memory[FONT_START..FONT_START + FONT.len()].copy_from_slice(&FONT);
    }

    /// Copy a program image to PROGRAM_START.
    ///
    /// Images longer than MAX_PROGRAM_SIZE are truncated; the loader rejects
    /// those before they get here.
    pub fn load_program(&mut self, image: &[u8]) {
        let len = image.len().min(MAX_PROGRAM_SIZE);
        let start = PROGRAM_START as usize;
        self.memory[start..start + len].copy_from_slice(&image[..len]);
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory[..]
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(MemoryInit::Zero)
    }
}
