//! Register naming and formatting for the `registers` command.

use crate::error::CommandError;
use crate::protocol::parse_int;
use hnc8_chip8::{Chip8, NUM_V_REGISTERS};

const V_NAMES: [&str; NUM_V_REGISTERS] = [
    "v0", "v1", "v2", "v3", "v4", "v5", "v6", "v7", "v8", "v9", "v10", "v11", "v12", "v13", "v14",
    "v15",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    V(usize),
    I,
    Pc,
    Sp,
    Dt,
    St,
}

impl Register {
    /// Display order of a full register dump
    pub fn all() -> impl Iterator<Item = Register> {
        (0..NUM_V_REGISTERS)
            .map(Register::V)
            .chain([Register::I, Register::Pc, Register::Sp, Register::Dt, Register::St])
    }

    /// Parse a register name.
    ///
    /// Only the first letter decides, except for `v` (index follows) and
    /// `s` (`sp` or `st`). The first letter is case-insensitive.
    pub fn parse(token: &[u8]) -> Result<Register, CommandError> {
        match token.first() {
            Some(b'v' | b'V') => {
                let index = parse_int(&token[1..]).ok_or(CommandError::InvalidRegisterIndex)?;
                if !(0..NUM_V_REGISTERS as i64).contains(&index) {
                    return Err(CommandError::InvalidRegisterIndex);
                }
                Ok(Register::V(index as usize))
            }
            Some(b'i' | b'I') => Ok(Register::I),
            Some(b'p' | b'P') => Ok(Register::Pc),
            Some(b's' | b'S') => match token.get(1) {
                Some(b'p') => Ok(Register::Sp),
                Some(b't') => Ok(Register::St),
                _ => Err(CommandError::InvalidRegisterName),
            },
            Some(b'd' | b'D') => Ok(Register::Dt),
            _ => Err(CommandError::InvalidArguments),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::V(n) => V_NAMES[n],
            Register::I => "i",
            Register::Pc => "pc",
            Register::Sp => "sp",
            Register::Dt => "dt",
            Register::St => "st",
        }
    }

    pub fn is_wide(self) -> bool {
        matches!(self, Register::I | Register::Pc)
    }

    /// Largest value the register holds
    pub fn max(self) -> u16 {
        if self.is_wide() {
            u16::MAX
        } else {
            u8::MAX as u16
        }
    }

    pub fn read(self, vm: &Chip8) -> u16 {
        match self {
            Register::V(n) => vm.v[n] as u16,
            Register::I => vm.i,
            Register::Pc => vm.pc,
            Register::Sp => vm.sp as u16,
            Register::Dt => vm.delay_timer as u16,
            Register::St => vm.sound_timer as u16,
        }
    }

    /// Store `value`, clamped to the register width
    pub fn write(self, vm: &mut Chip8, value: u16) -> u16 {
        let value = value.min(self.max());
        match self {
            Register::V(n) => vm.v[n] = value as u8,
            Register::I => vm.i = value,
            Register::Pc => vm.pc = value,
            Register::Sp => vm.sp = value as u8,
            Register::Dt => vm.delay_timer = value as u8,
            Register::St => vm.sound_timer = value as u8,
        }
        value
    }

    /// `<name>\t0x<hex>\t<decimal>` with 2 or 4 hex digits by width
    pub fn format(self, vm: &Chip8) -> String {
        let value = self.read(vm);
        if self.is_wide() {
            format!("{}\t0x{:04x}\t{}\n", self.name(), value, value)
        } else {
            format!("{}\t0x{:02x}\t{}\n", self.name(), value, value)
        }
    }
}

/// Parse a value to store in a register. The result is saturated to
/// 0..=0xffff before the per-register clamp.
pub fn parse_value(token: &[u8]) -> Result<u16, CommandError> {
    let value = parse_int(token).ok_or(CommandError::InvalidValue)?;
    Ok(value.clamp(0, u16::MAX as i64) as u16)
}
