//! Button stimulus injection keyed to the upcoming port read.
//!
//! The button port shares [`PORT_A`] with the LCD control lines, so the
//! injector may only ever touch the low nibble. To emulate debounced,
//! glitch-free switches it imposes the held button state at the exact
//! instant the firmware samples the port: right before an `LDA $6001`
//! executes, and at no other time.

use crate::api::Cpu;
use crate::map::{byte_at, BUTTON_MASK, PORT_A};

/// 6502 `LDA absolute` opcode.
const OPCODE_LDA_ABS: u8 = 0xAD;

/// Imposes `buttons` on the port if the next instruction reads it.
///
/// The check is keyed to the full upcoming encoding — opcode plus both
/// operand bytes — not just the effective address, so instructions that do
/// not read this specific port are never affected and calling this before
/// every step is free of observable side effects.
pub fn inject_buttons<C: Cpu>(cpu: &mut C, buttons: u8) {
    let pc = cpu.pc();
    let [addr_lo, addr_hi] = PORT_A.to_le_bytes();
    let memory = cpu.memory();
    let is_port_read = byte_at(memory, pc) == OPCODE_LDA_ABS
        && byte_at(memory, pc.wrapping_add(1)) == addr_lo
        && byte_at(memory, pc.wrapping_add(2)) == addr_hi;
    if !is_port_read {
        return;
    }

    let memory = cpu.memory_mut();
    let port = usize::from(PORT_A);
    memory[port] = (memory[port] & !BUTTON_MASK) | (buttons & BUTTON_MASK);
}
