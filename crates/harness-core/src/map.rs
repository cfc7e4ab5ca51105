//! Memory-mapped hardware layout of the target board.
//!
//! Addresses and bit assignments mirror the firmware's `constants.inc`: a
//! 6522 VIA at `$6000` drives the HD44780 display and the button port, the
//! GA keeps its counters in zero page, and the ROM occupies the upper half
//! of the address space with the 6502 reset vector at `$FFFC`.

/// VIA port B: the LCD 8-bit data bus.
pub const PORT_B: u16 = 0x6000;
/// VIA port A: LCD control lines in the high nibble, buttons in the low.
pub const PORT_A: u16 = 0x6001;
/// VIA timer 1 low-order counter, read by the firmware as a PRNG seed.
pub const VIA_T1_COUNTER: u16 = 0x6004;

/// Enable strobe bit on [`PORT_A`]; the display latches on its rising edge.
pub const LCD_E: u8 = 0x80;
/// Register-select bit on [`PORT_A`]; set for character data, clear for
/// commands.
pub const LCD_RS: u8 = 0x20;

/// Morse key on PA0.
pub const BTN_MORSE: u8 = 0x01;
/// Rub-out (backspace) on PA1.
pub const BTN_RUBOUT: u8 = 0x02;
/// Confirm-target on PA2.
pub const BTN_CONFIRM: u8 = 0x04;
/// Cancel / enter-input-mode on PA3.
pub const BTN_CANCEL: u8 = 0x08;
/// Low nibble of [`PORT_A`] carrying the button lines.
pub const BUTTON_MASK: u8 = 0x0F;

/// Zero-page low byte of the fitness-distance counter.
pub const DIST_LO: u16 = 0x03;
/// Zero-page high byte of the fitness-distance counter.
pub const DIST_HI: u16 = 0x04;
/// Zero-page low byte of the generation counter.
pub const GEN_LO: u16 = 0x06;
/// Zero-page high byte of the generation counter.
pub const GEN_HI: u16 = 0x07;
/// Zero-page write position into the target text buffer.
pub const TARGET_POS: u16 = 0x1B;
/// Zero-page index of the currently selected preset phrase.
pub const PHRASE_INDEX: u16 = 0x1F;

/// Base address of the null-padded target text buffer.
pub const TARGET_BUF: u16 = 0x0400;
/// Length of the target text buffer in bytes.
pub const TARGET_BUF_LEN: usize = 16;

/// Base address the ROM image is loaded at.
pub const ROM_BASE: u16 = 0x8000;
/// Exclusive end of the signature-scan window, leaving the vector table
/// untouched.
pub const ROM_SCAN_END: u16 = 0xFFF0;
/// Low byte of the 6502 reset vector.
pub const RESET_VECTOR_LO: u16 = 0xFFFC;
/// High byte of the 6502 reset vector.
pub const RESET_VECTOR_HI: u16 = 0xFFFD;

/// Reads the byte at `addr`, taking the address modulo the 16-bit space.
///
/// All harness address arithmetic goes through this helper so that operand
/// reads near the top of memory wrap instead of indexing out of bounds.
#[must_use]
pub fn byte_at(memory: &[u8], addr: u16) -> u8 {
    if memory.is_empty() {
        return 0;
    }
    memory[usize::from(addr) % memory.len()]
}

/// Reads a 16-bit counter split across two independently addressed bytes.
#[must_use]
pub fn read_u16_split(memory: &[u8], lo_addr: u16, hi_addr: u16) -> u16 {
    u16::from_le_bytes([byte_at(memory, lo_addr), byte_at(memory, hi_addr)])
}

#[cfg(test)]
mod tests {
    use super::{
        byte_at, read_u16_split, BTN_CANCEL, BTN_CONFIRM, BTN_MORSE, BTN_RUBOUT, BUTTON_MASK,
        LCD_E, LCD_RS, PORT_A, PORT_B, RESET_VECTOR_HI, RESET_VECTOR_LO, ROM_BASE,
    };

    #[test]
    fn button_lines_cover_the_low_nibble_exactly() {
        assert_eq!(BTN_MORSE | BTN_RUBOUT | BTN_CONFIRM | BTN_CANCEL, BUTTON_MASK);
        assert_eq!(BUTTON_MASK & (LCD_E | LCD_RS), 0);
    }

    #[test]
    fn control_lines_do_not_overlap() {
        assert_eq!(LCD_E & LCD_RS, 0);
    }

    #[test]
    fn lcd_registers_are_adjacent_via_ports() {
        assert_eq!(PORT_A, PORT_B + 1);
    }

    #[test]
    fn reset_vector_bytes_are_adjacent() {
        assert_eq!(RESET_VECTOR_HI, RESET_VECTOR_LO + 1);
        assert!(RESET_VECTOR_LO >= ROM_BASE);
    }

    #[test]
    fn split_read_is_little_endian_across_cells() {
        let mut memory = vec![0u8; 0x1_0000];
        memory[0x03] = 0x34;
        memory[0x04] = 0x12;
        assert_eq!(read_u16_split(&memory, 0x03, 0x04), 0x1234);
    }

    #[test]
    fn byte_reads_wrap_at_the_address_space_width() {
        let mut memory = vec![0u8; 0x1_0000];
        memory[0x0001] = 0xAB;
        assert_eq!(byte_at(&memory, 0x0001), 0xAB);
        assert_eq!(byte_at(&memory, u16::MAX), 0x00);
    }
}
