//! SSD1306 command definitions
//!
//! This module defines the command bytes used to bring up the SSD1306 and
//! address its display RAM, plus the two control bytes that open every bus
//! transaction.
//!
//! ## Transaction Structure
//!
//! Every transaction on the bus follows the pattern:
//! 1. Address the controller
//! 2. Send a control byte ([`CONTROL_COMMAND`] or [`CONTROL_DATA`])
//! 3. Send command bytes or pixel bytes, as announced by the control byte
//! 4. Stop
//!
//! ## Example
//!
//! ```
//! use ssd1306_text::command;
//!
//! // Start line 0 is encoded in the low bits of the opcode
//! assert_eq!(command::SET_START_LINE | 0x00, 0x40);
//! assert_eq!(command::SEG_REMAP | 0x01, 0xA1);
//! ```

// Transaction control bytes

/// Control byte announcing a command stream (Co = 0, D/C = 0)
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte announcing a pixel-data stream (Co = 0, D/C = 1)
pub const CONTROL_DATA: u8 = 0x40;

// Fundamental commands

/// Display off, controller enters sleep mode (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on, normal operation (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

/// Set contrast control command (0x81)
///
/// Requires 1 byte: contrast level 0x00-0xFF.
pub const SET_CONTRAST: u8 = 0x81;

/// Resume output from RAM content (0xA4)
pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;

/// Normal (non-inverted) display mode (0xA6)
pub const NORMAL_DISPLAY: u8 = 0xA6;

/// Stop any running scroll (0x2E)
pub const DEACTIVATE_SCROLL: u8 = 0x2E;

// Addressing commands

/// Set memory addressing mode (0x20)
///
/// Requires 1 byte: 0x00 = horizontal, 0x01 = vertical, 0x02 = page.
pub const MEMORY_MODE: u8 = 0x20;

/// Set column address range (0x21)
///
/// Requires 2 bytes: [start column, end column]
pub const COLUMN_ADDR: u8 = 0x21;

/// Set page address range (0x22)
///
/// Requires 2 bytes: [start page, end page]
pub const PAGE_ADDR: u8 = 0x22;

// Hardware configuration commands

/// Set display start line, OR-ed with the line number 0-63 (0x40)
pub const SET_START_LINE: u8 = 0x40;

/// Segment re-map, OR-ed with 1 to map column 127 to SEG0 (0xA0)
pub const SEG_REMAP: u8 = 0xA0;

/// Set multiplex ratio (0xA8)
///
/// Requires 1 byte: number of rows minus one.
pub const SET_MULTIPLEX: u8 = 0xA8;

/// COM output scan direction, remapped mode (0xC8)
pub const COM_SCAN_DEC: u8 = 0xC8;

/// Set display offset (0xD3)
///
/// Requires 1 byte: vertical shift 0-63.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Set COM pins hardware configuration (0xDA)
///
/// Requires 1 byte; the value depends on how the panel is wired.
pub const SET_COM_PINS: u8 = 0xDA;

// Timing and driving scheme commands

/// Set display clock divide ratio / oscillator frequency (0xD5)
pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;

/// Set pre-charge period (0xD9)
pub const SET_PRECHARGE: u8 = 0xD9;

/// Set VCOMH deselect level (0xDB)
pub const SET_VCOM_DETECT: u8 = 0xDB;

/// Charge pump setting (0x8D)
///
/// Requires 1 byte: 0x14 = enable, 0x10 = disable.
pub const CHARGE_PUMP: u8 = 0x8D;

/// Suggested clock divide ratio / oscillator frequency
pub const CLOCK_DIV_DEFAULT: u8 = 0x80;

/// VCOMH deselect level used during initialization
pub const VCOM_DETECT_DEFAULT: u8 = 0x40;
