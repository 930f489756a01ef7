//! Text cursor and glyph rasterizer
//!
//! Characters are laid out on a grid of 6x8 cells (5x8 glyph plus one blank
//! column), multiplied by the horizontal and vertical text size. The cursor
//! marks the top-left corner of the next cell.

use crate::buffer::FrameBuffer;
use crate::font::{self, CELL_WIDTH, LINE_HEIGHT};

const LINE_FEED: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';

/// Text cursor position and magnification
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextCursor {
    /// Left edge of the next cell, in pixels
    x: i32,
    /// Top edge of the next cell, in pixels
    y: i32,
    /// Horizontal magnification, at least 1
    size_x: u8,
    /// Vertical magnification, at least 1
    size_y: u8,
}

impl Default for TextCursor {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            size_x: 1,
            size_y: 1,
        }
    }
}

impl TextCursor {
    /// Cursor at (0, 0) with 1x1 text
    pub fn new() -> Self {
        Self::default()
    }

    /// Current (x, y) position
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Move the cursor to (x, y)
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Current (horizontal, vertical) magnification
    pub fn size(&self) -> (u8, u8) {
        (self.size_x, self.size_y)
    }

    /// Set the magnification; 0 is treated as 1
    pub fn set_size(&mut self, size_x: u8, size_y: u8) {
        self.size_x = size_x.max(1);
        self.size_y = size_y.max(1);
    }

    /// Horizontal advance of one character
    fn advance_x(&self) -> i32 {
        CELL_WIDTH * i32::from(self.size_x)
    }

    fn line_feed(&mut self) {
        self.x = 0;
        self.y = self.y.saturating_add(LINE_HEIGHT * i32::from(self.size_y));
    }

    /// Consume one byte of text on a display `width` pixels wide
    ///
    /// Returns the cell anchor where the glyph for `byte` must be drawn, or
    /// `None` for line feed and carriage return.
    pub fn advance(&mut self, byte: u8, width: u16) -> Option<(i32, i32)> {
        match byte {
            LINE_FEED => {
                self.line_feed();
                None
            }
            CARRIAGE_RETURN => None,
            _ => {
                if self.x.saturating_add(self.advance_x()) > i32::from(width) {
                    self.line_feed();
                }
                let anchor = (self.x, self.y);
                self.x = self.x.saturating_add(self.advance_x());
                Some(anchor)
            }
        }
    }
}

/// Draw the glyph for `code` with its top-left corner at (x, y)
///
/// Set font bits light `size_x` x `size_y` blocks. Glyphs whose cell lies
/// completely outside the buffer are skipped.
pub fn draw_char(fb: &mut FrameBuffer, x: i32, y: i32, code: u8, size_x: u8, size_y: u8) {
    let (sx, sy) = (i32::from(size_x.max(1)), i32::from(size_y.max(1)));
    if x >= i32::from(fb.width())
        || y >= i32::from(fb.height())
        || x.saturating_add(CELL_WIDTH * sx) - 1 < 0
        || y.saturating_add(LINE_HEIGHT * sy) - 1 < 0
    {
        return;
    }

    let Some(columns) = font::glyph(code) else {
        return;
    };

    for (i, column) in (0i32..).zip(columns.iter()) {
        for j in 0..font::GLYPH_HEIGHT as i32 {
            if column & (1 << j) == 0 {
                continue;
            }
            if sx == 1 && sy == 1 {
                fb.set_pixel(x + i, y + j);
            } else {
                fill_block(fb, x + i * sx, y + j * sy, sx, sy);
            }
        }
    }
}

fn fill_block(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32) {
    for dy in 0..h {
        for dx in 0..w {
            fb.set_pixel(x + dx, y + dy);
        }
    }
}
