//! Bit-packed monochrome frame buffer
//!
//! The buffer mirrors the controller's display RAM in horizontal addressing
//! mode. The display is cut into 8-row pages; each byte holds one column of
//! one page, least significant bit on top.
//!
//! ```text
//!            x=0      x=1            x=width-1
//! page 0   [byte 0] [byte 1]  ...  [byte width-1]       rows 0..8
//! page 1   [width ] [width+1] ...  [2*width-1]          rows 8..16
//! ```

use alloc::vec::Vec;

use crate::config::Dimensions;
use crate::error::Error;

/// Off-chip copy of the display RAM
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    /// Width in pixels
    width: u16,
    /// Height in pixels
    height: u16,
    /// `width * page_count` bytes
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a cleared buffer for `dims`
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the allocator cannot provide
    /// `dims.buffer_size()` bytes.
    pub fn try_new(dims: Dimensions) -> Result<Self, Error> {
        let required = dims.buffer_size();
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(required)
            .map_err(|_| Error::OutOfMemory { required })?;
        bytes.resize(required, 0);
        Ok(Self {
            width: dims.width,
            height: dims.height,
            bytes,
        })
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Turn the pixel at (x, y) on
    ///
    /// Coordinates outside the display are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.bytes[index] |= mask;
        }
    }

    /// Whether the pixel at (x, y) is on
    ///
    /// Coordinates outside the display read as off.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.bytes[index] & mask != 0)
    }

    /// Raw buffer bytes in display RAM order
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Byte index and bit mask of an in-bounds pixel
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((x + (y / 8) * self.width as usize, 1 << (y % 8)))
    }
}
