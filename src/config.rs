//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_COLUMNS, MAX_ROWS};

/// Default bus address of 128x32 panels
pub const ADDRESS_128X32: u8 = 0x3C;

/// Default bus address of every other panel
pub const ADDRESS_DEFAULT: u8 = 0x3D;

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Width in pixels (corresponds to SEG outputs)
    pub width: u16,
    /// Height in pixels (corresponds to COM outputs)
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width is 0 or greater than MAX_COLUMNS (128)
    /// - height is 0 or greater than MAX_ROWS (64)
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_COLUMNS || height == 0 || height > MAX_ROWS {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of 8-row pages covering the display height
    pub fn page_count(&self) -> usize {
        (self.height as usize).div_ceil(8)
    }

    /// Calculate required buffer size in bytes
    ///
    /// ```
    /// use ssd1306_text::Dimensions;
    ///
    /// let dims = Dimensions::new(128, 60).unwrap();
    /// assert_eq!(dims.page_count(), 8);
    /// assert_eq!(dims.buffer_size(), 1024);
    /// ```
    pub fn buffer_size(&self) -> usize {
        self.width as usize * self.page_count()
    }

    /// Conventional bus address for a panel of this size
    pub fn default_address(&self) -> u8 {
        if self.width == 128 && self.height == 32 {
            ADDRESS_128X32
        } else {
            ADDRESS_DEFAULT
        }
    }
}

/// Source of the panel driving voltage
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(u8)]
pub enum VccSource {
    /// Panel voltage is supplied externally
    External = 0x01,
    /// Panel voltage is generated from 3.3V by the internal charge pump
    #[default]
    SwitchCap = 0x02,
}

impl VccSource {
    /// Data byte for the charge pump command
    pub fn charge_pump(self) -> u8 {
        match self {
            Self::External => 0x10,
            Self::SwitchCap => 0x14,
        }
    }

    /// Data byte for the pre-charge period command
    pub fn precharge(self) -> u8 {
        match self {
            Self::External => 0x22,
            Self::SwitchCap => 0xF1,
        }
    }
}

/// Per-panel wiring and contrast values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelVariant {
    /// COM pins hardware configuration byte
    pub com_pins: u8,
    /// Contrast when the charge pump supplies the panel
    pub contrast: u8,
    /// Contrast when the panel is supplied externally
    pub contrast_external: u8,
}

impl PanelVariant {
    /// Look up the known settings for a panel geometry
    ///
    /// Returns `None` for geometries without confirmed values.
    ///
    /// ```
    /// use ssd1306_text::{Dimensions, PanelVariant};
    ///
    /// let dims = Dimensions::new(128, 64).unwrap();
    /// let panel = PanelVariant::lookup(dims).unwrap();
    /// assert_eq!(panel.com_pins, 0x12);
    /// assert!(PanelVariant::lookup(Dimensions::new(64, 48).unwrap()).is_none());
    /// ```
    pub fn lookup(dims: Dimensions) -> Option<Self> {
        match (dims.width, dims.height) {
            (128, 32) => Some(Self {
                com_pins: 0x02,
                contrast: 0x8F,
                contrast_external: 0x8F,
            }),
            (128, 64) => Some(Self {
                com_pins: 0x12,
                contrast: 0xCF,
                contrast_external: 0x9F,
            }),
            (96, 16) => Some(Self {
                com_pins: 0x02,
                contrast: 0xAF,
                contrast_external: 0x10,
            }),
            _ => None,
        }
    }

    /// Contrast for the given voltage source
    pub fn contrast_for(&self, vcc: VccSource) -> u8 {
        match vcc {
            VccSource::External => self.contrast_external,
            VccSource::SwitchCap => self.contrast,
        }
    }
}

/// Display configuration
///
/// Holds the geometry and panel values. Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Panel wiring and contrast values
    pub panel: PanelVariant,
}

impl Config {
    /// Resolve the device settings used by one initialization
    ///
    /// An `address` of 0 selects [`Dimensions::default_address`].
    pub fn device(&self, vcc: VccSource, address: u8) -> DeviceConfig {
        let address = if address == 0 {
            self.dimensions.default_address()
        } else {
            address
        };
        DeviceConfig {
            address,
            vcc,
            contrast: self.panel.contrast_for(vcc),
            com_pins: self.panel.com_pins,
        }
    }
}

/// Settings resolved by [`Display::begin`](crate::Display::begin)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceConfig {
    /// Bus address of the controller
    pub address: u8,
    /// Panel voltage source
    pub vcc: VccSource,
    /// Contrast byte sent during initialization
    pub contrast: u8,
    /// COM pins configuration byte sent during initialization
    pub com_pins: u8,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use ssd1306_text::{Builder, Dimensions};
///
/// let dims = match Dimensions::new(128, 32) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.panel.contrast, 0x8F);
///
/// // Panels outside the known set need explicit values
/// let odd = Dimensions::new(64, 48).unwrap();
/// assert!(Builder::new().dimensions(odd).build().is_err());
/// assert!(Builder::new().dimensions(odd).com_pins(0x12).contrast(0x7F).build().is_ok());
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// COM pins override
    com_pins: Option<u8>,
    /// Contrast override, applied to both voltage sources
    contrast: Option<u8>,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Override the COM pins configuration byte
    pub fn com_pins(mut self, value: u8) -> Self {
        self.com_pins = Some(value);
        self
    }

    /// Override the contrast byte
    pub fn contrast(mut self, value: u8) -> Self {
        self.contrast = Some(value);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set, and
    /// `BuilderError::UnknownPanel` if the geometry is not a known panel and the
    /// COM pins and contrast were not both supplied.
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        let panel = match (PanelVariant::lookup(dimensions), self.com_pins, self.contrast) {
            (Some(known), com_pins, contrast) => PanelVariant {
                com_pins: com_pins.unwrap_or(known.com_pins),
                contrast: contrast.unwrap_or(known.contrast),
                contrast_external: contrast.unwrap_or(known.contrast_external),
            },
            (None, Some(com_pins), Some(contrast)) => PanelVariant {
                com_pins,
                contrast,
                contrast_external: contrast,
            },
            (None, _, _) => {
                return Err(BuilderError::UnknownPanel {
                    width: dimensions.width,
                    height: dimensions.height,
                });
            }
        };
        Ok(Config { dimensions, panel })
    }
}
