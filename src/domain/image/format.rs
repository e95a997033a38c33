//! Clipboard image formats and the normalized image value object

use std::fmt;

/// In-memory layouts the supported clipboards accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardFormat {
    /// Device-independent bitmap: a BMP without its 14-byte file header
    Dib,
    /// Tagged image file format (macOS pasteboard)
    Tiff,
    /// PNG container (X11/Wayland `image/png` target)
    Png,
    /// Raw 8-bit RGBA pixels, row-major
    Rgba,
    /// The payload bytes exactly as uploaded
    Original,
}

impl ClipboardFormat {
    /// Whether the format can carry an alpha channel
    pub const fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Dib)
    }

    /// Short name used in logs and errors
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dib => "dib",
            Self::Tiff => "tiff",
            Self::Png => "png",
            Self::Rgba => "rgba",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ClipboardFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An image encoded for one clipboard format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    format: ClipboardFormat,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl NormalizedImage {
    pub fn new(format: ClipboardFormat, width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            format,
            width,
            height,
            bytes,
        }
    }

    pub fn format(&self) -> ClipboardFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
