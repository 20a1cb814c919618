use crate::grid::GridSpec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Raster formats read as frames or written as sheets/frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Bmp,
    Gif,
    Tga,
}

impl FrameFormat {
    /// Extensions (lowercase) accepted as pack input.
    pub const INPUT_EXTENSIONS: [&'static str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tga => "tga",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Gif => image::ImageFormat::Gif,
            Self::Tga => image::ImageFormat::Tga,
        }
    }

    /// Whether a file named `name` is picked up when packing.
    ///
    /// Matches the lowercased name's suffix, so a bare `.png` counts too.
    pub fn is_input_file_name(name: &str) -> bool {
        let name = name.to_lowercase();
        Self::INPUT_EXTENSIONS.iter().any(|ext| {
            name.strip_suffix(ext)
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }
}

impl FromStr for FrameFormat {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "gif" => Ok(Self::Gif),
            "tga" => Ok(Self::Tga),
            _ => Err(()),
        }
    }
}

/// Output naming and formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipbookConfig {
    /// Sheet file stem prefix; the grid is appended as `_{rows}x{cols}`.
    #[serde(default = "default_sheet_prefix")]
    pub sheet_prefix: String,
    #[serde(default = "default_sheet_format")]
    pub sheet_format: FrameFormat,
    /// Unpacked frame file stem prefix; the index is appended as `_{index}`.
    #[serde(default = "default_frame_prefix")]
    pub frame_prefix: String,
    /// Minimum digits of the zero-padded frame index.
    #[serde(default = "default_frame_digits")]
    pub frame_digits: usize,
    #[serde(default = "default_frame_format")]
    pub frame_format: FrameFormat,
}

impl Default for FlipbookConfig {
    fn default() -> Self {
        Self {
            sheet_prefix: default_sheet_prefix(),
            sheet_format: default_sheet_format(),
            frame_prefix: default_frame_prefix(),
            frame_digits: default_frame_digits(),
            frame_format: default_frame_format(),
        }
    }
}

impl FlipbookConfig {
    /// Rejects empty prefixes and a zero digit count.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::FlipbookError;

        if self.sheet_prefix.is_empty() {
            return Err(FlipbookError::InvalidConfig(
                "sheet_prefix must not be empty".into(),
            ));
        }
        if self.frame_prefix.is_empty() {
            return Err(FlipbookError::InvalidConfig(
                "frame_prefix must not be empty".into(),
            ));
        }
        if self.frame_digits == 0 {
            return Err(FlipbookError::InvalidConfig(
                "frame_digits must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// `flipbook_{rows}x{cols}.tga` with the defaults.
    pub fn sheet_file_name(&self, grid: &GridSpec) -> String {
        format!(
            "{}_{}x{}.{}",
            self.sheet_prefix,
            grid.rows,
            grid.cols,
            self.sheet_format.extension()
        )
    }

    /// `frame_0007.png` with the defaults; wider indices are not truncated.
    pub fn frame_file_name(&self, index: u32) -> String {
        format!(
            "{}_{:0width$}.{}",
            self.frame_prefix,
            index,
            self.frame_format.extension(),
            width = self.frame_digits
        )
    }

    /// Create a fluent builder for `FlipbookConfig`.
    pub fn builder() -> FlipbookConfigBuilder {
        FlipbookConfigBuilder::new()
    }
}

fn default_sheet_prefix() -> String {
    "flipbook".into()
}
fn default_sheet_format() -> FrameFormat {
    FrameFormat::Tga
}
fn default_frame_prefix() -> String {
    "frame".into()
}
fn default_frame_digits() -> usize {
    4
}
fn default_frame_format() -> FrameFormat {
    FrameFormat::Png
}

#[derive(Debug, Default, Clone)]
pub struct FlipbookConfigBuilder {
    cfg: FlipbookConfig,
}

impl FlipbookConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: FlipbookConfig::default(),
        }
    }
    pub fn sheet_prefix(mut self, v: impl Into<String>) -> Self {
        self.cfg.sheet_prefix = v.into();
        self
    }
    pub fn sheet_format(mut self, v: FrameFormat) -> Self {
        self.cfg.sheet_format = v;
        self
    }
    pub fn frame_prefix(mut self, v: impl Into<String>) -> Self {
        self.cfg.frame_prefix = v.into();
        self
    }
    pub fn frame_digits(mut self, v: usize) -> Self {
        self.cfg.frame_digits = v;
        self
    }
    pub fn frame_format(mut self, v: FrameFormat) -> Self {
        self.cfg.frame_format = v;
        self
    }
    pub fn build(self) -> FlipbookConfig {
        self.cfg
    }
}
