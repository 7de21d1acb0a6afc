use serde::Deserialize;

use crate::error::{ImageKbError, Result};
use crate::raster::encode::OutputFormat;
use crate::tools::to_pdf::Orientation;
use crate::tools::transform::PassportPreset;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

/// Input file path, or a list of paths for image-to-pdf jobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InputSpec {
    One(String),
    Many(Vec<String>),
}

impl InputSpec {
    pub fn paths(&self) -> Vec<&str> {
        match self {
            InputSpec::One(p) => vec![p.as_str()],
            InputSpec::Many(ps) => ps.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub input: InputSpec,
    pub output: String,
    #[serde(flatten)]
    pub tool: ToolSpec,
    /// Optional quality override (percent) for tools that encode.
    pub quality: Option<u8>,
}

/// Unit for physical print dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    In,
    Cm,
}

impl Unit {
    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            Unit::In => value,
            Unit::Cm => value / 2.54,
        }
    }
}

/// One tool invocation. Tool ids mirror the tool pages of the original
/// site.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "tool", rename_all = "kebab-case")]
pub enum ToolSpec {
    Convert {
        format: OutputFormat,
    },
    CompressImage {
        target_kb: u32,
        #[serde(default = "default_compress_format")]
        format: OutputFormat,
    },
    Resize {
        width: u32,
        height: u32,
        #[serde(default = "default_true")]
        maintain_aspect: bool,
    },
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    PassportPhoto {
        preset: Option<PassportPreset>,
        width: Option<u32>,
        height: Option<u32>,
    },
    ChangeDpi {
        dpi: f64,
        width: Option<f64>,
        height: Option<f64>,
        #[serde(default)]
        unit: Unit,
    },
    ImageToPdf {
        #[serde(default)]
        orientation: Orientation,
    },
    CompressPdf,
}

fn default_true() -> bool {
    true
}

fn default_compress_format() -> OutputFormat {
    OutputFormat::Jpeg
}

impl ToolSpec {
    /// Target pixel dimensions of a passport-photo job: a preset or an
    /// explicit pair, never both.
    pub fn passport_dimensions(&self) -> Result<(u32, u32)> {
        let ToolSpec::PassportPhoto {
            preset,
            width,
            height,
        } = self
        else {
            return Err(ImageKbError::config("not a passport-photo job"));
        };
        match (preset, width, height) {
            (Some(p), None, None) => Ok(p.dimensions()),
            (None, Some(w), Some(h)) if *w > 0 && *h > 0 => Ok((*w, *h)),
            _ => Err(ImageKbError::config(
                "passport-photo needs either a preset or an explicit width and height",
            )),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            ToolSpec::Convert { .. } => Ok(()),
            ToolSpec::CompressImage { target_kb, format } => {
                if *target_kb == 0 {
                    return Err(ImageKbError::config("target_kb must be positive"));
                }
                if *format == OutputFormat::Png {
                    return Err(ImageKbError::config(
                        "compress-image outputs jpeg or webp, not png",
                    ));
                }
                Ok(())
            }
            ToolSpec::Resize { width, height, .. } => {
                if *width == 0 || *height == 0 {
                    return Err(ImageKbError::config("resize dimensions must be positive"));
                }
                Ok(())
            }
            ToolSpec::Crop { width, height, .. } => {
                if *width == 0 || *height == 0 {
                    return Err(ImageKbError::config("crop dimensions must be positive"));
                }
                Ok(())
            }
            ToolSpec::PassportPhoto { .. } => self.passport_dimensions().map(|_| ()),
            ToolSpec::ChangeDpi {
                dpi, width, height, ..
            } => {
                if !dpi.is_finite() || *dpi <= 0.0 {
                    return Err(ImageKbError::config("dpi must be a positive number"));
                }
                match (width, height) {
                    (None, None) => Ok(()),
                    (Some(w), Some(h)) if *w > 0.0 && *h > 0.0 => Ok(()),
                    (Some(_), Some(_)) => Err(ImageKbError::config(
                        "physical dimensions must be positive",
                    )),
                    _ => Err(ImageKbError::config(
                        "change-dpi needs both physical dimensions or neither",
                    )),
                }
            }
            ToolSpec::ImageToPdf { .. } => Ok(()),
            ToolSpec::CompressPdf => Ok(()),
        }
    }
}

impl Job {
    pub fn validate(&self) -> Result<()> {
        let inputs = self.input.paths();
        if inputs.is_empty() {
            return Err(ImageKbError::config("job has no input files"));
        }
        if inputs.len() > 1 && !matches!(self.tool, ToolSpec::ImageToPdf { .. }) {
            return Err(ImageKbError::config(
                "only image-to-pdf jobs accept multiple inputs",
            ));
        }
        if let Some(q) = self.quality
            && !(1..=100).contains(&q)
        {
            return Err(ImageKbError::config(format!(
                "quality must be 1-100, got {q}"
            )));
        }
        self.tool.validate()
    }
}
