use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::job::ToolSpec;
use crate::config::merged::MergedConfig;
use crate::error::Result;
use crate::geometry::CropRect;
use crate::tools::{compress, convert, format_file_size, to_pdf, transform};
use crate::{dpi, raster};

/// Fully resolved configuration for a single job.
pub struct JobConfig {
    pub input_paths: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub tool: ToolSpec,
    pub merged: MergedConfig,
}

/// Result of processing a single job.
pub struct JobResult {
    pub output_path: PathBuf,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Run one job: read the input file(s), dispatch the tool, write the output.
pub fn run_job(config: &JobConfig) -> Result<JobResult> {
    let mut inputs = Vec::with_capacity(config.input_paths.len());
    for path in &config.input_paths {
        inputs.push(std::fs::read(path)?);
    }
    let bytes_in: u64 = inputs.iter().map(|d| d.len() as u64).sum();
    let source = &inputs[0];

    let output = match &config.tool {
        ToolSpec::Convert { format } => convert::convert(source, *format, config.merged.quality)?,

        ToolSpec::CompressImage { target_kb, format } => {
            let result = compress::compress_to_target(source, *target_kb, *format)?;
            if !result.met_target {
                warn!(
                    target_kb,
                    achieved = %format_file_size(result.bytes.len() as u64),
                    "target size unreachable; keeping the smallest attempt"
                );
            }
            result.bytes
        }

        ToolSpec::Resize {
            width,
            height,
            maintain_aspect,
        } => transform::resize(source, *width, *height, *maintain_aspect)?,

        ToolSpec::Crop {
            x,
            y,
            width,
            height,
        } => transform::crop(
            source,
            CropRect {
                x: *x,
                y: *y,
                w: *width,
                h: *height,
            },
        )?,

        ToolSpec::PassportPhoto { .. } => {
            let (w, h) = config.tool.passport_dimensions()?;
            transform::passport_crop(source, w, h)?
        }

        ToolSpec::ChangeDpi {
            dpi,
            width,
            height,
            unit,
        } => match (width, height) {
            (Some(w), Some(h)) => transform::change_dpi_resize(
                source,
                unit.to_inches(*w),
                unit.to_inches(*h),
                *dpi,
            )?,
            _ => dpi::set_dpi(source, *dpi)?,
        },

        ToolSpec::ImageToPdf { orientation } => {
            to_pdf::images_to_pdf(&inputs, *orientation, config.merged.quality)?
        }

        ToolSpec::CompressPdf => {
            #[cfg(feature = "render")]
            {
                crate::pipeline::pdf_compress::compress_pdf(
                    source,
                    config.merged.pdf_quality,
                    |page, total| info!("Compressing page {page} of {total}"),
                )?
            }
            #[cfg(not(feature = "render"))]
            {
                return Err(crate::error::ImageKbError::config(
                    "compress-pdf requires a build with the render feature",
                ));
            }
        }
    };

    std::fs::write(&config.output_path, &output)?;
    let bytes_out = output.len() as u64;
    info!(
        output = %config.output_path.display(),
        size_in = %format_file_size(bytes_in),
        size_out = %format_file_size(bytes_out),
        mime = raster::SourceFormat::sniff(&output).map(|f| f.mime()).unwrap_or("unknown"),
        "job finished"
    );

    Ok(JobResult {
        output_path: config.output_path.clone(),
        bytes_in,
        bytes_out,
    })
}
