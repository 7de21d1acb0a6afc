// Configuration parsing tests: job files, settings discovery, merging.

use std::io::Write;

use imagekb::config::job::{InputSpec, JobFile, ToolSpec, Unit};
use imagekb::config::load_settings_for_job;
use imagekb::config::merged::MergedConfig;
use imagekb::config::settings::Settings;
use imagekb::raster::OutputFormat;

// ============================================================
// 1. Job file parsing
// ============================================================

#[test]
fn test_parse_every_tool_id() {
    let yaml = r#"
jobs:
  - tool: convert
    input: photo.webp
    output: photo.jpg
    format: jpeg
  - tool: compress-image
    input: photo.jpg
    output: photo-200kb.jpg
    target_kb: 200
  - tool: resize
    input: a.png
    output: b.png
    width: 800
    height: 600
  - tool: crop
    input: a.png
    output: c.png
    x: 10
    y: 20
    width: 300
    height: 200
  - tool: passport-photo
    input: face.jpg
    output: passport.jpg
    preset: us
  - tool: change-dpi
    input: print.jpg
    output: print-300.jpg
    dpi: 300
    width: 4
    height: 6
  - tool: image-to-pdf
    input:
      - p1.png
      - p2.png
    output: pages.pdf
    orientation: landscape
  - tool: compress-pdf
    input: scan.pdf
    output: scan-small.pdf
    quality: 40
"#;
    let job_file: JobFile = serde_yml::from_str(yaml).expect("parse job file");
    assert_eq!(job_file.jobs.len(), 8);

    for job in &job_file.jobs {
        job.validate().expect("every job should validate");
    }

    assert!(matches!(
        job_file.jobs[0].tool,
        ToolSpec::Convert {
            format: OutputFormat::Jpeg
        }
    ));
    assert!(matches!(
        job_file.jobs[1].tool,
        ToolSpec::CompressImage {
            target_kb: 200,
            format: OutputFormat::Jpeg
        }
    ));
    assert!(matches!(
        job_file.jobs[2].tool,
        ToolSpec::Resize {
            width: 800,
            height: 600,
            maintain_aspect: true
        }
    ));
    assert!(matches!(job_file.jobs[7].tool, ToolSpec::CompressPdf));
    assert_eq!(job_file.jobs[7].quality, Some(40));

    match &job_file.jobs[6].input {
        InputSpec::Many(paths) => assert_eq!(paths, &["p1.png", "p2.png"]),
        InputSpec::One(_) => panic!("image-to-pdf input should parse as a list"),
    }
}

#[test]
fn test_passport_dimensions_resolution() {
    let yaml = r#"
jobs:
  - tool: passport-photo
    input: a.jpg
    output: b.jpg
    preset: canada
  - tool: passport-photo
    input: a.jpg
    output: c.jpg
    width: 600
    height: 600
"#;
    let job_file: JobFile = serde_yml::from_str(yaml).expect("parse");
    assert_eq!(
        job_file.jobs[0].tool.passport_dimensions().expect("preset"),
        (591, 827)
    );
    assert_eq!(
        job_file.jobs[1].tool.passport_dimensions().expect("explicit"),
        (600, 600)
    );
}

// ============================================================
// 2. Validation failures
// ============================================================

fn single_job(yaml: &str) -> imagekb::config::job::Job {
    let job_file: JobFile = serde_yml::from_str(yaml).expect("parse");
    job_file.jobs.into_iter().next().expect("one job")
}

#[test]
fn test_compress_to_png_rejected() {
    let job = single_job(
        "jobs:\n  - tool: compress-image\n    input: a.jpg\n    output: b.png\n    target_kb: 50\n    format: png\n",
    );
    assert!(job.validate().is_err(), "png target has no quality knob");
}

#[test]
fn test_zero_target_kb_rejected() {
    let job = single_job(
        "jobs:\n  - tool: compress-image\n    input: a.jpg\n    output: b.jpg\n    target_kb: 0\n",
    );
    assert!(job.validate().is_err());
}

#[test]
fn test_zero_crop_rejected() {
    let job = single_job(
        "jobs:\n  - tool: crop\n    input: a.png\n    output: b.png\n    x: 0\n    y: 0\n    width: 0\n    height: 10\n",
    );
    assert!(job.validate().is_err());
}

#[test]
fn test_passport_preset_and_dimensions_conflict() {
    let job = single_job(
        "jobs:\n  - tool: passport-photo\n    input: a.jpg\n    output: b.jpg\n    preset: us\n    width: 600\n    height: 600\n",
    );
    assert!(job.validate().is_err(), "preset and explicit size are exclusive");
}

#[test]
fn test_change_dpi_single_dimension_rejected() {
    let job = single_job(
        "jobs:\n  - tool: change-dpi\n    input: a.jpg\n    output: b.jpg\n    dpi: 300\n    width: 4\n",
    );
    assert!(job.validate().is_err(), "physical size needs both dimensions");
}

#[test]
fn test_multiple_inputs_only_for_image_to_pdf() {
    let job = single_job(
        "jobs:\n  - tool: resize\n    input:\n      - a.png\n      - b.png\n    output: c.png\n    width: 10\n    height: 10\n",
    );
    assert!(job.validate().is_err());
}

// ============================================================
// 3. Unit conversion
// ============================================================

#[test]
fn test_unit_conversion() {
    assert_eq!(Unit::In.to_inches(4.0), 4.0);
    assert!((Unit::Cm.to_inches(2.54) - 1.0).abs() < 1e-12);
}

// ============================================================
// 4. Settings and merging
// ============================================================

#[test]
fn test_settings_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.quality, 92);
    assert_eq!(settings.pdf_quality, 60);
}

#[test]
fn test_settings_partial_yaml_keeps_defaults() {
    let settings = Settings::from_yaml("pdf_quality: 40\n").expect("parse settings");
    assert_eq!(settings.quality, 92);
    assert_eq!(settings.pdf_quality, 40);
}

#[test]
fn test_settings_discovered_next_to_job_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut f = std::fs::File::create(dir.path().join("settings.yaml")).expect("create");
    writeln!(f, "quality: 85").expect("write");

    let job_path = dir.path().join("jobs.yaml");
    let settings = load_settings_for_job(&job_path).expect("load settings");
    assert_eq!(settings.quality, 85);
    assert_eq!(settings.pdf_quality, 60);
}

#[test]
fn test_missing_settings_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let settings = load_settings_for_job(&dir.path().join("jobs.yaml")).expect("load");
    assert_eq!(settings.quality, 92);
}

#[test]
fn test_merged_config_prefers_job_quality() {
    let settings = Settings::default();

    let with_override = single_job(
        "jobs:\n  - tool: convert\n    input: a.png\n    output: b.jpg\n    format: jpeg\n    quality: 70\n",
    );
    let merged = MergedConfig::new(&settings, &with_override);
    assert_eq!(merged.quality, 70);

    let without_override =
        single_job("jobs:\n  - tool: convert\n    input: a.png\n    output: b.jpg\n    format: jpeg\n");
    let merged = MergedConfig::new(&settings, &without_override);
    assert_eq!(merged.quality, 92);
    assert_eq!(merged.pdf_quality, 60);
}
