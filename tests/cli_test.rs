// CLI entry point tests.

use std::io::Write;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_imagekb"))
}

// ============================================================
// 1. No arguments shows usage and exits with failure
// ============================================================

#[test]
fn test_main_no_args_shows_usage() {
    let output = cargo_bin().output().expect("failed to execute binary");

    assert!(
        !output.status.success(),
        "should exit with failure when no args given"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Usage"),
        "stderr should contain 'Usage', got: {stderr}"
    );
}

// ============================================================
// 2. --help flag shows usage and exits with success
// ============================================================

#[test]
fn test_main_help_flag() {
    let output = cargo_bin()
        .arg("--help")
        .output()
        .expect("failed to execute binary");

    assert!(
        output.status.success(),
        "should exit with success for --help"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Usage"),
        "stderr should contain 'Usage', got: {stderr}"
    );
}

// ============================================================
// 3. --version flag shows version and exits with success
// ============================================================

#[test]
fn test_main_version_flag() {
    let output = cargo_bin()
        .arg("--version")
        .output()
        .expect("failed to execute binary");

    assert!(
        output.status.success(),
        "should exit with success for --version"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    let version = env!("CARGO_PKG_VERSION");
    assert!(
        stderr.contains(version),
        "stderr should contain '{version}', got: {stderr}"
    );
}

// ============================================================
// 4. A job file runs end to end
// ============================================================

#[test]
fn test_main_runs_job_file() {
    let dir = tempfile::tempdir().expect("temp dir");

    let img = image::RgbaImage::from_pixel(32, 32, image::Rgba([200, 100, 50, 255]));
    img.save(dir.path().join("in.png")).expect("write fixture");

    let mut jobs = std::fs::File::create(dir.path().join("jobs.yaml")).expect("create job file");
    writeln!(
        jobs,
        "jobs:\n  - tool: convert\n    input: in.png\n    output: out.jpg\n    format: jpeg"
    )
    .expect("write job file");

    let output = cargo_bin()
        .arg(dir.path().join("jobs.yaml"))
        .output()
        .expect("failed to execute binary");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "job run should succeed, stderr: {stderr}"
    );
    assert!(stderr.contains("OK:"), "should report the job, got: {stderr}");
    assert!(
        dir.path().join("out.jpg").exists(),
        "output file should be written next to the job file"
    );
}

// ============================================================
// 5. Invalid job files fail fast
// ============================================================

#[test]
fn test_main_rejects_unparseable_job_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("jobs.yaml"), "jobs: [not, a, job]").expect("write");

    let output = cargo_bin()
        .arg(dir.path().join("jobs.yaml"))
        .output()
        .expect("failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"), "got: {stderr}");
}

#[test]
fn test_main_rejects_invalid_job_parameters() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("jobs.yaml"),
        "jobs:\n  - tool: compress-image\n    input: a.jpg\n    output: b.jpg\n    target_kb: 0\n",
    )
    .expect("write");

    let output = cargo_bin()
        .arg(dir.path().join("jobs.yaml"))
        .output()
        .expect("failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid job"), "got: {stderr}");
}
