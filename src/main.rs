use std::path::{Path, PathBuf};
use std::process::ExitCode;

use imagekb::config::job::JobFile;
use imagekb::config::merged::MergedConfig;
use imagekb::config::{self};
use imagekb::pipeline::job_runner::JobConfig;
use imagekb::pipeline::orchestrator::run_all_jobs;
use imagekb::tools::format_file_size;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: imagekb <jobs.yaml>...");
        eprintln!("  Process image and PDF files according to job specifications.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("imagekb {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    // Collect job configs from all job files.
    let mut job_configs: Vec<JobConfig> = Vec::new();

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Read and parse the job YAML file.
        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let job_file: JobFile = match serde_yml::from_str(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Resolve job file directory for relative paths.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        for job in &job_file.jobs {
            if let Err(e) = job.validate() {
                eprintln!("ERROR: Invalid job in {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }

            let merged = MergedConfig::new(&settings, job);
            let input_paths: Vec<PathBuf> = job
                .input
                .paths()
                .iter()
                .map(|p| resolve_path(&job_dir, p))
                .collect();
            let output_path = resolve_path(&job_dir, &job.output);

            job_configs.push(JobConfig {
                input_paths,
                output_path,
                tool: job.tool.clone(),
                merged,
            });
        }
    }

    // Run all jobs through the pipeline.
    let results = run_all_jobs(&job_configs);

    let mut has_error = false;
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(job_result) => {
                eprintln!(
                    "OK: {} ({} -> {})",
                    job_result.output_path.display(),
                    format_file_size(job_result.bytes_in),
                    format_file_size(job_result.bytes_out),
                );
            }
            Err(e) => {
                eprintln!(
                    "ERROR: {}: {e}",
                    job_configs[i].output_path.display()
                );
                has_error = true;
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
