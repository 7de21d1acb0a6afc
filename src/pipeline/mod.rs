pub mod job_runner;
pub mod orchestrator;
#[cfg(feature = "render")]
pub mod pdf_compress;
