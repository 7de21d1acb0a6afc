use super::job::Job;
use super::settings::Settings;

/// Effective knobs for one job: the job's override when present, the
/// settings default otherwise.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub quality: u8,
    pub pdf_quality: u8,
}

impl MergedConfig {
    /// JobのOption値がSomeならJobの値を、NoneならSettingsの値を使用する。
    pub fn new(settings: &Settings, job: &Job) -> Self {
        MergedConfig {
            quality: job.quality.unwrap_or(settings.quality),
            pdf_quality: job.quality.unwrap_or(settings.pdf_quality),
        }
    }
}
