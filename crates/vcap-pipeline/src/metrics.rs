//! Render job metrics.

use metrics::{counter, gauge, histogram};

pub mod names {
    pub const RENDER_JOBS_CREATED_TOTAL: &str = "vcap_render_jobs_created_total";
    pub const RENDER_JOBS_COMPLETED_TOTAL: &str = "vcap_render_jobs_completed_total";
    pub const RENDER_JOBS_FAILED_TOTAL: &str = "vcap_render_jobs_failed_total";
    pub const RENDER_JOBS_ACTIVE: &str = "vcap_render_jobs_active";
    pub const RENDER_DURATION_SECONDS: &str = "vcap_render_duration_seconds";
    pub const SUBTITLE_UPLOAD_FAILURES_TOTAL: &str = "vcap_subtitle_upload_failures_total";
}

pub fn record_job_created(style: &str) {
    counter!(names::RENDER_JOBS_CREATED_TOTAL, "style" => style.to_string()).increment(1);
}

pub fn record_job_started() {
    gauge!(names::RENDER_JOBS_ACTIVE).increment(1.0);
}

pub fn record_job_completed(duration_secs: f64) {
    gauge!(names::RENDER_JOBS_ACTIVE).decrement(1.0);
    counter!(names::RENDER_JOBS_COMPLETED_TOTAL).increment(1);
    histogram!(names::RENDER_DURATION_SECONDS).record(duration_secs);
}

pub fn record_job_failed(stage: &'static str) {
    gauge!(names::RENDER_JOBS_ACTIVE).decrement(1.0);
    counter!(names::RENDER_JOBS_FAILED_TOTAL, "stage" => stage).increment(1);
}

pub fn record_subtitle_upload_failure() {
    counter!(names::SUBTITLE_UPLOAD_FAILURES_TOTAL).increment(1);
}
