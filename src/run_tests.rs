//! Tests for the run module.

use std::io::Write;

use bulk_relay::config::{JobFile, JobRequest};

use super::{RunError, prepare_request};

fn probe_job() -> JobFile {
    JobFile::parse(
        r#"
        kind = "probe"
        user_id = "u1"
        api_token = "secret"
        unique_id = "uid-1"
        message_text = "ping"
        contacts = ["15551230001"]
        "#,
    )
    .unwrap()
}

fn template_job_with_media(path: &str) -> JobFile {
    JobFile::parse(&format!(
        r#"
        kind = "template"
        user_id = "u1"
        api_token = "secret"
        unique_id = "uid-1"
        template_name = "promo"
        language = "en"
        media_type = "IMAGE"
        media_file = "{path}"
        media_content_type = "image/png"
        contacts = ["15551230001"]
        "#,
    ))
    .unwrap()
}

#[test]
fn plain_jobs_convert_without_media() {
    let request = prepare_request(probe_job()).unwrap();
    assert!(matches!(request, JobRequest::Probe(_)));
}

#[test]
fn media_file_bytes_are_attached_to_template_jobs() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"fake image bytes").unwrap();
    let path = file.path().to_str().unwrap();

    let request = prepare_request(template_job_with_media(path)).unwrap();

    match request {
        JobRequest::Template(req) => {
            let upload = req.media_upload.unwrap();
            assert_eq!(upload.bytes, b"fake image bytes");
            assert_eq!(upload.content_type, "image/png");
            assert!(!upload.file_name.is_empty());
        }
        other => panic!("expected template request, got {other:?}"),
    }
}

#[test]
fn missing_media_file_is_a_read_error() {
    let job = template_job_with_media("/nonexistent/banner.png");

    let err = prepare_request(job).unwrap_err();
    assert!(matches!(err, RunError::MediaRead { .. }));
}

#[test]
fn media_file_on_non_template_jobs_is_rejected() {
    let job = JobFile::parse(
        r#"
        kind = "probe"
        user_id = "u1"
        api_token = "secret"
        unique_id = "uid-1"
        message_text = "ping"
        media_file = "banner.png"
        contacts = ["15551230001"]
        "#,
    )
    .unwrap();

    let err = prepare_request(job).unwrap_err();
    assert!(matches!(err, RunError::JobFile(_)));
}
