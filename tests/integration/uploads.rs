//! Upload gateway behaviour through the content API

use super::test_utils::Site;
use content_store::assets::UploadRequest;
use content_store::error::{ApiError, ErrorKind};
use content_store::types::EntityKind;
use std::fs;

fn request<'a>(kind: EntityKind, mime: &'a str, name: &'a str, hint: Option<&'a str>) -> UploadRequest<'a> {
    UploadRequest {
        kind,
        bytes: b"image-bytes",
        mime_type: mime,
        original_name: name,
        identity_hint: hint,
    }
}

#[test]
fn test_gif_rejected_and_nothing_written() {
    let site = Site::new();
    let err = site
        .api
        .upload(&request(EntityKind::Events, "image/gif", "party.gif", None))
        .unwrap_err();

    match err {
        ApiError::Validation(report) => assert_eq!(report.fields(), vec!["mimeType"]),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(site.public_files().is_empty());
}

#[test]
fn test_hinted_upload_replaces_previous() {
    let site = Site::new();
    let first = site
        .api
        .upload(&request(EntityKind::People, "image/jpeg", "me.jpeg", Some("ada-lovelace")))
        .unwrap();
    assert_eq!(first, "/images/people/ada-lovelace.jpeg");

    let second = site
        .api
        .upload(&UploadRequest {
            bytes: b"newer",
            ..request(EntityKind::People, "image/jpeg", "other.jpeg", Some("ada-lovelace"))
        })
        .unwrap();
    assert_eq!(first, second);
    let on_disk = fs::read(site.asset_path(EntityKind::People, "ada-lovelace.jpeg")).unwrap();
    assert_eq!(on_disk, b"newer");
}

#[test]
fn test_unhinted_upload_is_timestamped() {
    let site = Site::new();
    let reference = site
        .api
        .upload(&request(EntityKind::Blogs, "image/webp", "C:\\Users\\me\\cover.webp", None))
        .unwrap();
    let name = reference.strip_prefix("/images/blogs/cover-").unwrap();
    let millis = name.strip_suffix(".webp").unwrap();
    assert!(millis.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_papers_have_no_upload_directory() {
    let site = Site::new();
    let err = site
        .api
        .upload(&request(EntityKind::Papers, "image/png", "fig.png", None))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(site.public_files().is_empty());
}

#[test]
fn test_hint_with_path_segments_rejected() {
    let site = Site::new();
    let err = site
        .api
        .upload(&request(EntityKind::People, "image/png", "x.png", Some("../escape")))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(site.public_files().is_empty());
}
