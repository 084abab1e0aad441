//! Profile form integration tests
//!
//! Drive `ProfileForm` against in-memory stores and check the requests it
//! issues, the fields it holds and the notifications it shows.


use profile_core::{AvatarPath, ProfileError, ProfileFields};
use profile_ui::{Notification, ProfileForm, Severity, UiSettings};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use test_helpers::*;

fn stored_fields() -> ProfileFields {
    ProfileFields {
        full_name: Some("Ada Lovelace".into()),
        username: Some("ada".into()),
        website: Some("https://example.com".into()),
        avatar_url: Some(AvatarPath::new("u1-0.5.png")),
    }
}

// ===== Load =====

#[tokio::test]
async fn test_load_absent_record_leaves_fields_empty() {
    let profiles = Arc::new(FakeProfileStore::default());
    let objects = Arc::new(FakeObjectStore::default());
    let form = form_with(profiles.clone(), objects.clone(), Arc::default());

    let fields = form.load().await.unwrap();

    assert!(fields.is_empty());
    assert!(form.fields().is_empty());
    assert!(!form.is_loading());
    assert!(form.notifications().current().is_none());
    assert_eq!(profiles.fetch_calls(), 1);
    assert_eq!(objects.download_calls(), 0);

    let view = form.view();
    assert_eq!(view.full_name, "");
    assert_eq!(view.email.as_deref(), Some("u1@example.com"));
    assert!(view.avatar.image.is_none());
}

#[tokio::test]
async fn test_load_fills_fields_and_resolves_avatar() {
    let profiles = Arc::new(FakeProfileStore::with_row("u1", stored_fields()));
    let objects = Arc::new(FakeObjectStore::with_object(
        "u1-0.5.png",
        b"png-bytes",
        "image/png",
    ));
    let form = form_with(profiles, objects.clone(), Arc::default());

    form.load().await.unwrap();

    assert_eq!(form.fields(), stored_fields());
    let view = form.view();
    assert_eq!(view.username, "ada");
    assert_eq!(view.submit_label, "Update");
    assert!(view.submit_enabled);

    let image = view.avatar.image.expect("avatar should be resolved");
    assert_eq!(image.data, b"png-bytes");
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(objects.download_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_load_failure_shows_error_for_three_seconds() {
    let profiles = Arc::new(FakeProfileStore::with_row("u1", stored_fields()));
    profiles.fail_fetch.store(true, Ordering::SeqCst);
    let form = form_with(profiles, Arc::default(), Arc::default());

    let err = form.load().await.unwrap_err();

    assert!(matches!(err, ProfileError::Fetch(_)));
    assert!(form.fields().is_empty());
    assert!(!form.is_loading());
    assert_eq!(
        form.notifications().current(),
        Some(Notification::error("Error loading user data!"))
    );

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert!(form.notifications().current().is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(form.notifications().current().is_none());
}

#[tokio::test]
async fn test_avatar_download_failure_keeps_placeholder_quietly() {
    let profiles = Arc::new(FakeProfileStore::with_row("u1", stored_fields()));
    let objects = Arc::new(FakeObjectStore::default());
    objects.fail_download.store(true, Ordering::SeqCst);
    let form = form_with(profiles, objects.clone(), Arc::default());

    // Load itself succeeds
    form.load().await.unwrap();

    assert_eq!(objects.download_calls(), 1);
    assert!(form.view().avatar.image.is_none());
    assert!(form.avatar().notifications().current().is_none());
    assert!(form.notifications().current().is_none());
}

#[tokio::test]
async fn test_avatar_download_failure_surfaced_when_enabled() {
    let profiles = Arc::new(FakeProfileStore::with_row("u1", stored_fields()));
    let objects = Arc::new(FakeObjectStore::default());
    objects.fail_download.store(true, Ordering::SeqCst);

    let settings = UiSettings {
        surface_download_errors: true,
        ..Default::default()
    };
    let form = ProfileForm::new(
        session_for("u1"),
        profiles,
        objects,
        Arc::new(FakeAuthenticator::default()),
        settings,
    );

    form.load().await.unwrap();

    let toast = form.avatar().notifications().current().unwrap();
    assert_eq!(toast.severity, Severity::Error);
}

// ===== Edit and submit =====

#[tokio::test(start_paused = true)]
async fn test_submit_writes_session_user_row() {
    let profiles = Arc::new(FakeProfileStore::default());
    let form = form_with(profiles.clone(), Arc::default(), Arc::default());
    form.load().await.unwrap();

    form.set_full_name("Ada Lovelace");
    form.set_username("ada");
    form.set_website("https://example.com");
    let record = form.submit().await.unwrap();

    assert_eq!(record.id.as_str(), "u1");
    assert_eq!(record.username.as_deref(), Some("ada"));
    assert!(record.avatar_url.is_none());
    assert!(!form.is_loading());

    let upserts = profiles.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0], record);
    assert_eq!(profiles.row("u1").unwrap().full_name.as_deref(), Some("Ada Lovelace"));

    assert_eq!(
        form.notifications().current(),
        Some(Notification::success("Profile updated!"))
    );
    tokio::time::sleep(Duration::from_millis(4001)).await;
    assert!(form.notifications().current().is_none());
}

#[tokio::test]
async fn test_submit_failure_shows_error() {
    let profiles = Arc::new(FakeProfileStore::default());
    profiles.fail_upsert.store(true, Ordering::SeqCst);
    let form = form_with(profiles, Arc::default(), Arc::default());

    form.set_username("ada");
    let err = form.submit().await.unwrap_err();

    assert!(matches!(err, ProfileError::Upsert(_)));
    assert!(!form.is_loading());
    assert_eq!(
        form.notifications().current(),
        Some(Notification::error("Error updating the data!"))
    );
    // Local edits survive a failed write
    assert_eq!(form.fields().username.as_deref(), Some("ada"));
}

#[tokio::test]
async fn test_empty_input_clears_field() {
    let profiles = Arc::new(FakeProfileStore::with_row("u1", stored_fields()));
    let form = form_with(profiles.clone(), Arc::default(), Arc::default());
    form.load().await.unwrap();

    form.set_website("");
    let record = form.submit().await.unwrap();

    assert!(record.website.is_none());
    assert_eq!(record.username.as_deref(), Some("ada"));
    assert_eq!(form.view().website, "");
}

#[tokio::test]
async fn test_submit_rejected_while_pending() {
    let profiles = Arc::new(FakeProfileStore::gated());
    let form = Arc::new(form_with(profiles.clone(), Arc::default(), Arc::default()));

    let first = tokio::spawn({
        let form = form.clone();
        async move { form.submit().await }
    });
    while profiles.upserts().is_empty() {
        tokio::task::yield_now().await;
    }

    assert!(form.is_loading());
    let view = form.view();
    assert_eq!(view.submit_label, "Loading ...");
    assert!(!view.submit_enabled);

    let second = form.submit().await;
    assert_eq!(second.unwrap_err(), ProfileError::Busy("Profile update"));

    profiles.release_upsert();
    first.await.unwrap().unwrap();

    assert_eq!(profiles.upserts().len(), 1);
    assert!(!form.is_loading());
}

// ===== Avatar upload =====

#[tokio::test(start_paused = true)]
async fn test_upload_avatar_scenario() {
    let profiles = Arc::new(FakeProfileStore::default());
    let objects = Arc::new(FakeObjectStore::default());
    let form = form_with(profiles.clone(), objects.clone(), Arc::default());
    form.load().await.unwrap();
    form.set_username("ada");

    let record = form.upload_avatar(&[png("photo.png")]).await.unwrap();

    // Exactly one object and one row write, both with the new path
    let paths = objects.paths();
    assert_eq!(paths.len(), 1);
    let path = paths[0].as_str();
    assert!(path.starts_with("u1-"), "unexpected path {path}");
    assert!(path.ends_with(".png"), "unexpected path {path}");

    let upserts = profiles.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].avatar_url.as_ref(), Some(&paths[0]));
    assert_eq!(upserts[0].username.as_deref(), Some("ada"));
    assert_eq!(record.avatar_url.as_ref(), Some(&paths[0]));
    assert_eq!(form.fields().avatar_url.as_ref(), Some(&paths[0]));

    // The new image is displayed
    let view = form.view();
    assert_eq!(view.avatar.image.unwrap().mime_type, "image/png");
    assert_eq!(view.avatar.button_label, "Upload");

    assert_eq!(
        form.avatar().notifications().current(),
        Some(Notification::success("Avatar uploaded successfully!"))
    );
    assert_eq!(
        form.notifications().current(),
        Some(Notification::success("Profile updated!"))
    );

    // Upload toast is shorter than the update toast
    tokio::time::sleep(Duration::from_millis(2001)).await;
    assert!(form.avatar().notifications().current().is_none());
    assert!(form.notifications().current().is_some());
}

#[tokio::test]
async fn test_upload_avatar_waits_for_pending_submit() {
    let profiles = Arc::new(FakeProfileStore::gated());
    let objects = Arc::new(FakeObjectStore::default());
    let form = form_with(profiles.clone(), objects.clone(), Arc::default());
    form.set_username("ada");

    let release = async {
        // First upsert is the manual save; the upload lands while it is pending
        while profiles.upserts().is_empty() || objects.paths().is_empty() {
            tokio::task::yield_now().await;
        }
        profiles.release_upsert();
        while profiles.upserts().len() < 2 {
            tokio::task::yield_now().await;
        }
        profiles.release_upsert();
    };
    let files = [png("photo.png")];
    let (manual, uploaded, ()) = tokio::join!(
        form.submit(),
        form.upload_avatar(&files),
        release
    );

    manual.unwrap();
    let record = uploaded.unwrap();
    let path = objects.paths()[0].clone();

    let upserts = profiles.upserts();
    assert_eq!(upserts.len(), 2);
    assert_eq!(upserts[0].avatar_url, None);
    assert_eq!(upserts[1].avatar_url.as_ref(), Some(&path));
    assert_eq!(upserts[1].username.as_deref(), Some("ada"));
    assert_eq!(record.avatar_url.as_ref(), Some(&path));
    assert_eq!(profiles.row("u1").unwrap().avatar_url, Some(path));
    assert!(!form.is_loading());
}

#[tokio::test]
async fn test_upload_avatar_during_load_keeps_new_path() {
    let profiles = Arc::new(FakeProfileStore::with_row("u1", stored_fields()).with_gated_fetch());
    let objects = Arc::new(FakeObjectStore::with_object(
        "u1-0.5.png",
        &[0x89, b'P', b'N', b'G'],
        "image/png",
    ));
    let form = form_with(profiles.clone(), objects.clone(), Arc::default());

    let release = async {
        while profiles.fetch_calls() == 0 || objects.paths().len() < 2 {
            tokio::task::yield_now().await;
        }
        profiles.release_fetch();
    };
    let files = [png("photo.png")];
    let (loaded, uploaded, ()) = tokio::join!(
        form.load(),
        form.upload_avatar(&files),
        release
    );

    loaded.unwrap();
    let record = uploaded.unwrap();
    let new_path = record.avatar_url.clone().unwrap();
    assert_ne!(new_path.as_str(), "u1-0.5.png");

    // The row write comes after the load and carries the loaded fields too
    let upserts = profiles.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].avatar_url.as_ref(), Some(&new_path));
    assert_eq!(upserts[0].username.as_deref(), Some("ada"));
    assert_eq!(form.fields().avatar_url, Some(new_path));
}

#[tokio::test]
async fn test_upload_without_file_is_rejected_locally() {
    let profiles = Arc::new(FakeProfileStore::default());
    let objects = Arc::new(FakeObjectStore::default());
    let form = form_with(profiles.clone(), objects.clone(), Arc::default());

    let err = form.upload_avatar(&[]).await.unwrap_err();

    assert_eq!(
        err,
        ProfileError::validation("You must select an image to upload.")
    );
    assert_eq!(objects.upload_calls(), 0);
    assert!(profiles.upserts().is_empty());
    assert_eq!(
        form.avatar().notifications().current(),
        Some(Notification::error("You must select an image to upload."))
    );
}

#[tokio::test]
async fn test_upload_failure_does_not_touch_profile() {
    let profiles = Arc::new(FakeProfileStore::default());
    let objects = Arc::new(FakeObjectStore::default());
    objects.fail_upload.store(true, Ordering::SeqCst);
    let form = form_with(profiles.clone(), objects.clone(), Arc::default());

    let err = form.upload_avatar(&[png("photo.png")]).await.unwrap_err();

    assert!(matches!(err, ProfileError::Upload(_)));
    assert_eq!(objects.upload_calls(), 1);
    assert!(profiles.upserts().is_empty());
    assert!(form.fields().avatar_url.is_none());
    assert_eq!(
        form.avatar().notifications().current(),
        Some(Notification::error("Error uploading avatar!"))
    );
}

#[tokio::test]
async fn test_consecutive_uploads_use_distinct_paths() {
    let profiles = Arc::new(FakeProfileStore::default());
    let objects = Arc::new(FakeObjectStore::default());
    let form = form_with(profiles.clone(), objects.clone(), Arc::default());

    let first = form.upload_avatar(&[png("a.png")]).await.unwrap();
    let second = form.upload_avatar(&[png("b.png")]).await.unwrap();

    assert_ne!(first.avatar_url, second.avatar_url);
    assert_eq!(objects.paths().len(), 2);
    // The row holds the latest reference only
    assert_eq!(profiles.row("u1").unwrap().avatar_url, second.avatar_url);
}

// ===== Sign out =====

#[tokio::test]
async fn test_sign_out() {
    let auth = Arc::new(FakeAuthenticator::default());
    let form = form_with(Arc::default(), Arc::default(), auth.clone());

    form.sign_out().await.unwrap();

    assert_eq!(auth.sign_out_calls(), 1);
    assert!(form.notifications().current().is_none());
}

#[tokio::test]
async fn test_sign_out_failure_shows_error() {
    let auth = Arc::new(FakeAuthenticator::default());
    auth.fail_sign_out.store(true, Ordering::SeqCst);
    let form = form_with(Arc::default(), Arc::default(), auth);

    let err = form.sign_out().await.unwrap_err();

    assert!(matches!(err, ProfileError::Auth(_)));
    let toast = form.view().toast.unwrap();
    assert_eq!(toast.style_class, "bg-red-500");
}

#[tokio::test]
async fn test_fields_json_includes_email() {
    let profiles = Arc::new(FakeProfileStore::with_row("u1", stored_fields()));
    let form = form_with(profiles, Arc::default(), Arc::default());
    form.load().await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&form.fields_json().unwrap()).unwrap();
    assert_eq!(json["email"], "u1@example.com");
    assert_eq!(json["username"], "ada");
    assert_eq!(json["avatar_url"], "u1-0.5.png");
}
