//! End-to-end command tests against a mock backend

use profile_cli::config::BackendSettings;
use profile_cli::{run, AppConfig, CliError, Command, Credentials};
use profile_core::ProfileError;
use profile_ui::UiSettings;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        backend: BackendSettings {
            url: server.uri(),
            api_key: "anon-key".to_string(),
            ..Default::default()
        },
        ui: UiSettings::default(),
    }
}

fn credentials() -> Credentials {
    Credentials {
        email: "u1@example.com".to_string(),
        password: "secret".to_string(),
    }
}

async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "user-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-token",
            "user": { "id": "u1", "email": "u1@example.com" }
        })))
        .mount(server)
        .await;
}

async fn mount_profile(server: &MockServer, avatar_url: Option<&str>) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "full_name": "Ada Lovelace",
            "username": "ada",
            "website": null,
            "avatar_url": avatar_url
        })))
        .mount(server)
        .await;
}

async fn run_command(server: &MockServer, command: Command) -> (Result<(), CliError>, String) {
    let mut out = Vec::new();
    let result = run(command, &config_for(server), &credentials(), &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_show_prints_profile() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, Some("u1-0.5.png")).await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/object/avatars/u1-0.5.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"png-bytes".to_vec()),
        )
        .mount(&server)
        .await;

    let (result, out) = run_command(&server, Command::Show { json: false }).await;

    result.unwrap();
    assert!(out.contains("Email:     u1@example.com"), "{out}");
    assert!(out.contains("Full name: Ada Lovelace"), "{out}");
    assert!(out.contains("Website:   -"), "{out}");
    assert!(out.contains("u1-0.5.png (9 bytes, image/png)"), "{out}");
}

#[tokio::test]
async fn test_show_json() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, None).await;

    let (result, out) = run_command(&server, Command::Show { json: true }).await;

    result.unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["username"], "ada");
    assert_eq!(json["email"], "u1@example.com");
}

#[tokio::test]
async fn test_update_submits_once() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, None).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .and(body_partial_json(serde_json::json!({
            "id": "u1",
            "full_name": "Ada Lovelace",
            "username": "countess",
            "website": "https://example.com"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (result, out) = run_command(
        &server,
        Command::Update {
            full_name: None,
            username: Some("countess".to_string()),
            website: Some("https://example.com".to_string()),
        },
    )
    .await;

    result.unwrap();
    assert!(out.contains("[ok] Profile updated!"), "{out}");
}

#[tokio::test]
async fn test_upload_avatar_stores_file_and_saves_profile() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, None).await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/avatars/u1-0\.[0-9]+\.png$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "avatars/u1.png"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/storage/v1/object/avatars/u1-.*\.png$"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"png-bytes".to_vec()),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .and(body_partial_json(serde_json::json!({ "username": "ada" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("photo.png");
    std::fs::write(&file, b"png-bytes").unwrap();

    let (result, out) = run_command(&server, Command::UploadAvatar { file }).await;

    result.unwrap();
    assert!(out.contains("[ok] Avatar uploaded successfully!"), "{out}");
    assert!(out.contains("[ok] Profile updated!"), "{out}");
    assert!(out.contains("Avatar stored at u1-"), "{out}");
}

#[tokio::test]
async fn test_download_avatar_writes_file() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, Some("u1-0.5.jpg")).await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/object/avatars/u1-0.5.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(b"jpeg-bytes".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("avatar.jpg");

    let (result, out) = run_command(&server, Command::DownloadAvatar { dest: dest.clone() }).await;

    result.unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"jpeg-bytes");
    assert!(out.contains("10 bytes, image/jpeg"), "{out}");
}

#[tokio::test]
async fn test_download_without_avatar() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    mount_profile(&server, None).await;

    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run_command(
        &server,
        Command::DownloadAvatar {
            dest: dir.path().join("avatar.png"),
        },
    )
    .await;

    assert!(matches!(result, Err(CliError::NoAvatar)));
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let (result, out) = run_command(&server, Command::Show { json: false }).await;

    assert!(matches!(result, Err(CliError::Profile(ProfileError::Auth(_)))));
    assert!(out.contains("[error] Invalid login credentials"), "{out}");
}

#[tokio::test]
async fn test_load_failure_is_reported() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (result, out) = run_command(&server, Command::Show { json: false }).await;

    assert!(matches!(result, Err(CliError::Profile(ProfileError::Fetch(_)))));
    assert!(out.contains("[error] Error loading user data!"), "{out}");
}

#[tokio::test]
async fn test_sign_out() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (result, out) = run_command(&server, Command::SignOut).await;

    result.unwrap();
    assert!(out.contains("Signed out"), "{out}");
}
