//! End-to-end dispatcher tests against a mocked repository store.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use patchbay_github::{Committer, GithubClient};
use patchbay_tools::{ToolError, execute};
use patchbay_types::RepoContext;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> GithubClient {
    GithubClient::new(
        "test-token",
        Committer {
            name: "Patchbay".to_string(),
            email: "patchbay@example.com".to_string(),
        },
    )
    .with_api_base(server.uri())
}

fn context() -> RepoContext {
    RepoContext::new("acme/site", "chat-20250101-120000")
}

async fn mount_file(server: &MockServer, file_path: &str, content: &str, sha: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/acme/site/contents/{file_path}")))
        .and(query_param("ref", "chat-20250101-120000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": BASE64.encode(content),
            "sha": sha,
            "path": file_path,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn edit_file_replace_all_rewrites_every_occurrence() {
    let server = MockServer::start().await;
    mount_file(
        &server,
        "a.css",
        "h1 { color: #fff; } p { color: #fff; } a { color: #fff; }",
        "sha-old",
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/a.css"))
        .and(body_partial_json(json!({
            "content": BASE64.encode(
                "h1 { color: #000; } p { color: #000; } a { color: #000; }"
            ),
            "sha": "sha-old",
            "message": "Edit a.css",
            "branch": "chat-20250101-120000",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commit": {"sha": "commit-1"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = execute(
        "edit_file",
        &json!({
            "file_path": "a.css",
            "old_text": "#fff",
            "new_text": "#000",
            "replace_all": true,
        }),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap();

    assert!(report.success());
    let body = report.to_json();
    assert_eq!(body["success"], true);
    assert_eq!(body["replaced"], "all 3 occurrences");
    assert_eq!(body["commit"], "commit-1");
}

#[tokio::test]
async fn edit_file_default_replaces_only_first_occurrence() {
    let server = MockServer::start().await;
    mount_file(&server, "a.css", "#fff #fff", "sha-old").await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/a.css"))
        .and(body_partial_json(json!({
            "content": BASE64.encode("#000 #fff"),
            "message": "Darken first heading",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commit": {"sha": "commit-2"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = execute(
        "edit_file",
        &json!({
            "file_path": "a.css",
            "old_text": "#fff",
            "new_text": "#000",
            "commit_message": "Darken first heading",
        }),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap();
    assert_eq!(report.to_json()["replaced"], "1 occurrence");
}

#[tokio::test]
async fn edit_file_missing_text_makes_no_write() {
    let server = MockServer::start().await;
    mount_file(&server, "a.css", "body { margin: 0; }", "sha-old").await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = execute(
        "edit_file",
        &json!({
            "file_path": "a.css",
            "old_text": "#fff",
            "new_text": "#000",
        }),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap();

    assert!(!report.success());
    assert_eq!(report.to_json()["error"], "text not found");
}

#[tokio::test]
async fn edit_file_on_missing_path_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/contents/gone.css"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let err = execute(
        "edit_file",
        &json!({"file_path": "gone.css", "old_text": "a", "new_text": "b"}),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ToolError::Gateway(patchbay_github::GatewayError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn write_file_creates_when_path_is_new() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/contents/new.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/new.txt"))
        .and(body_partial_json(json!({
            "content": BASE64.encode("hello"),
            "message": "Add greeting",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "commit": {"sha": "commit-3"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = execute(
        "write_file",
        &json!({
            "file_path": "new.txt",
            "content": "hello",
            "commit_message": "Add greeting",
        }),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap();

    let body = report.to_json();
    assert_eq!(body["created"], true);
    assert_eq!(body["commit"], "commit-3");
}

#[tokio::test]
async fn write_file_updates_with_current_revision_token() {
    let server = MockServer::start().await;
    mount_file(&server, "index.html", "<old/>", "sha-cur").await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/index.html"))
        .and(body_partial_json(json!({
            "sha": "sha-cur",
            "content": BASE64.encode("<new/>"),
            "message": "Update index.html",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commit": {"sha": "commit-4"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = execute(
        "write_file",
        &json!({"file_path": "index.html", "content": "<new/>"}),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap();
    assert_eq!(report.to_json()["created"], false);
}

#[tokio::test]
async fn read_file_returns_decoded_content() {
    let server = MockServer::start().await;
    mount_file(&server, "README.md", "# Site\n", "sha-r").await;

    let report = execute(
        "read_file",
        &json!({"file_path": "README.md"}),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap();
    assert_eq!(report.to_json()["content"], "# Site\n");
}

#[tokio::test]
async fn list_files_returns_flat_blob_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/git/trees/chat-20250101-120000"))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tree": [
                {"path": "css", "type": "tree", "sha": "t"},
                {"path": "css/a.css", "type": "blob", "sha": "b1", "size": 3},
                {"path": "index.html", "type": "blob", "sha": "b2", "size": 9},
            ],
        })))
        .mount(&server)
        .await;

    let report = execute("list_files", &json!({}), &context(), &gateway(&server))
        .await
        .unwrap();
    assert_eq!(
        report.to_json()["files"],
        json!(["css/a.css", "index.html"])
    );
}

#[tokio::test]
async fn unknown_tool_is_rejected_before_any_remote_call() {
    let server = MockServer::start().await;
    let err = execute("drop_table", &json!({}), &context(), &gateway(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::UnknownTool(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_arguments_are_rejected_before_any_remote_call() {
    let server = MockServer::start().await;
    let err = execute(
        "edit_file",
        &json!({"file_path": "a.css"}),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn stale_revision_token_surfaces_write_conflict() {
    let server = MockServer::start().await;
    mount_file(&server, "a.css", "#fff", "sha-stale").await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/a.css"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "a.css does not match",
        })))
        .mount(&server)
        .await;

    let err = execute(
        "edit_file",
        &json!({"file_path": "a.css", "old_text": "#fff", "new_text": "#000"}),
        &context(),
        &gateway(&server),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ToolError::Gateway(patchbay_github::GatewayError::WriteConflict { .. })
    ));
}
