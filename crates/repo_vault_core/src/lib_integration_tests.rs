//! Integration tests exercising the full backup pipeline against a mock
//! GitHub API, a real temporary directory tree and a recording git runner.

use super::*;
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct RecordingGitRunner {
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl RecordingGitRunner {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitRunner for RecordingGitRunner {
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<bool, Error> {
        self.calls.lock().unwrap().push((
            cwd.to_path_buf(),
            args.iter().map(|s| s.to_string()).collect(),
        ));
        Ok(true)
    }
}

/// Writes a configuration file pointing at `directory` and loads it.
fn config_for(dir: &Path, directory: &Path) -> BackupConfig {
    let config_path = dir.join("config.json");
    std::fs::write(
        &config_path,
        json!({ "token": "T", "directory": directory.to_str().unwrap() }).to_string(),
    )
    .unwrap();
    BackupConfig::load(&config_path).unwrap()
}

async fn mock_current_user(server: &MockServer, login: &str) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": login })))
        .mount(server)
        .await;
}

fn repo_json(name: &str, owner: &str) -> serde_json::Value {
    json!({
        "name": name,
        "owner": { "login": owner },
        "clone_url": format!("https://github.com/{owner}/{name}.git")
    })
}

#[tokio::test]
async fn test_full_backup_run_clones_one_repository() {
    let mock_server = MockServer::start().await;
    mock_current_user(&mock_server, "alice").await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("proj", "alice")])))
        .mount(&mock_server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let root = workdir.path().join("bk");
    let config = config_for(workdir.path(), &root);
    let client = github_client::create_token_client_with_base_uri(
        config.token(),
        &mock_server.uri(),
    )
    .unwrap();
    let runner = RecordingGitRunner::new();

    let summary = run_backup(&config, &client, &runner).await.unwrap();

    assert_eq!(summary.cloned, 1);
    assert_eq!(summary.updated, 0);
    assert!(summary.failures.is_empty());

    // The directory tree exists.
    let owner_path = root.join("alice");
    assert!(root.is_dir());
    assert!(owner_path.is_dir());
    assert!(owner_path.join("proj.git").is_dir());

    // The clone used the credentialed URL in the owner directory, and the
    // stored remote was reset to the clean URL afterward.
    let calls = runner.calls();
    assert_eq!(
        calls[0],
        (
            owner_path.clone(),
            vec![
                "clone".to_string(),
                "--mirror".to_string(),
                "https://alice:T@github.com/alice/proj.git".to_string(),
                "proj.git".to_string(),
            ]
        )
    );
    let last = calls.last().unwrap();
    assert_eq!(last.0, owner_path.join("proj.git"));
    assert_eq!(
        last.1,
        vec![
            "remote".to_string(),
            "set-url".to_string(),
            "origin".to_string(),
            "https://github.com/alice/proj.git".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_second_run_is_an_incremental_update() {
    let mock_server = MockServer::start().await;
    mock_current_user(&mock_server, "alice").await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("proj", "alice")])))
        .mount(&mock_server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let root = workdir.path().join("bk");
    let config = config_for(workdir.path(), &root);
    let client = github_client::create_token_client_with_base_uri(
        config.token(),
        &mock_server.uri(),
    )
    .unwrap();
    let runner = RecordingGitRunner::new();

    let first = run_backup(&config, &client, &runner).await.unwrap();
    assert_eq!(first.cloned, 1);

    let second = run_backup(&config, &client, &runner).await.unwrap();
    assert_eq!(second.cloned, 0);
    assert_eq!(second.updated, 1);

    let calls = runner.calls();
    let update_calls: Vec<&Vec<String>> = calls
        .iter()
        .map(|(_, args)| args)
        .filter(|args| args[0] == "remote" && args[1] == "update")
        .collect();
    assert_eq!(update_calls.len(), 1);
    assert_eq!(*update_calls[0], vec!["remote", "update", "--prune"]);
}

#[tokio::test]
async fn test_malicious_repository_name_is_isolated() {
    let mock_server = MockServer::start().await;
    mock_current_user(&mock_server, "alice").await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json("../../etc", "alice"),
            repo_json("proj", "alice"),
        ])))
        .mount(&mock_server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let root = workdir.path().join("bk");
    let config = config_for(workdir.path(), &root);
    let client = github_client::create_token_client_with_base_uri(
        config.token(),
        &mock_server.uri(),
    )
    .unwrap();
    let runner = RecordingGitRunner::new();

    let summary = run_backup(&config, &client, &runner).await.unwrap();

    // The malicious entry is surfaced, the good one still mirrored.
    assert_eq!(summary.cloned, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].repository, "alice/../../etc");

    // No filesystem access escaped the owner directory: the backup root
    // contains exactly the one validated owner.
    let entries: Vec<String> = std::fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["alice".to_string()]);
    assert!(!workdir.path().join("etc").exists());
}

#[tokio::test]
async fn test_listing_spans_multiple_pages() {
    let mock_server = MockServer::start().await;
    mock_current_user(&mock_server, "alice").await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([repo_json("beta", "acme")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(
                        "<{}/user/repos?per_page=100&page=2>; rel=\"next\"",
                        mock_server.uri()
                    )
                    .as_str(),
                )
                .set_body_json(json!([repo_json("alpha", "alice")])),
        )
        .mount(&mock_server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let root = workdir.path().join("bk");
    let config = config_for(workdir.path(), &root);
    let client = github_client::create_token_client_with_base_uri(
        config.token(),
        &mock_server.uri(),
    )
    .unwrap();
    let runner = RecordingGitRunner::new();

    let summary = run_backup(&config, &client, &runner).await.unwrap();

    assert_eq!(summary.cloned, 2);
    assert!(root.join("alice").join("alpha.git").is_dir());
    assert!(root.join("acme").join("beta.git").is_dir());
}

#[tokio::test]
async fn test_listing_failure_aborts_the_run() {
    let mock_server = MockServer::start().await;
    mock_current_user(&mock_server, "alice").await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Server Error"
        })))
        .mount(&mock_server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let root = workdir.path().join("bk");
    let config = config_for(workdir.path(), &root);
    let client = github_client::create_token_client_with_base_uri(
        config.token(),
        &mock_server.uri(),
    )
    .unwrap();
    let runner = RecordingGitRunner::new();

    let error = run_backup(&config, &client, &runner).await.unwrap_err();
    assert!(matches!(
        error,
        Error::GitHub(github_client::Error::RequestFailed { status: 500, .. })
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_identity_failure_aborts_the_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials"
        })))
        .mount(&mock_server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    let root = workdir.path().join("bk");
    let config = config_for(workdir.path(), &root);
    let client = github_client::create_token_client_with_base_uri(
        config.token(),
        &mock_server.uri(),
    )
    .unwrap();
    let runner = RecordingGitRunner::new();

    let error = run_backup(&config, &client, &runner).await.unwrap_err();
    assert!(matches!(
        error,
        Error::GitHub(github_client::Error::RequestFailed { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_unusable_backup_root_aborts_the_run() {
    let mock_server = MockServer::start().await;
    mock_current_user(&mock_server, "alice").await;

    let workdir = tempfile::tempdir().unwrap();
    let root = workdir.path().join("bk");
    // A regular file where the backup root should be.
    std::fs::write(&root, b"in the way").unwrap();

    let config = config_for(workdir.path(), &root);
    let client = github_client::create_token_client_with_base_uri(
        config.token(),
        &mock_server.uri(),
    )
    .unwrap();
    let runner = RecordingGitRunner::new();

    let error = run_backup(&config, &client, &runner).await.unwrap_err();
    assert!(matches!(error, Error::Filesystem { .. }));
    assert!(runner.calls().is_empty());
}
