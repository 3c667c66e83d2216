//! Integration tests for the `run` and `status` commands and their exit codes

use geobatch::cli::commands::run::RunArgs;
use geobatch::cli::commands::status::StatusArgs;
use geobatch::cli::commands::{EXIT_CONFIG_ERROR, EXIT_INTERRUPTED, EXIT_SUCCESS};
use mockito::Matcher;
use std::path::Path;
use tempfile::TempDir;
use tokio::sync::watch;

fn write_config(dir: &Path, server_url: &str) -> String {
    let input = dir.join("addresses.csv");
    std::fs::write(
        &input,
        "ADDRESS,STATE\n10 Elm St,MA\n20 Oak Ave,NY\n30 Pine Rd,VT\n",
    )
    .unwrap();

    let config_path = dir.join("geobatch.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[input]
path = "{input}"
postal_code_column = ""

[output]
base_path = "{output}/geocoded_"

[batch]
max_attempts = 0

[providers.arcgis]
base_url = "{server_url}"

[providers.komoot]
base_url = "{server_url}"
"#,
            input = input.display(),
            output = dir.display(),
        ),
    )
    .unwrap();

    config_path.to_string_lossy().to_string()
}

async fn found_everywhere(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", Matcher::Regex(r"^/findAddressCandidates".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"location":{"x":-71.0,"y":42.0}}]}"#)
        .create_async()
        .await
}

#[tokio::test]
async fn test_run_completes_and_status_suggests_next_index() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mock = found_everywhere(&mut server).await;
    let config_path = write_config(dir.path(), &server.url());

    let (_tx, rx) = watch::channel(false);
    let code = RunArgs::default().execute(&config_path, rx).await.unwrap();

    assert_eq!(code, EXIT_SUCCESS);
    let content = std::fs::read_to_string(dir.path().join("geocoded_2.csv")).unwrap();
    assert_eq!(content.lines().count(), 4);
    assert!(content.contains("\"10 Elm St, MA\",42,-71,arcgis"));

    let status = StatusArgs {
        output: None,
        latest: true,
    };
    assert_eq!(status.execute(&config_path).await.unwrap(), EXIT_SUCCESS);
}

#[tokio::test]
async fn test_cli_overrides_start_index_and_output() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mock = found_everywhere(&mut server).await;
    let config_path = write_config(dir.path(), &server.url());
    let output = format!("{}/override/", dir.path().display());

    let args = RunArgs {
        output: Some(output),
        start_index: Some(1),
        ..RunArgs::default()
    };
    let (_tx, rx) = watch::channel(false);
    assert_eq!(args.execute(&config_path, rx).await.unwrap(), EXIT_SUCCESS);

    let content = std::fs::read_to_string(dir.path().join("override/2.csv")).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[tokio::test]
async fn test_start_index_past_end_exits_with_config_error() {
    let dir = TempDir::new().unwrap();
    let server = mockito::Server::new_async().await;
    let config_path = write_config(dir.path(), &server.url());

    let args = RunArgs {
        start_index: Some(3),
        ..RunArgs::default()
    };
    let (_tx, rx) = watch::channel(false);
    assert_eq!(args.execute(&config_path, rx).await.unwrap(), EXIT_CONFIG_ERROR);
}

#[tokio::test]
async fn test_missing_input_column_exits_with_config_error() {
    let dir = TempDir::new().unwrap();
    let server = mockito::Server::new_async().await;
    let config_path = write_config(dir.path(), &server.url());
    std::fs::write(dir.path().join("addresses.csv"), "STREET,STATE\n1 A St,MA\n").unwrap();

    let (_tx, rx) = watch::channel(false);
    let code = RunArgs::default().execute(&config_path, rx).await.unwrap();
    assert_eq!(code, EXIT_CONFIG_ERROR);
}

#[tokio::test]
async fn test_shutdown_before_first_address_exits_interrupted() {
    let dir = TempDir::new().unwrap();
    let server = mockito::Server::new_async().await;
    let config_path = write_config(dir.path(), &server.url());

    let (_tx, rx) = watch::channel(true);
    let code = RunArgs::default().execute(&config_path, rx).await.unwrap();

    assert_eq!(code, EXIT_INTERRUPTED);
    assert!(!dir.path().join("geocoded_0.csv").exists());
}
