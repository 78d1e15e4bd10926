//! CLI integration tests for six-cities

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to escape path for TOML on Windows
fn escape_path_for_toml(path: &str) -> String {
    path.replace('\\', "\\\\")
}

/// Isolated config with a file token store inside a temp dir
fn setup_test_env(base_url: &str) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let token_path = temp_dir.path().join("token.json");

    let config_content = format!(
        r#"
[api]
base_url = "{}"
timeout_ms = 2000

[token]
backend = "file"
path = "{}"
"#,
        base_url,
        escape_path_for_toml(&token_path.to_string_lossy())
    );
    fs::write(&config_path, config_content).unwrap();

    (temp_dir, config_path.to_string_lossy().to_string())
}

fn cmd(config_path: &str) -> Command {
    let mut cmd = Command::cargo_bin("six-cities").unwrap();
    cmd.env("SIX_CITIES_CONFIG", config_path)
        .env_remove("SIX_CITIES_API_URL")
        .env_remove("SIX_CITIES_PASSWORD");
    cmd
}

fn offer_json(id: &str, city: &str, price: u32, is_favorite: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Canal View Prinsengracht {}", id),
        "type": "apartment",
        "price": price,
        "previewImage": "https://url-to-image/image.png",
        "city": {
            "name": city,
            "location": { "latitude": 52.374, "longitude": 4.88969, "zoom": 10 }
        },
        "location": { "latitude": 52.3609553943508, "longitude": 4.85309666406198, "zoom": 16 },
        "isFavorite": is_favorite,
        "isPremium": false,
        "rating": 4.2
    })
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("six-cities")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("offers"))
        .stdout(predicate::str::contains("favorites"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn test_unknown_city_rejected() {
    let (_temp_dir, config_path) = setup_test_env("http://127.0.0.1:9");

    cmd(&config_path)
        .args(["offers", "--city", "Berlin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown city"));
}

#[test]
fn test_short_review_fails_before_network() {
    // Port 9 is never contacted: validation runs first
    let (_temp_dir, config_path) = setup_test_env("http://127.0.0.1:9");

    cmd(&config_path)
        .args(["review", "1", "--rating", "5", "--comment", "Too short"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Review must be at least 50 characters"));
}

#[test]
fn test_weak_password_fails_before_network() {
    let (_temp_dir, config_path) = setup_test_env("http://127.0.0.1:9");

    cmd(&config_path)
        .args(["login", "--email", "Oliver.conner@gmail.com", "--password", "password"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "Password should contain at least 1 letter and digit",
        ));
}

#[test]
fn test_invalid_api_url_is_config_error() {
    let (_temp_dir, config_path) = setup_test_env("ftp://example.com");

    cmd(&config_path)
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must start with http:// or https://"));
}

#[tokio::test]
async fn test_offers_sorted_by_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/offers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            offer_json("1", "Amsterdam", 300, false),
            offer_json("2", "Amsterdam", 100, false),
            offer_json("3", "Amsterdam", 200, false),
            offer_json("4", "Paris", 50, false),
        ])))
        .mount(&server)
        .await;
    let (_temp_dir, config_path) = setup_test_env(&server.uri());

    let output = cmd(&config_path)
        .args(["offers", "--city", "Amsterdam", "--sort", "price-low", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let offers: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = offers.iter().map(|o| o["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["2", "3", "1"]);
}

#[tokio::test]
async fn test_favorites_grouped_by_city() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/offers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            offer_json("1", "Amsterdam", 300, true),
            offer_json("2", "Paris", 100, true),
            offer_json("3", "Hamburg", 200, false),
        ])))
        .mount(&server)
        .await;
    let (_temp_dir, config_path) = setup_test_env(&server.uri());

    cmd(&config_path)
        .arg("favorites")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)Paris.*Amsterdam").unwrap())
        .stdout(predicate::str::contains("Hamburg").not());
}

#[tokio::test]
async fn test_missing_offer_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/offers/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorType": "COMMON_ERROR",
            "message": "Offer with id nope not found."
        })))
        .mount(&server)
        .await;
    let (_temp_dir, config_path) = setup_test_env(&server.uri());

    cmd(&config_path)
        .args(["offer", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Offer not found"));
}

#[tokio::test]
async fn test_status_without_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let (_temp_dir, config_path) = setup_test_env(&server.uri());

    cmd(&config_path)
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NoAuth"));
}

#[tokio::test]
async fn test_login_writes_token_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "email": "Oliver.conner@gmail.com",
            "token": "T2xpdmVyLmNvbm5lckBnbWFpbC5jb20="
        })))
        .mount(&server)
        .await;
    let (temp_dir, config_path) = setup_test_env(&server.uri());

    cmd(&config_path)
        .args(["login", "--email", "Oliver.conner@gmail.com"])
        .env("SIX_CITIES_PASSWORD", "12345678a")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in Oliver.conner@gmail.com"));

    let stored = fs::read_to_string(temp_dir.path().join("token.json")).unwrap();
    assert!(stored.contains("T2xpdmVyLmNvbm5lckBnbWFpbC5jb20="));
}
