//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use conceptquiz_core::store::JsonFileStore;
use conceptquiz_core::traits::RelationStore;
use conceptquiz_core::{Concept, Relation};

/// Command isolated from the user's config and environment.
fn conceptquiz(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("conceptquiz").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("CONCEPTQUIZ_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, base_url: &str) {
    std::fs::write(
        dir.join("conceptquiz.toml"),
        format!("base_url = \"{base_url}\"\nresults_per_page = 2\n"),
    )
    .unwrap();
}

fn seed_store(dir: &Path, relations: &[Relation]) {
    let mut store = JsonFileStore::open(dir.join("conceptquiz-data/relations.json")).unwrap();
    store.save(relations).unwrap();
}

fn cat_is_an_animal() -> Relation {
    Relation::new(
        "IsA",
        "is a",
        Concept::new("cat", "en", "cat"),
        Concept::new("animal", "en", "animal"),
    )
}

fn edge(start: (&str, &str), end: (&str, &str)) -> serde_json::Value {
    serde_json::json!({
        "rel": {"@id": "/r/RelatedTo", "label": "related to"},
        "start": {"@id": format!("/c/{}/{}", start.0, start.1), "label": start.1, "language": start.0},
        "end": {"@id": format!("/c/{}/{}", end.0, end.1), "label": end.1, "language": end.0}
    })
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    conceptquiz(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ConceptNet guessing games"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    conceptquiz(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("conceptquiz"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    conceptquiz(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created conceptquiz.toml"));

    let content = std::fs::read_to_string(dir.path().join("conceptquiz.toml")).unwrap();
    assert!(content.contains("languages = [\"en\", \"fr\"]"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    conceptquiz(dir.path()).arg("init").assert().success();

    conceptquiz(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    conceptquiz(dir.path())
        .args(["saved", "--config", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn saved_with_empty_store() {
    let dir = TempDir::new().unwrap();
    conceptquiz(dir.path())
        .arg("saved")
        .assert()
        .success()
        .stdout(predicate::str::contains("No relations saved"));
}

#[test]
fn games_need_saved_relations() {
    let dir = TempDir::new().unwrap();
    for game in ["recall", "true-false", "guess-who"] {
        conceptquiz(dir.path())
            .arg(game)
            .assert()
            .failure()
            .stderr(predicate::str::contains("no relations saved"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn search_shows_and_saves_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), &server.uri());

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("node", "/c/en/cat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "edges": [edge(("en", "cat"), ("en", "pet")), edge(("en", "cat"), ("de", "katze"))]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("node", "/c/fr/cat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "edges": [edge(("fr", "cat"), ("fr", "animal")), edge(("fr", "cat"), ("en", "cat"))]
        })))
        .mount(&server)
        .await;

    conceptquiz(dir.path())
        .args(["search", "cat", "--pages", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1"))
        .stdout(predicate::str::contains("Page 2"))
        .stdout(predicate::str::contains("pet"))
        .stdout(predicate::str::contains("katze").not())
        .stdout(predicate::str::contains("3 relation(s) saved in total."));

    conceptquiz(dir.path())
        .args(["saved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 relation(s)"));

    // A second search is answered from the response cache.
    server.reset().await;
    conceptquiz(dir.path())
        .args(["search", "cat", "--no-save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pet"));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_interactive_navigation() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), &server.uri());

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "edges": [
                edge(("en", "cat"), ("en", "pet")),
                edge(("en", "cat"), ("en", "fur")),
                edge(("en", "cat"), ("en", "mouse"))
            ]
        })))
        .mount(&server)
        .await;

    conceptquiz(dir.path())
        .args(["search", "cat", "--interactive", "--no-save"])
        .write_stdin("n\np\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 2"))
        .stdout(predicate::str::contains("More pages available: previous"));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_reports_http_errors() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), &server.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    conceptquiz(dir.path())
        .args(["search", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("503"));
}

#[test]
fn recall_round() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path(), &[cat_is_an_animal()]);

    conceptquiz(dir.path())
        .arg("recall")
        .write_stdin("dog\nAnimal\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("cat is a ???"))
        .stdout(predicate::str::contains("That's not it."))
        .stdout(predicate::str::contains("You made 1 point(s)."));
}

#[test]
fn true_false_round() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path(), &[cat_is_an_animal()]);

    conceptquiz(dir.path())
        .arg("true-false")
        .write_stdin("perhaps\ntrue\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("cat is a ?"))
        .stdout(predicate::str::contains("Please answer true or false."));
}

#[test]
fn guess_who_round() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path(), &[cat_is_an_animal()]);

    conceptquiz(dir.path())
        .arg("guess-who")
        .write_stdin("cat\nanimal\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Good job!"))
        .stdout(predicate::str::contains("You made 7 point(s)."));
}
