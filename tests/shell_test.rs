//! Tests for the interactive shell and the JSON-lines server.

use std::sync::Arc;

use tempfile::TempDir;

use cardtree::cli::shell::{serve, Shell};
use cardtree::config::{SeedMode, Settings};
use cardtree::infrastructure::di::ServiceContainer;
use cardtree::infrastructure::traits::RealFileSystem;
use cardtree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn container(seed: SeedMode) -> ServiceContainer {
    let settings = Settings {
        seed,
        ..Settings::default()
    };
    ServiceContainer::with_deps(settings, Arc::new(RealFileSystem)).unwrap()
}

fn run_shell(container: &ServiceContainer, script: &str) -> String {
    let mut output = Vec::new();
    Shell::new(container, script.as_bytes(), &mut output)
        .run()
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn given_session_when_adding_nodes_then_later_commands_see_them() {
    let container = container(SeedMode::Empty);

    let output = run_shell(&container, "add root directory Sprachen\nadd root cards Vokabeln\nls\nquit\n");

    assert_eq!(output.matches("added ").count(), 2);
    assert!(output.contains("Sprachen/"));
    assert!(output.contains("Vokabeln (0 cards)"));
    assert_eq!(container.store.get_all().children.len(), 2);
}

#[test]
fn given_invalid_name_when_adding_then_reports_field_and_keeps_tree() {
    let container = container(SeedMode::Empty);

    let output = run_shell(&container, "add root cards bad/name!\n");

    assert!(output.contains(
        "error: name: Name must only include letters, numbers, dashes, underscores, and parentheses."
    ));
    assert!(container.store.get_all().children.is_empty());
}

#[test]
fn given_root_when_removing_then_refuses() {
    let container = container(SeedMode::Sample);

    let output = run_shell(&container, "rm root\n");

    assert!(output.contains("error: Cannot remove root directory!"));
    assert_eq!(container.store.node_count(), 12);
}

#[test]
fn given_deck_id_when_studying_then_shows_cards() {
    let container = container(SeedMode::Sample);
    let kochen = container.store.get_all().children[1].id();

    let output = run_shell(&container, &format!("study {kochen}\nf\nq\nquit\n"));

    assert!(output.contains("== Kochen (1 cards) =="));
    assert!(output.contains("Wo kocht man Wasser?"));
    assert!(output.contains("Am Herd! Wo denn sonst?"));
}

#[test]
fn given_directory_id_when_studying_then_reports_error() {
    let container = container(SeedMode::Sample);
    let schule = container.store.get_all().children[0].id();

    let output = run_shell(&container, &format!("study {schule}\n"));

    assert!(output.contains("error:"));
    assert!(!output.contains("=="));
}

#[test]
fn given_export_command_when_run_then_writes_snapshot() {
    let container = container(SeedMode::Sample);
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("out.json");

    let output = run_shell(&container, &format!("export {}\n", path.display()));

    assert!(output.contains("exported to"));
    assert!(path.exists());
}

#[test]
fn given_unknown_command_when_run_then_continues_until_eof() {
    let container = container(SeedMode::Empty);

    let output = run_shell(&container, "frobnicate\nhelp\n");

    assert!(output.contains("unknown command 'frobnicate'"));
    assert!(output.contains("commands:"));
}

#[test]
fn given_json_lines_when_serving_then_one_response_per_request() {
    let container = container(SeedMode::Empty);
    let root = container.store.root_id();
    let input = format!(
        "{{\"op\":\"add\",\"id\":\"{root}\",\"fileType\":\"cards\",\"name\":\"Go\"}}\n\n{{\"op\":\"list\"}}\n"
    );
    let mut output = Vec::new();

    serve(&container.store, input.as_bytes(), &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r#""status":"ok""#));
    assert!(lines[1].contains(r#""name":"Go""#));
}
