// Checks on the files that ship with the crate.

use std::path::{Path, PathBuf};

use xi_builder::api::offline::load_all_names;
use xi_builder::config::{parse_config, validate};

/// The bundled defaults parse and validate.
#[test]
fn default_settings_are_valid() {
    let path = Path::new("defaults/settings.toml");
    let content = std::fs::read_to_string(path).expect("defaults/settings.toml should exist");
    let config = parse_config(&content, path).expect("defaults should parse");
    validate(&config).expect("defaults should validate");

    assert_eq!(config.squad.max_size, 11);
    assert!(config.backend.base_url.starts_with("http"));
    assert!(config.universe.offline_csv.is_empty());
}

/// Verify that all expected source files exist.
#[test]
fn source_files_exist() {
    let expected_files = [
        "src/main.rs",
        "src/lib.rs",
        "src/app.rs",
        "src/config.rs",
        "src/page.rs",
        "src/protocol.rs",
        "src/request.rs",
        "src/api/mod.rs",
        "src/api/client.rs",
        "src/api/offline.rs",
        "src/api/types.rs",
        "src/squad/mod.rs",
        "src/squad/member.rs",
        "src/squad/selection.rs",
        "src/typeahead/mod.rs",
        "src/typeahead/matcher.rs",
        "src/typeahead/highlight.rs",
        "src/tui/mod.rs",
        "src/tui/layout.rs",
        "src/tui/input.rs",
        "src/tui/widgets/mod.rs",
        "src/tui/widgets/search.rs",
        "src/tui/widgets/squad.rs",
        "src/tui/widgets/estimate.rs",
        "src/tui/widgets/stats.rs",
        "src/tui/widgets/clusters.rs",
        "src/tui/widgets/status_bar.rs",
        "src/tui/widgets/quit_confirm.rs",
    ];
    for file in expected_files {
        assert!(Path::new(file).is_file(), "Expected source file '{}' to exist", file);
    }
}

/// The fixture CSV loads as a sorted, deduplicated name list.
#[test]
fn fixture_csv_loads_unique_names() {
    let names = load_all_names(&[PathBuf::from("tests/fixtures/players.csv")]);
    assert_eq!(
        names,
        vec![
            "Hardik Pandya",
            "Jasprit Bumrah",
            "MS Dhoni",
            "Rashid Khan",
            "Rohit Sharma",
            "Virat Kohli",
        ]
    );
}

#[test]
fn missing_csv_is_skipped() {
    let names = load_all_names(&[
        PathBuf::from("tests/fixtures/does-not-exist.csv"),
        PathBuf::from("tests/fixtures/players.csv"),
    ]);
    assert_eq!(names.len(), 6);
}
