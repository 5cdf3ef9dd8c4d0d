use haca_core::{ConfigError, Terminal, TerminalConfig};
use haca_corpus::Clearance;
use haca_test_utils::sample_corpus;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_partial_file_from_disk() {
    let file = write_temp(
        "[timing]\nlogin_delay_ms = 50\n\n[markup]\nkeywords = [\"MIMIR\"]\n\n[tutorial]\nclearance = 2\n",
    );
    let config = TerminalConfig::load(file.path()).unwrap();

    assert_eq!(config.timing.login_delay(), Duration::from_millis(50));
    assert_eq!(config.markup.keywords, vec!["MIMIR".to_string()]);
    assert_eq!(config.tutorial.clearance, Clearance::new(2));
    assert_eq!(config.escalation, TerminalConfig::default().escalation);
    assert!(Terminal::new(Arc::new(sample_corpus()), config).is_ok());
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    match TerminalConfig::load(&path).unwrap_err() {
        ConfigError::Io { path: reported, source } => {
            assert_eq!(reported, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn invalid_file_contents_are_rejected_on_load() {
    let file = write_temp("[escalation]\nmild_threshold = 7\nmoderate_threshold = 6\n");
    assert!(matches!(
        TerminalConfig::load(file.path()),
        Err(ConfigError::ThresholdsNotAscending { mild: 7, moderate: 6, .. })
    ));

    let file = write_temp("[timing\n");
    assert!(matches!(
        TerminalConfig::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}
