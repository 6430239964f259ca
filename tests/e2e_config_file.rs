/// End-to-end tests for config file loading and CLI option merging.
///
/// These tests exercise the flow from a config file on disk through CLI
/// invocation, using `assert_cmd` and `tempfile` for isolated test environments.
/// Each run stops at a refusal so no network access is needed.
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Write a config file at the specified path.
fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn scanner_cmd(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("sbom-scanner");
    cmd.current_dir(dir);
    for var in [
        "GITHUB_TOKEN",
        "JENKINS_USER",
        "JENKINS_TOKEN",
        "VERACODE_API_ID",
        "VERACODE_API_KEY",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Auto-discovery
// ============================================================================

mod auto_discovery_tests {
    use super::*;

    #[test]
    fn test_discovered_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("sbom-scanner.config.yml"),
            "scanners: jenkins\n",
        );

        // Organizations are missing, so the run refuses after loading the file
        scanner_cmd(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Auto-discovered config file"))
            .stderr(predicate::str::contains("No organizations"));
    }

    #[test]
    fn test_unknown_field_warns_but_continues() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("sbom-scanner.config.yml"),
            "concurrency: 2\nunknown_field: true\n",
        );

        scanner_cmd(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown config field will be ignored"))
            .stderr(predicate::str::contains("No organizations"));
    }

    #[test]
    fn test_invalid_yaml_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("sbom-scanner.config.yml"),
            "organizations: [acme\n",
        );

        scanner_cmd(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid config file"));
    }

    #[test]
    fn test_unknown_scanner_in_file() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("sbom-scanner.config.yml"),
            "organizations: acme\nscanners:\n  - sonar\n",
        );

        scanner_cmd(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown scanner 'sonar'"));
    }
}

// ============================================================================
// Explicit --config
// ============================================================================

mod explicit_config_tests {
    use super::*;

    #[test]
    fn test_missing_explicit_config() {
        let dir = TempDir::new().unwrap();
        scanner_cmd(dir.path())
            .args(["--config", "does-not-exist.yml"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid config file"));
    }

    #[test]
    fn test_explicit_config_outside_working_directory() {
        let dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        let config_path = config_dir.path().join("fleet.yml");
        write_config(
            &config_path,
            "organizations:\n  - acme\nscanners: veracode\n",
        );

        scanner_cmd(dir.path())
            .arg("--config")
            .arg(&config_path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Scanner 'veracode' is enabled"));
    }
}

// ============================================================================
// CLI and config merging
// ============================================================================

mod merge_tests {
    use super::*;

    #[test]
    fn test_cli_scanners_override_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("sbom-scanner.config.yml"),
            "organizations: acme\nscanners: sonar\n",
        );

        scanner_cmd(dir.path())
            .args(["--scanners", "jenkins"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Scanner 'jenkins' is enabled"))
            .stderr(predicate::str::contains("Unknown scanner").not());
    }

    #[test]
    fn test_cli_organizations_fill_missing_config_value() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("sbom-scanner.config.yml"),
            "scanners: jenkins\n",
        );

        scanner_cmd(dir.path())
            .args(["--organizations", "acme"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Scanner 'jenkins' is enabled"))
            .stderr(predicate::str::contains("No organizations").not());
    }

    #[test]
    fn test_partial_jenkins_credentials_are_not_enough() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("sbom-scanner.config.yml"),
            "organizations: acme\nscanners: jenkins\njenkins_user: ci-bot\n",
        );

        scanner_cmd(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Scanner 'jenkins' is enabled"));
    }
}
