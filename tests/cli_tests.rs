#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn cli() -> Command {
        let mut cmd = Command::cargo_bin("kodegen_bundler_webapp").unwrap();
        cmd.env("RUST_LOG", "off");
        cmd
    }

    #[test]
    fn test_help_lists_build_options() {
        cli()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--upgrade"))
            .stdout(predicate::str::contains("--overwrite"))
            .stdout(predicate::str::contains("--win32metadata"));
    }

    #[test]
    fn test_missing_url_exits_with_suggestion() {
        let temp = TempDir::new().unwrap();
        cli()
            .current_dir(temp.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("A target URL is required"))
            .stdout(predicate::str::contains("Recovery suggestions"));
        assert!(!temp.path().join("output-apps").exists());
    }

    #[test]
    fn test_unknown_platform_is_usage_error() {
        cli()
            .args(["https://example.com", "--platform", "beos"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("beos"));
    }

    #[test]
    fn test_windows_build_writes_bundle() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");

        cli()
            .current_dir(temp.path())
            .args(["example.com", "--platform", "windows", "--quiet", "--out"])
            .arg(&out)
            .assert()
            .success();

        let bundles: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        assert_eq!(bundles.len(), 1);
        let name = bundles[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("Example-win32-"), "{name}");
        assert!(bundles[0].join("resources/app/webapp.json").is_file());
    }

    #[test]
    fn test_second_build_without_overwrite_fails() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let args = ["example.com", "--platform", "windows", "--quiet", "--out"];

        cli().current_dir(temp.path()).args(args).arg(&out).assert().success();
        cli()
            .current_dir(temp.path())
            .args(args)
            .arg(&out)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("--overwrite"));
    }
}
