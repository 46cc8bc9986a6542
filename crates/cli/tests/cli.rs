use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("shelf-cli")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["serve", "migrate", "config"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[test]
fn config_applies_db_aliases_and_hides_password() {
    let output = Command::cargo_bin("shelf-cli")
        .unwrap()
        .arg("config")
        .env("SHELF_ENV", "local")
        .env("SHELF_CONFIG_DIR", "does-not-exist")
        .env("DB_HOST", "db.test")
        .env("DB_NAME", "catalogue")
        .env("DB_PASSWORD", "hunter2")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("@db.test:"));
    assert!(stdout.contains("/catalogue"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn unknown_environment_fails() {
    Command::cargo_bin("shelf-cli")
        .unwrap()
        .arg("config")
        .env("SHELF_ENV", "qa")
        .env("SHELF_CONFIG_DIR", "does-not-exist")
        .assert()
        .failure();
}
