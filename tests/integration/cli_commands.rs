#![allow(missing_docs)]

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const SCRIPT: &str = r#"addent "a"
addent "b"
addent "c"
addent "d"
report
addrel "b" "a" "r1"
addrel "c" "a" "r1"
report
addrel "d" "c" "r2"
addrel "b" "d" "r2"
report
delent "a"
report
end
report
"#;

/// Binary invocation isolated from the caller's config and log settings.
fn relgraph(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("relgraph");
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .env_remove("RELGRAPH_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("utf8 stdout")
}

#[test]
fn replays_stdin_and_prints_reports() {
    let home = TempDir::new().expect("tempdir");
    let out = stdout_of(relgraph(&home).write_stdin(SCRIPT));
    assert_eq!(
        out,
        "none\n\"r1\" \"a\" 2;\n\"r1\" \"a\" 2; \"r2\" \"c\" \"d\" 1;\n\"r2\" \"c\" \"d\" 1;\n"
    );
}

#[test]
fn reads_input_file_and_renders_json() {
    let home = TempDir::new().expect("tempdir");
    let input = home.path().join("commands.txt");
    fs::write(&input, SCRIPT).expect("write input");

    let out = stdout_of(
        relgraph(&home)
            .arg("--input")
            .arg(&input)
            .args(["--format", "json"]),
    );
    let lines: Vec<Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], Value::Array(vec![]));
    assert_eq!(lines[1][0]["relation"], "r1");
    assert_eq!(lines[1][0]["degree"], 2);
    assert_eq!(lines[2][1]["entities"], serde_json::json!(["c", "d"]));
}

#[test]
fn config_file_sets_empty_token_and_flags_override_it() {
    let home = TempDir::new().expect("tempdir");
    let config = home.path().join("relgraph.toml");
    fs::write(&config, "[report]\nempty_token = \"(nothing)\"\n").expect("write config");

    let out = stdout_of(relgraph(&home).arg("--config").arg(&config).write_stdin("report\n"));
    assert_eq!(out, "(nothing)\n");

    let out = stdout_of(
        relgraph(&home)
            .arg("--config")
            .arg(&config)
            .args(["--empty-token", "EMPTY"])
            .write_stdin("report\n"),
    );
    assert_eq!(out, "EMPTY\n");
}

#[cfg(target_os = "linux")]
#[test]
fn default_config_location_is_used() {
    let home = TempDir::new().expect("tempdir");
    let dir = home.path().join("relgraph");
    fs::create_dir_all(&dir).expect("config dir");
    fs::write(dir.join("config.toml"), "[report]\nformat = \"json\"\n").expect("write config");

    let out = stdout_of(relgraph(&home).write_stdin("report\n"));
    assert_eq!(out, "[]\n");
}

#[test]
fn bad_lines_are_skipped_unless_strict() {
    let home = TempDir::new().expect("tempdir");
    let script = "addent \"a\"\naddent b\naddrel \"a\" \"a\" \"r\"\nreport\n";

    let out = stdout_of(relgraph(&home).write_stdin(script));
    assert_eq!(out, "\"r\" \"a\" 1;\n");

    let assert = relgraph(&home).arg("--strict").write_stdin(script).assert().code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.contains("error: parse error on line 2"), "{stderr}");
}

#[test]
fn missing_input_file_is_fatal() {
    let home = TempDir::new().expect("tempdir");
    let assert = relgraph(&home)
        .arg("--input")
        .arg(home.path().join("absent.txt"))
        .assert()
        .code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.starts_with("error: cannot open input"), "{stderr}");
}

#[test]
fn verify_subcommand_reports_success() {
    let home = TempDir::new().expect("tempdir");
    let out = stdout_of(relgraph(&home).arg("verify").write_stdin(SCRIPT));
    let json: Value = serde_json::from_str(&out).expect("verify json");
    assert_eq!(json["success"], true);
    assert_eq!(json["counts"]["relations"], 2);
    assert!(json["findings"].as_array().expect("findings").is_empty());
}

#[test]
fn stats_subcommand_counts_relations() {
    let home = TempDir::new().expect("tempdir");
    let out = stdout_of(relgraph(&home).arg("stats").write_stdin(SCRIPT));
    let json: Value = serde_json::from_str(&out).expect("stats json");
    assert_eq!(json["relations"], 2);
    assert_eq!(json["known_names"], 3);
    assert_eq!(json["non_empty_relations"], 1);
    assert_eq!(json["per_relation"][1]["name"], "r2");
    assert_eq!(json["per_relation"][1]["max_indegree"], 1);
}
