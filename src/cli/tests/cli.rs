use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::str::contains;
use serde_json::json;
mod common;

fn tags_args(server: &Server, state: &str, tags: Option<&str>) -> serde_json::Value {
    let mut args = json!({
        "api_key": "api-key",
        "app_key": "app-key",
        "host": "MyHost",
        "state": state,
        "api_host": server.url(),
    });
    if let Some(tags) = tags {
        args["tags"] = json!(tags);
    }
    args
}

#[test]
fn echo_fields_returns_inputs_as_meta() {
    let args = common::args_file(&json!({"key1": "hello", "key2": "world"}));

    let assert = Command::cargo_bin("echo_fields")
        .unwrap()
        .arg(args.path())
        .assert()
        .success();

    let output = common::module_output(&assert);
    assert_eq!(output["changed"], json!(false));
    assert_eq!(output["meta"], json!({"key1": "hello", "key2": "world"}));
}

#[test]
fn echo_fields_reports_missing_arguments() {
    let args = common::args_file(&json!({"key1": "hello"}));

    let assert = Command::cargo_bin("echo_fields")
        .unwrap()
        .arg(args.path())
        .assert()
        .code(1)
        .stdout(contains("missing required arguments: key2"));

    assert_eq!(common::module_output(&assert)["failed"], json!(true));
}

#[test]
fn module_without_args_file_fails_with_json() {
    Command::cargo_bin("echo_fields")
        .unwrap()
        .assert()
        .code(1)
        .stdout(contains(r#""failed":true"#));
}

#[test]
fn runlog_echo_runs_the_same_module() {
    let args = common::args_file(&json!({"ANSIBLE_MODULE_ARGS": {"key1": "a", "key2": "b"}}));

    let assert = Command::cargo_bin("runlog")
        .unwrap()
        .arg("echo")
        .arg(args.path())
        .assert()
        .success();

    assert_eq!(
        common::module_output(&assert)["meta"],
        json!({"key1": "a", "key2": "b"})
    );
}

#[test]
fn datadog_tags_adds_missing_tag() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/search")
        .match_query(Matcher::UrlEncoded("q".into(), "MyHost".into()))
        .with_body(r#"{"results":{"hosts":["MyHost"]}}"#)
        .create();
    server
        .mock("GET", "/api/v1/tags/hosts/MyHost")
        .with_body(r#"{"tags":["aa","bb"]}"#)
        .create();
    let put = server
        .mock("PUT", "/api/v1/tags/hosts/MyHost")
        .match_query(Matcher::UrlEncoded("source".into(), "ansible".into()))
        .match_header("DD-API-KEY", "api-key")
        .match_body(Matcher::Json(json!({"tags": ["aa", "bb", "cc"]})))
        .with_body(r#"{"host":"MyHost","tags":["aa","bb","cc"]}"#)
        .expect(1)
        .create();
    let args = common::args_file(&tags_args(&server, "present", Some("aa,bb,cc")));

    let assert = Command::cargo_bin("datadog_tags")
        .unwrap()
        .arg(args.path())
        .assert()
        .success();

    let output = common::module_output(&assert);
    assert_eq!(output["changed"], json!(true));
    assert_eq!(output["msg"]["host"], json!("MyHost"));
    put.assert();
}

#[test]
fn datadog_tags_leaves_matching_tags_alone() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/search")
        .match_query(Matcher::Any)
        .with_body(r#"{"results":{"hosts":["MyHost"]}}"#)
        .create();
    server
        .mock("GET", "/api/v1/tags/hosts/MyHost")
        .with_body(r#"{"tags":["bb","aa"]}"#)
        .create();
    let put = server
        .mock("PUT", "/api/v1/tags/hosts/MyHost")
        .match_query(Matcher::Any)
        .expect(0)
        .create();
    let args = common::args_file(&tags_args(&server, "present", Some("aa,bb")));

    let assert = Command::cargo_bin("datadog_tags")
        .unwrap()
        .arg(args.path())
        .assert()
        .success();

    assert_eq!(common::module_output(&assert)["changed"], json!(false));
    put.assert();
}

#[test]
fn datadog_tags_absent_deletes_existing_tags() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/search")
        .match_query(Matcher::Any)
        .with_body(r#"{"results":{"hosts":["MyHost"]}}"#)
        .create();
    server
        .mock("GET", "/api/v1/tags/hosts/MyHost")
        .with_body(r#"{"tags":["aa"]}"#)
        .create();
    let delete = server
        .mock("DELETE", "/api/v1/tags/hosts/MyHost")
        .match_query(Matcher::UrlEncoded("source".into(), "ansible".into()))
        .with_status(204)
        .expect(1)
        .create();
    let args = common::args_file(&tags_args(&server, "absent", None));

    let assert = Command::cargo_bin("datadog_tags")
        .unwrap()
        .arg(args.path())
        .assert()
        .success();

    assert_eq!(common::module_output(&assert)["changed"], json!(true));
    delete.assert();
}

#[test]
fn datadog_tags_ignores_unknown_host() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/search")
        .match_query(Matcher::Any)
        .with_body(r#"{"results":{"hosts":[]}}"#)
        .create();
    let tags = server
        .mock("GET", "/api/v1/tags/hosts/MyHost")
        .expect(0)
        .create();
    let args = common::args_file(&tags_args(&server, "present", Some("aa")));

    let assert = Command::cargo_bin("datadog_tags")
        .unwrap()
        .arg(args.path())
        .assert()
        .success();

    assert_eq!(common::module_output(&assert)["changed"], json!(false));
    tags.assert();
}

#[test]
fn datadog_tags_reports_api_errors() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/search")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"errors":["Forbidden"]}"#)
        .create();
    let args = common::args_file(&tags_args(&server, "absent", None));

    Command::cargo_bin("datadog_tags")
        .unwrap()
        .arg(args.path())
        .assert()
        .code(1)
        .stdout(contains(r#""failed":true"#))
        .stdout(contains("403"));
}

#[test]
fn forward_dry_run_prints_one_record_per_event() {
    let events = [
        json!({"event": "on_start", "playbook": "site.yml"}),
        json!({"event": "on_ok", "host": "web1", "task": {"name": "ping"}, "result": {"ping": "pong", "_ansible_verbose_always": true}}),
        json!({"event": "on_failed", "host": "web2", "task": {"name": "ping"}, "result": {"msg": "boom"}}),
        json!({"event": "on_stats", "stats": {"processed": {"web1": {"ok": 1}, "web2": {"failures": 1}}}}),
    ];
    let input = events
        .iter()
        .map(|event| event.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    let assert = Command::cargo_bin("runlog")
        .unwrap()
        .args(["forward", "--dry-run"])
        .write_stdin(input)
        .assert()
        .success();

    let lines = common::json_lines(&assert);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["log_action"], json!("ansible start"));
    assert_eq!(lines[0]["ansible_playbook"], json!("site.yml"));
    assert_eq!(lines[1]["ansible_result"], json!(r#"{"ping":"pong"}"#));
    assert_eq!(lines[2]["status"], json!("FAILED"));
    assert_eq!(lines[2]["level"], json!("error"));
    assert_eq!(lines[3]["log_action"], json!("ansible stats"));
    assert_eq!(lines[3]["status"], json!("FAILED"));

    let session = &lines[0]["session"];
    assert!(lines.iter().all(|line| &line["session"] == session));
}

#[test]
fn forward_skips_malformed_lines() {
    let assert = Command::cargo_bin("runlog")
        .unwrap()
        .args(["forward", "--dry-run"])
        .write_stdin("garbage\n{\"event\":\"on_start\",\"playbook\":\"site.yml\"}\n")
        .assert()
        .success();

    assert_eq!(common::json_lines(&assert).len(), 1);
}

#[test]
fn info_prints_resolved_configuration() {
    let config = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(config.path(), "log_group = \"deploys\"\nbatch_size = 25\n").unwrap();

    Command::cargo_bin("runlog")
        .unwrap()
        .env_remove("LOG_GROUP")
        .args(["info", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(contains("deploys"))
        .stdout(contains("25"));
}
