use clap::Parser;
use formscout::cli::commands::{
    ScanOptions, cmd_classify, cmd_generate, cmd_locate, cmd_record, cmd_scan, cmd_selector, cmd_watch, load_page,
};
use formscout::cli::config::{AppConfig, Cli, Commands, PageArgs, load_config};
use formscout::bridge::SnapshotStore;
use formscout::form::form_model::{FieldType, NON_FORM_KEY};
use formscout::selector::{ResolvedSelector, SelectorResolver};
use formscout::trace::event::{ParseEvent, ParseTrigger};

mod common;
use crate::common::utils::{IFRAME_PAGE, LOGIN_PAGE, write_file};

fn file_args(path: &str) -> PageArgs {
    PageArgs {
        file: Some(path.to_string()),
        ..PageArgs::default()
    }
}

fn scan_opts<'a>(output: &'a str) -> ScanOptions<'a> {
    ScanOptions {
        layout: None,
        hide_non_form: false,
        drop_hidden: false,
        message: false,
        store: None,
        output: Some(output),
    }
}

// ============================================================================
// Argument parsing
// ============================================================================

#[test]
fn scan_arguments() {
    let cli = Cli::parse_from([
        "formscout", "-vv", "scan", "--file", "page.html", "--frame", "0=f.html", "--hide-non-form", "-o", "out.json",
    ]);
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Scan { page, hide_non_form, output, message, .. } => {
            assert_eq!(page.file.as_deref(), Some("page.html"));
            assert_eq!(page.frames, vec!["0=f.html".to_string()]);
            assert!(hide_non_form);
            assert!(!message);
            assert_eq!(output.as_deref(), Some("out.json"));
        }
        other => panic!("parsed as {other:?}"),
    }
}

#[test]
fn subcommand_defaults() {
    let cli = Cli::parse_from(["formscout", "record", "--file", "p.html", "--events", "e.json"]);
    match cli.command {
        Commands::Record { page_url, store, .. } => {
            assert_eq!(page_url, "about:blank");
            assert!(store.is_none());
        }
        other => panic!("parsed as {other:?}"),
    }

    let cli = Cli::parse_from(["formscout", "watch", "--file", "p.html", "--config", "custom.yaml"]);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Watch { trace, max_passes, .. } => {
            assert_eq!(trace, "formscout_trace.jsonl");
            assert!(max_passes.is_none());
        }
        other => panic!("parsed as {other:?}"),
    }

    let cli = Cli::parse_from(["formscout", "locate", "--url", "https://example.com", "--selector", "#pw"]);
    match cli.command {
        Commands::Locate { timeout_ms, iframe, .. } => {
            assert_eq!(timeout_ms, 0);
            assert!(iframe.is_none());
        }
        other => panic!("parsed as {other:?}"),
    }
}

#[test]
fn required_arguments_are_enforced() {
    assert!(Cli::try_parse_from(["formscout", "selector", "--file", "p.html"]).is_err());
    assert!(Cli::try_parse_from(["formscout", "generate"]).is_err());
}

// ============================================================================
// Config loading
// ============================================================================

#[test]
fn missing_config_gives_defaults() {
    let config = load_config(Some("/definitely/not/here.yaml"));
    assert_eq!(config.codegen.namespace, "steamBack");
    assert_eq!(config.heuristics.digit_run, 3);
    assert!(config.scan.include_non_form);
    assert_eq!(config.watch.quiet_ms, 500);
}

#[test]
fn partial_yaml_overrides_only_named_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "formscout.yaml",
        "codegen:\n  namespace: replay\nheuristics:\n  digit_run: 2\nscan:\n  include_non_form: false\n",
    );
    let config = load_config(Some(&path));

    assert_eq!(config.codegen.namespace, "replay");
    assert_eq!(config.codegen.action_delay_ms, 1500);
    assert_eq!(config.heuristics.digit_run, 2);
    assert_eq!(config.heuristics.min_run_len, 5);
    assert!(!config.scan.include_non_form);
    assert_eq!(config.watch.poll_ms, 200);
}

#[test]
fn malformed_yaml_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "formscout.yaml", "codegen: [unclosed\n");
    let config = load_config(Some(&path));
    assert_eq!(config.codegen.namespace, "steamBack");
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn load_page_needs_a_source() {
    assert!(load_page(&PageArgs::default(), &SelectorResolver::default()).is_err());
    assert!(load_page(&file_args("/definitely/not/here.html"), &SelectorResolver::default()).is_err());
}

#[test]
fn scan_writes_groups_and_store() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_file(&dir, "login.html", LOGIN_PAGE);
    let out = dir.path().join("groups.json").display().to_string();
    let store = dir.path().join("store.json").display().to_string();

    let opts = ScanOptions {
        store: Some(&store),
        ..scan_opts(&out)
    };
    let groups = cmd_scan(&file_args(&page), &opts, &AppConfig::default()).unwrap();
    assert_eq!(groups.total_elements(), 4);

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["login-form"]["method"], "post");

    assert_eq!(SnapshotStore::open(&store).unwrap().total_elements(), 4);
}

#[test]
fn scan_filters_and_message_output() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_file(&dir, "login.html", LOGIN_PAGE);
    let out = dir.path().join("message.json").display().to_string();

    let opts = ScanOptions {
        hide_non_form: true,
        message: true,
        ..scan_opts(&out)
    };
    let groups = cmd_scan(&file_args(&page), &opts, &AppConfig::default()).unwrap();
    assert!(groups.get(NON_FORM_KEY).is_none());

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["action"], "formElementsUpdated");
    assert_eq!(written["totalElements"], 3);
}

#[test]
fn scan_uses_layout_file() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_file(&dir, "login.html", LOGIN_PAGE);
    let layout = write_file(
        &dir,
        "layout.json",
        r##"[
            {"selector": "#pw", "parentSelector": "#login-form", "position": {"top": 5, "left": 0, "width": 100, "height": 20}}
        ]"##,
    );
    let out = dir.path().join("groups.json").display().to_string();

    let opts = ScanOptions {
        layout: Some(&layout),
        drop_hidden: true,
        ..scan_opts(&out)
    };
    let groups = cmd_scan(&file_args(&page), &opts, &AppConfig::default()).unwrap();
    assert_eq!(groups.total_elements(), 1);
    assert_eq!(groups.get("login-form").unwrap().elements[0].selector, "#pw");
}

#[test]
fn selector_and_classify_commands() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_file(&dir, "login.html", LOGIN_PAGE);
    let args = file_args(&page);
    let config = AppConfig::default();

    let resolved = cmd_selector(&args, "input[type=password]", None, None, false, &config).unwrap();
    assert_eq!(resolved, ResolvedSelector::Unique("#pw".into()));

    let scoped = cmd_selector(&args, "button", Some("form"), None, true, &config).unwrap();
    assert_eq!(scoped.as_str(), "button[type='submit']");

    assert!(cmd_selector(&args, "textarea", None, None, false, &config).is_err());

    let (field_type, label) = cmd_classify(&args, "input[type=email]", None, &config).unwrap();
    assert_eq!(field_type, FieldType::Email);
    assert_eq!(label, "Email");
}

#[test]
fn commands_reach_into_iframes() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_file(&dir, "checkout.html", IFRAME_PAGE);
    let args = file_args(&page);
    let config = AppConfig::default();

    let resolved = cmd_selector(&args, "input", Some("form"), Some(0), false, &config).unwrap();
    assert_eq!(resolved.as_str(), "input[name='card']");

    assert!(cmd_classify(&args, "input", Some(1), &config).is_err());

    let found = cmd_locate(&args, "input[name='card']", Some("#pay"), Some(0), 0, &config).unwrap();
    assert_eq!(found.as_deref(), Some("input"));
}

#[test]
fn locate_times_out_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_file(&dir, "login.html", LOGIN_PAGE);

    let found = cmd_locate(&file_args(&page), "#gone", None, None, 50, &AppConfig::default()).unwrap();
    assert!(found.is_none());

    let wrapped = cmd_locate(&file_args(&page), "document.querySelector(`#pw`)", None, None, 0, &AppConfig::default());
    assert_eq!(wrapped.unwrap().as_deref(), Some("input"));
}

#[test]
fn generate_reads_task_file() {
    let dir = tempfile::tempdir().unwrap();
    let task = write_file(
        &dir,
        "task.json",
        r##"{
            "url": "https://example.com/login",
            "formSelector": "#login-form",
            "node": [
                {"selector": "#pw", "type": "password"},
                {"selector": "button[type='submit']", "type": "click"}
            ]
        }"##,
    );
    let out = dir.path().join("task.js").display().to_string();

    let code = cmd_generate(&task, Some(&out), &AppConfig::default()).unwrap();
    assert!(code.contains("const submitBtnEle"));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), code);

    let bad = write_file(&dir, "bad.json", r#"{"url": "https://example.com/", "formSelector": ""}"#);
    assert!(cmd_generate(&bad, None, &AppConfig::default()).is_err());
}

#[test]
fn record_replays_interactions() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_file(&dir, "login.html", LOGIN_PAGE);
    let events = write_file(
        &dir,
        "events.json",
        r##"[
            {"type": "scroll", "top": 200, "left": 0},
            {"type": "click", "selector": "#pw"},
            {"type": "click", "selector": "#does-not-exist"},
            {"type": "click", "selector": "a"}
        ]"##,
    );
    let out = dir.path().join("records.json").display().to_string();
    let store = dir.path().join("store.json").display().to_string();

    let records = cmd_record(
        &page,
        &events,
        "https://example.com/login",
        Some(&store),
        Some(&out),
        &AppConfig::default(),
    )
    .unwrap();

    assert_eq!(records.len(), 3);
    assert!(!records[0].is_click());
    assert_eq!(records[1].click().unwrap().form_selector.as_deref(), Some("#login-form"));
    assert_eq!(records[2].click().unwrap().selector, "a[href='/forgot']");
    assert!(records.iter().all(|r| r.url == "https://example.com/login"));

    assert_eq!(SnapshotStore::open(&store).unwrap().click_records().len(), 3);
}

#[test]
fn watch_runs_the_initial_pass_and_traces_it() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_file(&dir, "login.html", LOGIN_PAGE);
    let trace = dir.path().join("trace.jsonl").display().to_string();
    let store = dir.path().join("store.json").display().to_string();

    let passes = cmd_watch(&page, &trace, Some(&store), Some(1), &AppConfig::default()).unwrap();
    assert_eq!(passes, 1);

    let content = std::fs::read_to_string(&trace).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);

    let event: ParseEvent = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(event.pass, 1);
    assert_eq!(event.trigger, ParseTrigger::InitialLoad);
    assert_eq!(event.forms, 2);
    assert_eq!(event.elements, 4);
    assert!(event.changed);
    assert_eq!(event.fingerprint.len(), 40);
    assert!(event.error.is_none());

    assert_eq!(SnapshotStore::open(&store).unwrap().total_elements(), 4);
}

#[test]
fn watch_traces_unreadable_pages() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.html").display().to_string();
    let trace = dir.path().join("trace.jsonl").display().to_string();

    cmd_watch(&missing, &trace, None, Some(1), &AppConfig::default()).unwrap();

    let content = std::fs::read_to_string(&trace).unwrap();
    let event: ParseEvent = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert!(event.error.is_some());
    assert_eq!(event.elements, 0);
}
