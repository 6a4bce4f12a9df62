use std::error::Error;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use tracing::{info, warn};

use crate::bridge::message::Message;
use crate::bridge::store::SnapshotStore;
use crate::browser::frames::{FileFrames, parse_frame_arg};
use crate::browser::layout::{LayoutProvider, NoLayout, SelectorLayout};
use crate::browser::locator::locate;
use crate::browser::page::{PageDocuments, fetch_html, read_html_file};
use crate::cli::config::{AppConfig, PageArgs};
use crate::error::FormscoutError;
use crate::form::classifier::determine_element_type;
use crate::form::form_model::{FieldType, FormGroups};
use crate::form::graph::FormScanner;
use crate::form::label::label_for;
use crate::record::record_model::{ClickRecord, Interaction};
use crate::record::recorder::Recorder;
use crate::selector::query::query_first;
use crate::selector::{ResolvedSelector, SelectorResolver, query_selector_expression};
use crate::task::codegen::TaskCodeGenerator;
use crate::task::task_model::TaskConfig;
use crate::trace::event::{ParseEvent, ParseTrigger};
use crate::trace::logger::TraceLogger;
use crate::watch::{Debouncer, WaitOutcome, wait_for};

type CmdResult<T> = Result<T, Box<dyn Error>>;

// ============================================================================
// Page loading
// ============================================================================

/// Load the page named by `args`, with its readable iframes.
pub fn load_page(args: &PageArgs, resolver: &SelectorResolver) -> Result<PageDocuments, FormscoutError> {
    let html = match (&args.file, &args.url) {
        (Some(file), _) => read_html_file(Path::new(file))?,
        (None, Some(url)) => fetch_html(url)?,
        (None, None) => return Err(FormscoutError::MissingInput("either --file or --url is required".into())),
    };

    Ok(PageDocuments::parse(&html, args.url.as_deref(), &frame_source(&args.frames), resolver))
}

fn frame_source(frames: &[String]) -> FileFrames {
    frames.iter().fold(FileFrames::new(), |source, arg| match parse_frame_arg(arg) {
        Some((index, path)) => source.with_frame(index, path),
        None => {
            warn!(arg = %arg, "ignoring malformed --frame (expected INDEX=PATH)");
            source
        }
    })
}

fn resolver(config: &AppConfig) -> SelectorResolver {
    SelectorResolver::new(config.heuristics.clone())
}

fn scanner(config: &AppConfig) -> FormScanner {
    FormScanner::new(resolver(config), config.scan.clone())
}

fn write_output(content: &str, output: Option<&str>) -> CmdResult<()> {
    match output {
        Some(path) => std::fs::write(path, content)?,
        None => println!("{}", content),
    }
    Ok(())
}

// ============================================================================
// scan subcommand
// ============================================================================

pub struct ScanOptions<'a> {
    pub layout: Option<&'a str>,
    pub hide_non_form: bool,
    pub drop_hidden: bool,
    pub message: bool,
    pub store: Option<&'a str>,
    pub output: Option<&'a str>,
}

pub fn cmd_scan(page_args: &PageArgs, opts: &ScanOptions<'_>, config: &AppConfig) -> CmdResult<FormGroups> {
    let scanner = scanner(config);
    let page = load_page(page_args, scanner.resolver())?;

    let layout: Box<dyn LayoutProvider> = match opts.layout {
        Some(path) => Box::new(SelectorLayout::load(Path::new(path))?),
        None => Box::new(NoLayout),
    };

    let mut groups = scanner.scan(&page, layout.as_ref());
    if opts.drop_hidden {
        groups = groups.without_zero_positions();
    }
    if opts.hide_non_form {
        groups = groups.without_non_form();
    }

    if let Some(path) = opts.store {
        let mut store = SnapshotStore::open(path)?;
        store.set_snapshot(groups.clone());
        store.save()?;
        info!(path, "snapshot stored");
    }

    let json = if opts.message {
        serde_json::to_string_pretty(&Message::snapshot(groups.clone()))?
    } else {
        serde_json::to_string_pretty(&groups)?
    };
    write_output(&json, opts.output)?;

    Ok(groups)
}

// ============================================================================
// selector / classify subcommands
// ============================================================================

pub fn cmd_selector(
    page_args: &PageArgs,
    target: &str,
    within: Option<&str>,
    iframe: Option<usize>,
    copy: bool,
    config: &AppConfig,
) -> CmdResult<ResolvedSelector> {
    let resolver = resolver(config);
    let page = load_page(page_args, &resolver)?;
    let doc = document(&page, iframe)?;
    let root = doc.root_element();

    let scope = match within {
        Some(css) => Some(query_first(root, css).ok_or_else(|| not_found(css, "scope"))?),
        None => None,
    };
    let search_root = scope.unwrap_or(root);
    let element = query_first(search_root, target).ok_or_else(|| not_found(target, "target"))?;

    let resolved = resolver.resolve(element, scope);
    match &resolved {
        ResolvedSelector::Unique(s) if copy => println!("{}", query_selector_expression(s)),
        ResolvedSelector::Unique(s) => println!("{}", s),
        ResolvedSelector::BestEffort(s) => {
            warn!(selector = %s, "selector is not verified unique");
            println!("{}", if copy { query_selector_expression(s) } else { s.clone() });
        }
        ResolvedSelector::NotFound => eprintln!("No selector could be built for '{}'", target),
    }

    Ok(resolved)
}

pub fn cmd_classify(
    page_args: &PageArgs,
    target: &str,
    iframe: Option<usize>,
    config: &AppConfig,
) -> CmdResult<(FieldType, String)> {
    let resolver = resolver(config);
    let page = load_page(page_args, &resolver)?;
    let doc = document(&page, iframe)?;

    let element = query_first(doc.root_element(), target).ok_or_else(|| not_found(target, "target"))?;
    let selector = resolver.resolve(element, None).into_option().unwrap_or_default();
    let field_type = determine_element_type(element, &selector, doc);
    let label = label_for(element, doc);

    println!("type:     {}", field_type);
    println!("selector: {}", selector);
    println!("label:    {}", label);

    Ok((field_type, label))
}

fn document(page: &PageDocuments, iframe: Option<usize>) -> Result<&scraper::Html, FormscoutError> {
    page.document(iframe).ok_or_else(|| FormscoutError::ElementNotFound {
        selector: format!("iframe[{}]", iframe.unwrap_or_default()),
        context: "iframe content not available".into(),
    })
}

fn not_found(selector: &str, what: &str) -> FormscoutError {
    FormscoutError::ElementNotFound {
        selector: selector.to_string(),
        context: format!("{what} query matched nothing"),
    }
}

// ============================================================================
// generate subcommand
// ============================================================================

pub fn cmd_generate(task_path: &str, output: Option<&str>, config: &AppConfig) -> CmdResult<String> {
    let task = TaskConfig::load(Path::new(task_path))?;
    let generator = TaskCodeGenerator::new(config.codegen.clone(), config.heuristics.clone());

    let code = generator.generate(&task)?;
    info!(nodes = task.node.len(), url = %task.url, "task code generated");
    write_output(&code, output)?;

    Ok(code)
}

// ============================================================================
// locate subcommand
// ============================================================================

/// Returns the matched element's tag name, or `None` on timeout.
pub fn cmd_locate(
    page_args: &PageArgs,
    selector: &str,
    parent: Option<&str>,
    iframe: Option<usize>,
    timeout_ms: u64,
    config: &AppConfig,
) -> CmdResult<Option<String>> {
    let resolver = resolver(config);
    let interval = Duration::from_millis(config.watch.poll_ms.max(1));

    let probe = || {
        let page = match load_page(page_args, &resolver) {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "page not readable");
                return None;
            }
        };
        locate(&page, selector, parent, iframe).map(|el| el.value().name().to_string())
    };

    match wait_for(Duration::from_millis(timeout_ms), interval, probe) {
        WaitOutcome::Found(tag) => {
            println!("found <{}>", tag);
            Ok(Some(tag))
        }
        WaitOutcome::TimedOut => {
            println!("not found: {}", selector);
            Ok(None)
        }
    }
}

// ============================================================================
// record subcommand
// ============================================================================

pub fn cmd_record(
    file: &str,
    events_path: &str,
    page_url: &str,
    store: Option<&str>,
    output: Option<&str>,
    config: &AppConfig,
) -> CmdResult<Vec<ClickRecord>> {
    let html = read_html_file(Path::new(file))?;
    let doc = scraper::Html::parse_document(&html);

    let content = std::fs::read_to_string(events_path)
        .map_err(|e| FormscoutError::io(format!("reading events {}", events_path), e))?;
    let events: Vec<Interaction> =
        serde_json::from_str(&content).map_err(|e| FormscoutError::json(format!("parsing events {}", events_path), e))?;

    let mut recorder = Recorder::new(resolver(config), page_url);
    recorder.start(0.0, 0.0);

    for event in &events {
        match event {
            Interaction::Click { selector } => match query_first(doc.root_element(), selector) {
                Some(el) => {
                    recorder.record_click(el, &doc);
                }
                None => warn!(selector = %selector, "click target not found; skipped"),
            },
            Interaction::Scroll { top, left } => {
                recorder.record_scroll(*top, *left);
            }
        }
    }
    recorder.stop();

    let records = recorder.into_records();
    if let Some(path) = store {
        let mut store = SnapshotStore::open(path)?;
        store.append_records(records.iter().cloned());
        store.save()?;
    }

    write_output(&serde_json::to_string_pretty(&records)?, output)?;
    Ok(records)
}

// ============================================================================
// watch subcommand
// ============================================================================

/// Re-scan `file` after each burst of changes. Returns the number of passes.
pub fn cmd_watch(
    file: &str,
    trace_path: &str,
    store: Option<&str>,
    max_passes: Option<u64>,
    config: &AppConfig,
) -> CmdResult<u64> {
    let scanner = scanner(config);
    let tracer = TraceLogger::new(Path::new(trace_path));
    let mut store = store.map(SnapshotStore::open).transpose()?;

    let mut debouncer = Debouncer::new(Duration::from_millis(config.watch.quiet_ms));
    let poll = Duration::from_millis(config.watch.poll_ms.max(1));

    let mut last_modified = modified_time(file);
    let mut last_fingerprint: Option<String> = None;
    let mut pass = 0u64;

    info!(file, "watching for changes");
    loop {
        if max_passes.is_some_and(|max| pass >= max) {
            break;
        }

        let trigger = if pass == 0 {
            Some(ParseTrigger::InitialLoad)
        } else {
            let modified = modified_time(file);
            if modified != last_modified {
                last_modified = modified;
                debouncer.schedule(Instant::now());
            }
            debouncer.poll(Instant::now()).then_some(ParseTrigger::Change)
        };

        let Some(trigger) = trigger else {
            thread::sleep(poll);
            continue;
        };

        pass += 1;
        let event = ParseEvent::now(pass, trigger);
        let event = match parse_pass(file, &scanner) {
            Ok(groups) => {
                let fingerprint = groups.fingerprint();
                let changed = last_fingerprint.as_deref() != Some(fingerprint.as_str());
                if changed {
                    println!(
                        "[pass {}] {} forms, {} elements ({})",
                        pass,
                        groups.forms.len(),
                        groups.total_elements(),
                        &fingerprint[..8]
                    );
                    if let Some(store) = store.as_mut() {
                        store.set_snapshot(groups.clone());
                        if let Err(e) = store.save() {
                            warn!(error = %e, "snapshot not stored");
                        }
                    }
                }
                last_fingerprint = Some(fingerprint.clone());
                event
                    .with_counts(groups.forms.len(), groups.total_elements())
                    .with_fingerprint(fingerprint, changed)
            }
            Err(e) => {
                warn!(error = %e, "parse pass failed");
                event.with_error(e)
            }
        };
        tracer.log(&event);
    }

    Ok(pass)
}

fn parse_pass(file: &str, scanner: &FormScanner) -> Result<FormGroups, FormscoutError> {
    let args = PageArgs {
        file: Some(file.to_string()),
        ..PageArgs::default()
    };
    let page = load_page(&args, scanner.resolver())?;
    Ok(scanner.scan(&page, &NoLayout))
}

fn modified_time(file: &str) -> Option<SystemTime> {
    std::fs::metadata(file).and_then(|m| m.modified()).ok()
}
