use formscout::selector::query::{parse_selector, query_all, resolves_uniquely_to};
use formscout::selector::{
    RandomnessHeuristic, ResolvedSelector, SelectorResolver, generate_unique_selector, is_random_selector,
    pattern_selector, query_selector_expression,
};

mod common;
use crate::common::utils::{LOGIN_PAGE, doc, find};

// ============================================================================
// Randomness heuristic
// ============================================================================

#[test]
fn randomness_boundaries() {
    assert!(!is_random_selector("btn-primary"));
    assert!(!is_random_selector("submit-button"));
    assert!(is_random_selector("a1b2c3d4"));
    assert!(is_random_selector("checkbox-625"));
    assert!(!is_random_selector(""));
}

#[test]
fn randomness_flags_hash_like_tokens() {
    assert!(is_random_selector("css-1x9f8a2"));
    assert!(is_random_selector("8f3x9q"));
    assert!(is_random_selector("xKqPzRt"));
    assert!(is_random_selector("bcdfghjk"));
    assert!(!is_random_selector("login-form"));
    assert!(!is_random_selector("FirstName"));
}

#[test]
fn randomness_thresholds_come_from_config() {
    let lenient = RandomnessHeuristic {
        digit_run: 6,
        ..RandomnessHeuristic::default()
    };
    assert!(is_random_selector("order-1234"));
    assert!(!lenient.is_random("order-1234"));
}

// ============================================================================
// Pattern selectors
// ============================================================================

#[test]
fn pattern_prefix_and_suffix() {
    assert_eq!(
        pattern_selector("id", "first_name-1615234155262").as_deref(),
        Some(r#"[id^="first_name"]"#)
    );
    assert_eq!(
        pattern_selector("class", "123456-submit_btn").as_deref(),
        Some(r#"[class$="submit_btn"]"#)
    );
}

#[test]
fn pattern_keyword_and_segment() {
    assert_eq!(pattern_selector("class", "x9SubmitBtn").as_deref(), Some(r#"[class*="Submit"]"#));
    assert_eq!(pattern_selector("id", "q7checkout9z").as_deref(), Some(r#"[id*="checkout"]"#));
}

#[test]
fn pattern_gives_up_on_short_or_opaque_values() {
    assert_eq!(pattern_selector("id", "ab"), None);
    assert_eq!(pattern_selector("class", "sc-a8f9x2"), None);
}

// ============================================================================
// Unique selector resolution
// ============================================================================

#[test]
fn generated_id_becomes_prefix_pattern() {
    let d = doc(LOGIN_PAGE);
    let email = find(&d, "input[type=email]");

    let resolved = generate_unique_selector(email, None);
    assert_eq!(resolved, ResolvedSelector::Unique(r#"[id^="user_email"]"#.into()));
}

#[test]
fn stable_id_is_used_directly() {
    let d = doc(LOGIN_PAGE);
    let pw = find(&d, "input[type=password]");
    assert_eq!(generate_unique_selector(pw, None).as_str(), "#pw");
}

#[test]
fn every_resolved_selector_matches_only_its_element() {
    let d = doc(LOGIN_PAGE);
    let root = d.root_element();
    let resolver = SelectorResolver::default();

    for el in query_all(root, "*") {
        match resolver.resolve(el, None) {
            ResolvedSelector::Unique(s) => {
                let matches = query_all(root, &s);
                assert_eq!(matches.len(), 1, "selector {s} is not unique");
                assert!(matches[0] == el, "selector {s} matched another element");
            }
            ResolvedSelector::BestEffort(s) => assert!(!s.is_empty()),
            ResolvedSelector::NotFound => panic!("element <{}> got no selector", el.value().name()),
        }
    }
}

#[test]
fn resolution_is_idempotent() {
    let d = doc(LOGIN_PAGE);
    let button = find(&d, "button");
    let first = generate_unique_selector(button, None);
    let second = generate_unique_selector(button, None);
    assert_eq!(first, second);
}

#[test]
fn utility_and_generated_classes_are_skipped() {
    let d = doc(
        r#"<div class="card css-1x9f8a2">
             <button class="btn btn-primary sc-a8f9x2">Save</button>
             <button class="btn btn-secondary">Cancel</button>
           </div>"#,
    );
    let save = find(&d, "button");

    let resolved = generate_unique_selector(save, None);
    assert_eq!(resolved.as_str(), "button.btn-primary");
    assert!(!resolved.as_str().contains("a8f9x2"));
}

#[test]
fn scope_limits_uniqueness() {
    let d = doc(r#"<form id="a"><input name="q"></form><form id="b"><input name="q"></form>"#);
    let form_b = find(&d, "#b");
    let input_b = find(&d, "#b input");

    assert_eq!(generate_unique_selector(input_b, Some(form_b)).as_str(), "input[name='q']");

    let global = generate_unique_selector(input_b, None);
    assert_eq!(global.as_str(), "form#b input[name='q']");
    assert!(resolves_uniquely_to(d.root_element(), global.as_str(), input_b));
}

#[test]
fn indistinguishable_elements_get_best_effort() {
    let d = doc("<body><span><input></span><span><input></span></body>");
    let inputs = query_all(d.root_element(), "input");

    let resolved = generate_unique_selector(inputs[1], None);
    assert!(resolved.is_best_effort());
    assert_eq!(resolved.as_str(), "body span input");
}

#[test]
fn classes_that_are_not_css_identifiers_are_skipped() {
    let d = doc(r#"<body><div class="-1box"><input></div><div class="-1box"><input></div></body>"#);
    let inputs = query_all(d.root_element(), "input");

    let resolved = generate_unique_selector(inputs[1], None);
    assert!(resolved.is_best_effort());
    assert!(!resolved.as_str().contains(".-1box"));
    assert!(parse_selector(resolved.as_str()).is_some());
    assert_eq!(resolved.as_str(), "body div[class='-1box'] input");
}

#[test]
fn unparsable_fallback_is_not_found() {
    let d = doc(r#"<body><div><span data-a(b="v"></span><span data-a(b="v"></span></div></body>"#);
    let spans = query_all(d.root_element(), "span");

    assert_eq!(generate_unique_selector(spans[1], None), ResolvedSelector::NotFound);
}

#[test]
fn scope_itself_has_no_selector() {
    let d = doc(LOGIN_PAGE);
    let form = find(&d, "form");
    assert_eq!(generate_unique_selector(form, Some(form)), ResolvedSelector::NotFound);
    assert_eq!(generate_unique_selector(d.root_element(), None), ResolvedSelector::NotFound);
}

#[test]
fn copy_format_wraps_selector() {
    assert_eq!(query_selector_expression("#pw"), "document.querySelector(`#pw`)");
}
