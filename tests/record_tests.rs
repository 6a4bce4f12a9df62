use formscout::form::form_model::FieldType;
use formscout::record::recorder::{click_text, find_parent_form};
use formscout::record::{Interaction, RecordedEvent, Recorder};
use formscout::selector::SelectorResolver;

mod common;
use crate::common::utils::{LOGIN_PAGE, doc, find};

const URL: &str = "https://example.com/login";

fn recorder() -> Recorder {
    Recorder::new(SelectorResolver::default(), URL)
}

// ============================================================================
// Clicks
// ============================================================================

#[test]
fn clicks_are_ignored_until_started() {
    let d = doc(LOGIN_PAGE);
    let mut rec = recorder();

    assert!(rec.record_click(find(&d, "button"), &d).is_none());
    assert!(rec.records().is_empty());
    assert!(!rec.is_recording());
}

#[test]
fn click_inside_a_form_is_scoped_to_it() {
    let d = doc(LOGIN_PAGE);
    let mut rec = recorder();
    rec.start(0.0, 0.0);

    let record = rec.record_click(find(&d, "button"), &d).cloned().expect("recorded");
    assert_eq!(record.url, URL);

    let click = record.click().expect("click event");
    assert_eq!(click.selector, "button[type='submit']");
    assert_eq!(click.form_selector.as_deref(), Some("#login-form"));
    assert_eq!(click.text, "Sign in");
    assert_eq!(click.tag_name, "button");
    assert_eq!(click.class_name, "btn-primary");
    assert_eq!(click.id, "");
    assert_eq!(click.element_type, FieldType::Click);
}

#[test]
fn click_on_a_field_captures_label_and_type() {
    let d = doc(LOGIN_PAGE);
    let mut rec = recorder();
    rec.start(0.0, 0.0);

    let record = rec.record_click(find(&d, "input[type=email]"), &d).cloned().unwrap();
    let click = record.click().unwrap();

    assert_eq!(click.selector, r#"[id^="user_email"]"#);
    assert_eq!(click.id, "user_email_8f3x9q");
    assert_eq!(click.label, "Email");
    assert_eq!(click.text, "");
    assert_eq!(click.element_type, FieldType::Email);
}

#[test]
fn click_outside_forms_has_no_form_selector() {
    let d = doc(LOGIN_PAGE);
    let mut rec = recorder();
    rec.start(0.0, 0.0);

    let record = rec.record_click(find(&d, "a"), &d).cloned().unwrap();
    let click = record.click().unwrap();
    assert_eq!(click.selector, "a[href='/forgot']");
    assert!(click.form_selector.is_none());
    assert_eq!(click.text, "Forgot password?");
}

#[test]
fn records_survive_stop_and_restart() {
    let d = doc(LOGIN_PAGE);
    let mut rec = recorder();

    rec.start(0.0, 0.0);
    rec.record_click(find(&d, "#pw"), &d);
    rec.stop();
    assert!(rec.record_click(find(&d, "button"), &d).is_none());

    rec.start(0.0, 0.0);
    rec.record_click(find(&d, "button"), &d);

    let records = rec.into_records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.is_click()));
}

// ============================================================================
// Scrolls
// ============================================================================

#[test]
fn one_scroll_per_sequence_between_clicks() {
    let d = doc(LOGIN_PAGE);
    let mut rec = recorder();
    rec.start(0.0, 0.0);

    assert!(rec.record_scroll(0.0, 0.0).is_none(), "position unchanged");
    assert!(rec.record_scroll(300.0, 0.0).is_some());
    assert!(rec.record_scroll(600.0, 0.0).is_none(), "same sequence");

    rec.record_click(find(&d, "#pw"), &d);
    assert!(rec.record_scroll(600.0, 0.0).is_some());

    let kinds: Vec<bool> = rec.records().iter().map(|r| r.is_click()).collect();
    assert_eq!(kinds, vec![false, true, false]);
    assert_eq!(
        rec.records()[2].event,
        RecordedEvent::Scroll { scroll_top: 600.0, scroll_left: 0.0 }
    );
}

#[test]
fn start_position_counts_as_last_scroll() {
    let mut rec = recorder();
    rec.start(250.0, 10.0);
    assert!(rec.record_scroll(250.0, 10.0).is_none());
    assert!(rec.record_scroll(250.0, 0.0).is_some());

    rec.stop();
    assert!(rec.record_scroll(900.0, 0.0).is_none());
}

// ============================================================================
// Helpers and wire shape
// ============================================================================

#[test]
fn click_text_rules() {
    let long = "x".repeat(60);
    let d = doc(&format!(
        r#"<div id="long">{long}</div>
           <input id="go" type="submit" value="Go">
           <input id="send" type="button" value="" placeholder="Send">
           <input id="name" type="text" value="Ada">
           <a id="link" href="/x">  Terms  </a>"#
    ));

    assert_eq!(click_text(find(&d, "#long")), format!("{}...", "x".repeat(50)));
    assert_eq!(click_text(find(&d, "#go")), "Go");
    assert_eq!(click_text(find(&d, "#send")), "Send");
    assert_eq!(click_text(find(&d, "#name")), "");
    assert_eq!(click_text(find(&d, "#link")), "Terms");
}

#[test]
fn parent_form_lookup() {
    let d = doc(LOGIN_PAGE);
    let form = find_parent_form(find(&d, "#pw")).expect("inside form");
    assert_eq!(form.value().id(), Some("login-form"));
    assert!(find_parent_form(find(&d, "a")).is_none());
}

#[test]
fn click_record_wire_shape() {
    let d = doc(LOGIN_PAGE);
    let mut rec = recorder();
    rec.start(0.0, 0.0);
    let record = rec.record_click(find(&d, "#pw"), &d).cloned().unwrap();

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["type"], "click");
    assert_eq!(value["selector"], "#pw");
    assert_eq!(value["tagName"], "input");
    assert_eq!(value["elementType"], "password");
    assert_eq!(value["formSelector"], "#login-form");
    assert_eq!(value["url"], URL);
}

#[test]
fn interactions_parse_from_json() {
    let events: Vec<Interaction> = serde_json::from_str(
        r##"[{"type":"scroll","top":120,"left":0},{"type":"click","selector":"#pw"}]"##,
    )
    .unwrap();
    assert_eq!(
        events,
        vec![
            Interaction::Scroll { top: 120.0, left: 0.0 },
            Interaction::Click { selector: "#pw".into() },
        ]
    );
}
