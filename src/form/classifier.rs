use scraper::{ElementRef, Html};

use crate::form::form_model::FieldType;
use crate::form::label::label_for;

// ============================================================================
// Keyword tables (ordered, first matching entry wins)
// ============================================================================

/// Label text patterns (case-insensitive substring match).
pub const LABEL_PATTERNS: &[(FieldType, &[&str])] = &[
    (FieldType::Email, &["email"]),
    (FieldType::Password, &["password", "pwd"]),
    (FieldType::FirstName, &["firstname", "first name", "first", "fname"]),
    (FieldType::LastName, &["lastname", "last name", "last", "lname"]),
    (FieldType::Name, &["full"]),
    (FieldType::Phone, &["phone", "telephone", "tel"]),
    (FieldType::Birthday, &["birth", "dob"]),
    (FieldType::Zip, &["zip", "postal", "code"]),
    (FieldType::Number, &["number", "num"]),
    (FieldType::City, &["city"]),
    (FieldType::State, &["state"]),
    (FieldType::Address, &["address"]),
];

/// Selector text patterns, used when no label matched.
pub const SELECTOR_PATTERNS: &[(FieldType, &[&str])] = &[
    (FieldType::Options, &["queryselectorall"]),
    (FieldType::Links, &["[href"]),
    (FieldType::Click, &["button", "btn", "submit"]),
    (FieldType::Email, &["email"]),
    (FieldType::Password, &["password", "pwd"]),
    (FieldType::FirstName, &["firstname", "first_name", "fname", "first"]),
    (FieldType::LastName, &["lastname", "last_name", "lname", "last"]),
    (FieldType::Phone, &["phone", "tel"]),
    (FieldType::Birthday, &["birth", "dob"]),
    (FieldType::Zip, &["zip", "postal", "code", "loc"]),
    (FieldType::Number, &["number", "num"]),
    (FieldType::Text, &["search"]),
];

// ============================================================================
// Classification
// ============================================================================

/// Classify an element: structural type first, then label text, then the
/// selector itself. Always returns a type; `Text` is the final fallback.
pub fn determine_element_type(el: ElementRef<'_>, selector: &str, doc: &Html) -> FieldType {
    let tag = el.value().name().to_ascii_lowercase();
    let base = base_type(&tag, el.value().attr("type"));
    if base != FieldType::Text {
        return base;
    }

    let label = label_for(el, doc);
    if let Some(t) = match_table(LABEL_PATTERNS, &label) {
        return t;
    }

    match_table(SELECTOR_PATTERNS, selector).unwrap_or(FieldType::Text)
}

/// Type implied by tag and `type` attribute alone. `Text` is provisional.
pub fn base_type(tag: &str, input_type: Option<&str>) -> FieldType {
    match tag {
        "select" => FieldType::Select,
        "button" => FieldType::Click,
        "textarea" => FieldType::Text,
        "input" => match input_type.map(str::to_ascii_lowercase).as_deref() {
            Some("password") => FieldType::Password,
            Some("email") => FieldType::Email,
            Some("number") => FieldType::Number,
            Some("checkbox" | "radio" | "button") => FieldType::Click,
            Some("file") => FieldType::File,
            _ => FieldType::Text,
        },
        _ => FieldType::Click,
    }
}

/// First table entry with any pattern contained in `text` (case-insensitive).
pub fn match_table(table: &[(FieldType, &[&str])], text: &str) -> Option<FieldType> {
    if text.is_empty() {
        return None;
    }

    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(t, _)| t.clone())
}
