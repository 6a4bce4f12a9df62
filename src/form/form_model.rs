use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Semantic field types
// ============================================================================

/// Semantic classification of a form control.
///
/// Serialized as the camelCase wire name (`"email"`, `"firstName"`, ...).
/// Names this crate does not know survive a round trip as [`FieldType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Options,
    Email,
    Text,
    Click,
    Number,
    Password,
    Name,
    FirstName,
    LastName,
    Phone,
    Birthday,
    Zip,
    Select,
    City,
    State,
    Address,
    File,
    Links,
    Other(String),
}

impl FieldType {
    pub const ALL: [FieldType; 18] = [
        FieldType::Options,
        FieldType::Email,
        FieldType::Text,
        FieldType::Click,
        FieldType::Number,
        FieldType::Password,
        FieldType::Name,
        FieldType::FirstName,
        FieldType::LastName,
        FieldType::Phone,
        FieldType::Birthday,
        FieldType::Zip,
        FieldType::Select,
        FieldType::City,
        FieldType::State,
        FieldType::Address,
        FieldType::File,
        FieldType::Links,
    ];

    pub fn wire_name(&self) -> &str {
        match self {
            FieldType::Options => "options",
            FieldType::Email => "email",
            FieldType::Text => "text",
            FieldType::Click => "click",
            FieldType::Number => "number",
            FieldType::Password => "password",
            FieldType::Name => "name",
            FieldType::FirstName => "firstName",
            FieldType::LastName => "lastName",
            FieldType::Phone => "phone",
            FieldType::Birthday => "birthday",
            FieldType::Zip => "zip",
            FieldType::Select => "select",
            FieldType::City => "city",
            FieldType::State => "state",
            FieldType::Address => "address",
            FieldType::File => "file",
            FieldType::Links => "links",
            FieldType::Other(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::ALL
            .iter()
            .find(|t| t.wire_name() == name)
            .cloned()
            .unwrap_or(FieldType::Other(name))
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        FieldType::from(name.to_string())
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.wire_name().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ============================================================================
// Parsed page model
// ============================================================================

/// Rendered bounding box in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Position {
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.left == 0.0 && self.width == 0.0 && self.height == 0.0
    }
}

/// DOM attributes of an element, kept in document order. Serialized as a
/// JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Attributes(iter.into_iter().collect())
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributesVisitor)
    }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = Attributes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of attribute names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Attributes, A::Error> {
        let mut attrs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, String>()? {
            attrs.push(entry);
        }
        Ok(Attributes(attrs))
    }
}

/// One classified interactive element. Built fresh on each parse pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormElement {
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Unique within the owning form (if any) or the document.
    pub selector: String,

    pub tag: String,

    pub attributes: Attributes,

    pub position: Position,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe_index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_selector: Option<String>,

    /// Selector could not be verified unique.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub best_effort: bool,
}

/// A `<form>` or the bucket of interactive elements outside any form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormGroup {
    pub name: String,
    pub action: String,
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe_selector: Option<String>,

    pub elements: Vec<FormElement>,
}

/// Key of the bucket holding elements outside any form.
pub const NON_FORM_KEY: &str = "non_form_elements";

/// All groups of one parse pass, keyed by form identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormGroups {
    pub forms: BTreeMap<String, FormGroup>,
}

impl FormGroups {
    pub fn total_elements(&self) -> usize {
        self.forms.values().map(|g| g.elements.len()).sum()
    }

    pub fn get(&self, key: &str) -> Option<&FormGroup> {
        self.forms.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Drop elements with an all-zero box (hidden or never rendered) and
    /// any group left empty.
    pub fn without_zero_positions(mut self) -> Self {
        for group in self.forms.values_mut() {
            group.elements.retain(|e| !e.position.is_zero());
        }
        self.forms.retain(|_, g| !g.elements.is_empty());
        self
    }

    /// SHA-1 of the serialized snapshot. Equal snapshots share a fingerprint
    /// because groups are kept in a sorted map.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let json = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha1::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Drop the non-form buckets.
    pub fn without_non_form(mut self) -> Self {
        self.forms.retain(|key, _| !key.ends_with(NON_FORM_KEY));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_wire_names_round_trip() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::from(t.wire_name()), t);
        }
        assert_eq!(FieldType::from("signature"), FieldType::Other("signature".into()));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let empty = FormGroups::default();
        let mut one = FormGroups::default();
        one.forms.insert(
            NON_FORM_KEY.to_string(),
            FormGroup {
                name: NON_FORM_KEY.to_string(),
                action: String::new(),
                method: String::new(),
                selector: None,
                iframe_selector: None,
                elements: Vec::new(),
            },
        );

        assert_eq!(empty.fingerprint(), FormGroups::default().fingerprint());
        assert_ne!(empty.fingerprint(), one.fingerprint());
        assert_eq!(empty.fingerprint().len(), 40);
    }

    #[test]
    fn field_type_serializes_as_wire_name() {
        let json = serde_json::to_string(&FieldType::FirstName).unwrap();
        assert_eq!(json, "\"firstName\"");
    }
}
