pub mod classifier;
pub mod form_model;
pub mod graph;
pub mod label;

pub use classifier::determine_element_type;
pub use form_model::{Attributes, FieldType, FormElement, FormGroup, FormGroups, Position};
pub use graph::{FormScanner, ScanConfig};
pub use label::get_label_text;
