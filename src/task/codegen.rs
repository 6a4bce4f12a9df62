use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::form::form_model::FieldType;
use crate::selector::RandomnessHeuristic;
use crate::task::js::{string_literal, template_literal};
use crate::task::task_model::{TaskConfig, TaskNode};
use crate::task::validation::{TaskConfigError, task_path, validate_config};

/// Indentation of node statements inside the form branch.
const NODE_INDENT: &str = "    ";

// ============================================================================
// Generator configuration
// ============================================================================

/// Knobs of the emitted script. Defaults match the replay runtime's
/// expectations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Global object exposing the replay runtime
    pub namespace: String,

    /// Pause before every node action
    pub action_delay_ms: u64,

    /// Timeout passed to element waits inside an iframe document
    pub iframe_wait_timeout_ms: u64,

    /// Pause after the success element appears, before polling its text
    pub success_settle_ms: u64,

    /// Interval of the success text poll
    pub success_poll_ms: u64,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            namespace: "steamBack".to_string(),
            action_delay_ms: 1500,
            iframe_wait_timeout_ms: 10_000,
            success_settle_ms: 2000,
            success_poll_ms: 1000,
        }
    }
}

// ============================================================================
// Task code generator
// ============================================================================

/// Turns a validated [`TaskConfig`] into a replay script.
#[derive(Debug, Clone, Default)]
pub struct TaskCodeGenerator {
    config: CodegenConfig,
    heuristic: RandomnessHeuristic,
}

impl TaskCodeGenerator {
    pub fn new(config: CodegenConfig, heuristic: RandomnessHeuristic) -> Self {
        Self { config, heuristic }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Validate `task` and emit its script. Nothing is emitted on error.
    pub fn generate(&self, task: &TaskConfig) -> Result<String, TaskConfigError> {
        validate_config(task, &self.heuristic)?;
        let path = task_path(&task.url)?;

        let nodes: Vec<&TaskNode> = task
            .node
            .iter()
            .filter(|n| !n.selector.trim().is_empty())
            .collect();
        debug!(nodes = nodes.len(), skipped = task.node.len() - nodes.len(), "generating task code");

        let mut ctx = EmitContext::new(&self.config, task.iframe_selector().is_some());

        let blocks: Vec<String> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let lines = ctx.node_lines(node, i, i + 1 == nodes.len());
                indent(&lines, NODE_INDENT)
            })
            .collect();

        let mut sections = vec![ctx.form_init()];
        if !blocks.is_empty() {
            sections.push(blocks.join("\n\n"));
        }
        if let Some(success) = task.success_selector() {
            sections.push(ctx.success_block(success, task.success_text()));
        }
        let form_body = sections.join("\n\n");

        let form_selector = task.form_selector.trim();
        let form_check = match task.iframe_selector() {
            Some(iframe) => ctx.iframe_form_check(iframe, form_selector, &form_body),
            None => ctx.form_check(form_selector, &form_body),
        };

        Ok(ctx.task_wrapper(&path, &form_check))
    }
}

/// Generate with default settings. Invalid configs yield an empty string
/// and a logged warning.
pub fn generate_task_code(config: &TaskConfig) -> String {
    match TaskCodeGenerator::default().generate(config) {
        Ok(code) => code,
        Err(e) => {
            warn!(error = %e, "task config rejected; no code generated");
            String::new()
        }
    }
}

/// Variable name for a node: `submitBtn` for a final click, otherwise the
/// field type's wire name.
pub fn variable_name(field_type: &FieldType, index: usize, is_last: bool) -> String {
    if *field_type == FieldType::Click && is_last {
        return "submitBtn".to_string();
    }

    let name = field_type.wire_name();
    if crate::task::js::is_identifier(name) {
        name.to_string()
    } else {
        format!("element{index}")
    }
}

// ============================================================================
// Per-call emission state
// ============================================================================

/// Counters that must restart with every generation call.
struct EmitContext<'c> {
    config: &'c CodegenConfig,
    in_iframe: bool,
    type_counts: HashMap<String, usize>,
    options_counter: usize,
}

impl<'c> EmitContext<'c> {
    fn new(config: &'c CodegenConfig, in_iframe: bool) -> Self {
        Self {
            config,
            in_iframe,
            type_counts: HashMap::new(),
            options_counter: 0,
        }
    }

    fn ns(&self) -> &str {
        &self.config.namespace
    }

    /// Wait-for-element call, scoped to the iframe document when needed.
    fn wait_expr(&self, selector: &str) -> String {
        let ns = self.ns();
        let lit = template_literal(selector);
        if self.in_iframe {
            format!(
                "{ns}.waitForElementObserver({lit}, iframeDoc.body, {}, iframeDoc)",
                self.config.iframe_wait_timeout_ms
            )
        } else {
            format!("{ns}.waitForElementObserver({lit})")
        }
    }

    fn element_var(&mut self, node: &TaskNode, index: usize, is_last: bool) -> String {
        let base = variable_name(&node.field_type, index, is_last);
        let count = self
            .type_counts
            .entry(node.field_type.wire_name().to_string())
            .or_insert(0);
        *count += 1;

        if *count > 1 {
            format!("{base}Ele{count}")
        } else {
            format!("{base}Ele")
        }
    }

    fn node_lines(&mut self, node: &TaskNode, index: usize, is_last: bool) -> Vec<String> {
        let var = self.element_var(node, index, is_last);
        let mut lines = Vec::new();

        if node.wait_for_element {
            let selector = match node.parent_selector.as_deref().filter(|p| !p.is_empty()) {
                Some(parent) => format!("{parent} {}", node.selector),
                None => node.selector.clone(),
            };
            lines.push(format!("const {var} = await {};", self.wait_expr(&selector)));
        } else {
            lines.push(format!("const {var} = form.querySelector({});", template_literal(&node.selector)));
        }

        if node.scroll {
            lines.push(format!("await {}.scrollToWithPromise({var});", self.ns()));
        }

        lines.extend(self.action_lines(node, &var, is_last));
        lines
    }

    fn action_lines(&mut self, node: &TaskNode, var: &str, is_last: bool) -> Vec<String> {
        let ns = self.ns().to_string();
        let delay = format!("await {ns}.wait({});", self.config.action_delay_ms);

        let action = match &node.field_type {
            FieldType::Click if is_last => {
                format!("{ns}.createSubmit ? {ns}.createSubmit({var}, 'monitor') : {ns}.createClick({var});")
            }
            FieldType::Click => format!("{ns}.createClick({var});"),
            FieldType::Options => {
                self.options_counter += 1;
                let options_var = format!("option{}", self.options_counter);
                let doc = if self.in_iframe { "iframeDoc" } else { "document" };
                return vec![
                    delay,
                    format!("const {options_var} = {doc}.querySelectorAll({});", template_literal(&node.selector)),
                    format!("{ns}.createClick({ns}.generatorApi.getRandomElement({options_var}));"),
                ];
            }
            FieldType::Select => format!("{ns}.fillSelectField({var});"),
            other => match fill_value(&ns, other) {
                Some(value) => format!("{ns}.setValue({var}, {value}, true);"),
                None => {
                    let name = other.wire_name().replace(['\n', '\r'], " ");
                    return vec![format!("// unhandled type: {name}")];
                }
            },
        };

        vec![delay, action]
    }

    fn form_init(&self) -> String {
        let ns = self.ns();
        [
            format!("await {ns}.scrollToWithPromise(form);"),
            format!("const user = await {ns}.getUserInfo();"),
            format!("{ns}.trackInfo('form', 'start fill form');"),
        ]
        .iter()
        .map(|l| format!("{NODE_INDENT}{l}"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    fn success_block(&self, selector: &str, text: Option<&str>) -> String {
        let ns = self.ns();
        let wait = self.wait_expr(selector);

        let lines = match text {
            Some(text) => vec![
                format!("const success = await {wait};"),
                "if (success) {".to_string(),
                format!("  {ns}.trackInfo('form', 'success wrap found');"),
                format!("  await {ns}.wait({});", self.config.success_settle_ms),
                format!("  await {ns}.scrollToWithPromise(success);"),
                format!("  {ns}.waitForElementVisible(success, (isVisible) => {{"),
                "    if (isVisible) {".to_string(),
                "      const timer = setInterval(() => {".to_string(),
                format!(
                    "        if (success.innerText.toLowerCase().includes({}.toLowerCase())) {{",
                    string_literal(text)
                ),
                "          clearInterval(timer);".to_string(),
                format!("          {ns}.trackInfo('form', 'success message is visible');"),
                "          console.log('form submit success!');".to_string(),
                format!("          {ns}.finish('form');"),
                "        }".to_string(),
                format!("      }}, {});", self.config.success_poll_ms),
                "    }".to_string(),
                "  });".to_string(),
                "} else {".to_string(),
                format!("  {ns}.trackInfo('form', 'success wrap not found');"),
                "}".to_string(),
            ],
            None => vec![
                format!("const success = await {wait};"),
                "if (success) {".to_string(),
                format!("  {ns}.trackInfo('form', 'success message is visible');"),
                "  console.log('form submit success!');".to_string(),
                format!("  {ns}.finish('form');"),
                "}".to_string(),
            ],
        };

        indent(&lines, NODE_INDENT)
    }

    fn form_check(&self, form_selector: &str, body: &str) -> String {
        let lookup = format!("  const form = await {};", self.wait_expr(form_selector));
        self.guarded(&[lookup], body)
    }

    fn iframe_form_check(&self, iframe_selector: &str, form_selector: &str, body: &str) -> String {
        let ns = self.ns();
        let lookups = [
            format!(
                "  const iframeEle = await {ns}.waitForElementObserver({});",
                template_literal(iframe_selector)
            ),
            "  const iframeDoc = iframeEle.contentDocument;".to_string(),
            format!("  const form = await {};", self.wait_expr(form_selector)),
        ];
        self.guarded(&lookups, body)
    }

    /// Lookups followed by the form branch and its "not found" diagnostic.
    fn guarded(&self, lookups: &[String], body: &str) -> String {
        let ns = self.ns();
        let mut out = lookups.join("\n");
        out.push_str("\n  if (form) {\n");
        out.push_str(body);
        out.push_str(&format!(
            "\n  }} else {{\n    {ns}.trackInfo('form', 'form not found');\n  }}"
        ));
        out
    }

    fn task_wrapper(&self, path: &str, body: &str) -> String {
        format!(
            "await {}.task(\n  {},\n  async () => {{\n{body}\n  }}\n);",
            self.ns(),
            string_literal(path)
        )
    }
}

/// Value expression for field types filled through `setValue`. Profile
/// values win over generated ones where the profile has a matching field.
fn fill_value(ns: &str, field_type: &FieldType) -> Option<String> {
    let (profile, generator) = match field_type {
        FieldType::Email => (Some("email"), "generateEmail"),
        FieldType::Name => (Some("name"), "generateName"),
        FieldType::FirstName => (Some("firstName"), "generateFirstName"),
        FieldType::LastName => (Some("lastName"), "generateLastName"),
        FieldType::Phone => (Some("phone"), "generatePhone"),
        FieldType::Zip => (Some("postCode"), "generateZip"),
        FieldType::City => (Some("city"), "generateCity"),
        FieldType::Address => (Some("address1"), "generateAddress"),
        FieldType::Text => (None, "generateText"),
        FieldType::Password => (None, "generatePassword"),
        FieldType::Birthday => (None, "generateBirthday"),
        FieldType::State => (None, "generateState"),
        FieldType::Number => return Some(format!("{ns}.generatorApi.generateNumber() + ''")),
        _ => return None,
    };

    Some(match profile {
        Some(field) => format!("user.{field} || {ns}.generatorApi.{generator}()"),
        None => format!("{ns}.generatorApi.{generator}()"),
    })
}

fn indent(lines: &[String], prefix: &str) -> String {
    lines
        .iter()
        .map(|l| format!("{prefix}{l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_click_is_submit() {
        assert_eq!(variable_name(&FieldType::Click, 3, true), "submitBtn");
        assert_eq!(variable_name(&FieldType::Click, 0, false), "click");
        assert_eq!(variable_name(&FieldType::FirstName, 1, false), "firstName");
        assert_eq!(variable_name(&FieldType::Other("my-type".into()), 4, false), "element4");
    }

    #[test]
    fn fill_values_prefer_profile() {
        assert_eq!(
            fill_value("rt", &FieldType::Zip).unwrap(),
            "user.postCode || rt.generatorApi.generateZip()"
        );
        assert_eq!(fill_value("rt", &FieldType::State).unwrap(), "rt.generatorApi.generateState()");
        assert!(fill_value("rt", &FieldType::File).is_none());
    }
}
