pub mod codegen;
pub mod js;
pub mod task_model;
pub mod validation;

pub use codegen::{CodegenConfig, TaskCodeGenerator, generate_task_code};
pub use task_model::{TaskConfig, TaskNode};
pub use validation::{TaskConfigError, validate_config};
