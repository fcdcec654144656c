pub mod console;
pub mod json;

pub use console::format_report;
pub use json::{to_json_pretty, write_json};
