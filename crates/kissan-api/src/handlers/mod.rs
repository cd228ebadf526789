mod health;
mod index;
mod tools;

pub use health::health_check;
pub use index::compute_index;
pub use tools::{invoke_tool, list_tools};
