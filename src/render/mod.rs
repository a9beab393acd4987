//! Output rendering for reconciled pages.

mod json;
mod result;

pub use json::{to_json, write_json, JsonFormat};
pub use result::ElementStats;
