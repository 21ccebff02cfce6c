pub mod json;

pub use json::{JsonFileStorage, export_json_to_path, import_json};
