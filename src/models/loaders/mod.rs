pub mod image_loader;
pub mod toml_loader;

pub use image_loader::load_sheet_image;
pub use toml_loader::{load_answer_key, parse_answer_key};
