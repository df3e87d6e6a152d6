mod handler;
pub mod model;

pub use handler::{create_character, delete_character, get_character, update_character};
