mod handler;
pub mod model;

pub use handler::{create_ability, delete_ability, get_abilities, reset_abilities, update_ability};
