mod handler;
pub mod model;

pub use handler::{create_item, delete_item, get_inventory, update_item};
