mod handler;
pub mod model;

pub use handler::{create_relationship, delete_relationship, get_relationships};
