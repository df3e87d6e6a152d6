mod handler;
pub mod model;

pub use handler::{create_condition, delete_condition, get_conditions};
