mod handler;
pub mod model;

pub use handler::{
    create_spell, delete_spell, get_spells, reset_spells, update_spell, use_spell,
};
