mod handler;
pub mod model;

pub use handler::{
    create_decision, create_journal_entry, delete_decision, delete_journal_entry, get_decisions,
    get_journal,
};
