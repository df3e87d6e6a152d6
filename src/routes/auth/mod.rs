mod handler;
pub mod model;

pub use handler::{login, refresh, revoke_tokens, signup, userinfo};
