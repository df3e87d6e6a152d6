pub mod ability;
pub mod auth;
pub mod character;
pub mod condition;
pub mod inventory;
pub mod misc;
pub mod notes;
pub mod relationship;
pub mod spell;
