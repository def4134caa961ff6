pub mod analytics;
pub mod assets;
pub mod core;
pub mod notes;
pub mod reports;
pub mod roster;
