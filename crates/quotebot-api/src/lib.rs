pub mod commands;
pub mod gate;
pub mod quotes;
pub mod routes;
pub mod selector;
pub mod state;
