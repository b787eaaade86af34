pub mod routes;
mod server;
pub use server::{app, serve};
pub mod public;
mod shell;
mod state;
pub use state::AppState;
