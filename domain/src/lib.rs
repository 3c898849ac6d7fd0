pub mod engagement;
pub mod error;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod scenario;
pub mod session;
