pub mod app;
pub mod config;
pub mod errors;
pub mod goal;
pub mod handlers;
pub mod history;
pub mod ledger;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;
pub mod users;

pub use app::router;
pub use config::Config;
pub use goal::compute_goal;
pub use ledger::{ProgressLedger, Reconciliation};
pub use state::AppState;
pub use storage::{connect, migrate};
