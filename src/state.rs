use crate::ledger::ProgressLedger;
use crate::session::SessionStore;
use crate::users::UserStore;
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub ledger: ProgressLedger,
    pub users: UserStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            ledger: ProgressLedger::new(pool.clone()),
            users: UserStore::new(pool),
            sessions: SessionStore::new(),
        }
    }
}
