use database::{
    clock::{Clock, utc_now},
    services::{catalog::DbTableCatalog, ledger::DbBalanceLedger, reservation::ReservationEngine},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub engine: Arc<ReservationEngine>,
    pub ledger: DbBalanceLedger,
    pub clock: Clock,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_clock(db, utc_now)
    }

    pub fn with_clock(db: DatabaseConnection, clock: Clock) -> Self {
        let ledger = DbBalanceLedger::new(clock);
        let engine = ReservationEngine::new(db.clone(), DbTableCatalog, ledger, clock);

        Self {
            db,
            engine: Arc::new(engine),
            ledger,
            clock,
        }
    }

    pub fn now(&self) -> chrono::NaiveDateTime {
        (self.clock)()
    }
}
