use crate::entry_log::{EntryLog, StoreBackend};
use crate::store::KvStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub log: EntryLog<StoreBackend>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, secure_cookies: bool) -> Self {
        Self {
            log: EntryLog::new(StoreBackend::new(store)),
            secure_cookies,
        }
    }
}
