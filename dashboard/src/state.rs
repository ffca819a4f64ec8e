//! Store state management

use crate::types::StoreState;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared store state wrapper
pub type SharedStoreState = Arc<RwLock<StoreState>>;

/// Create new shared store state
pub fn create_shared_state(state: StoreState) -> SharedStoreState {
    Arc::new(RwLock::new(state))
}
