//! Common test utilities for the client integration tests

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

pub mod fixtures;

pub use fixtures::*;

use spaceadmin_client::{AppState, MemoryStorage, Storage};
use spaceadmin_core::Config;
use std::sync::{Arc, Once};
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Configuration pointing at the mock backend
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{}/api/v1", server.uri());
    config.api.request_timeout_secs = Some(10);
    config
}

/// Signed-out state over in-memory storage
pub fn test_state(server: &MockServer) -> (Arc<MemoryStorage>, AppState) {
    let storage = Arc::new(MemoryStorage::new());
    let state = AppState::new(test_config(server), storage.clone() as Arc<dyn Storage>).unwrap();
    (storage, state)
}

/// Signed-in state with `permissions` already fetched
pub fn signed_in_state(
    server: &MockServer,
    permissions: Vec<spaceadmin_core::ModulePermission>,
) -> (Arc<MemoryStorage>, AppState) {
    let (storage, state) = test_state(server);
    {
        let mut session = state.shared_session().write();
        session
            .login("test-token".to_string(), admin_user(Some(2)), None)
            .unwrap();
        session.set_permissions(permissions);
    }
    (storage, state)
}

/// A port nothing listens on
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
