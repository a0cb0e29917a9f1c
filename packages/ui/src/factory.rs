//! Shared session constructor for all platforms.
//!
//! Returns a [`PortalSession`] whose credential is persisted by the
//! platform-appropriate [`session::CredentialStorage`]:
//! - **Web** (WASM + `web` feature): `window.localStorage`
//! - **Desktop / Mobile** (native): a JSON file under the platform data dir

use api::HttpPortalApi;
use session::{PortalConfig, SessionContext};

/// The session type every screen shares.
pub type PortalSession = SessionContext<HttpPortalApi>;

/// Create the process-wide session for `config`.
pub fn make_session(config: PortalConfig) -> PortalSession {
    let api = HttpPortalApi::new(config.api.base_url.clone());

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        let storage = session::LocalStorage::new(config.storage.key.clone());
        SessionContext::new(config, api, storage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let storage = session::FileStorage::in_data_dir(&config.storage.key);
        SessionContext::new(config, api, storage)
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        SessionContext::new(config, api, session::MemoryStorage::new())
    }
}
