pub mod directory;
pub mod error;
pub mod hash;
pub mod nets;
pub mod registry;
pub mod users;

use std::sync::Arc;

use directory::UserDirectory;
use registry::NetRegistry;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub directory: UserDirectory,
    pub registry: NetRegistry,
}
