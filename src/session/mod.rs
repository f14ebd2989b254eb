mod context;
mod role;
mod storage;

pub use context::{SessionContext, COOKIE_KEY, ROLE_KEY, TOKEN_KEY};
pub use role::Role;
pub use storage::{LocalStorage, StorageEvent, TabId};
