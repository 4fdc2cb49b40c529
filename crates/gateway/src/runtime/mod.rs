pub mod session_lock;

pub use session_lock::{SessionBusy, SessionLockMap};
