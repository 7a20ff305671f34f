//! Application Services
//!
//! Services that orchestrate domain logic and coordinate between ports.
//!
//! - [`SessionManager`]: hands out a valid session token, logging in only
//!   when the cached one has expired
//! - [`StreamBroadcaster`]: attaches streaming consumers and fans the shared
//!   upstream push feed out to them

mod broadcaster;
mod session;

pub use broadcaster::{ConsumerRegistry, StreamBroadcaster};
pub use session::{SessionError, SessionManager};
