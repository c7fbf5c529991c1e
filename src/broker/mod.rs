//! Session core: phases, the rendezvous hand-off cell, the session registry
//! and its eviction sweeper.

mod config;
mod handoff;
mod phase;
mod registry;
mod session;

pub use config::BrokerConfig;
pub use handoff::{Handoff, HandoffTimeout};
pub use phase::Phase;
pub use registry::{spawn_sweeper, SessionRegistry, Sweeper};
pub use session::{Session, Snapshot};
