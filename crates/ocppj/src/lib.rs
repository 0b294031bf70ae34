//! Top-level facade crate for ocppj.
//!
//! Re-exports the envelope/type layer and the dispatch library so users can
//! depend on a single crate.

pub mod core {
    pub use ocppj_core::*;
}

pub mod dispatch {
    pub use ocppj_dispatch::*;
}

pub use ocppj_core::protocol::{parse, Envelope};
pub use ocppj_dispatch::{AppState, Dispatched, Dispatcher, Registry};
