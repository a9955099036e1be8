//! Session management

mod registry;

pub use registry::{Acquired, SessionDescriptor, SessionHandle, SessionRegistry};
