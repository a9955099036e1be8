//! sp-orchestrator: session orchestration for shellport
//!
//! Keeps the catalog of configured servers, decides whether a connect
//! request reuses a live session or opens a new one, builds the exact lines
//! typed into that session, and drives the port-forwarding wizard. The UI
//! shell (prompts, sessions, log surface) is reached only through the
//! traits in `sp_core::traits`.

pub mod auth;
pub mod catalog;
pub mod command;
pub mod commands;
pub mod forwarding;
pub mod mapper;
pub mod orchestrator;
pub mod session;
pub mod ssh;
pub mod state;

pub use catalog::{ServerCatalog, ServerEntry};
pub use commands::Commands;
pub use forwarding::{ForwardingKind, ForwardingWizard, WizardOutcome};
pub use orchestrator::{ConnectionOrchestrator, SessionOutcome};
pub use session::{SessionDescriptor, SessionHandle, SessionRegistry};
pub use ssh::check_ssh_executable;
pub use state::{FastOpenTarget, OrchestratorState};
