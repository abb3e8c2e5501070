//! Agent-to-Agent (A2A) protocol adapter
//!
//! Translates A2A JSON-RPC requests into research cycles and packages the
//! outcome as A2A tasks.
//!
//! # Methods
//!
//! | Method | Behaviour |
//! |--------|-----------|
//! | `tasks/send` | runs a research cycle, returns the completed task |
//! | `tasks/get` | returns a remembered task |
//! | `tasks/cancel` | tasks finish synchronously, so never cancelable |
//! | `tasks/sendSubscribe`, `tasks/resubscribe`, `tasks/pushNotification/*` | unsupported |
//!
//! The query is the first part of the incoming message and must be text.
//! A successful task carries one `research` artifact whose text part is the
//! summary followed by a `Sources:` list, with the structured answer under
//! `metadata.answer`.

pub mod agent_card;
/// JSON-RPC envelope and error codes.
pub mod protocol;
pub mod task_manager;
/// Task, message and artifact types.
pub mod types;

pub use agent_card::AgentCard;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use task_manager::{ResearchTaskManager, TaskStore};
pub use types::{Artifact, Message, Part, Task, TaskState, TaskStatus};
