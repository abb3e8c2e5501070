use crate::a2a::agent_card::are_modalities_compatible;
use crate::a2a::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, INTERNAL_ERROR, JSONRPC_VERSION,
};
use crate::a2a::types::{
    Artifact, Message, Part, Task, TaskIdParams, TaskQueryParams, TaskSendParams, TaskState,
    TaskStatus,
};
use crate::research::ResearchOrchestrator;
use crate::types::{ResearchAnswer, ResearchError};
use lru::LruCache;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{info, warn};

/// Bounded in-memory record of tasks, least recently used evicted first.
pub struct TaskStore {
    tasks: Mutex<LruCache<String, Task>>,
}

impl TaskStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            tasks: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.lock().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.lock().contains(id)
    }

    /// Record an incoming `tasks/send`: a new task is created in `submitted`,
    /// a known one gets the message appended to its history.
    pub fn upsert(&self, params: &TaskSendParams) -> Task {
        let mut tasks = self.tasks.lock();

        if let Some(task) = tasks.get_mut(&params.id) {
            task.history.push(params.message.clone());
            return task.clone();
        }

        let task = Task {
            id: params.id.clone(),
            session_id: params
                .session_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
            status: TaskStatus::new(TaskState::Submitted),
            artifacts: Vec::new(),
            history: vec![params.message.clone()],
            metadata: params.metadata.clone(),
        };
        tasks.put(task.id.clone(), task.clone());
        task
    }

    /// Apply `change` to the stored task under the lock and return the
    /// result. A task evicted in the meantime is restored from `current`.
    pub fn update(&self, current: &Task, change: impl FnOnce(&mut Task)) -> Task {
        let mut tasks = self.tasks.lock();
        let task = tasks.get_or_insert_mut(current.id.clone(), || current.clone());
        change(task);
        task.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handles A2A JSON-RPC requests by running research cycles.
pub struct ResearchTaskManager {
    orchestrator: Arc<ResearchOrchestrator>,
    store: TaskStore,
}

impl ResearchTaskManager {
    pub fn new(orchestrator: Arc<ResearchOrchestrator>, task_capacity: usize) -> Self {
        Self {
            orchestrator,
            store: TaskStore::new(task_capacity),
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Decode a raw request body and dispatch it.
    pub async fn handle_payload(&self, body: &[u8]) -> JsonRpcResponse {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => return JsonRpcResponse::error(None, JsonRpcError::parse_error(e)),
        };

        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => return JsonRpcResponse::error(id, JsonRpcError::invalid_request(e)),
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version '{}'",
                    request.jsonrpc
                )),
            );
        }

        self.handle(request).await
    }

    /// Dispatch a decoded request to its method handler.
    pub async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        let outcome = match request.method.as_str() {
            "tasks/send" => self.on_send_task(request.params).await,
            "tasks/get" => self.on_get_task(request.params),
            "tasks/cancel" => self.on_cancel_task(request.params),
            "tasks/sendSubscribe"
            | "tasks/resubscribe"
            | "tasks/pushNotification/set"
            | "tasks/pushNotification/get" => {
                Err(JsonRpcError::unsupported_operation(&request.method))
            }
            other => Err(JsonRpcError::method_not_found(other)),
        };

        match outcome.and_then(|task| {
            serde_json::to_value(task)
                .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, format!("Serialization failed: {}", e)))
        }) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        }
    }

    async fn on_send_task(&self, params: Value) -> Result<Task, JsonRpcError> {
        let params: TaskSendParams = parse_params(params)?;

        if !are_modalities_compatible(params.accepted_output_modes.as_deref()) {
            warn!(
                task_id = %params.id,
                accepted = ?params.accepted_output_modes,
                "Unsupported output mode"
            );
            return Err(JsonRpcError::incompatible_content_types());
        }

        let query = user_query(&params.message)?;

        let task = self.store.upsert(&params);
        let task = self.store.update(&task, |task| {
            task.status = TaskStatus::new(TaskState::Working);
        });

        match self.orchestrator.run(query).await {
            Ok(answer) => {
                let task = self.store.update(&task, |task| {
                    let index = task.artifacts.len() as u32;
                    task.artifacts.push(research_artifact(&answer, index));
                    task.status = TaskStatus::new(TaskState::Completed);
                });

                info!(task_id = %task.id, "Research task completed");
                Ok(match params.history_length {
                    Some(n) => task.with_history_length(Some(n)),
                    None => task,
                })
            }
            Err(e) => {
                self.store.update(&task, |task| {
                    task.status = TaskStatus::new(TaskState::Failed)
                        .with_message(Message::agent_text(e.to_string()));
                });

                Err(research_error_to_rpc(&e))
            }
        }
    }

    fn on_get_task(&self, params: Value) -> Result<Task, JsonRpcError> {
        let params: TaskQueryParams = parse_params(params)?;

        self.store
            .get(&params.id)
            .map(|task| task.with_history_length(params.history_length))
            .ok_or_else(|| JsonRpcError::task_not_found(&params.id))
    }

    fn on_cancel_task(&self, params: Value) -> Result<Task, JsonRpcError> {
        let params: TaskIdParams = parse_params(params)?;

        if self.store.contains(&params.id) {
            Err(JsonRpcError::task_not_cancelable(&params.id))
        } else {
            Err(JsonRpcError::task_not_found(&params.id))
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(params).map_err(JsonRpcError::invalid_params)
}

/// The query is the first part of the message, which must be text.
fn user_query(message: &Message) -> Result<&str, JsonRpcError> {
    match message.parts.first() {
        Some(Part::Text { text, .. }) => Ok(text),
        Some(_) => Err(JsonRpcError::invalid_params("Only text parts are supported")),
        None => Err(JsonRpcError::invalid_params("message has no parts")),
    }
}

/// Package an answer as the task artifact: rendered text plus the
/// structured answer in metadata.
pub fn research_artifact(answer: &ResearchAnswer, index: u32) -> Artifact {
    Artifact {
        name: Some("research".to_string()),
        description: None,
        parts: vec![Part::text(answer.to_text())],
        index,
        metadata: Some(json!({ "answer": answer })),
    }
}

/// Map a failed research cycle onto a JSON-RPC error.
pub fn research_error_to_rpc(err: &ResearchError) -> JsonRpcError {
    let data = match err {
        ResearchError::ResearchUnavailable { phase, .. } => {
            json!({ "kind": err.kind(), "phase": phase })
        }
        _ => json!({ "kind": err.kind() }),
    };

    match err {
        ResearchError::InvalidQuery(_) => JsonRpcError::invalid_params(err).with_data(data),
        _ => JsonRpcError::new(INTERNAL_ERROR, err.to_string()).with_data(data),
    }
}
