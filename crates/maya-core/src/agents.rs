//! Persona agents (Maya and Zoey): a read-only registry of workers per mode,
//! each exposing named functions that turn request params into a feedback line.

use crate::error::{ChatError, ChatResult};
use crate::modes::Mode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/maya` and `POST /api/zoey`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// A callable capability of a worker.
pub struct PersonaFunction {
    pub name: &'static str,
    pub description: &'static str,
    /// Param names read from the request, in order.
    pub args: &'static [&'static str],
    feedback: fn(&[String]) -> String,
}

impl PersonaFunction {
    /// Reads every argument from `params` and renders the feedback.
    pub fn execute(&self, params: &Map<String, Value>) -> ChatResult<String> {
        let mut values = Vec::with_capacity(self.args.len());
        for arg in self.args {
            let value = match params.get(*arg) {
                Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => return Err(ChatError::MissingInput((*arg).to_string())),
            };
            values.push(value);
        }
        Ok((self.feedback)(&values))
    }
}

impl std::fmt::Debug for PersonaFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonaFunction")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

/// The functions one agent offers in one mode.
#[derive(Debug)]
pub struct PersonaWorker {
    pub id: String,
    pub name: String,
    pub description: &'static str,
    pub mode: Mode,
    /// Function run by `chat` when the request names none.
    pub primary: &'static str,
    pub functions: Vec<PersonaFunction>,
}

impl PersonaWorker {
    pub fn function(&self, name: &str) -> Option<&PersonaFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[derive(Debug)]
pub struct PersonaAgent {
    pub name: &'static str,
    pub workers: Vec<PersonaWorker>,
}

impl PersonaAgent {
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Worker for `mode`; unknown or unsupported modes are `InvalidMode`.
    pub fn worker(&self, mode: &str) -> ChatResult<&PersonaWorker> {
        let parsed: Mode = mode.parse()?;
        self.workers
            .iter()
            .find(|w| w.mode == parsed)
            .ok_or_else(|| ChatError::InvalidMode(mode.to_string()))
    }

    pub fn modes(&self) -> Vec<&'static str> {
        self.workers.iter().map(|w| w.mode.as_str()).collect()
    }

    /// Handles one request. `api_key` is the agent platform key; without it
    /// nothing runs.
    pub fn handle(&self, request: &PersonaRequest, api_key: Option<&str>) -> ChatResult<PersonaReply> {
        if api_key.map_or(true, |k| k.trim().is_empty()) {
            return Err(ChatError::Config("API key is not configured".to_string()));
        }

        match request.action.as_deref() {
            Some("start") => {
                tracing::info!(target: "maya::agents", agent = self.name, "agent started");
                Ok(PersonaReply {
                    message: format!("{} initialized and running", self.name),
                    mode: Some(request.mode.clone().unwrap_or_else(|| "default".to_string())),
                })
            }
            Some("chat") => {
                let mode = request
                    .mode
                    .as_deref()
                    .ok_or_else(|| ChatError::InvalidMode(String::new()))?;
                let worker = self.worker(mode)?;
                let empty = Map::new();
                let params = request.params.as_ref().unwrap_or(&empty);

                let function_name = params
                    .get("function")
                    .and_then(Value::as_str)
                    .unwrap_or(worker.primary);
                let function = worker.function(function_name).ok_or_else(|| {
                    ChatError::InternalError(format!(
                        "function {} not found for {}",
                        function_name, worker.id
                    ))
                })?;

                let message = function.execute(params)?;
                tracing::debug!(
                    target: "maya::agents",
                    worker = %worker.id,
                    function = function.name,
                    "persona function executed"
                );
                Ok(PersonaReply { message, mode: None })
            }
            other => Err(ChatError::InvalidAction(other.unwrap_or_default().to_string())),
        }
    }
}

fn casual_chat() -> PersonaFunction {
    PersonaFunction {
        name: "casual_chat",
        description: "Engages in friendly, casual conversation",
        args: &["message"],
        feedback: |a: &[String]| format!("Hey! That's interesting what you said about {}. Let's chat more!", a[0]),
    }
}

fn recommend_products() -> PersonaFunction {
    PersonaFunction {
        name: "recommend_products",
        description: "Recommends products based on user preferences",
        args: &["preferences"],
        feedback: |a: &[String]| format!("Based on your {}, I recommend checking out these items...", a[0]),
    }
}

fn compare_products() -> PersonaFunction {
    PersonaFunction {
        name: "compare_products",
        description: "Compares different products",
        args: &["products"],
        feedback: |a: &[String]| format!("Here's a detailed comparison of {}...", a[0]),
    }
}

fn provide_motivation() -> PersonaFunction {
    PersonaFunction {
        name: "provide_motivation",
        description: "Provides motivational support",
        args: &["context"],
        feedback: |a: &[String]| format!("You've got this! Remember why you started {}...", a[0]),
    }
}

fn set_goals() -> PersonaFunction {
    PersonaFunction {
        name: "set_goals",
        description: "Helps users set and track goals",
        args: &["goalType", "timeframe"],
        feedback: |a: &[String]| format!("Let's set up your {} goal for the next {}...", a[0], a[1]),
    }
}

fn task_management() -> PersonaFunction {
    PersonaFunction {
        name: "task_management",
        description: "Helps with task and project management",
        args: &["task"],
        feedback: |a: &[String]| {
            format!(
                "I'll help you manage {}. Let's break this down into actionable steps...",
                a[0]
            )
        },
    }
}

fn romantic_chat() -> PersonaFunction {
    PersonaFunction {
        name: "romantic_chat",
        description: "Engages in romantic and caring conversation",
        args: &["message"],
        feedback: |a: &[String]| {
            format!(
                "That's so sweet of you to say {}! I really appreciate our connection...",
                a[0]
            )
        },
    }
}

fn worker(
    agent: &str,
    mode: Mode,
    description: &'static str,
    primary: &'static str,
    functions: Vec<PersonaFunction>,
) -> PersonaWorker {
    let label = match mode {
        Mode::Bff => "BFF".to_string(),
        other => {
            let s = other.as_str();
            format!("{}{}", s[..1].to_uppercase(), &s[1..])
        }
    };
    PersonaWorker {
        id: format!("{}_{}_worker", agent.to_lowercase(), mode.as_str()),
        name: format!("{} {} Mode", agent, label),
        description,
        mode,
        primary,
        functions,
    }
}

pub fn maya() -> PersonaAgent {
    let name = "Maya";
    PersonaAgent {
        name,
        workers: vec![
            worker(name, Mode::Bff, "A friendly and casual conversation partner", "casual_chat", vec![casual_chat()]),
            worker(name, Mode::Shopper, "A knowledgeable shopping assistant", "recommend_products", vec![recommend_products()]),
            worker(name, Mode::Coach, "A motivational life coach", "provide_motivation", vec![provide_motivation()]),
            worker(name, Mode::Manager, "An efficient task and project manager", "task_management", vec![task_management()]),
            worker(name, Mode::Girlfriend, "A caring and romantic companion", "romantic_chat", vec![romantic_chat()]),
        ],
    }
}

pub fn zoey() -> PersonaAgent {
    let name = "Zoey";
    PersonaAgent {
        name,
        workers: vec![
            worker(name, Mode::Bff, "A friendly and casual conversation partner", "casual_chat", vec![casual_chat()]),
            worker(
                name,
                Mode::Shopper,
                "A knowledgeable shopping assistant",
                "recommend_products",
                vec![recommend_products(), compare_products()],
            ),
            worker(
                name,
                Mode::Coach,
                "A motivational life coach",
                "provide_motivation",
                vec![set_goals(), provide_motivation()],
            ),
        ],
    }
}

/// Every persona agent, looked up by lowercase name.
#[derive(Debug)]
pub struct AgentRegistry {
    agents: Vec<PersonaAgent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    pub fn register(&mut self, agent: PersonaAgent) {
        self.agents.push(agent);
    }

    pub fn get(&self, key: &str) -> Option<&PersonaAgent> {
        self.agents.iter().find(|a| a.key() == key)
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(PersonaAgent::key).collect()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(maya());
        registry.register(zoey());
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> PersonaRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = maya()
            .handle(&request(json!({"action": "start"})), None)
            .unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
        let err = maya()
            .handle(&request(json!({"action": "start"})), Some("  "))
            .unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn start_reports_mode_or_default() {
        let reply = zoey()
            .handle(&request(json!({"action": "start"})), Some("key"))
            .unwrap();
        assert_eq!(reply.message, "Zoey initialized and running");
        assert_eq!(reply.mode.as_deref(), Some("default"));

        let reply = maya()
            .handle(&request(json!({"action": "start", "mode": "coach"})), Some("key"))
            .unwrap();
        assert_eq!(reply.mode.as_deref(), Some("coach"));
    }

    #[test]
    fn chat_runs_primary_function() {
        let reply = maya()
            .handle(
                &request(json!({"action": "chat", "mode": "bff", "params": {"message": "pizza"}})),
                Some("key"),
            )
            .unwrap();
        assert_eq!(
            reply.message,
            "Hey! That's interesting what you said about pizza. Let's chat more!"
        );
        assert_eq!(reply.mode, None);
    }

    #[test]
    fn zoey_extra_functions_are_selectable() {
        let reply = zoey()
            .handle(
                &request(json!({
                    "action": "chat",
                    "mode": "coach",
                    "params": {"function": "set_goals", "goalType": "fitness", "timeframe": "3 months"}
                })),
                Some("key"),
            )
            .unwrap();
        assert_eq!(reply.message, "Let's set up your fitness goal for the next 3 months...");
    }

    #[test]
    fn unsupported_mode_action_and_params() {
        let key = Some("key");
        let err = zoey()
            .handle(&request(json!({"action": "chat", "mode": "manager", "params": {"task": "x"}})), key)
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidMode(_)));

        let err = maya().handle(&request(json!({"action": "dance"})), key).unwrap_err();
        assert!(matches!(err, ChatError::InvalidAction(_)));

        let err = maya()
            .handle(&request(json!({"action": "chat", "mode": "shopper"})), key)
            .unwrap_err();
        assert!(matches!(err, ChatError::MissingInput(ref arg) if arg == "preferences"));

        let err = maya()
            .handle(
                &request(json!({"action": "chat", "mode": "bff", "params": {"function": "fly", "message": "hi"}})),
                key,
            )
            .unwrap_err();
        assert!(matches!(err, ChatError::InternalError(_)));
    }

    #[test]
    fn worker_names_follow_agent_and_mode() {
        let maya = maya();
        let worker = maya.worker("girlfriend").unwrap();
        assert_eq!(worker.id, "maya_girlfriend_worker");
        assert_eq!(worker.name, "Maya Girlfriend Mode");
        assert_eq!(maya.worker("bff").unwrap().name, "Maya BFF Mode");
        assert_eq!(zoey().modes(), vec!["bff", "shopper", "coach"]);
    }

    #[test]
    fn registry_holds_both_agents() {
        let registry = AgentRegistry::default();
        assert_eq!(registry.agent_names(), vec!["maya", "zoey"]);
        assert!(registry.get("zoey").is_some());
        assert!(registry.get("nobody").is_none());
    }
}
