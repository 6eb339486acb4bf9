//! Axum-based gateway for the Maya assistant. Config-driven via CoreConfig.

mod error;
mod handlers;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    routing::{get, post},
    Router,
};
use axum::http::Method;
use maya_core::{AgentRegistry, CoreConfig, ModeRegistry, Orchestrator};
use maya_skills::ModelRouter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ENV_AGENT_API_KEY: &str = "GAME_API_KEY";

/// Renders a tracing event as `message key=value ...`.
struct LineCollector<'a> {
    message: &'a mut String,
    fields: &'a mut Vec<String>,
}

impl Visit for LineCollector<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/// Sends each tracing event as a line to a broadcast channel for SSE log streaming.
#[derive(Clone)]
struct LogBroadcastLayer {
    tx: broadcast::Sender<String>,
}

impl LogBroadcastLayer {
    fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl<S> tracing_subscriber::Layer<S> for LogBroadcastLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        let mut fields = Vec::new();
        event.record(&mut LineCollector {
            message: &mut message,
            fields: &mut fields,
        });
        let mut line = format!(
            "{} [{}] {}",
            event.metadata().level(),
            event.metadata().target(),
            message
        );
        if !fields.is_empty() {
            line.push(' ');
            line.push_str(&fields.join(" "));
        }
        // No subscribers is fine.
        let _ = self.tx.send(line);
    }
}

/// Pre-flight check: config loads, chunked modes are valid, the model is usable and the port is free.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking chunked modes... ");
    ModeRegistry::new(config.chunked_modes.as_slice())
        .map_err(|e| format!("chunked_modes invalid: {}", e))?;
    println!("OK ({})", config.chunked_modes.join(", "));

    print!("Checking model ({})... ", config.llm_mode);
    if config.is_live() && std::env::var("OPENAI_API_KEY").map_or(true, |k| k.trim().is_empty()) {
        return Err("llm_mode is live but OPENAI_API_KEY is not set".to_string());
    }
    println!("OK");

    if std::env::var(ENV_AGENT_API_KEY).is_err() {
        println!("Note: {} is not set; /api/maya and /api/zoey will answer 500", ENV_AGENT_API_KEY);
    }

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }

    println!("\n✅ SUCCESS: Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[maya-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("❌ PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    let (log_tx, _) = broadcast::channel(1000);
    let log_layer = LogBroadcastLayer::new(log_tx.clone());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(log_layer)
        .init();

    let config = Arc::new(CoreConfig::load().expect("load CoreConfig"));
    let model_router = Arc::new(ModelRouter::new(&config));
    let orchestrator = Arc::new(
        Orchestrator::from_config(&config, model_router).expect("build orchestrator from config"),
    );
    let agent_api_key = std::env::var(ENV_AGENT_API_KEY)
        .ok()
        .filter(|k| !k.trim().is_empty());

    let app = build_app(AppState {
        config: Arc::clone(&config),
        orchestrator,
        agents: Arc::new(AgentRegistry::default()),
        agent_api_key,
        log_tx,
    });

    let port = config.port;
    let app_name = config.app_name.clone();
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!(llm_mode = %config.llm_mode, "{} listening on {}", app_name, addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await.expect("bind gateway port"),
        app,
    )
    .await
    .expect("serve gateway");
}

fn build_app(state: AppState) -> Router {
    // CORS: local front-ends (3000-3099) and other local services (8001-8099).
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &axum::http::HeaderValue, _| {
            let s = origin.to_str().unwrap_or("");
            let port = s
                .rsplit(':')
                .next()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(0);
            (3000..=3099).contains(&port) || (8001..=8099).contains(&port)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .expose_headers(tower_http::cors::Any);

    Router::new()
        .route("/v1/status", get(status))
        .route("/api/v1/health", get(health))
        .route("/api/v1/logs", get(logs_stream))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/maya", post(handlers::agents::maya))
        .route("/api/zoey", post(handlers::agents::zoey))
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) orchestrator: Arc<Orchestrator>,
    pub(crate) agents: Arc<AgentRegistry>,
    /// Persona platform key; persona endpoints refuse to run without it.
    pub(crate) agent_api_key: Option<String>,
    pub(crate) log_tx: broadcast::Sender<String>,
}

/// GET /api/v1/health – liveness check for UI and scripts.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/v1/logs – Server-Sent Events stream of gateway logs (tracing output).
async fn logs_stream(
    State(state): State<AppState>,
) -> Sse<impl futures_util::Stream<Item = Result<Event, std::convert::Infallible>> + Send + 'static> {
    use async_stream::stream;
    let mut rx = state.log_tx.subscribe();
    let stream = stream! {
        loop {
            match rx.recv().await {
                Ok(line) => yield Ok(Event::default().data(line)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    yield Ok(Event::default().data(format!("... {} log lines dropped", n)));
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };
    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

/// GET /v1/status – app identity, model mode and the mode/agent tables.
async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let modes = state.orchestrator.modes();
    axum::Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "llm_mode": state.config.llm_mode,
        "model_source": state.orchestrator.source_name(),
        "modes": modes.mode_names(),
        "chunked_modes": modes.chunked_mode_names(),
        "agents": state.agents.agent_names(),
    }))
}
