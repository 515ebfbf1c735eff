use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

use crate::agents::{AgentChoice, RunOutcome, ToolCallRecord};
use crate::AppState;

pub const EMPTY_QUERY_NOTICE: &str = "Please enter a query first.";
pub const NO_CONTENT_NOTICE: &str = "No content returned from the agent.";

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    /// One of the sidebar labels
    pub agent: String,
    pub query: String,
}

#[derive(Serialize)]
pub struct RunResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Empty-input and no-content notices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Intermediate tool calls, when the configuration wants them shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u128>,
}

impl RunResponse {
    fn warning(message: &str) -> Self {
        RunResponse {
            success: false,
            content: None,
            warning: Some(message.to_string()),
            error: None,
            tool_calls: None,
            elapsed_ms: None,
        }
    }

    fn error(message: String) -> Self {
        RunResponse {
            success: false,
            content: None,
            warning: None,
            error: Some(message),
            tool_calls: None,
            elapsed_ms: None,
        }
    }
}

#[derive(Serialize)]
pub struct AgentOption {
    pub label: &'static str,
    pub persona: String,
}

#[derive(Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<AgentOption>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/agents").route(web::get().to(list_agents)));
    cfg.service(web::resource("/api/run").route(web::post().to(run)));
}

/// The closed label set for the sidebar control, with the persona each
/// label resolves to
async fn list_agents(state: web::Data<AppState>) -> impl Responder {
    let agents = AgentChoice::ALL
        .iter()
        .map(|choice| AgentOption {
            label: choice.label(),
            persona: choice
                .select(&state.agent_registry)
                .display_name()
                .to_string(),
        })
        .collect();

    HttpResponse::Ok().json(AgentsResponse { agents })
}

async fn run(state: web::Data<AppState>, body: web::Json<RunRequest>) -> impl Responder {
    let choice = match AgentChoice::from_label(&body.agent) {
        Some(c) => c,
        None => {
            return HttpResponse::BadRequest()
                .json(RunResponse::error(format!("Unknown agent: {}", body.agent)));
        }
    };

    // The only input validation: an empty query is a notice, not a run
    let query = body.query.trim();
    if query.is_empty() {
        return HttpResponse::Ok().json(RunResponse::warning(EMPTY_QUERY_NOTICE));
    }

    let run_id = Uuid::new_v4();
    log::info!(
        "[RUN {}] label='{}' query_len={}",
        run_id,
        choice.label(),
        query.len()
    );

    let selected = choice.select(&state.agent_registry);
    let show_tool_calls = selected.show_tool_calls();
    let started = Instant::now();

    let outcome = state.runner.run(selected, query).await;
    let elapsed_ms = started.elapsed().as_millis();

    let trace = |records: Vec<ToolCallRecord>| {
        if show_tool_calls && !records.is_empty() {
            Some(records)
        } else {
            None
        }
    };

    match outcome {
        RunOutcome::Answered {
            content,
            tool_calls,
        } => {
            log::info!(
                "[RUN {}] answered in {}ms after {} tool calls",
                run_id,
                elapsed_ms,
                tool_calls.len()
            );
            HttpResponse::Ok().json(RunResponse {
                success: true,
                content: Some(content),
                warning: None,
                error: None,
                tool_calls: trace(tool_calls),
                elapsed_ms: Some(elapsed_ms),
            })
        }
        RunOutcome::NoContent { tool_calls } => {
            log::warn!("[RUN {}] completed without content", run_id);
            HttpResponse::Ok().json(RunResponse {
                success: false,
                content: None,
                warning: Some(NO_CONTENT_NOTICE.to_string()),
                error: None,
                tool_calls: trace(tool_calls),
                elapsed_ms: Some(elapsed_ms),
            })
        }
        RunOutcome::Failed(e) => {
            log::error!("[RUN {}] failed: {}", run_id, e);
            HttpResponse::InternalServerError().json(RunResponse {
                success: false,
                content: None,
                warning: None,
                error: Some(format!("Error: {}", e)),
                tool_calls: None,
                elapsed_ms: Some(elapsed_ms),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AgentRegistry, AgentRunner};
    use crate::config::Config;
    use actix_web::{test, App};
    use std::sync::Arc;

    fn app_state(endpoint: &str) -> web::Data<AppState> {
        let config = Config {
            port: 8080,
            groq_api_key: None,
            groq_endpoint: endpoint.to_string(),
            groq_model: "qwen/qwen3-32b".to_string(),
        };
        let tool_registry = Arc::new(crate::tools::create_default_registry());
        let agent_registry = Arc::new(AgentRegistry::new(&config.groq_model));
        let runner = Arc::new(AgentRunner::new(
            tool_registry.clone(),
            config.groq_endpoint.clone(),
            String::new(),
        ));
        web::Data::new(AppState {
            config,
            agent_registry,
            tool_registry,
            runner,
        })
    }

    /// Minimal provider stub that answers every request with 401, so the
    /// fault path is exercised without retries or real network access.
    async fn spawn_unauthorized_stub() -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 65536];
                    let _ = socket.read(&mut buf).await;
                    let body = r#"{"error":{"message":"Invalid API Key"}}"#;
                    let response = format!(
                        "HTTP/1.1 401 Unauthorized\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{}/openai/v1/chat/completions", addr)
    }

    #[actix_web::test]
    async fn test_list_agents_returns_the_closed_label_set() {
        let app = test::init_service(
            App::new()
                .app_data(app_state("http://127.0.0.1:1/unused"))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/agents").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let labels: Vec<&str> = body["agents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["Web Agent", "Finance Agent", "Both (Team)"]);
        // The web label resolves to the news persona
        assert_eq!(body["agents"][0]["persona"], "G Agent");
    }

    #[actix_web::test]
    async fn test_empty_query_is_a_notice_and_never_runs() {
        let app = test::init_service(
            App::new()
                .app_data(app_state("http://127.0.0.1:1/unused"))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/run")
            .set_json(serde_json::json!({"agent": "Web Agent", "query": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["warning"], EMPTY_QUERY_NOTICE);
        assert!(body.get("error").is_none());
        // No run happened, so no timing either
        assert!(body.get("elapsed_ms").is_none());
    }

    #[actix_web::test]
    async fn test_unknown_label_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(app_state("http://127.0.0.1:1/unused"))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/run")
            .set_json(serde_json::json!({"agent": "Mystery Agent", "query": "hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("Mystery Agent"));
    }

    #[actix_web::test]
    async fn test_provider_fault_becomes_an_error_notice() {
        let endpoint = spawn_unauthorized_stub().await;
        let app = test::init_service(
            App::new().app_data(app_state(&endpoint)).configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/run")
            .set_json(serde_json::json!({"agent": "Finance Agent", "query": "Analyze AAPL"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Error: "));

        // And the process keeps serving afterwards
        let req = test::TestRequest::get().uri("/api/agents").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
