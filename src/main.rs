use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod agents;
mod ai;
mod config;
mod controllers;
mod http;
mod tools;

use agents::{AgentRegistry, AgentRunner};
use config::Config;
use tools::ToolRegistry;

pub struct AppState {
    pub config: Config,
    pub agent_registry: Arc<AgentRegistry>,
    pub tool_registry: Arc<ToolRegistry>,
    pub runner: Arc<AgentRunner>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    if config.groq_api_key.is_none() {
        log::warn!("GROQ_API_KEY is not set; model calls will surface the provider's auth error");
    }

    log::info!("Initializing tool registry");
    let tool_registry = Arc::new(tools::create_default_registry());
    log::info!("Registered {} tools", tool_registry.len());

    // The personas are built once here and never mutated afterwards
    let agent_registry = Arc::new(AgentRegistry::new(&config.groq_model));

    let runner = Arc::new(AgentRunner::new(
        tool_registry.clone(),
        config.groq_endpoint.clone(),
        config.groq_api_key.clone().unwrap_or_default(),
    ));

    log::info!(
        "Starting FinScout server on port {} (model: {})",
        port,
        config.groq_model
    );

    let agents = agent_registry.clone();
    let tool_reg = tool_registry.clone();
    let run = runner.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                config: config.clone(),
                agent_registry: Arc::clone(&agents),
                tool_registry: Arc::clone(&tool_reg),
                runner: Arc::clone(&run),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::run::config)
            // The single page, with a fallback so stray paths still load it
            .service(
                Files::new("/", "./static")
                    .index_file("index.html")
                    .default_handler(|req: actix_web::dev::ServiceRequest| {
                        let (http_req, _payload) = req.into_parts();
                        async {
                            let response =
                                NamedFile::open("./static/index.html")?.into_response(&http_req);
                            Ok(actix_web::dev::ServiceResponse::new(http_req, response))
                        }
                    }),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
