//! Backend entry-point: wires the platform, session middleware and routes.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use mockable::{DefaultClock, DefaultEnv};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::Trace;
use backend::api::health::HealthState;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::AuditSink;
use backend::outbound::{HttpAuditSink, MemoryPlatform};
use backend::server::config::{BuildMode, session_settings_from_env};
use backend::server::state::PortalState;
use backend::server::{configure_portal, session_middleware};

/// Command-line flags for the portal backend.
#[derive(Debug, Parser)]
#[command(name = "portal-backend", about = "Client-management portal backend")]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,

    /// Base URL of a remote audit collector; the platform keeps the trail
    /// itself when unset.
    #[arg(long)]
    audit_collector: Option<Url>,

    /// Name of the demo-data seed to load at startup.
    #[cfg(feature = "example-data")]
    #[arg(long, default_value = "dev")]
    seed: String,

    /// Skip demo-data seeding.
    #[cfg(feature = "example-data")]
    #[arg(long)]
    no_seed: bool,
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = Args::parse();
    let settings =
        session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())?;

    let platform = Arc::new(MemoryPlatform::new(Arc::new(DefaultClock)));

    #[cfg(feature = "example-data")]
    if !args.no_seed {
        let report = backend::server::seed::seed_platform(&platform, &args.seed)?;
        info!(
            profiles = report.profiles,
            clients = report.clients,
            seed = %args.seed,
            "demo data seeded"
        );
    }

    let state = match &args.audit_collector {
        Some(base) => {
            let sink: Arc<dyn AuditSink> = Arc::new(HttpAuditSink::new(
                reqwest::Client::new(),
                base.clone(),
            ));
            PortalState::new(Arc::clone(&platform), sink, Arc::new(DefaultClock))
        }
        None => PortalState::self_contained(Arc::clone(&platform), Arc::new(DefaultClock)),
    };
    let state = web::Data::new(state);
    let health_state = web::Data::new(HealthState::new());

    let server_state = state.clone();
    let server_health = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(Trace)
            .wrap(session_middleware(&settings))
            .configure(configure_portal(server_state.clone(), server_health.clone()));
        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
        app
    })
    .bind(args.bind.as_str())?;

    health_state.mark_ready();
    info!(bind = %args.bind, "portal backend listening");
    server.run().await?;
    Ok(())
}
