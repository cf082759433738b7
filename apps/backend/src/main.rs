use actix_web::{web, App, HttpServer};
use mingle::config::db::DbProfile;
use mingle::config::engine::EngineConfig;
use mingle::infra::state::build_state;
use mingle::logging::LogFormat;
use mingle::middleware::request_trace::RequestTrace;
use mingle::middleware::structured_logger::StructuredLogger;
use mingle::middleware::trace_span::TraceSpan;
use mingle::routes;

mod telemetry;

fn env_or(primary: &str, legacy: &str, default: &str) -> String {
    std::env::var(primary)
        .or_else(|_| std::env::var(legacy))
        .unwrap_or_else(|_| default.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing(LogFormat::from_env());

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let host = env_or("MINGLE_HOST", "BACKEND_HOST", "0.0.0.0");
    let port = env_or("MINGLE_PORT", "BACKEND_PORT", "3001")
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ MINGLE_PORT must be a valid port number");
            std::process::exit(1);
        });

    let engine = match EngineConfig::from_env() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Invalid engine configuration: {e}");
            std::process::exit(1);
        }
    };

    println!("🚀 Starting Mingle on http://{host}:{port}");

    let app_state = match build_state()
        .with_db(DbProfile::Prod)
        .with_engine(engine)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        matcher = app_state.matching.oracle_name().unwrap_or("shuffle"),
        "database connected, migrations applied"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
