use actix_web::web;

pub mod events;
pub mod health;
pub mod participants;
pub mod rounds;
pub mod saves;
pub mod views;

/// Register every route. Shared by `main.rs` and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Events and their rounds: /api/events/**
    cfg.service(
        web::scope("/api/events")
            .configure(events::configure_routes)
            .configure(rounds::configure_event_routes),
    );

    // Per-round lookups: /api/rounds/**
    cfg.service(web::scope("/api/rounds").configure(rounds::configure_routes));

    // Contact saves: /api/saves
    cfg.service(web::scope("/api/saves").configure(saves::configure_routes));

    // Connections: /api/participants/**
    cfg.service(web::scope("/api/participants").configure(participants::configure_routes));
}
