use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use coursehub_backend::{
    config::Config,
    db::connection::create_pool,
    docs::ApiDoc,
    handlers,
    middleware as auth_middleware,
    state::AppState,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coursehub_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        jwt_secret = %mask_secret(&config.jwt_secret),
        jwt_expiration_hours = config.jwt_expiration_hours,
        refresh_token_expiration_days = config.refresh_token_expiration_days,
        "Loaded configuration from environment/.env"
    );

    // Initialize database
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState::new(pool, config);

    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/signin", post(handlers::auth::signin))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route(
            "/api/catalog/courses",
            get(handlers::catalog::list_catalog_courses),
        )
        .route(
            "/api/catalog/courses/{id}",
            get(handlers::catalog::get_catalog_course),
        );

    // User-protected routes (auth required)
    let user_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/auth/me",
            get(handlers::auth::me).put(handlers::auth::update_me),
        )
        .route(
            "/api/auth/change-password",
            put(handlers::auth::change_password),
        )
        .route("/api/courses", post(handlers::courses::create_course))
        .route("/api/courses/mine", get(handlers::courses::list_my_courses))
        .route(
            "/api/courses/{id}",
            get(handlers::courses::get_course)
                .put(handlers::courses::update_course)
                .delete(handlers::courses::delete_course),
        )
        .route(
            "/api/courses/{id}/submit",
            post(handlers::courses::submit_course),
        )
        .route(
            "/api/courses/{id}/sections",
            post(handlers::sections::create_section).get(handlers::sections::list_sections),
        )
        .route(
            "/api/sections/{id}",
            delete(handlers::sections::delete_section),
        )
        .route(
            "/api/sections/{id}/lessons",
            get(handlers::lessons::list_lessons),
        )
        .route(
            "/api/courses/{course_id}/sections/{section_id}/lessons",
            post(handlers::lessons::create_lesson),
        )
        .route(
            "/api/lessons/{id}",
            delete(handlers::lessons::delete_lesson),
        )
        .route(
            "/api/courses/{id}/enroll",
            post(handlers::enrollments::enroll),
        )
        .route(
            "/api/courses/{id}/enrollment",
            get(handlers::enrollments::check_enrollment),
        )
        .route(
            "/api/enrollments/me",
            get(handlers::enrollments::my_enrollments),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::auth,
        ));

    // Admin-protected routes (auth + admin role)
    let admin_routes = Router::new()
        .route("/api/admin/courses", get(handlers::admin::list_courses))
        .route(
            "/api/admin/courses/{id}/approve",
            put(handlers::admin::approve_course),
        )
        .route(
            "/api/admin/courses/{id}/reject",
            put(handlers::admin::reject_course),
        )
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/{id}/active",
            put(handlers::admin::set_user_active),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::auth_admin,
        ));

    // Compose app with shared layers (CORS/Trace) and shared state
    let app = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
