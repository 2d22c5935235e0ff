use std::time::Duration;

use anyhow::Context;
use axum::{Router, http::HeaderValue};
use storage::Database;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod config;
mod error;
mod features;
mod middleware;
mod state;

use auth::TokenKeys;
use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::users::handlers::signup,
        features::users::handlers::login,
        features::users::handlers::get_current_user,
        features::workouts::handlers::list_workouts,
        features::workouts::handlers::get_workout,
        features::workouts::handlers::create_workout,
        features::workouts::handlers::update_workout,
        features::workouts::handlers::delete_workout,
        features::workouts::handlers::delete_movement_from_workout,
        features::workouts::handlers::create_set,
        features::workouts::handlers::delete_set,
        features::movements::handlers::list_movements,
        features::movements::handlers::link_movement,
    ),
    components(
        schemas(
            storage::dto::user::SignupRequest,
            storage::dto::user::LoginRequest,
            storage::dto::user::LoginResponse,
            storage::dto::user::UserResponse,
            storage::dto::workout::CreateWorkoutRequest,
            storage::dto::workout::UpdateWorkoutRequest,
            storage::dto::workout::SetInput,
            storage::dto::workout::WorkoutResponse,
            storage::dto::workout::SetResponse,
            storage::dto::set::CreateSetRequest,
            storage::dto::movement::LinkMovementRequest,
            storage::dto::movement::MovementLinkResponse,
            storage::models::Movement,
            storage::models::MovementLink,
            storage::models::Workout,
            storage::models::WorkoutSet,
        )
    ),
    tags(
        (name = "users", description = "Signup, login and profile endpoints"),
        (name = "workouts", description = "Workout and set endpoints"),
        (name = "movements", description = "Movement catalog endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting workout tracker API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let state = AppState {
        db,
        tokens: TokenKeys::new(&config.access_token_secret, config.token_ttl_minutes),
    };

    let cors = cors_layer(config.cors_origin.as_deref())?;

    let app = Router::new()
        .nest("/api", features::routes(state.tokens.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Ok(match origin {
        Some(origin) => cors.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS_ORIGIN: {}", origin))?,
        ),
        None => cors.allow_origin(Any),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/signup",
            "/api/login",
            "/api/users/me",
            "/api/workouts",
            "/api/workouts/{workout_id}",
            "/api/workouts/{workout_id}/movements/{movement_name}",
            "/api/workouts/{workout_id}/sets",
            "/api/workouts/{workout_id}/sets/{set_id}",
            "/api/movements",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }

    #[test]
    fn test_cors_origin_must_be_a_header_value() {
        assert!(cors_layer(Some("http://localhost:3000")).is_ok());
        assert!(cors_layer(None).is_ok());
        assert!(cors_layer(Some("bad\norigin")).is_err());
    }
}
