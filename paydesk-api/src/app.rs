/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use paydesk_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = paydesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use paydesk_shared::auth::middleware::authenticate;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Today's date in the server's local time zone
    ///
    /// Attendance and payroll periods follow the office calendar, not UTC.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Current local time truncated to whole seconds
    pub fn now_time(&self) -> NaiveTime {
        let now = Local::now().time();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Builds the complete router
///
/// ```text
/// /health                                GET     public
/// /hr/login                              POST    public
/// /hr/logout, /hr/me                     POST/GET
/// /hrs, /hrs/:id                         CRUD    writes need super admin
/// /employers, /employers/:id             CRUD
/// /employers/:id/attend, /leave          POST
/// /departments, /departments/:id         CRUD
/// /holidays, /holidays/:id               CRUD
/// /adjustments, /adjustments/:id         CRUD
/// /attendances, /attendances/:id         CRUD
/// /salary                                GET
/// /salary/calculate                      POST
/// /salary/summary/:employer_id           GET
/// /dashboard[/stats|/employers|/attendance-today|/upcoming-holidays]  GET
/// ```
///
/// Everything except `/health` and `/hr/login` passes through
/// [`jwt_auth_layer`].
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/hr/login", post(routes::auth::login));

    let protected_routes = Router::new()
        .route("/hr/logout", post(routes::auth::logout))
        .route("/hr/me", get(routes::auth::me))
        .route(
            "/hrs",
            get(routes::hrs::list_hrs).post(routes::hrs::create_hr),
        )
        .route(
            "/hrs/:id",
            get(routes::hrs::get_hr)
                .put(routes::hrs::update_hr)
                .delete(routes::hrs::delete_hr),
        )
        .route(
            "/employers",
            get(routes::employers::list_employers).post(routes::employers::create_employer),
        )
        .route(
            "/employers/:id",
            get(routes::employers::get_employer)
                .put(routes::employers::update_employer)
                .delete(routes::employers::delete_employer),
        )
        .route("/employers/:id/attend", post(routes::employers::attend))
        .route("/employers/:id/leave", post(routes::employers::leave))
        .route(
            "/departments",
            get(routes::departments::list_departments)
                .post(routes::departments::create_department),
        )
        .route(
            "/departments/:id",
            get(routes::departments::get_department)
                .put(routes::departments::update_department)
                .delete(routes::departments::delete_department),
        )
        .route(
            "/holidays",
            get(routes::holidays::list_holidays).post(routes::holidays::create_holiday),
        )
        .route(
            "/holidays/:id",
            get(routes::holidays::get_holiday)
                .put(routes::holidays::update_holiday)
                .delete(routes::holidays::delete_holiday),
        )
        .route(
            "/adjustments",
            get(routes::adjustments::list_adjustments)
                .post(routes::adjustments::create_adjustment),
        )
        .route(
            "/adjustments/:id",
            get(routes::adjustments::get_adjustment)
                .put(routes::adjustments::update_adjustment)
                .delete(routes::adjustments::delete_adjustment),
        )
        .route(
            "/attendances",
            get(routes::attendances::list_attendances)
                .post(routes::attendances::create_attendance),
        )
        .route(
            "/attendances/:id",
            get(routes::attendances::get_attendance)
                .put(routes::attendances::update_attendance)
                .delete(routes::attendances::delete_attendance),
        )
        .route("/salary", get(routes::salary::list_salaries))
        .route("/salary/calculate", post(routes::salary::calculate_salary))
        .route(
            "/salary/summary/:employer_id",
            get(routes::salary::salary_history),
        )
        .route("/dashboard", get(routes::dashboard::overview))
        .route("/dashboard/stats", get(routes::dashboard::stats))
        .route("/dashboard/employers", get(routes::dashboard::employers))
        .route(
            "/dashboard/attendance-today",
            get(routes::dashboard::attendance_today),
        )
        .route(
            "/dashboard/upcoming-holidays",
            get(routes::dashboard::upcoming_holidays),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Authenticates the bearer token and stores the `AuthContext` in request
/// extensions
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let auth = authenticate(&state.db, state.jwt_secret(), authorization).await?;

    tracing::debug!(hr_user_id = %auth.hr_user_id, role = %auth.role, "Authenticated request");
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
