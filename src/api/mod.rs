use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::{CliWithdrawalMode, ScenarioArgs, build_input};
use crate::core::{InputError, ScenarioInput, run_scenario};
use crate::report::build_calculate_response;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiWithdrawalMode {
    #[serde(alias = "lumpSum", alias = "lump_sum", alias = "lump")]
    LumpSum,
    Monthly,
}

impl From<ApiWithdrawalMode> for CliWithdrawalMode {
    fn from(value: ApiWithdrawalMode) -> Self {
        match value {
            ApiWithdrawalMode::LumpSum => CliWithdrawalMode::LumpSum,
            ApiWithdrawalMode::Monthly => CliWithdrawalMode::Monthly,
        }
    }
}

// Both amount fields arrive with every form submit; only the selected mode's one must be numeric.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AmountField {
    Number(f64),
    Text(String),
}

impl AmountField {
    fn parse(self) -> Result<f64, InputError> {
        match self {
            AmountField::Number(v) => Ok(v),
            AmountField::Text(text) => text.trim().parse().map_err(|_| InputError::NotNumeric),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    capital: Option<f64>,
    rate_percent: Option<f64>,
    target: Option<f64>,
    years: Option<u32>,
    mode: Option<ApiWithdrawalMode>,
    lump_sum: Option<AmountField>,
    monthly: Option<AmountField>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/health", get(health_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "spendcalc HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(
    payload: Result<Query<CalculatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => calculate_handler_impl(payload),
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "rejected calculate query");
            input_error_response(&InputError::NotNumeric)
        }
    }
}

async fn calculate_post_handler(payload: Result<Json<CalculatePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => calculate_handler_impl(payload),
        Err(rejection @ (JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_))) => {
            warn!(reason = %rejection.body_text(), "rejected calculate body");
            input_error_response(&InputError::NotNumeric)
        }
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

fn calculate_handler_impl(payload: CalculatePayload) -> Response {
    let report = match scenario_input_from_payload(payload).and_then(|input| run_scenario(&input))
    {
        Ok(report) => report,
        Err(err) => {
            warn!(%err, "rejected calculate input");
            return input_error_response(&err);
        }
    };

    info!(
        mode = ?report.input.withdrawal.kind(),
        found = report.result.is_found(),
        when_index = ?report.result.when_index,
        "calculated"
    );
    json_response(StatusCode::OK, build_calculate_response(&report))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn input_error_response(err: &InputError) -> Response {
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

#[cfg(test)]
fn scenario_input_from_json(json: &str) -> Result<ScenarioInput, InputError> {
    let payload =
        serde_json::from_str::<CalculatePayload>(json).map_err(|_| InputError::NotNumeric)?;
    scenario_input_from_payload(payload)
}

fn scenario_input_from_payload(payload: CalculatePayload) -> Result<ScenarioInput, InputError> {
    let mut args = ScenarioArgs::default();

    if let Some(v) = payload.capital {
        args.capital = v;
    }
    if let Some(v) = payload.rate_percent {
        args.rate_percent = v;
    }
    if let Some(v) = payload.target {
        args.target = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.mode {
        args.mode = v.into();
    }
    match args.mode {
        CliWithdrawalMode::LumpSum => {
            if let Some(v) = payload.lump_sum {
                args.lump_sum = v.parse()?;
            }
        }
        CliWithdrawalMode::Monthly => {
            if let Some(v) = payload.monthly {
                args.monthly = v.parse()?;
            }
        }
    }

    build_input(&args)
}
