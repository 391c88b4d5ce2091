use crate::generator::curve::CurveConfig;
use crate::gui_bridge::model::VisualizationModel;
use log::{error, info};
use physcore::counting::{CountingParameters, MeasurementSession};
use serde::Serialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::StatusCode,
    reply::{Json, WithStatus},
    Filter,
};

pub type SharedSession = Arc<RwLock<MeasurementSession>>;

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

fn reply<T: Serialize>(value: &T, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(value), status)
}

fn error_reply(message: &str, status: StatusCode) -> WithStatus<Json> {
    reply(&json!({"status": "error", "message": message}), status)
}

fn poisoned() -> WithStatus<Json> {
    error_reply("session lock poisoned", StatusCode::INTERNAL_SERVER_ERROR)
}

/// JSON routes over a shared session:
/// `GET /model`, `GET /history`, `GET /payload`, `POST /parameters`, `POST /measure`, `POST /clear`.
pub fn routes(
    session: SharedSession,
    curve: CurveConfig,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let session_filter = warp::any().map(move || session.clone());

    let model_route = warp::path("model")
        .and(warp::path::end())
        .and(warp::get())
        .and(session_filter.clone())
        .map(|session: SharedSession| match session.read() {
            Ok(guard) => reply(&guard.model(), StatusCode::OK),
            Err(_) => poisoned(),
        });

    let history_route = warp::path("history")
        .and(warp::path::end())
        .and(warp::get())
        .and(session_filter.clone())
        .map(|session: SharedSession| match session.read() {
            Ok(guard) => reply(guard.history(), StatusCode::OK),
            Err(_) => poisoned(),
        });

    let payload_route = warp::path("payload")
        .and(warp::path::end())
        .and(warp::get())
        .and(session_filter.clone())
        .map(move |session: SharedSession| match session.read() {
            Ok(guard) => match VisualizationModel::from_session(&*guard, &curve) {
                Ok(model) => reply(&model, StatusCode::OK),
                Err(err) => error_reply(&err.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
            },
            Err(_) => poisoned(),
        });

    let parameters_route = warp::path("parameters")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(session_filter.clone())
        .map(
            |params: CountingParameters, session: SharedSession| match session.write() {
                Ok(mut guard) => match guard.set_parameters(params) {
                    Ok(applied) => reply(
                        &json!({"status": "ok", "parameters": applied, "model": guard.model()}),
                        StatusCode::OK,
                    ),
                    Err(err) => error_reply(&err.to_string(), StatusCode::BAD_REQUEST),
                },
                Err(_) => poisoned(),
            },
        );

    let measure_route = warp::path("measure")
        .and(warp::path::end())
        .and(warp::post())
        .and(session_filter.clone())
        .map(|session: SharedSession| match session.write() {
            Ok(mut guard) => reply(&guard.take_measurement(), StatusCode::OK),
            Err(_) => poisoned(),
        });

    let clear_route = warp::path("clear")
        .and(warp::path::end())
        .and(warp::post())
        .and(session_filter)
        .map(|session: SharedSession| match session.write() {
            Ok(mut guard) => {
                guard.clear();
                reply(&json!({"status": "ok"}), StatusCode::OK)
            }
            Err(_) => poisoned(),
        });

    model_route
        .or(history_route)
        .or(payload_route)
        .or(parameters_route)
        .or(measure_route)
        .or(clear_route)
}

/// Bridge that hosts the session HTTP endpoint for chart/table front ends.
pub struct GuiBridge {
    session: SharedSession,
}

impl GuiBridge {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    /// Serves the routes from a dedicated thread with its own runtime.
    pub fn serve(&self, curve: CurveConfig) -> thread::JoinHandle<()> {
        let routes = routes(self.session.clone(), curve);
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        })
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self, curve: &CurveConfig) -> anyhow::Result<VisualizationModel> {
        let guard = self
            .session
            .read()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        VisualizationModel::from_session(&*guard, curve)
    }
}
