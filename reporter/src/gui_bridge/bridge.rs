use crate::gui_bridge::model::MapModel;
use crate::workflow::runner::Runner;
use anyhow::Result;
use linergycore::data_interface::{FaultRecord, GeoPoint};
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

#[derive(Debug, Deserialize)]
struct ReportRequest {
    id: String,
}

/// Bridge that hosts the data endpoint the visualizer polls and accepts
/// ingested fault records and report requests.
pub struct GuiBridge {
    state: Arc<RwLock<MapModel>>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let state = Arc::new(RwLock::new(MapModel::new()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("faults")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<MapModel>>| warp::reply::json(&*state.read().unwrap()));

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and_then(
                |fault: FaultRecord, state: Arc<RwLock<MapModel>>| async move {
                    let folio = fault.folio();
                    let located = GeoPoint::from_geojson(fault.geom.as_ref()).is_some();
                    if !located {
                        eprintln!("ingest {}: geometry unavailable, will degrade", folio);
                    }
                    let mut guard = state.write().unwrap();
                    guard.faults.push(fault);
                    Ok::<_, warp::Rejection>(warp::reply::with_status(
                        warp::reply::json(&json!({
                            "status": "ok",
                            "folio": folio,
                            "located": located,
                        })),
                        StatusCode::OK,
                    ))
                },
            );

        let report_route = warp::path("report")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |request: ReportRequest,
                 state: Arc<RwLock<MapModel>>,
                 runner: Arc<Runner>| async move {
                    let (fault, line) = {
                        let guard = state.read().unwrap();
                        let fault = guard
                            .faults
                            .iter()
                            .find(|f| f.id == request.id)
                            .cloned();
                        let line = fault
                            .as_ref()
                            .and_then(|f| guard.line_for(f))
                            .cloned();
                        (fault, line)
                    };
                    let Some(fault) = fault else {
                        return Err(warp::reject::custom(WarpError));
                    };
                    match runner.render_fault(&fault, line.as_ref()) {
                        Ok(files) => {
                            let names: Vec<String> = files
                                .iter()
                                .map(|p| p.display().to_string())
                                .collect();
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "files": names,
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("report error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(ingest_route).or(report_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &MapModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[GUI] faults: {}, structures: {}, lines: {}",
            guard.faults.len(),
            guard.structures.len(),
            guard.lines.len()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> MapModel {
        self.state.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::sample::{build_sample_set, SampleConfig};
    use crate::workflow::config::DriverConfig;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn gui_bridge_updates_state() {
        let config = DriverConfig::from_args(PathBuf::from("tools/data/reports"), 3, 5);
        let runner = Arc::new(Runner::new(config.clone()));
        let gui = GuiBridge::new(runner);

        let set = build_sample_set(&config.to_sample_config()).unwrap();
        let model = MapModel {
            faults: set.faults.clone(),
            structures: set.structures.clone(),
            lines: set.lines.clone(),
        };
        gui.publish(&model).unwrap();
        assert_eq!(gui.snapshot().faults.len(), set.faults.len());
    }
}
