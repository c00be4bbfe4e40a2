/// paddy-diagnose Studio
///
/// Browser front-end for the diagnosis pipeline. Served by a synchronous
/// tiny_http server; the only JavaScript is the image preview and the loading
/// notice.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:7878
///
/// Pages:
///   /diagnose       — pick a sample or upload a photo, then submit
///   /diseases/{id}  — result page for a prediction

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::sync::{Arc, Mutex};

use tiny_http::Server;
use tracing::{error, info};

use paddy_diagnose::{logging, DiagnoseConfig, DiagnosisWorkflow, SampleCatalog};
use state::{Studio, StudioState};

fn main() {
    if let Err(e) = logging::init_tracing() {
        eprintln!("logging disabled: {}", e);
    }

    let config = match DiagnoseConfig::from_env() {
        Ok(c)  => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    let server = match Server::http(&config.addr) {
        Ok(s)  => s,
        Err(e) => {
            error!(addr = %config.addr, error = %e, "failed to bind HTTP server");
            std::process::exit(1);
        }
    };

    let catalog = SampleCatalog::new(&config.samples_dir);
    if !catalog.dir().is_dir() {
        tracing::warn!(dir = %catalog.dir().display(), "sample directory not found; sample selection will fail");
    }

    let client = config.inference_client();
    info!(endpoint = client.endpoint(), timeout_secs = client.timeout().as_secs(), "prediction service");

    let workflow = DiagnosisWorkflow::new(catalog, config.normalizer());
    let studio = Arc::new(Studio {
        state:            Mutex::new(StudioState::new(workflow)),
        predictor:        Box::new(client),
        max_upload_bytes: config.max_upload_bytes,
    });

    info!(
        addr = %config.addr,
        resample = %config.resample,
        "studio listening on http://{}", config.addr
    );

    // One thread per request so a pending prediction does not stall other
    // page loads.
    for request in server.incoming_requests() {
        let studio = studio.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, studio);
        });
    }
}
