// Command-line driver for the diagnosis pipeline.
//
//   paddy-diagnose --sample 3
//   paddy-diagnose photo.jpg --endpoint http://127.0.0.1:9000/predict
//   paddy-diagnose photo.jpg --tensor-only
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error};

use paddy_diagnose::{
    extract, logging, DiagnoseConfig, DiagnoseError, DiagnosisWorkflow, ResampleFilter, SampleCatalog,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Diagnose a rice-paddy photo with the remote disease model")]
struct Args {
    /// Image file to diagnose (JPEG, PNG, BMP or GIF)
    #[arg(conflicts_with = "sample", required_unless_present = "sample")]
    image: Option<PathBuf>,

    /// Use catalog sample 0-9 instead of a file
    #[arg(short, long)]
    sample: Option<usize>,

    /// Prediction endpoint (overrides PADDY_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides PADDY_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<u64>,

    /// Directory holding the sample images (overrides PADDY_SAMPLES_DIR)
    #[arg(long)]
    samples_dir: Option<PathBuf>,

    /// Resampling filter (overrides PADDY_RESAMPLE)
    #[arg(long)]
    resample: Option<ResampleFilter>,

    /// Build the tensor and print its shape without calling the service
    #[arg(long)]
    tensor_only: bool,
}

fn main() -> ExitCode {
    if let Err(e) = logging::init_tracing() {
        eprintln!("logging disabled: {}", e);
    }
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "diagnosis failed");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), DiagnoseError> {
    let mut config = DiagnoseConfig::from_env()?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(secs) = args.timeout {
        config.timeout = Duration::from_secs(secs.clamp(1, 300));
    }
    if let Some(dir) = args.samples_dir {
        config.samples_dir = dir;
    }
    if let Some(filter) = args.resample {
        config.resample = filter;
    }

    let mut workflow = DiagnosisWorkflow::new(SampleCatalog::new(&config.samples_dir), config.normalizer());

    match (args.sample, args.image) {
        (Some(index), _) => workflow.select_sample(index)?,
        (None, Some(path)) => {
            let bytes = read_image(&path)?;
            workflow.select_upload(Some(bytes))?;
        }
        (None, None) => return Err(DiagnoseError::NoImageSelected),
    }

    if args.tensor_only {
        let asset = workflow.session().active().ok_or(DiagnoseError::NoImageSelected)?;
        let normalizer = config.normalizer();
        let tensor = extract(&normalizer.normalize(asset)?);
        let (rows, cols, channels) = tensor.shape();
        println!("{}x{}x{} (filter: {})", rows, cols, channels, normalizer.filter());
        return Ok(());
    }

    let client = config.inference_client();
    debug!(endpoint = client.endpoint(), timeout_secs = client.timeout().as_secs(), "submitting");
    let diagnosis = workflow.submit(&client)?;

    println!("{}", diagnosis.target);
    if let Some(disease) = paddy_diagnose::Disease::from_route_id(diagnosis.target.disease_id()) {
        println!("{}", disease.label());
    }
    let raw = serde_json::to_string(&diagnosis.response)
        .map_err(|e| DiagnoseError::InvalidResponse(e.to_string()))?;
    println!("{}", raw);
    Ok(())
}

fn read_image(path: &Path) -> Result<Vec<u8>, DiagnoseError> {
    std::fs::read(path).map_err(|source| DiagnoseError::ImageUnreadable { path: path.to_path_buf(), source })
}
