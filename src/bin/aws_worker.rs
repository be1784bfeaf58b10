//! AWS Worker Binary
//!
//! Long-running worker for ECS/Batch that:
//! 1. Connects to AWS services (S3, SQS).
//! 2. Serves the configured `STAGE`, reading pods from `SQS_READ_URL` and
//!    publishing outcomes to `SQS_WRITE_URL`.
//!
//! Environment Variables:
//! - AWS_REGION: AWS region (e.g., us-east-1)
//! - S3_BUCKET: S3 bucket for pod media
//! - SQS_READ_URL / SQS_WRITE_URL: inbound and outbound queues
//! - STAGE and the other worker settings

use mediapod::adapters::assemblyai::AssemblyAi;
use mediapod::adapters::aws::{S3Adapter, SqsAdapter};
use mediapod::adapters::ffmpeg::FfmpegTool;
use mediapod::application::runner::StageRunner;
use mediapod::application::stages::build_stage;
use mediapod::application::worker::WorkerService;
use mediapod::config::{AwsConfig, TranscriberConfig, WorkerConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let worker_config = WorkerConfig::from_env();
    let aws = AwsConfig::from_env();
    let transcriber = TranscriberConfig::from_env();
    let (worker_config, aws, transcriber) = match (worker_config, aws, transcriber) {
        (Ok(w), Ok(a), Ok(t)) => (w, a, t),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // Load AWS config
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    // Create adapters
    let storage = S3Adapter::new(aws_sdk_s3::Client::new(&sdk_config), aws.s3_bucket);
    let queue = SqsAdapter::new(
        aws_sdk_sqs::Client::new(&sdk_config),
        aws.sqs_read_url,
        aws.sqs_write_url,
    );

    let stage = build_stage(
        &worker_config,
        storage,
        FfmpegTool::default(),
        AssemblyAi::new(&transcriber),
    );
    let worker = Arc::new(WorkerService::new(
        queue.clone(),
        StageRunner::new(stage, queue),
    ));

    info!(stage = %worker_config.stage, workers = worker_config.workers, "AWS Worker started, polling for pods");

    let mut handles = Vec::with_capacity(worker_config.workers);
    for i in 0..worker_config.workers {
        let w = worker.clone();
        handles.push(tokio::spawn(async move { w.run_worker_loop(i).await }));
    }
    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Worker task ended");
        }
    }
}
