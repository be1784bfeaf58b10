//! Monolith Binary - Local deployment of one pipeline stage
//!
//! It wires up:
//! - Local adapters (filesystem blob store, Redis lists)
//! - ffmpeg for media work, AssemblyAI for transcription
//! - `WORKERS` receive loops serving the configured `STAGE`

use mediapod::adapters::assemblyai::AssemblyAi;
use mediapod::adapters::ffmpeg::FfmpegTool;
use mediapod::adapters::local::{FsStorage, RedisPool};
use mediapod::application::runner::StageRunner;
use mediapod::application::stages::build_stage;
use mediapod::application::worker::WorkerService;
use mediapod::config::{LocalConfig, TranscriberConfig, WorkerConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (worker_config, transcriber_config) =
        match (WorkerConfig::from_env(), TranscriberConfig::from_env()) {
            (Ok(w), Ok(t)) => (w, t),
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "Invalid configuration");
                std::process::exit(1);
            }
        };
    let local_config = LocalConfig::from_env();

    // 1. Adapters (Local implementations)
    let queue = match RedisPool::new(
        &local_config.redis_url,
        &worker_config.queue_read,
        &worker_config.queue_write,
    ) {
        Ok(q) => q,
        Err(e) => {
            error!(error = %e, "Failed to connect to Redis");
            std::process::exit(1);
        }
    };
    let storage = FsStorage::new(&local_config.storage_dir);

    // 2. Application Services
    let stage = build_stage(
        &worker_config,
        storage,
        FfmpegTool::default(),
        AssemblyAi::new(&transcriber_config),
    );
    let worker_service = Arc::new(WorkerService::new(
        queue.clone(),
        StageRunner::new(stage, queue),
    ));

    // 3. Start Workers
    let mut handles = Vec::with_capacity(worker_config.workers);
    for i in 0..worker_config.workers {
        let w = worker_service.clone();
        handles.push(tokio::spawn(async move {
            w.run_worker_loop(i).await;
        }));
    }
    info!(
        workers = worker_config.workers,
        stage = %worker_config.stage,
        queue = %worker_config.queue_read,
        "Workers started"
    );

    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Worker task ended");
        }
    }
}
