use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use crate::cli::commands::VerifyArgs;
use crate::cli::progress::VerifyProgress;
use crate::config::{
    self, VeriomConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, DEFAULT_WORKERS,
};
use crate::errors::VeriomError;
use crate::loader::CsvLoader;
use crate::net::{HttpClient, ReqwestHttp, TcpDialer, TokioDialer};
use crate::pipeline::VerificationRunner;
use crate::probes::ProbeRegistry;
use crate::report::CsvSink;
use tracing::{info, warn};

struct RunConfig {
    workers: usize,
    http_timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
}

pub async fn handle_verify(args: VerifyArgs, quiet: bool) -> Result<(), VeriomError> {
    let run_id = Uuid::new_v4();
    info!(run_id = %run_id, input = %args.input, output = %args.output, "Starting verification run");

    // CLI flags win over file config, file config over defaults
    let file_config = match &args.config {
        Some(path) => Some(config::parse_config(Path::new(path)).await?),
        None => None,
    };
    let run_config = build_run_config(&args, file_config.as_ref())?;

    let loaded = CsvLoader::new(&args.input).load().await;
    if loaded.is_empty() {
        return Err(VeriomError::InputData(
            "No data found or error reading input file.".into(),
        ));
    }
    if !quiet {
        println!(
            "Loaded {} IoMs. Starting verification with {} workers...",
            loaded.len(),
            run_config.workers
        );
    }

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttp::new(
        run_config.http_timeout,
        &run_config.user_agent,
    )?);
    let tcp: Arc<dyn TcpDialer> = Arc::new(TokioDialer::new(run_config.connect_timeout));
    let registry = Arc::new(ProbeRegistry::builtin(http, tcp));

    // The sink is created only after the input proved non-empty, so an
    // empty run never touches the output path
    let sink = Arc::new(CsvSink::create(Path::new(&args.output), &loaded.columns)?);

    let cancel_token = CancellationToken::new();
    {
        let token = cancel_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Ctrl-C received, letting in-flight probes finish");
                token.cancel();
            }
        });
    }

    let mut runner = VerificationRunner::new(registry, sink, run_config.workers)
        .with_cancel_token(cancel_token);

    let progress_handle = if quiet {
        None
    } else {
        let (tx, mut rx) = mpsc::unbounded_channel();
        runner = runner.with_event_channel(tx);
        Some(tokio::spawn(async move {
            let mut progress = VerifyProgress::new();
            while let Some(event) = rx.recv().await {
                progress.handle_event(&event);
            }
        }))
    };

    let summary = runner.run(loaded.findings).await?;

    // Dropping the runner drops the event sender and ends the renderer
    drop(runner);
    if let Some(handle) = progress_handle {
        let _ = handle.await;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !quiet {
        println!(
            "Verification complete: {} findings ({} exploitable, {} secure, {} manual, {} errors) in {:.1}s",
            summary.total,
            summary.exploitable,
            summary.secure,
            summary.manual_check,
            summary.probe_errors,
            summary.duration_ms as f64 / 1000.0
        );
    }

    info!(
        run_id = %run_id,
        total = summary.total,
        exploitable = summary.exploitable,
        duration_ms = summary.duration_ms,
        "Verification run completed"
    );

    Ok(())
}

fn build_run_config(
    args: &VerifyArgs,
    file_config: Option<&VeriomConfig>,
) -> Result<RunConfig, VeriomError> {
    let workers = args
        .workers
        .or_else(|| file_config.and_then(|c| c.workers()))
        .unwrap_or(DEFAULT_WORKERS);
    if workers == 0 {
        return Err(VeriomError::Config("--workers must be >= 1".into()));
    }

    let http_timeout = args
        .timeout_secs
        .or_else(|| file_config.and_then(|c| c.timeout_secs()))
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    let connect_timeout = args
        .connect_timeout_secs
        .or_else(|| file_config.and_then(|c| c.connect_timeout_secs()))
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
    if http_timeout == 0 || connect_timeout == 0 {
        return Err(VeriomError::Config("Timeouts must be >= 1 second".into()));
    }

    let user_agent = file_config
        .and_then(|c| c.user_agent())
        .unwrap_or(DEFAULT_USER_AGENT)
        .to_string();

    Ok(RunConfig {
        workers,
        http_timeout: Duration::from_secs(http_timeout),
        connect_timeout: Duration::from_secs(connect_timeout),
        user_agent,
    })
}
