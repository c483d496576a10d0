// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod serve;
pub mod types;
pub mod watch;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::build::{BuildStamp, ProcessBuildRunner};
use crate::cli::CliArgs;
use crate::config::{ConfigFile, apply_cli_overrides, load_or_default};
use crate::engine::{WatchLoop, run_build};
use crate::serve::ServeState;
use crate::types::WatchBackend;
use crate::watch::{HashSource, NotifySource, WatchSet};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the optional reload server
/// - change source, build runner and watch loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_or_default(args.config.as_deref())?;
    apply_cli_overrides(&mut raw, &args);
    let cfg = ConfigFile::try_from(raw)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let stamp = BuildStamp::new(cfg.build.timestamp_file.clone());
    let mut runner = ProcessBuildRunner::new(cfg.build.cmd.clone());

    if args.once {
        if run_build(&mut runner, &stamp).await {
            return Ok(());
        }
        bail!("build command failed: {}", cfg.build.cmd);
    }

    // Ctrl-C flips the shutdown channel; the loop and the server both
    // watch it.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    {
        let tx = shutdown_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(true);
        });
    }

    // Bind before anything long-lived starts: a port conflict is fatal
    // at startup, not a background surprise.
    let server_handle = if cfg.serve.enabled {
        let listener = serve::bind(&cfg.serve).await?;
        let state = ServeState::new(cfg.serve.dir.clone(), stamp.clone());
        Some(tokio::spawn(serve::serve(
            listener,
            state,
            shutdown_rx.clone(),
        )))
    } else {
        None
    };

    if cfg.build.on_start {
        info!("running initial build");
        run_build(&mut runner, &stamp).await;
    }

    let set = WatchSet::from_config(&cfg)?;
    let interval = cfg.watch.interval();

    match cfg.watch.backend {
        WatchBackend::Hash => {
            let source = HashSource::new(set, interval);
            WatchLoop::new(source, runner, stamp, shutdown_rx)
                .run()
                .await?;
        }
        WatchBackend::Notify => {
            let source = NotifySource::new(set, interval)?;
            WatchLoop::new(source, runner, stamp, shutdown_rx)
                .run()
                .await?;
        }
    }

    // The loop is done; tell the server (if any) to stop and wait until it
    // has actually released its port before returning.
    let _ = shutdown_tx.send(true);
    if let Some(handle) = server_handle {
        handle.await.context("joining reload server task")??;
    }

    Ok(())
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("docwatch dry-run");
    println!("  watch.dir = {:?}", cfg.watch.dir);
    println!("  watch.config_file = {:?}", cfg.watch.config_file);
    println!("  watch.interval_seconds = {}", cfg.watch.interval_seconds);
    if !cfg.watch.exclude.is_empty() {
        println!("  watch.exclude = {:?}", cfg.watch.exclude);
    }
    println!("  watch.backend = {:?}", cfg.watch.backend);
    println!("  build.cmd = {}", cfg.build.cmd);
    println!("  build.timestamp_file = {:?}", cfg.build.timestamp_file);
    if cfg.build.on_start {
        println!("  build.on_start = true");
    }
    println!("  serve.enabled = {}", cfg.serve.enabled);
    if cfg.serve.enabled {
        println!("  serve.addr = {}:{}", cfg.serve.host, cfg.serve.port);
        println!("  serve.dir = {:?}", cfg.serve.dir);
    }

    debug!("dry-run complete (no execution)");
}
