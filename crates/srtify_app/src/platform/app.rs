use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use srtify_core::{AppViewModel, SelectedFile, SubmissionState};
use srtify_engine::{download_artifact, AtomicFileWriter, ReqwestService, SubmissionController};
use srtify_logging::{srtify_error, srtify_info, srtify_warn};

use super::cli::Cli;
use super::render::{self, StatusPrinter};
use super::settings::{self, AppSettings};

/// Exit code used when the user interrupts a running submission.
const EXIT_INTERRUPTED: u8 = 130;

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = settings::resolve(&cli)?;
    let file = read_selected_file(&cli)?;

    let service = Arc::new(
        ReqwestService::new(settings.service.clone()).context("invalid service settings")?,
    );
    srtify_info!(
        "Using {} (poll every {:?}, at most {} polls)",
        settings.service.base_url,
        settings.policy.interval,
        settings.policy.max_attempts
    );

    let controller = SubmissionController::spawn(service.clone(), settings.policy);
    let mut views = controller.subscribe();
    controller.select_file(file);
    views
        .wait_for(|view| view.can_submit)
        .await
        .context("submission controller stopped before the file was accepted")?;
    controller.submit();

    let mut printer = StatusPrinter::default();
    let view = loop {
        let view = views.borrow_and_update().clone();
        if let Some(line) = printer.next_line(&view) {
            println!("{line}");
        }
        if view.submission.is_terminal() {
            break view;
        }

        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    bail!("submission controller stopped unexpectedly");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                srtify_warn!("Interrupted, cancelling submission");
                controller.dispose().await;
                eprintln!("Cancelled.");
                return Ok(ExitCode::from(EXIT_INTERRUPTED));
            }
        }
    };
    controller.dispose().await;

    finish(&view, &service, &settings).await
}

async fn finish(
    view: &AppViewModel,
    service: &ReqwestService,
    settings: &AppSettings,
) -> anyhow::Result<ExitCode> {
    let download_url = match &view.download {
        Some(link) => Some(service.download_url(link)?.to_string()),
        None => None,
    };
    for line in render::summary(view, download_url.as_deref()) {
        println!("{line}");
    }

    match (&view.submission, &view.download) {
        (SubmissionState::Completed { .. }, Some(link)) if settings.download => {
            let writer = AtomicFileWriter::new(settings.output_dir.clone());
            match download_artifact(service, link, &writer).await {
                Ok(path) => {
                    println!("Saved {}", path.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    srtify_error!("Failed to save subtitles for {}: {}", link.handle, err);
                    eprintln!("{err}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        (SubmissionState::Completed { .. }, _) => Ok(ExitCode::SUCCESS),
        _ => Ok(ExitCode::FAILURE),
    }
}

fn read_selected_file(cli: &Cli) -> anyhow::Result<SelectedFile> {
    let name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file path", cli.file.display()))?;
    let payload = fs::read(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let file = SelectedFile::new(name, payload);
    if !file.has_supported_extension() {
        eprintln!(
            "Warning: {} is not a supported media type; the service may reject it.",
            file.name()
        );
    }
    Ok(file)
}
