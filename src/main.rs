// Entrypoint: read settings, start logging, ask for the caption and the
// token, then hand everything to the pipeline. Any failure ends up in the
// single handler below and the process exits with code 1.

use catdisk_cli::config::{Settings, TOKEN_VAR};
use catdisk_cli::credentials::{CredentialProvider, EnvCredentialProvider, PromptCredentialProvider};
use catdisk_cli::disk::DiskClient;
use catdisk_cli::image::ImageClient;
use catdisk_cli::pipeline::Pipeline;
use catdisk_cli::poll::UploadPoller;
use catdisk_cli::transport::HttpTransport;
use catdisk_cli::{logging, ui};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Configuration error: {:?}", err);
            return ExitCode::from(1);
        }
    };
    if let Err(err) = logging::init(&settings.log_file) {
        eprintln!("Logging setup failed: {:?}", err);
        return ExitCode::from(1);
    }

    match run(&settings) {
        Ok(()) => {
            info!("Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Unexpected error: {:?}", err);
            ExitCode::from(1)
        }
    }
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    let caption = ui::prompt_caption()?;
    let provider: Box<dyn CredentialProvider> = if std::env::var_os(TOKEN_VAR).is_some() {
        Box::new(EnvCredentialProvider::new(TOKEN_VAR))
    } else {
        Box::new(PromptCredentialProvider::new("Yandex Disk token"))
    };
    let token = provider.credential()?;

    let transport = HttpTransport::new()?;
    let poller = UploadPoller::new(settings.poll_interval).with_max_wait(settings.poll_max_wait);
    let pipeline = Pipeline::new(
        ImageClient::new(transport.clone(), settings.image_api_url.clone()),
        DiskClient::new(transport, settings.disk_api_url.clone(), poller)
            .with_progress(ui::upload_spinner()),
    );

    pipeline.run(&token, &caption, &settings.folder, &settings.manifest_path)?;
    Ok(())
}
