// Terminal interaction: the caption prompt and the upload spinner.

use anyhow::{Context, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

/// Ask for the text to put on the picture.
pub fn prompt_caption() -> Result<String> {
    let caption: String = Input::new()
        .with_prompt("Text for the picture")
        .allow_empty(true)
        .interact_text()
        .context("Reading caption")?;
    Ok(caption)
}

/// Spinner shown while the disk fetches the image. It stays blank until
/// the first message is set.
pub fn upload_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner
}
