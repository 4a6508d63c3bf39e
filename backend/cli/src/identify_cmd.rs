//! CLI Identify and Interpret Commands

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use florascope_core::ImageInput;
use florascope_understanding::{interpret as interpret_text, IdentificationSession, PlantIdentifier};
use tokio::io::AsyncReadExt;

use crate::mime::detect_image_mime;
use crate::terminal_output::{note_warn, render_record, supports_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
    Raw,
}

/// Identify the plant in a local photo and print the result.
pub async fn identify(
    identifier: &PlantIdentifier,
    path: &Path,
    mime: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mime = match mime {
        Some(mime) => mime,
        None => detect_image_mime(path)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot tell the image type of {}; pass --mime", path.display()))?,
    };
    if !mime.starts_with("image/") {
        note_warn(&format!("{mime} is not an image type; the provider may reject it"));
    }

    let mut image = ImageInput::new(data, mime);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        image = image.with_file_name(name);
    }

    let session = IdentificationSession::new();
    session.select_image(image).await;
    session.run(identifier).await.map_err(|e| anyhow!(e.user_message()))?;

    let snapshot = session.snapshot().await;
    if let Some(message) = snapshot.error {
        bail!(message);
    }
    let Some(identification) = snapshot.identification else {
        bail!("no identification result");
    };

    match format {
        OutputFormat::Raw => println!("{}", identification.result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&identification)?),
        OutputFormat::Pretty => print!("{}", render_record(&identification.record, supports_color())),
    }
    Ok(())
}

/// Interpret saved model output from a file or stdin and print it as JSON.
pub async fn interpret(path: Option<&Path>) -> Result<()> {
    let text = match path {
        Some(p) if p != Path::new("-") => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("Failed to read {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            buf
        }
    };
    let record = interpret_text(&text);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_identification_is_reported_once_as_error() {
        let path = std::env::temp_dir().join(format!("florascope-leaf-{}.jpg", std::process::id()));
        tokio::fs::write(&path, [0xFFu8, 0xD8, 0xFF]).await.unwrap();

        let identifier = PlantIdentifier::unconfigured("no key");
        let err = identify(&identifier, &path, None, OutputFormat::Raw).await.unwrap_err();
        let _ = tokio::fs::remove_file(&path).await;
        assert_eq!(err.to_string(), "service not configured");
    }

    #[tokio::test]
    async fn unknown_extension_needs_mime() {
        let identifier = PlantIdentifier::unconfigured("no key");
        let path = std::env::temp_dir().join(format!("florascope-leaf-{}.dat", std::process::id()));
        tokio::fs::write(&path, [1u8]).await.unwrap();
        let err = identify(&identifier, &path, None, OutputFormat::Raw).await.unwrap_err();
        let _ = tokio::fs::remove_file(&path).await;
        assert!(err.to_string().contains("--mime"));
    }
}
