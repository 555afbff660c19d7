//! Smoke test client for a running server

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

/// MIME type sent for an uploaded file, from its extension
fn audio_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("opus") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("amr") => "audio/amr",
        _ => "audio/octet-stream",
    }
}

async fn get_json(client: &Client, url: &str) -> Result<serde_json::Value> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?;
    response
        .json()
        .await
        .with_context(|| format!("GET {} returned invalid JSON", url))
}

async fn upload(client: &Client, base_url: &str, audio: &Path, encoding: &str, sample_rate: u32) -> Result<serde_json::Value> {
    let bytes = read_audio_file(audio).await?;
    let filename = audio
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());

    let part = Part::bytes(bytes)
        .file_name(filename)
        .mime_str(audio_mime(audio))?;
    let form = Form::new()
        .part("audio", part)
        .text("encoding", encoding.to_string())
        .text("sampleRateHertz", sample_rate.to_string())
        .text("languageCode", "en-US")
        .text("enableWordTimeOffsets", "true")
        .text("enableAutomaticPunctuation", "true");

    let url = format!("{}/api/speech-to-text", base_url);
    let response = client
        .post(&url)
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("POST {} failed", url))?;
    response
        .json()
        .await
        .with_context(|| format!("POST {} returned invalid JSON", url))
}

async fn read_audio_file(path: &Path) -> Result<Vec<u8>> {
    let path = path.to_path_buf();
    actix_web::web::block(move || std::fs::read(&path))
        .await
        .context("File read task failed")?
        .context("Failed to read audio file")
}

/// Call every read-only endpoint, then upload `audio` when given
pub async fn run(base_url: &str, audio: Option<&Path>, encoding: &str, sample_rate: u32) -> Result<()> {
    let base_url = base_url.trim_end_matches('/');
    let client = Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .context("Failed to create HTTP client")?;

    let endpoints = [
        ("Health check", "/health"),
        ("Component test", "/api/test"),
        ("Supported formats", "/api/supported-formats"),
        ("Supported languages", "/api/supported-languages"),
    ];

    let mut failures = 0;
    for (label, path) in endpoints {
        match get_json(&client, &format!("{}{}", base_url, path)).await {
            Ok(body) => info!("{}: {}", label, body),
            Err(e) => {
                failures += 1;
                error!("{} failed: {:#}", label, e);
            }
        }
    }

    match audio {
        Some(path) if path.exists() => match upload(&client, base_url, path, encoding, sample_rate).await {
            Ok(body) => info!("Speech-to-text: {}", body),
            Err(e) => {
                failures += 1;
                error!("Speech-to-text failed: {:#}", e);
            }
        },
        Some(path) => warn!("Audio file not found: {}", path.display()),
        None => info!("No audio file given; skipping upload"),
    }

    if failures > 0 {
        anyhow::bail!("{} probe(s) failed", failures);
    }
    Ok(())
}
