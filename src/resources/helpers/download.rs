//! HTTP downloads staged in temporary files.
use anyhow::{Context as _, Result};
use std::io::Write as _;
use tempfile::NamedTempFile;

/// Download `url` into a fresh temporary file.
///
/// The file is deleted when the returned handle is dropped. Non-2xx
/// responses are errors.
///
/// # Errors
///
/// Returns an error if the request fails, the server answers with an error
/// status, or the body cannot be written to disk.
pub fn download_to_temp(url: &str) -> Result<NamedTempFile> {
    let mut response = ureq::get(url)
        .call()
        .with_context(|| format!("GET {url}"))?;

    let mut file = NamedTempFile::new().context("creating temporary download file")?;
    let mut reader = response.body_mut().as_reader();
    std::io::copy(&mut reader, &mut file).with_context(|| format!("downloading {url}"))?;
    file.flush().context("flushing download")?;
    Ok(file)
}
