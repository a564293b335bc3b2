//! Archive acquisition: a caller-supplied file or a streamed download into a
//! temporary file.

use std::path::{Path, PathBuf};

use futures::StreamExt as _;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt as _;

use crate::{Error, Result};

/// The CSV a run reads from.
#[derive(Debug)]
pub enum InputFile {
  /// Supplied by the caller; never removed.
  Local(PathBuf),
  /// Downloaded for this run; removed by [`InputFile::cleanup`] or on drop.
  Downloaded(TempPath),
}

impl InputFile {
  pub fn path(&self) -> &Path {
    match self {
      InputFile::Local(p) => p,
      InputFile::Downloaded(p) => p,
    }
  }

  /// Remove a downloaded file. Failure is logged, never returned.
  pub fn cleanup(self) {
    if let InputFile::Downloaded(temp) = self {
      let path = temp.to_path_buf();
      match temp.close() {
        Ok(()) => tracing::debug!(path = %path.display(), "removed temporary download"),
        Err(e) => {
          tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary download")
        }
      }
    }
  }
}

/// Resolve the run's input: `local` if given, otherwise a fresh download of
/// `url`.
pub async fn acquire(local: Option<&Path>, url: &str) -> Result<InputFile> {
  match local {
    Some(path) => {
      tracing::info!(path = %path.display(), "using local archive");
      Ok(InputFile::Local(path.to_path_buf()))
    }
    None => download_csv(url).await.map(InputFile::Downloaded),
  }
}

/// Download `url` into a new temporary file, streaming the body to disk.
pub async fn download_csv(url: &str) -> Result<TempPath> {
  tracing::info!(%url, "downloading archive");

  let temp = tempfile::Builder::new()
    .prefix("ibtracs-")
    .suffix(".csv")
    .tempfile()
    .map_err(|source| Error::Io { path: std::env::temp_dir(), source })?
    .into_temp_path();

  let http_err = |source| Error::Http { url: url.to_owned(), source };

  let client = reqwest::Client::builder()
    .user_agent(concat!("ibtracs-updater/", env!("CARGO_PKG_VERSION")))
    .build()
    .map_err(http_err)?;

  let response = client.get(url).send().await.map_err(http_err)?;
  if !response.status().is_success() {
    return Err(Error::HttpStatus {
      url:    url.to_owned(),
      status: response.status().as_u16(),
    });
  }

  let io_err = |source| Error::Io { path: temp.to_path_buf(), source };
  let mut file = tokio::fs::File::create(&temp).await.map_err(io_err)?;

  let mut stream = response.bytes_stream();
  let mut downloaded: u64 = 0;
  while let Some(chunk) = stream.next().await {
    let chunk = chunk.map_err(http_err)?;
    file.write_all(&chunk).await.map_err(io_err)?;
    downloaded += chunk.len() as u64;
  }
  file.flush().await.map_err(io_err)?;

  tracing::info!(bytes = downloaded, path = %temp.display(), "download complete");
  Ok(temp)
}
