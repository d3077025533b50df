use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::{format_speed, throughput};
use crate::data::{DownloadOptions, DownloadProgress, Source};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};

/// A downloaded archive sitting in its temporary file.
///
/// The file is deleted when this value is dropped, so an archive never
/// outlives the attempt that fetched it. Call [`StagedArchive::remove`] to
/// delete it explicitly and observe the outcome.
#[derive(Debug)]
pub struct StagedArchive {
    path: PathBuf,
    bytes: u64,
    elapsed: Duration,
    removed: bool,
}

impl StagedArchive {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn average_speed(&self) -> f64 {
        throughput(self.bytes, self.elapsed)
    }

    pub async fn remove(mut self) -> io::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        self.removed = true;
        Ok(())
    }
}

impl Drop for StagedArchive {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Stream `remote_file_name` from `source` into a temporary file in `target_dir`.
///
/// Chunks are written as they arrive. Progress is reported after every chunk
/// when the server announced a length; without one the download proceeds
/// silently. A response that ends without a single body byte is an error.
pub async fn download_archive<C: HttpClient>(
    client: &C,
    source: &Source,
    remote_file_name: &str,
    target_dir: &Path,
    options: &DownloadOptions,
) -> Result<StagedArchive> {
    let url = source.archive_url(remote_file_name);
    let mut staged = StagedArchive {
        path: target_dir.join(temp_file_name(remote_file_name)),
        bytes: 0,
        elapsed: Duration::ZERO,
        removed: false,
    };

    info!(source = %source.name, %url, "downloading archive");
    let started = Instant::now();

    let response = client
        .stream(&url, &options.headers)
        .await
        .map_err(FetchError::network)?;
    if !response.is_success() {
        return Err(FetchError::HttpStatus {
            url,
            status: response.status,
        });
    }
    let total = response.content_length.unwrap_or(0);
    debug!(total, path = %staged.path.display(), "writing archive");

    let write_error = |source: io::Error, path: &Path| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::File::create(&staged.path)
        .await
        .map_err(|e| write_error(e, &staged.path))?;
    let mut body = response.body;
    let mut downloaded = 0u64;

    loop {
        let next = tokio::time::timeout(options.stall_timeout, body.next())
            .await
            .map_err(|_| FetchError::Stalled {
                url: url.clone(),
                idle: options.stall_timeout,
            })?;
        let Some(chunk) = next else { break };
        let chunk = chunk.map_err(FetchError::network)?;

        file.write_all(&chunk)
            .await
            .map_err(|e| write_error(e, &staged.path))?;
        downloaded += chunk.len() as u64;

        if total > 0 {
            if let Some(callback) = &options.on_progress {
                callback(&DownloadProgress {
                    downloaded,
                    total,
                    speed_bps: throughput(downloaded, started.elapsed()),
                });
            }
        }
    }

    file.flush().await.map_err(|e| write_error(e, &staged.path))?;
    drop(file);

    if downloaded == 0 {
        return Err(FetchError::MissingBody { url });
    }

    staged.bytes = downloaded;
    staged.elapsed = started.elapsed();
    info!(
        source = %source.name,
        bytes = downloaded,
        elapsed = ?staged.elapsed,
        speed = %format_speed(staged.average_speed()),
        "download finished"
    );
    Ok(staged)
}

/// `temp-<unix millis>` followed by the archive's own extension.
fn temp_file_name(remote_file_name: &str) -> String {
    let extension = [".tar.xz", ".zip"]
        .into_iter()
        .find(|ext| remote_file_name.ends_with(ext))
        .unwrap_or("");
    format!("temp-{}{extension}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_name_keeps_extension() {
        let zip = temp_file_name("ffmpeg-master-latest-win64-gpl.zip");
        let tar = temp_file_name("ffmpeg-master-latest-linux64-gpl.tar.xz");
        assert!(zip.starts_with("temp-") && zip.ends_with(".zip"));
        assert!(tar.starts_with("temp-") && tar.ends_with(".tar.xz"));
        assert!(tar["temp-".len()..tar.len() - ".tar.xz".len()].parse::<i64>().is_ok());
    }

    #[test]
    fn drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp-1.zip");
        std::fs::write(&path, b"x").unwrap();
        drop(StagedArchive {
            path: path.clone(),
            bytes: 1,
            elapsed: Duration::ZERO,
            removed: false,
        });
        assert!(!path.exists());
    }
}
