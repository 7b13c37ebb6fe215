//! Texture loading off the simulation thread.
//!
//! [`TextureLoader`] owns a small pool of named worker threads. The
//! simulation submits requests and collects finished loads each tick via
//! [`drain_results`](TextureLoader::drain_results); loading never blocks a
//! tick. Completion order across requests is unspecified.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

/// Errors from loading a texture.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("texture {key} not found at {path}")]
    NotFound { key: String, path: PathBuf },

    #[error("failed to decode texture {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to spawn loader thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Decoded RGBA8 texture.
#[derive(Clone, Debug)]
pub struct Texture {
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Where texture bytes come from.
pub trait TextureSource: Send + Sync + 'static {
    fn load(&self, key: &str) -> Result<Texture, AssetError>;
}

/// Loads `<dir>/<key>.<extension>` from disk.
#[derive(Clone, Debug)]
pub struct FileTextureSource {
    dir: PathBuf,
    extension: String,
}

impl FileTextureSource {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.to_string(),
        }
    }

    /// Path a key resolves to.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{}", self.extension))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TextureSource for FileTextureSource {
    fn load(&self, key: &str) -> Result<Texture, AssetError> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(AssetError::NotFound {
                key: key.to_string(),
                path,
            });
        }
        let img = image::open(&path)
            .map_err(|source| AssetError::Decode {
                key: key.to_string(),
                source,
            })?
            .to_rgba8();
        Ok(Texture {
            key: key.to_string(),
            width: img.width(),
            height: img.height(),
            rgba: img.into_raw(),
        })
    }
}

/// Which scene object a texture belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadTarget {
    /// Body at this registry index; counted by the preload gate.
    Body(usize),
    /// The sun; not gated.
    Sun,
}

struct LoadRequest {
    target: LoadTarget,
    key: String,
}

/// A finished load.
#[derive(Debug)]
pub struct TextureLoadResult {
    pub target: LoadTarget,
    pub key: String,
    pub result: Result<Texture, AssetError>,
}

/// Thread pool that decodes textures in the background.
pub struct TextureLoader {
    request_sender: Option<Sender<LoadRequest>>,
    result_receiver: Receiver<TextureLoadResult>,
    worker_handles: Vec<JoinHandle<()>>,
}

impl TextureLoader {
    /// Spawn `worker_count` loader threads (at least one) reading from `source`.
    pub fn new(worker_count: usize, source: Arc<dyn TextureSource>) -> Result<Self, AssetError> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<LoadRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let mut handles = Vec::with_capacity(worker_count.max(1));
        for i in 0..worker_count.max(1) {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let source = Arc::clone(&source);

            let handle = std::thread::Builder::new()
                .name(format!("texture-loader-{i}"))
                .spawn(move || {
                    while let Ok(request) = rx.recv() {
                        let result = source.load(&request.key);
                        let _ = tx.send(TextureLoadResult {
                            target: request.target,
                            key: request.key,
                            result,
                        });
                    }
                })
                .map_err(AssetError::Spawn)?;
            handles.push(handle);
        }

        Ok(Self {
            request_sender: Some(request_tx),
            result_receiver: result_rx,
            worker_handles: handles,
        })
    }

    /// Queue a load. Returns `false` after shutdown.
    pub fn request(&self, target: LoadTarget, key: &str) -> bool {
        match &self.request_sender {
            Some(sender) => sender
                .send(LoadRequest {
                    target,
                    key: key.to_string(),
                })
                .is_ok(),
            None => false,
        }
    }

    /// Drain all finished loads. Called once per tick on the simulation thread.
    pub fn drain_results(&self) -> Vec<TextureLoadResult> {
        self.result_receiver.try_iter().collect()
    }

    /// Stop accepting requests and join the workers once the queue empties.
    pub fn shutdown(&mut self) {
        self.request_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn write_texture(dir: &Path, name: &str) {
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join(format!("{name}.png"))).unwrap();
    }

    fn collect(loader: &TextureLoader, expected: usize) -> Vec<TextureLoadResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        while results.len() < expected && start.elapsed() < Duration::from_secs(5) {
            results.extend(loader.drain_results());
            std::thread::sleep(Duration::from_millis(5));
        }
        results
    }

    #[test]
    fn test_file_source_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        write_texture(dir.path(), "Earth");
        let source = FileTextureSource::new(dir.path(), "png");

        let texture = source.load("Earth").unwrap();
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.rgba.len(), 4 * 2 * 4);
        assert_eq!(&texture.rgba[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_file_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileTextureSource::new(dir.path(), "jpg");
        assert!(matches!(
            source.load("Pluto"),
            Err(AssetError::NotFound { ref key, .. }) if key == "Pluto"
        ));
    }

    #[test]
    fn test_file_source_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Mars.png"), b"not a png").unwrap();
        let source = FileTextureSource::new(dir.path(), "png");
        assert!(matches!(source.load("Mars"), Err(AssetError::Decode { .. })));
    }

    #[test]
    fn test_loader_delivers_every_request() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Mercury", "Venus", "Sun"] {
            write_texture(dir.path(), name);
        }
        let source = Arc::new(FileTextureSource::new(dir.path(), "png"));
        let loader = TextureLoader::new(2, source).unwrap();

        assert!(loader.request(LoadTarget::Body(0), "Mercury"));
        assert!(loader.request(LoadTarget::Body(1), "Venus"));
        assert!(loader.request(LoadTarget::Sun, "Sun"));
        assert!(loader.request(LoadTarget::Body(2), "Earth"));

        let results = collect(&loader, 4);
        assert_eq!(results.len(), 4);
        let failed: Vec<_> = results.iter().filter(|r| r.result.is_err()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].target, LoadTarget::Body(2));
    }

    #[test]
    fn test_request_after_shutdown() {
        let source = Arc::new(FileTextureSource::new("missing", "jpg"));
        let mut loader = TextureLoader::new(1, source).unwrap();
        loader.shutdown();
        assert!(!loader.request(LoadTarget::Sun, "Sun"));
    }
}
