use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    assets::{decode, store::PreparedImage},
    face::id::CharacterId,
    foundation::error::{FlipbookError, FlipbookResult},
};

/// Backend that fetches game files by relative path.
///
/// Load failures and parse failures are reported as distinct [`FlipbookError`] variants. Loaders
/// are shared across the parallel image decode, hence `Sync`.
pub trait AssetLoader: Sync {
    /// Fetch and parse a JSON document.
    fn get_json(&self, path: &str) -> FlipbookResult<serde_json::Value>;

    /// Fetch and decode an image.
    fn get_image(&self, path: &str) -> FlipbookResult<PreparedImage>;
}

/// Normalize and validate game-file-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> FlipbookResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(FlipbookError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(FlipbookError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FlipbookError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(FlipbookError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Path layout of a game file tree.
#[derive(Clone, Debug)]
pub struct ResourcePaths {
    extensions: BTreeSet<String>,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self::new(["manlea"])
    }
}

impl ResourcePaths {
    /// Layout where the given character names live in extension packs.
    pub fn new<I, S>(extension_characters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extension_characters.into_iter().map(Into::into).collect(),
        }
    }

    /// Return `true` when `name` ships in an extension pack.
    pub fn is_extension(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }

    /// `data/characters/{category}/{name}.json`, prefixed for extension characters.
    pub fn character_json(&self, id: &CharacterId) -> String {
        self.under_root(
            &id.name,
            &format!("data/characters/{}/{}.json", id.category, id.name),
        )
    }

    /// `media/face/{src}`, prefixed for extension characters.
    pub fn face_image(&self, id: &CharacterId, src: &str) -> String {
        self.under_root(&id.name, &format!("media/face/{src}"))
    }

    fn under_root(&self, name: &str, target: &str) -> String {
        if self.is_extension(name) {
            format!("extension/{name}/{target}")
        } else {
            target.to_owned()
        }
    }
}

/// Loader reading from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used to resolve relative paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_bytes(&self, path: &str) -> FlipbookResult<Vec<u8>> {
        let norm = normalize_rel_path(path)?;
        let full = self.root.join(Path::new(&norm));
        std::fs::read(&full).map_err(|e| FlipbookError::load(path, e))
    }
}

impl AssetLoader for FsLoader {
    #[tracing::instrument(level = "debug", skip(self))]
    fn get_json(&self, path: &str) -> FlipbookResult<serde_json::Value> {
        let bytes = self.read_bytes(path)?;
        serde_json::from_slice(&bytes).map_err(|e| FlipbookError::parse(path, e))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn get_image(&self, path: &str) -> FlipbookResult<PreparedImage> {
        let bytes = self.read_bytes(path)?;
        decode::decode_image(&bytes).map_err(|e| FlipbookError::load(path, e))
    }
}

/// Loader serving files from memory, counting every fetch. For tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    files: HashMap<String, Vec<u8>>,
    json_loads: AtomicUsize,
    image_loads: AtomicUsize,
}

impl MemoryLoader {
    /// Empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw bytes under `path`.
    pub fn insert_bytes(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Register a JSON document under `path`.
    pub fn insert_json(&mut self, path: impl Into<String>, doc: &serde_json::Value) {
        self.insert_bytes(path, doc.to_string().into_bytes());
    }

    /// Number of `get_json` calls served so far.
    pub fn json_load_count(&self) -> usize {
        self.json_loads.load(Ordering::SeqCst)
    }

    /// Number of `get_image` calls served so far.
    pub fn image_load_count(&self) -> usize {
        self.image_loads.load(Ordering::SeqCst)
    }

    fn bytes(&self, path: &str) -> FlipbookResult<&[u8]> {
        self.files
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| FlipbookError::load(path, anyhow::anyhow!("no such file")))
    }
}

impl AssetLoader for MemoryLoader {
    fn get_json(&self, path: &str) -> FlipbookResult<serde_json::Value> {
        self.json_loads.fetch_add(1, Ordering::SeqCst);
        let bytes = self.bytes(path)?;
        serde_json::from_slice(bytes).map_err(|e| FlipbookError::parse(path, e))
    }

    fn get_image(&self, path: &str) -> FlipbookResult<PreparedImage> {
        self.image_loads.fetch_add(1, Ordering::SeqCst);
        let bytes = self.bytes(path)?;
        decode::decode_image(bytes).map_err(|e| FlipbookError::load(path, e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
