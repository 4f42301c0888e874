use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use rayon::prelude::*;

use crate::{
    animation::timer::TimerBook,
    assets::loader::{AssetLoader, ResourcePaths},
    config::ViewerConfig,
    face::{
        id::CharacterId,
        listing::ExpressionListing,
        model::{AbstractFaces, Face, FaceSource},
    },
    foundation::error::{FlipbookError, FlipbookResult},
    individual::Individual,
    render::surface::Surface,
};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Images a face draws from, keyed by image name (`""` for the default image).
#[derive(Clone, Debug, Default)]
pub struct ImageSet {
    by_name: BTreeMap<String, Arc<PreparedImage>>,
}

impl ImageSet {
    /// Register `image` under `name`.
    pub fn insert(&mut self, name: impl Into<String>, image: Arc<PreparedImage>) {
        self.by_name.insert(name.into(), image);
    }

    /// Look up an image by name.
    pub fn get(&self, name: &str) -> FlipbookResult<&PreparedImage> {
        self.by_name
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| {
                FlipbookError::unresolved(format!("couldn't find img '{name}' in image set"))
            })
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Return `true` when the set holds no image.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// A character's face, chosen expression and loaded images, not yet bound to a surface.
///
/// Keeping the bind step separate lets a caller drop a result that arrives after its surface went
/// away, without ever touching that surface.
#[derive(Clone, Debug)]
pub struct ResolvedFace {
    /// Character the face was resolved for.
    pub id: CharacterId,
    /// Face geometry.
    pub face: Arc<Face>,
    /// Expression to render.
    pub expression: String,
    /// Every image the face may draw from.
    pub images: ImageSet,
}

impl ResolvedFace {
    /// Bind to `surface`, ready to [`Individual::render`].
    pub fn bind<S: Surface>(
        self,
        surface: S,
        config: ViewerConfig,
        timers: &TimerBook,
    ) -> FlipbookResult<Individual<S>> {
        Individual::new(self, surface, config, timers)
    }
}

/// Session cache resolving character ids to faces and images.
///
/// Character documents are cached by id and images by resolved path. Both caches only grow: the
/// game files are treated as immutable for the session.
pub struct FaceRepository<L> {
    loader: L,
    paths: ResourcePaths,
    abstract_faces: Option<AbstractFaces>,
    characters: HashMap<CharacterId, Arc<FaceSource>>,
    images: HashMap<String, Arc<PreparedImage>>,
}

impl<L: AssetLoader> FaceRepository<L> {
    /// Repository over `loader` with the default path layout.
    pub fn new(loader: L) -> Self {
        Self::with_paths(loader, ResourcePaths::default())
    }

    /// Repository over `loader` with a custom path layout.
    pub fn with_paths(loader: L, paths: ResourcePaths) -> Self {
        Self {
            loader,
            paths,
            abstract_faces: None,
            characters: HashMap::new(),
            images: HashMap::new(),
        }
    }

    /// Underlying loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Install the abstract faces table used by string `face` references.
    pub fn set_abstract_faces(&mut self, faces: AbstractFaces) {
        self.abstract_faces = Some(faces);
    }

    /// Load and install the abstract faces document at `path`.
    pub fn load_abstract_faces(&mut self, path: &str) -> FlipbookResult<()> {
        let doc = self.loader.get_json(path)?;
        let faces = AbstractFaces::from_json(doc, path)?;
        tracing::debug!(path, count = faces.len(), "loaded abstract faces");
        self.abstract_faces = Some(faces);
        Ok(())
    }

    /// Load a character index (`["{category}.{name}.json", ...]`) and return character ids.
    pub fn load_character_index(&self, path: &str) -> FlipbookResult<Vec<String>> {
        let doc = self.loader.get_json(path)?;
        let files: Vec<String> =
            serde_json::from_value(doc).map_err(|e| FlipbookError::parse(path, e))?;
        Ok(crate::face::listing::character_ids_from_index(&files))
    }

    /// Classified `face` field of a character, loading its document on first use.
    pub fn character(&mut self, id: &CharacterId) -> FlipbookResult<Arc<FaceSource>> {
        if let Some(source) = self.characters.get(id) {
            return Ok(Arc::clone(source));
        }

        let path = self.paths.character_json(id);
        tracing::debug!(character = %id, path, "loading character");
        let doc = self.loader.get_json(&path).map_err(|e| with_character(e, id))?;
        let source = Arc::new(FaceSource::from_character_json(&doc, &path)?);
        self.characters.insert(id.clone(), Arc::clone(&source));
        Ok(source)
    }

    /// What the character offers to an expression picker.
    pub fn expression_listing(&mut self, character_id: &str) -> FlipbookResult<ExpressionListing> {
        let id = CharacterId::parse(character_id)?;
        let source = self.character(&id)?;
        Ok(ExpressionListing::from_source(&source))
    }

    /// Resolve a character and expression to a face plus its loaded images.
    ///
    /// Returns `Ok(None)` when the character has no face data at all.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resolve(
        &mut self,
        character_id: &str,
        expression: &str,
    ) -> FlipbookResult<Option<ResolvedFace>> {
        let id = CharacterId::parse(character_id)?;
        let source = self.character(&id)?;

        let face = match source.as_ref() {
            FaceSource::NoFace => return Ok(None),
            FaceSource::Direct(face) => Arc::clone(face),
            FaceSource::AbstractRef(name) => self
                .abstract_faces
                .as_ref()
                .ok_or_else(|| {
                    FlipbookError::unresolved(format!(
                        "{id} references abstract face '{name}', but no abstract faces are loaded"
                    ))
                })?
                .get(name)?,
            FaceSource::AbstractMap(_) => {
                return Err(FlipbookError::unhandled_shape(format!(
                    "can't resolve keyed abstract face map: {id}, {expression}"
                )));
            }
        };

        face.expression(expression)?;
        let images = self.load_images(&id, &face)?;

        Ok(Some(ResolvedFace {
            id,
            face,
            expression: expression.to_owned(),
            images,
        }))
    }

    /// Load every image `face` may draw from, reusing cached decodes.
    ///
    /// Distinct uncached paths are decoded in parallel. Any failure fails the whole set and
    /// nothing from that batch is cached.
    pub fn load_images(&mut self, id: &CharacterId, face: &Face) -> FlipbookResult<ImageSet> {
        let sources: Vec<(String, String)> = face
            .image_sources()
            .into_iter()
            .map(|(name, src)| (name, self.paths.face_image(id, &src)))
            .collect();

        let missing: BTreeSet<&str> = sources
            .iter()
            .map(|(_, path)| path.as_str())
            .filter(|path| !self.images.contains_key(*path))
            .collect();

        if !missing.is_empty() {
            tracing::debug!(character = %id, count = missing.len(), "decoding face images");
            let loader = &self.loader;
            let loaded = missing
                .into_par_iter()
                .map(|path| {
                    loader
                        .get_image(path)
                        .map(|img| (path.to_owned(), Arc::new(img)))
                })
                .collect::<FlipbookResult<Vec<_>>>()
                .map_err(|e| with_character(e, id))?;
            self.images.extend(loaded);
        }

        let mut set = ImageSet::default();
        for (name, path) in &sources {
            let image = self.images.get(path).ok_or_else(|| {
                FlipbookError::unresolved(format!("image '{path}' missing after load"))
            })?;
            set.insert(name.clone(), Arc::clone(image));
        }
        Ok(set)
    }

    /// Number of distinct images decoded this session.
    pub fn cached_image_count(&self) -> usize {
        self.images.len()
    }
}

fn with_character(err: FlipbookError, id: &CharacterId) -> FlipbookError {
    match err {
        FlipbookError::Load { path, source } => FlipbookError::Load {
            path,
            source: source.context(format!("character {id}")),
        },
        FlipbookError::Parse { path, source } => FlipbookError::Parse {
            path,
            source: source.context(format!("character {id}")),
        },
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
