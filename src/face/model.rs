use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Ordered part names of one frame, one name per part slot.
pub type PartNameList = Vec<String>;

/// Part table of one slot, keyed by part name.
pub type PartTable = BTreeMap<String, Part>;

/// Image name under which a face's default `src` image is registered.
pub const DEFAULT_IMAGE: &str = "";

/// One sprite rectangle plus its carry-over adjustment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Left edge of the sprite in its image.
    pub src_x: f64,
    /// Top edge of the sprite in its image.
    pub src_y: f64,
    /// Sprite width; source and destination share it.
    pub width: f64,
    /// Sprite height; source and destination share it.
    pub height: f64,
    /// Nominal destination x before carry-over.
    pub dest_x: f64,
    /// Nominal destination y before carry-over.
    pub dest_y: f64,
    /// Added to the x offset of every later part in the same frame, not this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_x: Option<f64>,
    /// Added to the y offset of every later part in the same frame, not this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_y: Option<f64>,
    /// Sub-image name; `None` draws from the default image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

/// Static description of a character's renderable surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Face {
    /// Reference surface width. Some expressions draw outside of it.
    pub width: u32,
    /// Reference surface height. Some expressions draw outside of it.
    pub height: u32,
    /// Informational, unused by rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_x: Option<f64>,
    /// Informational, unused by rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_y: Option<f64>,
    /// Default image source.
    pub src: String,
    /// Sub-image name to image source.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sub_images: BTreeMap<String, String>,
    /// Part slots; index 0 is usually the body and the last slot is always the face.
    pub parts: Vec<PartTable>,
    /// Expression name to expression.
    #[serde(default)]
    pub expressions: BTreeMap<String, Expression>,
}

impl Face {
    /// Look up part `name` in slot `slot`.
    pub fn part(&self, slot: usize, name: &str) -> FlipbookResult<&Part> {
        let table = self.parts.get(slot).ok_or_else(|| {
            FlipbookError::unresolved(format!(
                "part slot {slot} does not exist (face has {} slots)",
                self.parts.len()
            ))
        })?;
        table.get(name).ok_or_else(|| {
            FlipbookError::unresolved(format!("part '{name}' not found in slot {slot}"))
        })
    }

    /// Look up an expression by name.
    pub fn expression(&self, name: &str) -> FlipbookResult<&Expression> {
        self.expressions
            .get(name)
            .ok_or_else(|| FlipbookError::unresolved(format!("expression '{name}' not found")))
    }

    /// Every `(image name, image source)` pair the face may draw from, default image first.
    pub fn image_sources(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(1 + self.sub_images.len());
        out.push((DEFAULT_IMAGE.to_owned(), self.src.clone()));
        for (name, src) in &self.sub_images {
            out.push((name.clone(), src.clone()));
        }
        out
    }
}

/// An expression with exactly one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticExpression {
    /// Frame list; only the first entry is drawn.
    pub faces: Vec<PartNameList>,
}

impl StaticExpression {
    /// The single frame of this expression.
    pub fn frame(&self) -> FlipbookResult<&PartNameList> {
        self.faces
            .first()
            .ok_or_else(|| FlipbookError::unresolved("static expression has no frame"))
    }
}

/// An expression played back as a sequence of frames.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedExpression {
    /// Playback order as indices into `faces`.
    pub anim: Vec<usize>,
    /// Seconds per frame. Required for playback but kept optional so malformed data surfaces as a
    /// precondition error when a duration is requested.
    pub time: Option<f64>,
    /// Additional passes beyond the first; absent counts as one.
    pub repeat: Option<u32>,
    /// Frames referenced by `anim`.
    pub faces: Vec<PartNameList>,
}

impl AnimatedExpression {
    /// Duration of one frame in milliseconds.
    pub fn frame_duration_ms(&self) -> FlipbookResult<u64> {
        let secs = self
            .time
            .ok_or_else(|| FlipbookError::precondition("requested frame duration, but no time"))?;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(FlipbookError::precondition(format!(
                "frame time must be finite and > 0, got {secs}"
            )));
        }
        Ok((secs * 1000.0).round() as u64)
    }

    /// Period of the hover loop: one nominal pass over `anim`, independent of `repeat`.
    pub fn loop_duration_ms(&self) -> FlipbookResult<u64> {
        let frame = self.frame_duration_ms()?;
        if self.anim.is_empty() {
            return Err(FlipbookError::precondition(
                "requested loop duration, but no frames (anim)",
            ));
        }
        Ok(frame.saturating_mul(self.anim.len() as u64))
    }

    /// Number of full traversals of `anim` in one playthrough.
    pub fn passes(&self) -> u32 {
        self.repeat.unwrap_or(1).saturating_add(1)
    }

    /// Frame index shown while the animation is still.
    pub fn first_index(&self) -> FlipbookResult<usize> {
        self.anim
            .first()
            .copied()
            .ok_or_else(|| FlipbookError::precondition("wanted to animate, but anim is empty"))
    }

    /// Frame index the playthrough comes to rest on.
    pub fn last_index(&self) -> FlipbookResult<usize> {
        self.anim
            .last()
            .copied()
            .ok_or_else(|| FlipbookError::precondition("wanted to animate, but anim is empty"))
    }

    /// Part names of frame `index`.
    pub fn frame(&self, index: usize) -> FlipbookResult<&PartNameList> {
        self.faces.get(index).ok_or_else(|| {
            FlipbookError::unresolved(format!(
                "frame {index} not found (expression has {} frames)",
                self.faces.len()
            ))
        })
    }
}

/// Static or animated expression, discriminated by the presence of `anim`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExpressionDef", into = "ExpressionDef")]
pub enum Expression {
    /// Single still frame.
    Static(StaticExpression),
    /// Timed frame sequence.
    Animated(AnimatedExpression),
}

impl Expression {
    /// Return `true` for [`Expression::Animated`].
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ExpressionDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anim: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repeat: Option<u32>,
    faces: Vec<PartNameList>,
}

impl From<ExpressionDef> for Expression {
    fn from(def: ExpressionDef) -> Self {
        match def.anim {
            Some(anim) => Self::Animated(AnimatedExpression {
                anim,
                time: def.time,
                repeat: def.repeat,
                faces: def.faces,
            }),
            None => Self::Static(StaticExpression { faces: def.faces }),
        }
    }
}

impl From<Expression> for ExpressionDef {
    fn from(expr: Expression) -> Self {
        match expr {
            Expression::Static(s) => Self {
                anim: None,
                time: None,
                repeat: None,
                faces: s.faces,
            },
            Expression::Animated(a) => Self {
                anim: Some(a.anim),
                time: a.time,
                repeat: a.repeat,
                faces: a.faces,
            },
        }
    }
}

/// A character's `face` field, classified once at load time.
#[derive(Clone, Debug, PartialEq)]
pub enum FaceSource {
    /// The character has no face data.
    NoFace,
    /// Concrete face embedded in the character file.
    Direct(Arc<Face>),
    /// Name of an entry in the abstract faces document.
    AbstractRef(String),
    /// Map of keys to abstract face names.
    AbstractMap(BTreeMap<String, String>),
}

impl FaceSource {
    /// Classify the `face` field of a character document loaded from `path`.
    pub fn from_character_json(doc: &serde_json::Value, path: &str) -> FlipbookResult<Self> {
        let Some(face) = doc.get("face") else {
            return Ok(Self::NoFace);
        };

        match face {
            serde_json::Value::Null => Ok(Self::NoFace),
            serde_json::Value::String(name) => Ok(Self::AbstractRef(name.clone())),
            serde_json::Value::Object(obj) if obj.get("src").is_some_and(|v| !v.is_null()) => {
                let face: Face = serde_json::from_value(face.clone())
                    .map_err(|e| FlipbookError::parse(path, e))?;
                Ok(Self::Direct(Arc::new(face)))
            }
            serde_json::Value::Object(obj) => {
                let mut map = BTreeMap::new();
                for (k, v) in obj {
                    let serde_json::Value::String(s) = v else {
                        return Err(FlipbookError::unhandled_shape(format!(
                            "{path}: face key '{k}' is neither a face nor an abstract face name"
                        )));
                    };
                    map.insert(k.clone(), s.clone());
                }
                Ok(Self::AbstractMap(map))
            }
            other => Err(FlipbookError::unhandled_shape(format!(
                "{path}: face must be an object or string, got {other}"
            ))),
        }
    }
}

/// Shared table of faces referenced by name from character files.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbstractFaces {
    faces: BTreeMap<String, Arc<Face>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbstractFacesDoc {
    abstract_faces: BTreeMap<String, Face>,
}

impl AbstractFaces {
    /// Decode an `{ "abstractFaces": { name: Face } }` document loaded from `path`.
    pub fn from_json(doc: serde_json::Value, path: &str) -> FlipbookResult<Self> {
        let doc: AbstractFacesDoc =
            serde_json::from_value(doc).map_err(|e| FlipbookError::parse(path, e))?;
        Ok(Self {
            faces: doc
                .abstract_faces
                .into_iter()
                .map(|(k, v)| (k, Arc::new(v)))
                .collect(),
        })
    }

    /// Register a face under `name`.
    pub fn insert(&mut self, name: impl Into<String>, face: Face) {
        self.faces.insert(name.into(), Arc::new(face));
    }

    /// Look up a face by name.
    pub fn get(&self, name: &str) -> FlipbookResult<Arc<Face>> {
        self.faces
            .get(name)
            .cloned()
            .ok_or_else(|| {
                FlipbookError::unresolved(format!("could not find abstract face: {name}"))
            })
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Return `true` when no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/face/model.rs"]
mod tests;
