use crate::face::model::FaceSource;

/// Expression preferred as the initial selection when a character offers it.
pub const PREFERRED_EXPRESSION: &str = "SHAKE";

/// Expression requested when nothing was picked, e.g. for faces that cannot be listed.
pub const DEFAULT_EXPRESSION: &str = "DEFAULT";

/// What a character offers to an expression picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpressionListing {
    /// Character has no face data.
    NoFace,
    /// Face lives in the abstract faces document under this name; nothing to list here.
    AbstractRef(String),
    /// Selectable names.
    Names(Vec<String>),
}

impl ExpressionListing {
    /// Derive the listing from a classified face field.
    pub fn from_source(source: &FaceSource) -> Self {
        match source {
            FaceSource::NoFace => Self::NoFace,
            FaceSource::AbstractRef(name) => Self::AbstractRef(name.clone()),
            FaceSource::Direct(face) => Self::Names(face.expressions.keys().cloned().collect()),
            FaceSource::AbstractMap(map) => Self::Names(map.keys().cloned().collect()),
        }
    }
}

/// Pick the initial expression: [`PREFERRED_EXPRESSION`] when present, else the first name.
pub fn default_expression(names: &[String]) -> Option<&str> {
    names
        .iter()
        .find(|n| n.as_str() == PREFERRED_EXPRESSION)
        .or_else(|| names.first())
        .map(String::as_str)
}

/// Turn `index.json` entries (`{category}.{name}.json`) into character ids.
pub fn character_ids_from_index(files: &[String]) -> Vec<String> {
    files
        .iter()
        .map(|f| f.strip_suffix(".json").unwrap_or(f).to_owned())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/face/listing.rs"]
mod tests;
