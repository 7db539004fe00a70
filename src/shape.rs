use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of shapes the viewer knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Cube,
    Cylinder,
    Cone,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [Self::Sphere, Self::Cube, Self::Cylinder, Self::Cone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Cube => "cube",
            Self::Cylinder => "cylinder",
            Self::Cone => "cone",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShapeKind(pub String);

impl fmt::Display for UnknownShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shape type '{}'", self.0)
    }
}

impl std::error::Error for UnknownShapeKind {}

impl FromStr for ShapeKind {
    type Err = UnknownShapeKind;

    /// Case-insensitive; stored shape files use lowercase names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownShapeKind(s.to_string()))
    }
}

/// One visualized object as handed over by the shape store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub id: u64,
    pub name: String,
    /// Raw type string; anything outside [`ShapeKind`] is kept but not drawn
    #[serde(rename = "type", default)]
    pub shape_type: String,
}

impl ShapeRecord {
    pub fn new(id: u64, name: impl Into<String>, shape_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            shape_type: shape_type.into(),
        }
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        self.shape_type.parse().ok()
    }
}
