//! The region catalog: every anatomical region the viewer knows about,
//! with its lab, display name, fact text, and highlight color.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub lab: String,
    pub display: String,
    pub fact: String,
    pub color: String,
}

impl Region {
    /// Linear-ish sRGB components of the `#RRGGBB` highlight color, in 0..=1.
    pub fn color_rgb(&self) -> Option<[f32; 3]> {
        parse_hex_color(&self.color)
    }
}

/// Ordered, immutable region collection. Iteration order is the definition
/// order and is also the tour's cycle order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCatalog {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateId { id: String },
    InvalidColor { id: String, color: String },
    Io(String),
    Serde(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateId { id } => write!(f, "duplicate region id: {id}"),
            CatalogError::InvalidColor { id, color } => {
                write!(f, "region {id} has invalid color: {color}")
            }
            CatalogError::Io(message) => write!(f, "catalog io error: {message}"),
            CatalogError::Serde(message) => write!(f, "catalog parse error: {message}"),
        }
    }
}

impl Error for CatalogError {}

impl From<io::Error> for CatalogError {
    fn from(error: io::Error) -> Self {
        CatalogError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        CatalogError::Serde(error.to_string())
    }
}

impl RegionCatalog {
    /// Builds a catalog from `regions` in their given order. An empty list is
    /// a valid (degenerate) catalog: the viewer renders nothing selectable
    /// and the tour never schedules.
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(regions.len());
        for (position, region) in regions.iter().enumerate() {
            if index.insert(region.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: region.id.clone(),
                });
            }
            if parse_hex_color(&region.color).is_none() {
                return Err(CatalogError::InvalidColor {
                    id: region.id.clone(),
                    color: region.color.clone(),
                });
            }
        }

        Ok(Self { regions, index })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let regions: Vec<Region> = serde_json::from_str(raw)?;
        Self::from_regions(regions)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.index.get(id).map(|position| &self.regions[*position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of `id` in the catalog's fixed iteration order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn region_at(&self, position: usize) -> Option<&Region> {
        self.regions.get(position)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|region| region.id.as_str())
    }
}

/// The atlas of the shipped brain model. Node names in the model match
/// these ids; anything else in the asset is scenery.
pub fn builtin_catalog() -> RegionCatalog {
    let regions = vec![
        region(
            "Stillness_Prefrontal",
            "Lab of Stillness",
            "Prefrontal Cortex",
            "Responsible for planning, attention, and self-control.",
            "#BEE6FF",
        ),
        region(
            "Stillness_Cingulate",
            "Lab of Stillness",
            "Anterior Cingulate",
            "Involved in attention and emotional regulation.",
            "#9FC9FF",
        ),
        region(
            "Echoes_Temporal",
            "Lab of Echoes",
            "Temporal Lobe",
            "Processes sounds and language-related signals.",
            "#FFE7AF",
        ),
        region(
            "Echoes_AuditoryCortex",
            "Lab of Echoes",
            "Auditory Cortex",
            "Primary area for hearing and auditory pattern recognition.",
            "#FFD27A",
        ),
        region(
            "Motor_Primary",
            "Lab of Movement",
            "Primary Motor Cortex",
            "Executes voluntary movements.",
            "#CFFFE6",
        ),
        region(
            "Cerebellum",
            "Lab of Movement",
            "Cerebellum",
            "Coordinates balance and fine motor control.",
            "#D9EEFF",
        ),
        region(
            "Brainstem",
            "Core",
            "Brainstem",
            "Controls vital functions like breathing and heart rate.",
            "#DADADA",
        ),
    ];

    let mut index = HashMap::with_capacity(regions.len());
    for (position, entry) in regions.iter().enumerate() {
        index.insert(entry.id.clone(), position);
    }
    RegionCatalog { regions, index }
}

fn region(id: &str, lab: &str, display: &str, fact: &str, color: &str) -> Region {
    Region {
        id: id.to_string(),
        lab: lab.to_string(),
        display: display.to_string(),
        fact: fact.to_string(),
        color: color.to_string(),
    }
}

fn parse_hex_color(raw: &str) -> Option<[f32; 3]> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([
        f32::from(red) / 255.0,
        f32::from(green) / 255.0,
        f32::from(blue) / 255.0,
    ])
}
