//! Reference entities a quote points at: materials, cut types and finishes.
//!
//! Name-based material traits (double density, canvas/satin special cut) are
//! classified once when an entity is constructed, so the calculation path only
//! ever reads boolean/enum attributes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Primary key of a material (Tafetá, Sarja, Canvas, ...)
    MaterialId
);
entity_id!(
    /// Primary key of a cut type
    CutTypeId
);
entity_id!(
    /// Primary key of a finish (Goma F, Termocolante, ...)
    FinishId
);

const DOUBLE_DENSITY_MARKER: &str = "dupla densidade";
const CANVAS_MARKER: &str = "canvas";
const SATIN_MARKER: &str = "cetim";

/// Material family that carries a per-width special-cut surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialCutFamily {
    Canvas,
    Satin,
}

impl SpecialCutFamily {
    /// Detect the family from a material name. Canvas wins when both markers appear.
    pub fn detect(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.contains(CANVAS_MARKER) {
            Some(SpecialCutFamily::Canvas)
        } else if lower.contains(SATIN_MARKER) {
            Some(SpecialCutFamily::Satin)
        } else {
            None
        }
    }
}

impl fmt::Display for SpecialCutFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialCutFamily::Canvas => write!(f, "canvas"),
            SpecialCutFamily::Satin => write!(f, "satin"),
        }
    }
}

/// A label material with its pricing traits resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub double_density: bool,
    pub special_cut: Option<SpecialCutFamily>,
    /// Retired from the catalogue; existing orders still price against it
    pub active: bool,
}

impl Material {
    /// Build a material, classifying its traits from the display name.
    pub fn new(id: MaterialId, name: impl Into<String>) -> Self {
        let name = name.into();
        let double_density = name.to_lowercase().contains(DOUBLE_DENSITY_MARKER);
        let special_cut = SpecialCutFamily::detect(&name);
        Self {
            id,
            name,
            double_density,
            special_cut,
            active: true,
        }
    }
}

/// A cut type (CORTE, DOBRA MEIO, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CutType {
    pub id: CutTypeId,
    pub name: String,
    /// Code stored alongside the cut type in the coefficient table
    pub stored_code: i32,
    pub active: bool,
}

impl CutType {
    pub fn new(id: CutTypeId, name: impl Into<String>, stored_code: i32) -> Self {
        Self {
            id,
            name: name.into(),
            stored_code,
            active: true,
        }
    }

    /// Legacy cut code: number of characters in the display name.
    pub fn name_length_code(&self) -> i32 {
        self.name.chars().count() as i32
    }
}

/// A finish (the surcharge material applied per meter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finish {
    pub id: FinishId,
    pub name: String,
    pub active: bool,
}

impl Finish {
    pub fn new(id: FinishId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
        }
    }
}

/// Every entity a quote input may reference.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    materials: HashMap<MaterialId, Material>,
    cut_types: HashMap<CutTypeId, CutType>,
    finishes: HashMap<FinishId, Finish>,
}

impl ReferenceData {
    pub fn insert_material(&mut self, material: Material) {
        self.materials.insert(material.id, material);
    }

    pub fn insert_cut_type(&mut self, cut_type: CutType) {
        self.cut_types.insert(cut_type.id, cut_type);
    }

    pub fn insert_finish(&mut self, finish: Finish) {
        self.finishes.insert(finish.id, finish);
    }

    /// Flag a material as active or retired. Unknown ids are ignored.
    pub fn set_material_active(&mut self, id: MaterialId, active: bool) {
        if let Some(material) = self.materials.get_mut(&id) {
            material.active = active;
        }
    }

    pub fn set_cut_type_active(&mut self, id: CutTypeId, active: bool) {
        if let Some(cut_type) = self.cut_types.get_mut(&id) {
            cut_type.active = active;
        }
    }

    pub fn set_finish_active(&mut self, id: FinishId, active: bool) {
        if let Some(finish) = self.finishes.get_mut(&id) {
            finish.active = active;
        }
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn cut_type(&self, id: CutTypeId) -> Option<&CutType> {
        self.cut_types.get(&id)
    }

    pub fn finish(&self, id: FinishId) -> Option<&Finish> {
        self.finishes.get(&id)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn cut_type_count(&self) -> usize {
        self.cut_types.len()
    }

    pub fn finish_count(&self) -> usize {
        self.finishes.len()
    }
}
