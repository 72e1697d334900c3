//! Vehicle data model
//!
//! `VehicleDraft` is the unvalidated candidate decoded at the boundary, where
//! every field may be missing. `NewVehicle` carries the fields of a draft that
//! passed structural validation and is what the record store writes.
//! `Vehicle` is a stored record with its store-assigned id.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Store-assigned record identifier
pub type VehicleId = i64;

/// A stored vehicle record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub plate: String,
    pub brand: String,
    /// Model year as submitted (text), validated to parse as a year
    pub model_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub owner: String,
}

/// Candidate record as decoded from user input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDraft {
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model_year: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl VehicleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plate(mut self, plate: impl Into<String>) -> Self {
        self.plate = Some(plate.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn model_year(mut self, model_year: impl Into<String>) -> Self {
        self.model_year = Some(model_year.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Raw value of a field, if present
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Plate => self.plate.as_deref(),
            Field::Brand => self.brand.as_deref(),
            Field::ModelYear => self.model_year.as_deref(),
            Field::Color => self.color.as_deref(),
            Field::Owner => self.owner.as_deref(),
        }
    }
}

impl From<&Vehicle> for VehicleDraft {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            plate: Some(vehicle.plate.clone()),
            brand: Some(vehicle.brand.clone()),
            model_year: Some(vehicle.model_year.clone()),
            color: vehicle.color.clone(),
            owner: Some(vehicle.owner.clone()),
        }
    }
}

/// Field values of a validated record, without an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub plate: String,
    pub brand: String,
    pub model_year: String,
    pub color: Option<String>,
    pub owner: String,
}

impl NewVehicle {
    /// Attach the id assigned by the store
    pub fn into_vehicle(self, id: VehicleId) -> Vehicle {
        Vehicle {
            id,
            plate: self.plate,
            brand: self.brand,
            model_year: self.model_year,
            color: self.color,
            owner: self.owner,
        }
    }
}

impl TryFrom<&VehicleDraft> for NewVehicle {
    type Error = ValidationError;

    fn try_from(draft: &VehicleDraft) -> Result<Self, Self::Error> {
        let required = |field: Field| {
            draft
                .get(field)
                .map(str::to_string)
                .ok_or(ValidationError::Missing { field })
        };

        Ok(Self {
            plate: required(Field::Plate)?,
            brand: required(Field::Brand)?,
            model_year: required(Field::ModelYear)?,
            // A blank color means "no color"
            color: draft
                .color
                .as_ref()
                .filter(|c| !c.trim().is_empty())
                .cloned(),
            owner: required(Field::Owner)?,
        })
    }
}

/// Validated fields of a vehicle record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Plate,
    Brand,
    ModelYear,
    Color,
    Owner,
}

impl Field {
    /// All fields in the order they are concatenated for input screening
    pub const ALL: [Field; 5] = [
        Field::Plate,
        Field::Brand,
        Field::ModelYear,
        Field::Color,
        Field::Owner,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Plate => write!(f, "plate"),
            Field::Brand => write!(f, "brand"),
            Field::ModelYear => write!(f, "model year"),
            Field::Color => write!(f, "color"),
            Field::Owner => write!(f, "owner"),
        }
    }
}

/// Unicode-aware case-insensitive equality
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Uniqueness key of a plate: surrounding whitespace dropped, case folded
pub fn plate_key(plate: &str) -> String {
    plate.trim().to_lowercase()
}
