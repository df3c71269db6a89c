//! This module contains thermal data on common wall materials, used to derive
//! the wall conductance coefficient from a material and its thickness.

use crate::errors::{invalid_input, CoolsimError};
use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WallMaterial {
    Wood,
    Brick,
    Concrete,
    Fiberglass,
    PsFoam,
    PeFoam,
}

impl WallMaterial {
    /// Thermal conductivity of the material, in W/(m.K).
    pub fn conductivity(&self) -> f64 {
        match self {
            WallMaterial::Wood => 0.12,
            WallMaterial::Brick => 0.8,
            WallMaterial::Concrete => 1.8,
            WallMaterial::Fiberglass => 0.04,
            WallMaterial::PsFoam => 0.035,
            WallMaterial::PeFoam => 0.04,
        }
    }
}

/// Calculate the wall conductance coefficient (U-value) for a wall built from
/// the given material at the given thickness, in W/(m2.K).
///
/// Arguments:
/// * `material` - wall material
/// * `thickness` - wall thickness, in m
pub fn conductance_for_thickness(
    material: WallMaterial,
    thickness: f64,
) -> Result<f64, CoolsimError> {
    if !(thickness > 0.) {
        return Err(invalid_input(format!(
            "wall thickness must be greater than zero, was {thickness}"
        )));
    }

    let r_value = thickness / material.conductivity();

    Ok(1. / r_value)
}
