//! This module ingests a simulation scenario from JSON and validates it at
//! the API boundary, before any calculation starts.

use crate::core::cooling_systems::air_conditioning::CoolingSetup;
use crate::core::material_properties::{conductance_for_thickness, WallMaterial};
use crate::core::thermal_zone::RoomGeometry;
use crate::errors::CoolsimError;
use crate::simulation_time::SIMULATION_WINDOW_MINUTES;
use serde::Deserialize;
use std::io::Read;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub room: RoomGeometry,
    /// Indoor air temperature at the start of the window, in deg C.
    pub initial_indoor_temp: f64,
    pub wall: WallSpec,
    /// Sparse hourly outdoor forecast covering the simulation window, in deg C.
    pub hourly_outdoor_temps: Vec<f64>,
    pub cooling: Option<CoolingSetup>,
    #[serde(default)]
    pub billing: BillingInput,
}

/// The wall can be specified either directly by its conductance coefficient
/// or by a material and thickness from which the coefficient is derived.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
pub enum WallSpec {
    Conductance {
        /// Wall conductance coefficient, in W/(m2.K).
        conductance: f64,
    },
    Material {
        material: WallMaterial,
        /// Wall thickness, in m.
        thickness: f64,
    },
}

impl WallSpec {
    pub fn conductance(&self) -> Result<f64, CoolsimError> {
        match self {
            WallSpec::Conductance { conductance } => Ok(*conductance),
            WallSpec::Material {
                material,
                thickness,
            } => conductance_for_thickness(*material, *thickness),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BillingInput {
    #[serde(default = "default_days_in_month")]
    pub days_in_month: u32,
    /// Monthly household consumption before the cooling system, in kWh.
    #[serde(default)]
    pub existing_usage_kwh: f64,
}

fn default_days_in_month() -> u32 {
    30
}

impl Default for BillingInput {
    fn default() -> Self {
        Self {
            days_in_month: default_days_in_month(),
            existing_usage_kwh: 0.,
        }
    }
}

pub fn ingest_scenario(input: impl Read) -> anyhow::Result<Scenario> {
    let scenario: Scenario = serde_json::from_reader(input)?;
    scenario.validate()?;
    Ok(scenario)
}

impl Scenario {
    pub fn validate(&self) -> Result<(), CoolsimError> {
        self.room.validate()?;
        if let Some(cooling) = &self.cooling {
            cooling.validate(SIMULATION_WINDOW_MINUTES)?;
        }
        Ok(())
    }
}
