use crate::errors::{invalid_input, CoolsimError};

pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Standard atmospheric pressure, in Pa.
pub(crate) const ATMOSPHERIC_PRESSURE_PA: f64 = 101_325.;
/// Specific gas constant of dry air, in J/(kg.K).
pub(crate) const GAS_CONSTANT_DRY_AIR: f64 = 287.;
/// Specific heat capacity of air, in J/(kg.K).
pub(crate) const SPECIFIC_HEAT_CAPACITY_AIR: f64 = 1_005.;

pub(crate) fn celsius_to_kelvin(temp_c: f64) -> Result<f64, CoolsimError> {
    if temp_c < -273.15 {
        Err(invalid_input(format!(
            "temperature of {temp_c} deg C is below absolute zero"
        )))
    } else {
        Ok(temp_c + 273.15)
    }
}

/// Density of dry air at a given temperature from the ideal gas law, in kg/m3.
pub(crate) fn air_density_at(temp_k: f64) -> f64 {
    ATMOSPHERIC_PRESSURE_PA / (GAS_CONSTANT_DRY_AIR * temp_k)
}
