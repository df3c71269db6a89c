// This module provides the dead-band thermostat control for the compressor

use crate::core::cooling_systems::air_conditioning::CoolingSetup;

/// Half-width of the thermostat dead band, in K. The compressor switches on
/// at set point + 1.5 and off at set point - 1.5.
pub const HYSTERESIS_HALF_BAND_K: f64 = 1.5;

/// On/off state of the compressor, evolved by the hysteresis rule as the
/// thermal model is integrated. The state belongs to one simulation run and
/// is discarded afterwards.
#[derive(Clone, Copy, Debug)]
pub struct CompressorController {
    compressor_on: bool,
}

impl CompressorController {
    /// Initial state: the compressor starts running when the room is already
    /// above the set point at the start of the window.
    pub(crate) fn new(initial_indoor_temp: f64, setup: &CoolingSetup) -> Self {
        Self {
            compressor_on: initial_indoor_temp > setup.set_point,
        }
    }

    pub fn is_on(&self) -> bool {
        self.compressor_on
    }

    /// Apply the hysteresis rule for one derivative evaluation. Must be
    /// called exactly once per evaluation so that the switching history
    /// follows the integrator's intermediate temperature estimates.
    pub(crate) fn update(&mut self, minute_of_window: usize, indoor_temp: f64, setup: &CoolingSetup) {
        self.compressor_on = next_state(self.compressor_on, minute_of_window, indoor_temp, setup);
    }

    /// Heat flow contributed by the system in its current state, in W. Zero
    /// outside the operating window regardless of the stored state.
    pub(crate) fn cooling_contribution(&self, minute_of_window: usize, setup: &CoolingSetup) -> f64 {
        if self.compressor_on && setup.is_within_operating_time(minute_of_window) {
            setup.cooling_power
        } else {
            0.
        }
    }
}

/// Pure switching rule. Outside the operating window the state is held
/// unconditionally; inside it the compressor turns off once the temperature
/// reaches the lower band edge and on once it reaches the upper band edge.
fn next_state(
    currently_on: bool,
    minute_of_window: usize,
    indoor_temp: f64,
    setup: &CoolingSetup,
) -> bool {
    if !setup.is_within_operating_time(minute_of_window) {
        return currently_on;
    }

    let lower_band = setup.set_point - HYSTERESIS_HALF_BAND_K;
    let upper_band = setup.set_point + HYSTERESIS_HALF_BAND_K;

    if currently_on && indoor_temp <= lower_band {
        false
    } else if !currently_on && indoor_temp >= upper_band {
        true
    } else {
        currently_on
    }
}
