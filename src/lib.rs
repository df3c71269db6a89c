pub mod core;
pub mod errors;
pub mod external_conditions;
pub mod input;
pub mod output;
pub mod simulation_time;

use crate::core::energy_supply::tariff::{OperatingCostBreakdown, TariffSchedule};
use crate::core::thermal_zone::{SimulationResult, ThermalZone};
use crate::errors::CoolsimError;
use crate::external_conditions::ExternalConditions;
use crate::input::{ingest_scenario, Scenario};
use crate::output::{write_simulation_results_file, Output};
use std::io::Read;
use tracing::info;

/// Everything produced by one scenario run: the minute-by-minute simulation
/// traces and the estimated cost of the cooling system.
#[derive(Clone, Debug)]
pub struct ScenarioResults {
    pub simulation: SimulationResult,
    pub cost: OperatingCostBreakdown,
}

/// Run a scenario end to end: interpolate the hourly forecast to a dense
/// trace, integrate the thermal model and price the resulting compressor
/// profile against the residential rate schedule.
pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioResults, CoolsimError> {
    let external_conditions = ExternalConditions::from_hourly_forecast(&scenario.hourly_outdoor_temps)?;
    run_scenario_with_conditions(scenario, &external_conditions)
}

/// As [`run_scenario`], for callers that have already built (or otherwise
/// obtained) the dense outdoor trace.
pub fn run_scenario_with_conditions(
    scenario: &Scenario,
    external_conditions: &ExternalConditions,
) -> Result<ScenarioResults, CoolsimError> {
    let zone = ThermalZone::new(
        scenario.room,
        scenario.wall.conductance()?,
        scenario.initial_indoor_temp,
    )?;
    let simulation = zone.run_simulation(external_conditions.air_temps(), scenario.cooling.as_ref())?;

    let cost = TariffSchedule::residential_2024().estimate_operating_cost(
        scenario.cooling.as_ref(),
        scenario.billing.days_in_month,
        scenario.billing.existing_usage_kwh,
        &simulation.compressor_running,
    );

    info!(
        minutes = simulation.len(),
        monthly_cost = cost.monthly,
        "simulation run complete"
    );

    Ok(ScenarioResults { simulation, cost })
}

/// Ingest a JSON scenario, run it and write the traces to the given output.
pub fn run_project(input: impl Read, output: impl Output) -> anyhow::Result<ScenarioResults> {
    let scenario = ingest_scenario(input)?;
    let external_conditions = ExternalConditions::from_hourly_forecast(&scenario.hourly_outdoor_temps)?;

    let results = run_scenario_with_conditions(&scenario, &external_conditions)?;

    write_simulation_results_file(output, &external_conditions, &results.simulation)?;

    Ok(results)
}
