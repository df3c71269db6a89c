pub mod controls;
pub mod cooling_systems;
pub mod energy_supply;
pub mod material_properties;
pub mod thermal_zone;
pub mod units;
