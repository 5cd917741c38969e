//! Lumped first-order thermal model of a conditioned room.
//!
//! The room air is one well-mixed volume cooled by supply air and heated by a
//! constant internal load. Its temperature relaxes exponentially toward the
//! equilibrium `q / (rho * cp * flow) + t_supply` with time constant
//! `tau = (cv * volume) / (cp * flow)`.
//!
//! Units: °F, ft³, cfm, BTU/min and minutes.

use crate::error::{SimError, SimResult};
use hv_core::units::{Temperature, Volume, as_degf, as_ft3};
use serde::{Deserialize, Serialize};

/// Properties of air near room conditions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirProperties {
    /// Density (lbm/ft³)
    pub density: f64,
    /// Specific heat at constant pressure (BTU/lbm·°F)
    pub cp: f64,
    /// Specific heat at constant volume (BTU/lbm·°F)
    pub cv: f64,
}

impl Default for AirProperties {
    fn default() -> Self {
        Self {
            density: 0.0763,
            cp: 0.2403,
            cv: 0.1714,
        }
    }
}

/// Time constant (minutes) of the room air for a given supply airflow.
pub fn time_constant(cp: f64, cv: f64, volume_ft3: f64, flow_cfm: f64) -> SimResult<f64> {
    if !(volume_ft3 > 0.0) {
        return Err(SimError::NonPhysical {
            what: "room volume must be positive",
        });
    }
    if !(flow_cfm > 0.0) {
        return Err(SimError::NonPhysical {
            what: "supply airflow must be positive",
        });
    }
    Ok((cv * volume_ft3) / (cp * flow_cfm))
}

/// Room temperature `t_min` minutes after starting from `t0_f` with constant
/// airflow, supply temperature and heat load.
pub fn room_temperature(
    t_min: f64,
    flow_cfm: f64,
    volume_ft3: f64,
    t0_f: f64,
    t_supply_f: f64,
    heat_load_btu_per_min: f64,
) -> SimResult<f64> {
    response(
        &AirProperties::default(),
        t_min,
        flow_cfm,
        volume_ft3,
        t0_f,
        t_supply_f,
        heat_load_btu_per_min,
    )
}

fn response(
    air: &AirProperties,
    t_min: f64,
    flow_cfm: f64,
    volume_ft3: f64,
    t0_f: f64,
    t_supply_f: f64,
    heat_load_btu_per_min: f64,
) -> SimResult<f64> {
    let tau = time_constant(air.cp, air.cv, volume_ft3, flow_cfm)?;
    let decay = (-t_min / tau).exp();
    let equilibrium = heat_load_btu_per_min / (air.density * air.cp * flow_cfm) + t_supply_f;
    Ok(t0_f * decay + (1.0 - decay) * equilibrium)
}

/// A single room served by one cooling terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomModel {
    /// Air volume (ft³)
    pub volume_ft3: f64,
    /// Supply air temperature (°F)
    pub supply_temp_f: f64,
    /// Net heat gain of the space (BTU/hr)
    pub heat_load_btu_per_hr: f64,
    /// Room temperature at t = 0 (°F)
    pub initial_temp_f: f64,
    #[serde(default)]
    pub air: AirProperties,
}

impl RoomModel {
    pub fn new(
        volume_ft3: f64,
        supply_temp_f: f64,
        heat_load_btu_per_hr: f64,
        initial_temp_f: f64,
    ) -> SimResult<Self> {
        let room = Self {
            volume_ft3,
            supply_temp_f,
            heat_load_btu_per_hr,
            initial_temp_f,
            air: AirProperties::default(),
        };
        room.validate()?;
        Ok(room)
    }

    pub fn from_units(
        volume: Volume,
        supply_temp: Temperature,
        heat_load_btu_per_hr: f64,
        initial_temp: Temperature,
    ) -> SimResult<Self> {
        Self::new(
            as_ft3(volume),
            as_degf(supply_temp),
            heat_load_btu_per_hr,
            as_degf(initial_temp),
        )
    }

    pub fn with_air(mut self, air: AirProperties) -> Self {
        self.air = air;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        hv_core::ensure_positive(self.volume_ft3, "room volume")?;
        hv_core::ensure_finite(self.supply_temp_f, "supply temperature")?;
        hv_core::ensure_finite(self.heat_load_btu_per_hr, "heat load")?;
        hv_core::ensure_finite(self.initial_temp_f, "initial temperature")?;
        hv_core::ensure_positive(self.air.density, "air density")?;
        hv_core::ensure_positive(self.air.cp, "air cp")?;
        hv_core::ensure_positive(self.air.cv, "air cv")?;
        Ok(())
    }

    pub fn heat_load_btu_per_min(&self) -> f64 {
        self.heat_load_btu_per_hr / 60.0
    }

    /// Temperature `t_min` minutes after starting from `from_temp_f`.
    pub fn temperature_at(&self, t_min: f64, flow_cfm: f64, from_temp_f: f64) -> SimResult<f64> {
        response(
            &self.air,
            t_min,
            flow_cfm,
            self.volume_ft3,
            from_temp_f,
            self.supply_temp_f,
            self.heat_load_btu_per_min(),
        )
    }

    /// Steady temperature the room settles at for a constant airflow.
    pub fn equilibrium_temp(&self, flow_cfm: f64) -> SimResult<f64> {
        hv_core::ensure_positive(flow_cfm, "supply airflow")?;
        Ok(self.heat_load_btu_per_min() / (self.air.density * self.air.cp * flow_cfm)
            + self.supply_temp_f)
    }

    pub fn time_constant(&self, flow_cfm: f64) -> SimResult<f64> {
        time_constant(self.air.cp, self.air.cv, self.volume_ft3, flow_cfm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::units::{degf, ft3};

    fn office() -> RoomModel {
        RoomModel::new(10.0 * 20.0 * 8.0, 65.0, 2800.0, 65.0).unwrap()
    }

    #[test]
    fn time_constant_matches_definition() {
        let tau = time_constant(0.2403, 0.1714, 100.0, 100.0).unwrap();
        assert!((tau - 0.1714 / 0.2403).abs() < 1e-12);
    }

    #[test]
    fn time_constant_rejects_zero_flow() {
        assert!(matches!(
            time_constant(0.2403, 0.1714, 100.0, 0.0),
            Err(SimError::NonPhysical { .. })
        ));
        assert!(matches!(
            time_constant(0.2403, 0.1714, -1.0, 100.0),
            Err(SimError::NonPhysical { .. })
        ));
    }

    #[test]
    fn starts_at_initial_temperature() {
        let t = room_temperature(0.0, 200.0, 1600.0, 68.0, 55.0, 46.0).unwrap();
        assert_eq!(t, 68.0);
    }

    #[test]
    fn approaches_equilibrium() {
        let room = office();
        let eq = room.equilibrium_temp(200.0).unwrap();
        let late = room.temperature_at(1_000.0, 200.0, 65.0).unwrap();
        assert!((late - eq).abs() < 1e-9);
        // 2800 BTU/hr into 200 cfm of 65°F air
        assert!((eq - 77.727).abs() < 1e-2);
    }

    #[test]
    fn more_airflow_cools_more() {
        let room = office();
        let low = room.equilibrium_temp(200.0).unwrap();
        let high = room.equilibrium_temp(600.0).unwrap();
        assert!(high < low);
        assert!(high > room.supply_temp_f);
    }

    #[test]
    fn heating_is_monotonic_from_cold_start() {
        let room = office();
        let mut last = room.initial_temp_f;
        for minute in 1..30 {
            let t = room.temperature_at(minute as f64, 200.0, 65.0).unwrap();
            assert!(t > last);
            last = t;
        }
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(RoomModel::new(0.0, 65.0, 2800.0, 65.0).is_err());
        assert!(RoomModel::new(1600.0, f64::NAN, 2800.0, 65.0).is_err());
    }

    #[test]
    fn from_units_converts_imperial() {
        let room = RoomModel::from_units(ft3(1600.0), degf(55.0), 2800.0, degf(70.0)).unwrap();
        assert!((room.volume_ft3 - 1600.0).abs() < 1e-9);
        assert!((room.supply_temp_f - 55.0).abs() < 1e-9);
        assert!((room.initial_temp_f - 70.0).abs() < 1e-9);
    }
}
