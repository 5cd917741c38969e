// hv-core/src/units.rs
//
// The room model works in the imperial units HVAC engineers size equipment
// in (°F, ft³, cfm, BTU/min, minutes). Controller time is always seconds.

use uom::si::f64::{
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Volume as UomVolume, VolumeRate as UomVolumeRate,
};

pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn degf(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_fahrenheit;
    Temperature::new::<degree_fahrenheit>(v)
}

#[inline]
pub fn ft3(v: f64) -> Volume {
    use uom::si::volume::cubic_foot;
    Volume::new::<cubic_foot>(v)
}

#[inline]
pub fn cfm(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_foot_per_minute;
    VolumeRate::new::<cubic_foot_per_minute>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn minutes(v: f64) -> Time {
    use uom::si::time::minute;
    Time::new::<minute>(v)
}

#[inline]
pub fn as_minutes(t: Time) -> f64 {
    use uom::si::time::minute;
    t.get::<minute>()
}

#[inline]
pub fn as_seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

#[inline]
pub fn as_degf(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_fahrenheit;
    t.get::<degree_fahrenheit>()
}

#[inline]
pub fn as_cfm(q: VolumeRate) -> f64 {
    use uom::si::volume_rate::cubic_foot_per_minute;
    q.get::<cubic_foot_per_minute>()
}

#[inline]
pub fn as_ft3(v: Volume) -> f64 {
    use uom::si::volume::cubic_foot;
    v.get::<cubic_foot>()
}
