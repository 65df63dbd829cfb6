// tm-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, DynamicViscosity as UomDynamicViscosity, Energy as UomEnergy,
    Length as UomLength, Mass as UomMass, MassDensity as UomMassDensity,
    MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure, Ratio as UomRatio,
    ThermalConductivity as UomThermalConductivity, ThermodynamicTemperature as UomThermodynamicTemperature,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type DynVisc = UomDynamicViscosity;
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type ThermalConductivity = UomThermalConductivity;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn rho(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Degree-based trigonometry, used everywhere a flow or blade angle appears.
///
/// Every angle in this codebase (`alpha`, `beta`, stagger, metal angles, wedge
/// angle) is a bare `f64` measured in degrees, never radians and never a `uom`
/// `Angle`. This is a deliberate contract, not an oversight: the turbomachinery
/// literature this model is built from works exclusively in degrees, and
/// round-tripping through `uom::Angle` at every call site would bury the
/// formulas whose exact numeric form matters (deviation, incidence, loss
/// correlations). Keep angles as plain degrees; convert only inside `degtrig`.
pub mod degtrig {
    #[inline]
    pub fn sind(deg: f64) -> f64 {
        deg.to_radians().sin()
    }

    #[inline]
    pub fn cosd(deg: f64) -> f64 {
        deg.to_radians().cos()
    }

    #[inline]
    pub fn tand(deg: f64) -> f64 {
        deg.to_radians().tan()
    }

    #[inline]
    pub fn arcsind(x: f64) -> f64 {
        x.clamp(-1.0, 1.0).asin().to_degrees()
    }

    #[inline]
    pub fn arccosd(x: f64) -> f64 {
        x.clamp(-1.0, 1.0).acos().to_degrees()
    }

    #[inline]
    pub fn arctand(x: f64) -> f64 {
        x.atan().to_degrees()
    }
}

pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _l = m(2.0);
        let _a = m2(0.01);
        let _d = rho(1.2);
        let _r = unitless(0.5);
    }

    #[test]
    fn degtrig_round_trips() {
        use degtrig::*;
        assert!((arccosd(cosd(37.0)) - 37.0).abs() < 1e-9);
        assert!((arcsind(sind(-12.5)) - (-12.5)).abs() < 1e-9);
        assert!((arctand(tand(54.3)) - 54.3).abs() < 1e-9);
    }
}
