// dp-core/src/units.rs

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, Length as UomLength, MassDensity as UomMassDensity,
    MassRate as UomMassRate, Pressure as UomPressure,
};

// Public canonical unit types (SI, f64)
pub type DynVisc = UomDynamicViscosity;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
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
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

/// Gauge pressure in psig to absolute pressure.
#[inline]
pub fn psig(v: f64) -> Pressure {
    pa((v + constants::ATM_PSI) * constants::PSI_PA)
}

/// Differential pressure in inches of water column.
#[inline]
pub fn in_h2o(v: f64) -> Pressure {
    pa(v * constants::IN_H2O_PA)
}

#[inline]
pub fn inch(v: f64) -> Length {
    m(v * constants::INCH_M)
}

#[inline]
pub fn centipoise(v: f64) -> DynVisc {
    pa_s(v * constants::CP_PA_S)
}

pub mod constants {
    /// Pascal per pound-force per square inch.
    pub const PSI_PA: f64 = 6_894.757_293_168;

    /// Atmospheric offset added to gauge readings, in psi.
    pub const ATM_PSI: f64 = 14.7;

    /// Pascal per inch of water column.
    pub const IN_H2O_PA: f64 = 248.84;

    pub const INCH_M: f64 = 0.0254;

    /// Pascal-second per centipoise.
    pub const CP_PA_S: f64 = 1e-3;
}
