/// Earth equatorial radius (kilometers), as used by the thin shell model.
pub const EARTH_RADIUS_KM: f64 = 6378.1363;

/// Default ionospheric thin shell height (kilometers)
pub const IONO_SHELL_HEIGHT_KM: f64 = 350.0;

/// Vertical confidence multiplier (10⁻⁹ missed detection / 10⁻⁷ integrity risk)
pub const K_V: f64 = 5.33;

/// Horizontal confidence multiplier, precision approach
pub const K_H_PA: f64 = 6.0;

/// Horizontal confidence multiplier, en route through non precision approach
pub const K_H_NPA: f64 = 6.18;

/// Minimal number of usable satellites to form a protection level.
pub const MIN_USABLE_SATELLITES: usize = 4;

/// First SBAS PRN, associated to slot number 1.
pub const SBAS_PRN_OFFSET: u8 = 119;

/// Tropospheric vertical error (meters), at sea level
pub const SIGMA_TVE_M: f64 = 0.12;

/// Sea level standard temperature (Kelvin)
pub const STD_TEMPERATURE_K: f64 = 288.15;

/// Standard temperature lapse rate (Kelvin/m)
pub const STD_LAPSE_RATE_K_M: f64 = 0.0065;

/// Dry air gas constant (J/kg/K)
pub const R_D: f64 = 287.054;

/// Standard gravity (m.s⁻²)
pub const G: f64 = 9.80665;
