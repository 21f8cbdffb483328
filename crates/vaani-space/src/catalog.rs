//! Static catalog of well-known satellites for the 3D view.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Orbit {
    Leo,
    Meo,
    Geo,
    Lunar,
    L2,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSatellite {
    pub name: &'static str,
    pub norad_id: u32,
    pub orbit: Orbit,
    pub altitude_km: f64,
    pub inclination_deg: f64,
    pub status: &'static str,
    pub purpose: &'static str,
    pub country: &'static str,
}

pub const CATALOG: &[CatalogSatellite] = &[
    CatalogSatellite {
        name: "International Space Station",
        norad_id: 25544,
        orbit: Orbit::Leo,
        altitude_km: 408.0,
        inclination_deg: 51.64,
        status: "active",
        purpose: "Crewed research laboratory",
        country: "International",
    },
    CatalogSatellite {
        name: "Hubble Space Telescope",
        norad_id: 20580,
        orbit: Orbit::Leo,
        altitude_km: 535.0,
        inclination_deg: 28.47,
        status: "active",
        purpose: "Optical and ultraviolet astronomy",
        country: "USA / Europe",
    },
    CatalogSatellite {
        name: "James Webb Space Telescope",
        norad_id: 50463,
        orbit: Orbit::L2,
        altitude_km: 1_500_000.0,
        inclination_deg: 0.0,
        status: "active",
        purpose: "Infrared astronomy",
        country: "USA / Europe / Canada",
    },
    CatalogSatellite {
        name: "Cartosat-3",
        norad_id: 44804,
        orbit: Orbit::Leo,
        altitude_km: 509.0,
        inclination_deg: 97.5,
        status: "active",
        purpose: "High-resolution Earth imaging",
        country: "India",
    },
    CatalogSatellite {
        name: "GSAT-24",
        norad_id: 52934,
        orbit: Orbit::Geo,
        altitude_km: 35_786.0,
        inclination_deg: 0.05,
        status: "active",
        purpose: "Ku-band communications",
        country: "India",
    },
    CatalogSatellite {
        name: "Chandrayaan-3 Propulsion Module",
        norad_id: 57320,
        orbit: Orbit::Lunar,
        altitude_km: 384_400.0,
        inclination_deg: 0.0,
        status: "returned to Earth orbit",
        purpose: "Lunar mission carrier",
        country: "India",
    },
    CatalogSatellite {
        name: "Starlink-1007",
        norad_id: 44713,
        orbit: Orbit::Leo,
        altitude_km: 550.0,
        inclination_deg: 53.0,
        status: "active",
        purpose: "Broadband internet",
        country: "USA",
    },
    CatalogSatellite {
        name: "GPS III-01",
        norad_id: 43873,
        orbit: Orbit::Meo,
        altitude_km: 20_180.0,
        inclination_deg: 55.0,
        status: "active",
        purpose: "Navigation",
        country: "USA",
    },
    CatalogSatellite {
        name: "NOAA-21",
        norad_id: 54234,
        orbit: Orbit::Leo,
        altitude_km: 824.0,
        inclination_deg: 98.7,
        status: "active",
        purpose: "Weather observation",
        country: "USA",
    },
];

/// Look up a catalog entry by NORAD id.
pub fn by_norad_id(id: u32) -> Option<&'static CatalogSatellite> {
    CATALOG.iter().find(|s| s.norad_id == id)
}
