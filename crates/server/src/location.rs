//! Ground location of a state vector.
//!
//! The default locator rotates the J2000 position into an Earth-fixed frame
//! by Greenwich mean sidereal time, converts it to WGS84 geodetic
//! coordinates, and optionally asks a reverse geocoder for a place name.
//! Precession, nutation and polar motion are ignored.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use map_3d::{ecef2geodetic, rad2deg, Ellipsoid};
use orbit_core::config::LocationConfig;
use orbit_core::{Error, Result, StateVector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Place name reported when no geocoder is configured.
pub const UNKNOWN_PLACE: &str = "unknown";

/// Place name reported when the geocoder has no address (open water, poles).
pub const NO_ADDRESS_PLACE: &str = "no address (likely over ocean)";

/// Sub-satellite point of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundLocation {
    /// Geodetic latitude, degrees.
    pub lat: f64,
    /// Longitude, degrees in (-180, 180].
    pub lon: f64,
    /// Height above the ellipsoid, km.
    pub height: f64,
    pub place: String,
}

/// Derives where on Earth a state vector sits.
#[async_trait]
pub trait Locator: Send + Sync {
    async fn locate(&self, record: &StateVector) -> Result<GroundLocation>;
}

/// Julian date of a UTC timestamp.
fn julian_date(epoch: NaiveDateTime) -> f64 {
    epoch.and_utc().timestamp_millis() as f64 / 86_400_000.0 + 2_440_587.5
}

/// Greenwich mean sidereal time, radians in [0, 2π).
pub fn gmst(epoch: NaiveDateTime) -> f64 {
    let d = julian_date(epoch) - 2_451_545.0;
    let t = d / 36_525.0;
    let degrees =
        280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t - t * t * t / 38_710_000.0;
    degrees.rem_euclid(360.0).to_radians()
}

/// Rotate an inertial position (km) into the Earth-fixed frame at `epoch`.
pub fn inertial_to_earth_fixed(x: f64, y: f64, z: f64, epoch: NaiveDateTime) -> (f64, f64, f64) {
    let theta = gmst(epoch);
    let (sin, cos) = theta.sin_cos();
    (cos * x + sin * y, -sin * x + cos * y, z)
}

/// Local transform plus optional reverse geocoding.
pub struct GeodeticLocator {
    geocoder: Option<ReverseGeocoder>,
}

impl GeodeticLocator {
    /// Locator that never resolves place names.
    pub fn offline() -> Self {
        Self { geocoder: None }
    }

    pub fn with_geocoder(geocoder: ReverseGeocoder) -> Self {
        Self {
            geocoder: Some(geocoder),
        }
    }

    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        match &config.geocoder_url {
            Some(url) => Ok(Self::with_geocoder(ReverseGeocoder::new(
                url.clone(),
                &config.user_agent,
                Duration::from_secs(config.timeout_secs),
            )?)),
            None => Ok(Self::offline()),
        }
    }

    /// Geodetic coordinates without a place name.
    pub fn geodetic(record: &StateVector) -> Result<(f64, f64, f64)> {
        if !record.is_finite() {
            return Err(Error::invalid_input("cannot locate a non-finite state vector"));
        }
        let (xe, ye, ze) = inertial_to_earth_fixed(record.x, record.y, record.z, record.epoch);
        let (lat, lon, h_m) = ecef2geodetic(xe * 1000.0, ye * 1000.0, ze * 1000.0, Ellipsoid::WGS84);
        Ok((rad2deg(lat), rad2deg(lon), h_m / 1000.0))
    }
}

#[async_trait]
impl Locator for GeodeticLocator {
    async fn locate(&self, record: &StateVector) -> Result<GroundLocation> {
        let (lat, lon, height) = Self::geodetic(record)?;
        debug!(epoch = %record.epoch, lat, lon, height, "sub-satellite point");

        let place = match &self.geocoder {
            Some(geocoder) => geocoder
                .place(lat, lon)
                .await?
                .unwrap_or_else(|| NO_ADDRESS_PLACE.to_string()),
            None => UNKNOWN_PLACE.to_string(),
        };

        Ok(GroundLocation {
            lat,
            lon,
            height,
            place,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

/// Client for a Nominatim-compatible `/reverse` endpoint.
pub struct ReverseGeocoder {
    url: String,
    client: reqwest::Client,
}

impl ReverseGeocoder {
    pub fn new(url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("cannot build geocoder client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Place name at a point, `None` when the service knows no address there.
    pub async fn place(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "jsonv2".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::locate(format!("geocoder unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::locate(format!("geocoder returned {status}")));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| Error::locate(format!("geocoder sent an unexpected body: {e}")))?;

        if let Some(reason) = body.error {
            warn!(lat, lon, %reason, "geocoder has no address");
        }
        Ok(body.display_name)
    }
}
