//! Outbound navigation links to an external mapping service.
//!
//! Every link is built from the institute's real-world [`LatLng`], never from
//! the widget's logical coordinates. Opening a link is fire-and-forget; a
//! missing or denied geolocation only drops the origin from a directions link.

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

const MAPS_BASE_URL: &str = "https://www.google.com/maps";
const STREET_VIEW_SUFFIX: &str = "3a,75y,90t/data=!3m6!1e1!3m4!1s0x0:0x0!2e0!7i13312!8i6656";

/// The three outbound actions offered next to the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationKind {
    Directions,
    StreetView,
    OpenInMaps,
}

/// Driving directions ending at `destination`, starting at `origin` when known
pub fn directions_url(destination: &LatLng, origin: Option<&LatLng>) -> String {
    match origin {
        Some(origin) => format!("{MAPS_BASE_URL}/dir/{origin}/{destination}"),
        None => format!("{MAPS_BASE_URL}/dir//{destination}"),
    }
}

pub fn street_view_url(location: &LatLng) -> String {
    format!("{MAPS_BASE_URL}/@{location},{STREET_VIEW_SUFFIX}")
}

pub fn place_url(location: &LatLng) -> String {
    format!("{MAPS_BASE_URL}/place/{location}")
}

/// Why a position could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation permission denied")]
    PermissionDenied,
    #[error("geolocation unavailable")]
    Unavailable,
    #[error("geolocation timed out")]
    Timeout,
}

/// Source of the user's current position
pub trait GeolocationProvider: Send + Sync {
    fn current_position(&self) -> Result<LatLng, GeolocationError>;
}

/// Provider for hosts without any geolocation support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

impl GeolocationProvider for NoGeolocation {
    fn current_position(&self) -> Result<LatLng, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

impl<T: GeolocationProvider + ?Sized> GeolocationProvider for Box<T> {
    fn current_position(&self) -> Result<LatLng, GeolocationError> {
        (**self).current_position()
    }
}

/// A provider that always reports the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation(pub LatLng);

impl GeolocationProvider for FixedGeolocation {
    fn current_position(&self) -> Result<LatLng, GeolocationError> {
        Ok(self.0)
    }
}

/// Opens a URL in a new browsing context
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str);
}

/// Opener that only logs the URL
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOpener;

impl LinkOpener for LoggingOpener {
    fn open(&self, url: &str) {
        log::info!("opening external map link: {}", url);
    }
}

/// Opener that keeps every URL it was asked to open
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) {
        if let Ok(mut urls) = self.opened.lock() {
            urls.push(url.to_string());
        }
    }
}

impl<T: LinkOpener + ?Sized> LinkOpener for std::sync::Arc<T> {
    fn open(&self, url: &str) {
        (**self).open(url)
    }
}

impl<T: LinkOpener + ?Sized> LinkOpener for Box<T> {
    fn open(&self, url: &str) {
        (**self).open(url)
    }
}

/// Builds and opens navigation links for one destination
pub struct Navigator {
    destination: LatLng,
    geolocation: Box<dyn GeolocationProvider>,
    opener: Box<dyn LinkOpener>,
}

impl Navigator {
    pub fn new(destination: LatLng) -> Self {
        Self {
            destination,
            geolocation: Box::new(NoGeolocation),
            opener: Box::new(LoggingOpener),
        }
    }

    pub fn with_geolocation(mut self, provider: impl GeolocationProvider + 'static) -> Self {
        self.geolocation = Box::new(provider);
        self
    }

    pub fn with_opener(mut self, opener: impl LinkOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn destination(&self) -> &LatLng {
        &self.destination
    }

    /// Builds the URL for `kind`; directions try the current position first
    pub fn resolve(&self, kind: NavigationKind) -> String {
        match kind {
            NavigationKind::Directions => {
                let origin = match self.geolocation.current_position() {
                    Ok(position) if position.is_valid() => Some(position),
                    Ok(position) => {
                        log::debug!("ignoring invalid geolocation fix {}", position);
                        None
                    }
                    Err(e) => {
                        log::debug!("directions without origin: {}", e);
                        None
                    }
                };
                directions_url(&self.destination, origin.as_ref())
            }
            NavigationKind::StreetView => street_view_url(&self.destination),
            NavigationKind::OpenInMaps => place_url(&self.destination),
        }
    }

    /// Resolves and opens the link, returning the URL that was opened
    pub fn open(&self, kind: NavigationKind) -> String {
        let url = self.resolve(kind);
        self.opener.open(&url);
        url
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}
