//! Long-lived collaborators shared by every page through context.
use std::rc::Rc;

use cinebook_core::gateway::GatewayConfig;
use cinebook_core::{
    BookingConfig, Enricher, FallbackGateway, HttpGateway, MetadataProvider, MockGateway,
    OmdbProvider,
};

use crate::storage::BrowserStore;

pub type WebGateway = FallbackGateway<HttpGateway>;

/// Booking tunables shipped with the static assets; malformed JSON falls back
/// to the built-in defaults.
#[must_use]
pub fn load_booking_config() -> BookingConfig {
    BookingConfig::from_json(include_str!("../static/assets/data/booking.json")).unwrap_or_else(
        |err| {
            log::warn!("booking.json rejected, using defaults: {err}");
            BookingConfig::default_config()
        },
    )
}

#[derive(Clone)]
pub struct Services {
    pub config: Rc<BookingConfig>,
    pub store: BrowserStore,
    pub gateway: Rc<WebGateway>,
    pub enricher: Rc<Enricher>,
}

impl Services {
    /// Wire up the gateway for `api_url` (mock mode when absent or when the
    /// HTTP client cannot be built) and an enricher using `omdb_key`.
    #[must_use]
    pub fn new(
        config: BookingConfig,
        api_url: Option<&str>,
        omdb_key: Option<String>,
        clock: fn() -> chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let remote = HttpGateway::new(&GatewayConfig::from_url(api_url)).unwrap_or_else(|err| {
            log::warn!("HTTP gateway unavailable, using demo data: {err}");
            None
        });
        let providers: Vec<Box<dyn MetadataProvider>> = omdb_key
            .map(|key| Box::new(OmdbProvider::new(key)) as Box<dyn MetadataProvider>)
            .into_iter()
            .collect();
        Self {
            config: Rc::new(config),
            store: BrowserStore,
            gateway: Rc::new(FallbackGateway::new(remote, MockGateway::new(clock))),
            enricher: Rc::new(Enricher::new(providers)),
        }
    }

    /// Production wiring from build-time settings.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            load_booking_config(),
            crate::paths::api_base_url(),
            crate::paths::omdb_api_key(),
            crate::dom::now,
        )
    }
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config)
            && Rc::ptr_eq(&self.gateway, &other.gateway)
            && Rc::ptr_eq(&self.enricher, &other.enricher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use cinebook_core::CatalogGateway;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap()
    }

    #[test]
    fn shipped_config_parses() {
        assert_eq!(load_booking_config(), BookingConfig::default_config());
    }

    #[test]
    fn missing_backend_means_demo_mode() {
        let services = Services::new(BookingConfig::default_config(), None, None, fixed);
        assert!(services.gateway.is_mock());
        assert!(services.gateway.remote().is_none());
        assert_eq!(services.enricher.cached(), 0);
    }

    #[test]
    fn equality_is_identity() {
        let a = Services::new(BookingConfig::default_config(), None, None, fixed);
        let b = Services::new(BookingConfig::default_config(), None, None, fixed);
        assert!(a == a.clone());
        assert!(a != b);
    }
}
