// src/service.rs
use crate::aggregator::aggregate;
use crate::catalog::ProbeCatalog;
use crate::error::Result;
use crate::geoip::{GeoIpClient, IpReport};
use crate::phone::{self, PhoneReport};
use crate::prober::ExistenceProber;
use crate::session::Session;
use crate::types::{Config, ProbeReport};
use crate::validate;
use log::info;
use std::time::Duration;

/// Orchestrates the lookup flows: input validation, collaborator or
/// probe fan-out, and response shaping. Thin by design; the heavy
/// lifting lives in the prober and the collaborators.
pub struct LookupService {
    catalog: ProbeCatalog,
    prober: ExistenceProber,
    geoip: GeoIpClient,
}

impl LookupService {
    pub fn new(config: &Config) -> Result<Self> {
        let session = Session::new(&config.upstream)?;
        let catalog = ProbeCatalog::builtin();
        let prober = ExistenceProber::new(
            session.clone(),
            Duration::from_secs(config.probe.timeout_secs),
        );
        let geoip = GeoIpClient::new(
            session,
            &config.upstream.geoip_url,
            &config.upstream.echo_ip_url,
        )?;

        Ok(Self {
            catalog,
            prober,
            geoip,
        })
    }

    /// Builds a service around an explicit catalog. Used by tests.
    pub fn with_catalog(config: &Config, catalog: ProbeCatalog) -> Result<Self> {
        let mut service = Self::new(config)?;
        service.catalog = catalog;
        Ok(service)
    }

    /// Username flow: validate, probe every catalog platform
    /// concurrently, aggregate in catalog order. Once probing starts
    /// the batch always completes; per-target failures are folded into
    /// the report as `error` outcomes.
    pub async fn track_username(&self, raw: &str) -> Result<ProbeReport> {
        let username = validate::username(raw)?;

        let outcomes = self.prober.probe_all(&username, &self.catalog).await;
        let report = aggregate(&username, outcomes);

        info!(
            "Username {:?}: {}/{} platforms matched",
            report.username, report.found_count, report.total_searched
        );

        Ok(report)
    }

    /// IP flow: validate shape and range, then remap the geolocation
    /// collaborator's fields.
    pub async fn track_ip(&self, raw: &str) -> Result<IpReport> {
        let ip = validate::ip_address(raw)?;
        self.geoip.lookup(&ip).await
    }

    /// Phone flow: validate shape, then remap the telephony library's
    /// fields. No network access.
    pub fn track_phone(&self, raw: &str) -> Result<PhoneReport> {
        let phone = validate::phone_number(raw)?;
        phone::lookup(&phone)
    }

    /// The server's own public IP via the echo collaborator.
    pub async fn my_ip(&self) -> Result<String> {
        self.geoip.public_ip().await
    }

    pub fn catalog(&self) -> &ProbeCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProbeTarget;
    use crate::types::{ProbeStatus, TrackerError};

    #[tokio::test]
    async fn test_track_username_rejects_bad_input_before_probing() {
        let service = LookupService::new(&Config::default()).unwrap();
        let result = service.track_username("bad input!").await;
        assert!(matches!(result, Err(TrackerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_track_ip_rejects_private_before_lookup() {
        let service = LookupService::new(&Config::default()).unwrap();
        let result = service.track_ip("192.168.0.1").await;
        assert!(matches!(result, Err(TrackerError::InvalidInput(_))));
    }

    #[test]
    fn test_track_phone_rejects_bad_shape() {
        let service = LookupService::new(&Config::default()).unwrap();
        assert!(service.track_phone("12345").is_err());
    }

    #[test]
    fn test_track_phone_maps_valid_number() {
        let service = LookupService::new(&Config::default()).unwrap();
        let report = service.track_phone("+14155552671").unwrap();
        assert!(report.is_valid);
        assert!(report.success);
    }

    #[tokio::test]
    async fn test_track_username_end_to_end_with_mock_platforms() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/hub/alice")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("GET", "/forge/alice")
            .with_status(404)
            .create_async()
            .await;

        let catalog = ProbeCatalog::from_targets(vec![
            ProbeTarget::new("Hub", &format!("{}/hub/{{}}", server.url())),
            ProbeTarget::new("Forge", &format!("{}/forge/{{}}", server.url())),
        ]);

        let service = LookupService::with_catalog(&Config::default(), catalog).unwrap();
        let report = service.track_username("alice").await.unwrap();

        assert_eq!(report.total_searched, 2);
        assert_eq!(report.found_count, 1);
        assert_eq!(report.found_profiles[0].platform, "Hub");
        assert_eq!(report.found_profiles[0].status, ProbeStatus::Found);
        assert_eq!(report.not_found_profiles[0].platform, "Forge");
        assert!(report.success);
    }
}
