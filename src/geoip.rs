// src/geoip.rs
//! IP-intelligence collaborator. The lookup is a single pass-through
//! call to ipwho.is with field remapping into our stable report shape.

use crate::error::Result;
use crate::session::Session;
use crate::types::TrackerError;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Deserialize)]
struct IpWhoisResponse {
    success: Option<bool>,
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    city: Option<String>,
    continent: Option<String>,
    continent_code: Option<String>,
    region: Option<String>,
    region_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    is_eu: Option<bool>,
    postal: Option<String>,
    calling_code: Option<String>,
    capital: Option<String>,
    borders: Option<String>,
    flag: Option<IpWhoisFlag>,
    connection: Option<IpWhoisConnection>,
    timezone: Option<IpWhoisTimezone>,
}

#[derive(Debug, Deserialize)]
struct IpWhoisFlag {
    emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpWhoisConnection {
    asn: Option<i64>,
    org: Option<String>,
    isp: Option<String>,
    domain: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpWhoisTimezone {
    id: Option<String>,
    abbr: Option<String>,
    is_dst: Option<bool>,
    offset: Option<i64>,
    utc: Option<String>,
    current_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    pub asn: Option<i64>,
    pub org: Option<String>,
    pub isp: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimezoneReport {
    pub id: Option<String>,
    pub abbr: Option<String>,
    pub is_dst: Option<bool>,
    pub offset: Option<i64>,
    pub utc: Option<String>,
    pub current_time: Option<String>,
}

/// Normalized geolocation report for one IP address.
#[derive(Debug, Clone, Serialize)]
pub struct IpReport {
    pub ip: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub continent: Option<String>,
    pub continent_code: Option<String>,
    pub region: Option<String>,
    pub region_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub maps_url: Option<String>,
    pub is_eu: Option<bool>,
    pub postal: Option<String>,
    pub calling_code: Option<String>,
    pub capital: Option<String>,
    pub borders: Option<String>,
    pub flag: Option<String>,
    pub connection: ConnectionReport,
    pub timezone: TimezoneReport,
    pub success: bool,
}

pub struct GeoIpClient {
    session: Session,
    geoip_url: String,
    echo_ip_url: String,
}

impl GeoIpClient {
    pub fn new(session: Session, geoip_url: &str, echo_ip_url: &str) -> Result<Self> {
        Url::parse(geoip_url).map_err(|e| {
            TrackerError::ConfigError(format!("Invalid geoip URL {:?}: {}", geoip_url, e))
        })?;
        Url::parse(echo_ip_url).map_err(|e| {
            TrackerError::ConfigError(format!("Invalid echo-ip URL {:?}: {}", echo_ip_url, e))
        })?;

        Ok(Self {
            session,
            geoip_url: geoip_url.trim_end_matches('/').to_string(),
            echo_ip_url: echo_ip_url.to_string(),
        })
    }

    /// Looks up a validated IP literal and remaps the upstream fields.
    pub async fn lookup(&self, ip: &str) -> Result<IpReport> {
        let url = format!("{}/{}", self.geoip_url, ip);
        let upstream: IpWhoisResponse = self.session.get_json(&url).await?;

        // ipwho.is reports lookup failures inside a 200 body
        if !upstream.success.unwrap_or(true) {
            let reason = upstream
                .message
                .unwrap_or_else(|| "lookup failed".to_string());
            return Err(TrackerError::InvalidInput(format!(
                "IP lookup failed: {}",
                reason
            )));
        }

        // A zero coordinate means the upstream had no fix for that axis
        let maps_url = match (upstream.latitude, upstream.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => {
                Some(format!("https://www.google.com/maps/@{},{},8z", lat, lon))
            }
            _ => None,
        };

        let connection = upstream
            .connection
            .map(|c| ConnectionReport {
                asn: c.asn,
                org: c.org,
                isp: c.isp,
                domain: c.domain,
            })
            .unwrap_or(ConnectionReport {
                asn: None,
                org: None,
                isp: None,
                domain: None,
            });

        let timezone = upstream
            .timezone
            .map(|t| TimezoneReport {
                id: t.id,
                abbr: t.abbr,
                is_dst: t.is_dst,
                offset: t.offset,
                utc: t.utc,
                current_time: t.current_time,
            })
            .unwrap_or(TimezoneReport {
                id: None,
                abbr: None,
                is_dst: None,
                offset: None,
                utc: None,
                current_time: None,
            });

        Ok(IpReport {
            ip: ip.to_string(),
            kind: upstream.kind,
            country: upstream.country,
            country_code: upstream.country_code,
            city: upstream.city,
            continent: upstream.continent,
            continent_code: upstream.continent_code,
            region: upstream.region,
            region_code: upstream.region_code,
            latitude: upstream.latitude,
            longitude: upstream.longitude,
            maps_url,
            is_eu: upstream.is_eu,
            postal: upstream.postal,
            calling_code: upstream.calling_code,
            capital: upstream.capital,
            borders: upstream.borders,
            flag: upstream.flag.and_then(|f| f.emoji),
            connection,
            timezone,
            success: true,
        })
    }

    /// The server's public IP as seen by the echo service.
    pub async fn public_ip(&self) -> Result<String> {
        let body = self.session.get_text(&self.echo_ip_url).await?;
        Ok(body.trim().to_string())
    }
}
