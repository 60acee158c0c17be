// src/catalog.rs
use crate::types::{ProbeOutcome, ProbeStatus};

/// One platform in the probe catalog. The URL template carries a single
/// `{}` slot for the subject identifier.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub platform: String,
    pub url_template: String,
}

impl ProbeTarget {
    pub fn new(platform: &str, url_template: &str) -> Self {
        Self {
            platform: platform.to_string(),
            url_template: url_template.to_string(),
        }
    }

    /// Substitutes the identifier into the template. The identifier has
    /// already passed shape validation upstream; only standard URL
    /// encoding is applied here.
    pub fn resolve(&self, identifier: &str) -> String {
        self.url_template
            .replacen("{}", &urlencoding::encode(identifier), 1)
    }

    /// A placeholder outcome for this target, used when a probe task
    /// vanishes without reporting.
    pub fn error_outcome(&self, identifier: &str) -> ProbeOutcome {
        ProbeOutcome {
            platform: self.platform.clone(),
            url: self.resolve(identifier),
            status: ProbeStatus::Error,
        }
    }
}

/// Static, ordered list of platforms checked per username query.
/// Catalog order is semantically meaningful: it defines the output
/// ordering of the aggregated report.
#[derive(Debug, Clone)]
pub struct ProbeCatalog {
    entries: Vec<ProbeTarget>,
}

impl ProbeCatalog {
    /// The built-in platform table, loaded once at startup.
    pub fn builtin() -> Self {
        let table = [
            ("Facebook", "https://www.facebook.com/{}"),
            ("Twitter", "https://www.twitter.com/{}"),
            ("Instagram", "https://www.instagram.com/{}"),
            ("LinkedIn", "https://www.linkedin.com/in/{}"),
            ("GitHub", "https://www.github.com/{}"),
            ("Pinterest", "https://www.pinterest.com/{}"),
            ("Tumblr", "https://www.tumblr.com/{}"),
            ("Youtube", "https://www.youtube.com/{}"),
            ("SoundCloud", "https://soundcloud.com/{}"),
            ("Snapchat", "https://www.snapchat.com/add/{}"),
            ("TikTok", "https://www.tiktok.com/@{}"),
            ("Behance", "https://www.behance.net/{}"),
            ("Medium", "https://www.medium.com/@{}"),
            ("Quora", "https://www.quora.com/profile/{}"),
            ("Flickr", "https://www.flickr.com/people/{}"),
            ("Twitch", "https://www.twitch.tv/{}"),
            ("Dribbble", "https://www.dribbble.com/{}"),
            ("Telegram", "https://www.telegram.me/{}"),
        ];

        Self {
            entries: table
                .iter()
                .map(|(name, template)| ProbeTarget::new(name, template))
                .collect(),
        }
    }

    /// A catalog from explicit targets. Used by tests and by deployments
    /// that narrow the platform list.
    pub fn from_targets(entries: Vec<ProbeTarget>) -> Self {
        Self { entries }
    }

    /// Entries in stable catalog order.
    pub fn entries(&self) -> &[ProbeTarget] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
