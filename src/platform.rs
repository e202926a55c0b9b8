use url::Url;

/// A supported website.
///
/// Platforms only differ by the hosts they are served from:
/// the page markup is read the same way for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub id: &'static str,
    pub domains: &'static [&'static str],
}

pub const INSTAGRAM: Platform = Platform {
    id: "instagram",
    domains: &["instagram.com"],
};

pub const THREADS: Platform = Platform {
    id: "threads",
    domains: &["threads.net", "threads.com", "www.threads.com"],
};

/// Every supported platform, in dispatch order
pub const PLATFORMS: [Platform; 2] = [INSTAGRAM, THREADS];

impl Platform {
    /// Whether the host is one of the platform domains or a subdomain of one
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// Find the platform serving the URL, if any
    pub fn for_url(url: &str) -> Option<Platform> {
        let host = Url::parse(url).ok()?.host_str()?.to_owned();
        PLATFORMS.into_iter().find(|p| p.matches_host(&host))
    }
}
