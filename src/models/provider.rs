use serde::{Deserialize, Serialize};

/// Logo used for any provider missing from [`PROVIDER_LOGOS`]
pub const PLACEHOLDER_LOGO: &str = "https://via.placeholder.com/40";

/// Known provider logos, keyed on the normalized display name
const PROVIDER_LOGOS: &[(&str, &str)] = &[
    (
        "tubi tv",
        "https://upload.wikimedia.org/wikipedia/commons/0/0c/Tubi_Logo.svg",
    ),
    (
        "kanopy",
        "https://upload.wikimedia.org/wikipedia/commons/1/1d/Kanopy_logo.svg",
    ),
    (
        "netflix",
        "https://upload.wikimedia.org/wikipedia/commons/0/08/Netflix_2015_logo.svg",
    ),
    (
        "amazon prime video",
        "https://upload.wikimedia.org/wikipedia/commons/f/fa/Amazon_icon.svg",
    ),
    (
        "disney plus",
        "https://upload.wikimedia.org/wikipedia/commons/3/3e/Disney%2B_logo.svg",
    ),
    (
        "hulu",
        "https://upload.wikimedia.org/wikipedia/commons/e/e4/Hulu_Logo.svg",
    ),
];

/// Providers that can be watched without a paid subscription
const FREE_PROVIDERS: &[&str] = &["tubi tv", "kanopy"];

/// Display-ready description of a streaming provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    /// Slug of the display name; only unique within one result set
    pub id: String,
    pub display_name: String,
    pub logo_url: String,
    pub requires_subscription: bool,
}

impl ProviderDescriptor {
    pub fn from_display_name(name: &str) -> Self {
        let key = lookup_key(name);

        let logo_url = PROVIDER_LOGOS
            .iter()
            .find(|(provider, _)| *provider == key)
            .map(|(_, logo)| logo.to_string())
            .unwrap_or_else(|| PLACEHOLDER_LOGO.to_string());

        Self {
            id: slug(name),
            display_name: name.to_string(),
            logo_url,
            requires_subscription: !FREE_PROVIDERS.contains(&key.as_str()),
        }
    }
}

/// Lowercase, with every whitespace run replaced by a hyphen
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn lookup_key(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
