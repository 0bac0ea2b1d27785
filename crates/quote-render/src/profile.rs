use quote_store::WorkspaceConfig;

/// Letterhead shown at the top of every proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioProfile {
    pub name: String,
    pub tagline: String,
    pub regions: String,
}

impl Default for StudioProfile {
    fn default() -> Self {
        Self {
            name: "Mera Studio & Films".into(),
            tagline: "Wedding • Pre-Wedding • Cinematic Films • Albums".into(),
            regions: "Varanasi • Lucknow • Pan India".into(),
        }
    }
}

impl StudioProfile {
    /// Built-in letterhead with any `studio.*` config keys applied.
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        let base = Self::default();
        Self {
            name: config.studio_name().unwrap_or(base.name),
            tagline: config.studio_tagline().unwrap_or(base.tagline),
            regions: config.studio_regions().unwrap_or(base.regions),
        }
    }
}
