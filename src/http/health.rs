use super::{params::QueryParams, request::Empty, ApiRequest, Error, Opa};

/// Extra checks of the health endpoint.
#[derive(Debug, Clone, Default)]
pub struct HealthOptions {
    /// Also require all bundles to be activated.
    pub bundles: bool,
    /// Also require all plugins to be in an OK state.
    pub plugins: bool,
    /// Plugins ignored by the plugin check.
    pub exclude_plugins: Vec<String>,
}

impl Opa {
    /// Basic health-checking.
    pub async fn health(&self) -> Result<(), Error> {
        self.health_with(&HealthOptions::default()).await
    }

    pub async fn health_with(&self, options: &HealthOptions) -> Result<(), Error> {
        let path = QueryParams::new()
            .flag("bundles", options.bundles)
            .flag("plugins", options.plugins)
            .values("exclude-plugin", options.exclude_plugins.iter().map(String::as_str))
            .to_path("/health");

        self.send::<Empty>(ApiRequest::get(path)).await?;
        Ok(())
    }

    /// Check a custom health rule defined under `data.system.health`.
    pub async fn health_custom(&self, name: &str) -> Result<(), Error> {
        let path = format!("/health/{}", name.trim_start_matches('/'));
        self.send::<Empty>(ApiRequest::get(path)).await?;
        Ok(())
    }
}
