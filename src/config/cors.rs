use anyhow::Result;

use crate::config::Environment;

/// Browser origins allowed to call the API.
///
/// Development allows the usual local frontend dev servers. Production
/// serves exactly the configured frontend origin and refuses to start
/// without one.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_lookup(
        get: &dyn Fn(&str) -> Option<String>,
        environment: Environment,
    ) -> Result<Self> {
        let allowed_origins = if environment.is_production() {
            vec![super::required(get, "FRONTEND_URL")?]
        } else {
            vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ]
        };

        Ok(Self { allowed_origins })
    }
}
