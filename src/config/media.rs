use anyhow::Result;

/// Media host credentials. All three fields are required; the upload
/// client signs every request with them and bootstrap pings the host
/// before the server accepts traffic.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_url: String,
}

impl MediaConfig {
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            cloud_name: super::required(get, "CLOUDINARY_NAME")?,
            api_key: super::required(get, "CLOUDINARY_API_KEY")?,
            api_secret: super::required(get, "CLOUDINARY_SECRET_KEY")?,
            api_url: get("CLOUDINARY_API_URL")
                .unwrap_or_else(|| "https://api.cloudinary.com/v1_1".to_string()),
        })
    }
}
