//! URL utilities for consistent endpoint construction
//!
//! Base URLs come from user config and may or may not carry a trailing slash;
//! these helpers keep the final endpoint free of double slashes.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use edubots::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta///"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use edubots::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://example.test/v1beta/", "/models"),
///     "https://example.test/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Endpoint for a single non-streaming Gemini completion.
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(base_url, &format!("models/{model}:generateContent"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1"),
            "https://api.example.com/v1"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/v1/"),
            "https://api.example.com/v1"
        );
        assert_eq!(normalize_base_url("/"), "");
    }

    #[test]
    fn test_construct_api_url_avoids_double_slashes() {
        assert_eq!(
            construct_api_url("https://api.example.com/v1//", "//models"),
            "https://api.example.com/v1/models"
        );
    }

    #[test]
    fn test_generate_content_url() {
        assert_eq!(
            generate_content_url(
                "https://generativelanguage.googleapis.com/v1beta/",
                "gemini-2.5-flash"
            ),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        // Model names copied from the API listing carry a "models/" prefix.
        assert_eq!(
            generate_content_url("http://localhost:8080", "models/gemini-2.5-pro"),
            "http://localhost:8080/models/gemini-2.5-pro:generateContent"
        );
    }
}
