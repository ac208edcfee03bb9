// Direct URL source - Endpoint URLs given on the command line

use super::{UrlSource, distinct_inputs, parse_input_url};
use crate::Result;
use crate::endpoints::DistinctUrlFilter;
use async_trait::async_trait;
use url::Url;

/// URLs supplied directly, validated eagerly at construction
#[derive(Debug, Clone)]
pub struct DirectUrlSource {
    urls: Vec<Url>,
}

impl DirectUrlSource {
    pub fn new(inputs: &[String]) -> Result<Self> {
        let parsed = distinct_inputs(inputs)
            .into_iter()
            .map(|input| parse_input_url("URL", input))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            urls: DistinctUrlFilter::new().filter(parsed),
        })
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }
}

#[async_trait]
impl UrlSource for DirectUrlSource {
    async fn discover(&self) -> Result<Vec<Url>> {
        Ok(self.urls.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HarvestError;

    #[tokio::test]
    async fn test_direct_source_deduplicates_endpoints() {
        let inputs = vec![
            "https://example.com/".to_string(),
            "https://EXAMPLE.com/".to_string(),
            "http://other.example.com/".to_string(),
            "https://example.com/".to_string(),
        ];

        let source = DirectUrlSource::new(&inputs).unwrap();
        let urls = source.discover().await.unwrap();

        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].as_str(), "https://example.com/");
        assert_eq!(urls[1].as_str(), "http://other.example.com/");
    }

    #[test]
    fn test_invalid_direct_url() {
        let inputs = vec!["https://ok.example".to_string(), "not a url".to_string()];

        let err = DirectUrlSource::new(&inputs).unwrap_err();
        assert!(matches!(err, HarvestError::InvalidUrl { what: "URL", .. }));
        assert_eq!(err.to_string(), "Failed to parse URL: Invalid input: not a url");
    }
}
