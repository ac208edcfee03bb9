// Trust-list parser - Extracts the pointers a list of trust lists publishes

use crate::config::NetworkSettings;
use crate::http::probe_client;
use crate::tls::TlsProtocol;
use crate::{HarvestError, Result};
use roxmltree::{Document, Node};
use std::fmt;
use url::Url;

const ROOT_ELEMENT: &str = "TrustServiceStatusList";
const POINTER_PATH: &[&str] = &["SchemeInformation", "PointersToOtherTSL", "OtherTSLPointer"];
const TERRITORY_PATH: &[&str] = &["AdditionalInformation", "OtherInformation", "SchemeTerritory"];
const MIME_TYPE_PATH: &[&str] = &["AdditionalInformation", "OtherInformation", "MimeType"];
const LOCATION_PATH: &[&str] = &["TSLLocation"];

/// One entry of a list of trust lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TslPointer {
    /// Scheme territory, empty when the entry does not name one
    pub territory: String,
    pub url: Url,
    pub mime_type: Option<String>,
}

impl TslPointer {
    /// Whether the referenced document is itself an XML trust list
    pub fn is_xml(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_none_or(|mime| mime.to_ascii_lowercase().contains("xml"))
    }
}

impl fmt::Display for TslPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.territory.is_empty() {
            write!(f, "{}", self.url)
        } else {
            write!(f, "{} ({})", self.url, self.territory)
        }
    }
}

/// Downloads trust lists without following redirects or validating certificates
#[derive(Debug, Clone)]
pub struct TrustListParser {
    client: reqwest::Client,
}

impl TrustListParser {
    pub fn new(protocol: TlsProtocol, settings: &NetworkSettings) -> Result<Self> {
        Ok(Self {
            client: probe_client(protocol, settings)?,
        })
    }

    /// Fetch and parse the trust list at `url`
    pub async fn parse(&self, url: &Url) -> Result<Vec<TslPointer>> {
        tracing::debug!("Loading trust list from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| HarvestError::Connection {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(HarvestError::TrustListLoad {
                url: url.to_string(),
                reason: format!("HTTP status {}", status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| HarvestError::TrustListLoad {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let pointers = parse_document(url, &body)?;
        tracing::info!("Trust list {} lists {} pointers", url, pointers.len());
        Ok(pointers)
    }
}

/// Parse an already downloaded trust-list document
pub fn parse_document(url: &Url, body: &str) -> Result<Vec<TslPointer>> {
    let document = Document::parse(body).map_err(|e| HarvestError::TrustListDocument {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let root = document.root_element();
    if root.tag_name().name() != ROOT_ELEMENT {
        return Err(HarvestError::UnrecognizedTrustListRoot {
            url: url.to_string(),
            root: root.tag_name().name().to_string(),
        });
    }

    find_elements(root, POINTER_PATH)
        .into_iter()
        .enumerate()
        .map(|(index, pointer)| parse_pointer(url, index, pointer))
        .collect()
}

fn parse_pointer(url: &Url, index: usize, pointer: Node<'_, '_>) -> Result<TslPointer> {
    let territory = first_text(pointer, TERRITORY_PATH).unwrap_or_default();
    let mime_type = first_text(pointer, MIME_TYPE_PATH).filter(|mime| !mime.is_empty());

    let location = first_text(pointer, LOCATION_PATH).ok_or_else(|| {
        HarvestError::MissingTslLocation {
            url: url.to_string(),
            index,
        }
    })?;

    let url = Url::parse(&location).map_err(|source| HarvestError::InvalidTslLocation {
        location: location.clone(),
        source,
    })?;

    Ok(TslPointer {
        territory,
        url,
        mime_type,
    })
}

/// Descendant search along a path of local element names, in document order
fn find_elements<'a, 'input>(root: Node<'a, 'input>, path: &[&str]) -> Vec<Node<'a, 'input>> {
    let Some((head, rest)) = path.split_first() else {
        return vec![root];
    };

    root.descendants()
        .skip(1)
        .filter(|node| node.is_element() && node.tag_name().name() == *head)
        .flat_map(|node| find_elements(node, rest))
        .collect()
}

fn first_text(root: Node<'_, '_>, path: &[&str]) -> Option<String> {
    find_elements(root, path)
        .into_iter()
        .next()
        .map(text_content)
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
