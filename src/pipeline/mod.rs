// Harvest pipeline - Discovery, redirect expansion, chain capture, extraction and output
//
// Stages run one after another and every network call is awaited before the
// next one starts. Per-endpoint failures go through the run's ErrorPolicy.

use crate::certificates::extract::{IndexPrompt, TerminalPrompt};
use crate::certificates::{
    CertificateChain, CertificateSet, ExtractionPolicy, TrustStoreOptions, save_certificates,
};
use crate::config::HarvestConfig;
use crate::endpoints::{DistinctUrlFilter, is_https_url, is_supported_scheme};
use crate::error::ErrorPolicy;
use crate::http::RedirectResolver;
use crate::input::{DirectUrlSource, TrustListUrlSource, UrlSource};
use crate::output;
use crate::tls::{CertificateChainFetcher, ChainFetcher};
use crate::trust_list::TrustListParser;
use crate::Result;
use std::collections::HashSet;
use std::path::PathBuf;
use url::Url;

/// Counters describing a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    /// HTTPS endpoints a handshake was attempted with
    pub endpoints: usize,
    /// Distinct chains captured
    pub chains: usize,
    /// Distinct certificates written
    pub certificates: usize,
    /// Failures skipped under continue-on-error
    pub skipped: usize,
    pub path: PathBuf,
}

/// Drives one trust-store generation run
pub struct Harvester {
    sources: Vec<Box<dyn UrlSource>>,
    resolver: Option<RedirectResolver>,
    fetcher: Box<dyn ChainFetcher>,
    extraction: ExtractionPolicy,
    prompt: Box<dyn IndexPrompt>,
    policy: ErrorPolicy,
    store: TrustStoreOptions,
}

impl Harvester {
    /// Wire up sources, resolver and fetcher from a validated configuration
    pub fn from_config(config: &HarvestConfig) -> Result<Self> {
        let resolver = if config.follow_redirects {
            Some(RedirectResolver::new(config.protocol, &config.network)?)
        } else {
            None
        };

        let mut sources: Vec<Box<dyn UrlSource>> = Vec::new();
        if !config.urls.is_empty() {
            sources.push(Box::new(DirectUrlSource::new(&config.urls)?));
        }
        if !config.trust_lists.is_empty() {
            let parser = TrustListParser::new(config.protocol, &config.network)?;
            sources.push(Box::new(TrustListUrlSource::new(
                &config.trust_lists,
                parser,
                resolver.clone(),
                config.trust_list_depth,
            )?));
        }

        let fetcher = CertificateChainFetcher::new(config.protocol)
            .with_timeouts(config.network.connect_timeout, config.network.read_timeout);

        Ok(Self {
            sources,
            resolver,
            fetcher: Box::new(fetcher),
            extraction: config.extraction.clone(),
            prompt: Box::new(TerminalPrompt),
            policy: ErrorPolicy::new(config.continue_on_error),
            store: config.store.clone(),
        })
    }

    /// Replace the chain source
    pub fn with_fetcher(mut self, fetcher: Box<dyn ChainFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replace the prompt used by the interactive extraction policy
    pub fn with_prompt(mut self, prompt: Box<dyn IndexPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn policy(&self) -> &ErrorPolicy {
        &self.policy
    }

    /// Concatenate every source, keeping the first URL of each endpoint
    pub async fn discover(&self) -> Result<Vec<Url>> {
        let mut urls = Vec::new();
        for source in &self.sources {
            urls.extend(source.discover().await?);
        }
        Ok(DistinctUrlFilter::new().filter(urls))
    }

    /// Replace every URL by its redirect chain when redirects are followed
    pub async fn expand_redirects(&self, urls: Vec<Url>) -> Result<Vec<Url>> {
        let urls: Vec<Url> = urls
            .into_iter()
            .filter(|url| {
                let supported = is_supported_scheme(url.scheme());
                if !supported {
                    tracing::warn!("Ignoring {}: unsupported scheme", url);
                    output::print_skipped(url, "unsupported scheme");
                }
                supported
            })
            .collect();

        let Some(resolver) = &self.resolver else {
            return Ok(urls);
        };

        let mut expanded = Vec::new();
        for url in &urls {
            expanded.extend(resolver.resolve_with(url, &self.policy).await?);
        }
        Ok(DistinctUrlFilter::new().filter(expanded))
    }

    /// Capture one chain per HTTPS endpoint, dropping repeated chains
    pub async fn fetch_chains(&self, urls: &[Url]) -> Result<(usize, Vec<CertificateChain>)> {
        let mut attempted = 0;
        let mut seen = HashSet::new();
        let mut chains = Vec::new();

        for url in urls.iter().filter(|url| is_https_url(url)) {
            attempted += 1;
            match self.fetcher.fetch(url).await {
                Ok(chain) => {
                    output::print_fetched(url, &chain);
                    if seen.insert(chain.clone()) {
                        chains.push(chain);
                    }
                }
                Err(err) => self.policy.handle(err)?,
            }
        }

        Ok((attempted, chains))
    }

    /// Apply the extraction policy to every chain and pool the results
    pub fn extract(&self, chains: &[CertificateChain]) -> Result<CertificateSet> {
        let mut certificates = CertificateSet::new();
        for chain in chains {
            let extracted = self.extraction.apply_with(chain, self.prompt.as_ref())?;
            output::print_extracted(chain, &extracted);
            certificates.extend(extracted.into_certificates());
        }
        Ok(certificates)
    }

    /// Everything except writing the store
    pub async fn collect_certificates(&self) -> Result<(usize, usize, CertificateSet)> {
        let discovered = self.discover().await?;
        tracing::info!("Discovered {} endpoint URLs", discovered.len());

        output::print_section_header("Fetching certificate chains...");
        let urls = self.expand_redirects(discovered).await?;
        let (attempted, chains) = self.fetch_chains(&urls).await?;

        output::print_section_header("Extracting certificates...");
        let certificates = self.extract(&chains)?;

        Ok((attempted, chains.len(), certificates))
    }

    /// Run the whole pipeline and write the trust store
    pub async fn run(&self) -> Result<HarvestReport> {
        let (endpoints, chains, certificates) = self.collect_certificates().await?;

        println!();
        output::print_saving(&self.store.path);
        save_certificates(&certificates, &self.store)?;
        output::print_done();

        Ok(HarvestReport {
            endpoints,
            chains,
            certificates: certificates.len(),
            skipped: self.policy.skipped(),
            path: self.store.path.clone(),
        })
    }
}
