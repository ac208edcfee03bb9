// Trust-list URL source - Endpoints published by lists of trust lists

use super::{UrlSource, distinct_inputs, parse_input_url};
use crate::Result;
use crate::endpoints::{DistinctUrlFilter, contains_equivalent, is_supported_scheme};
use crate::http::RedirectResolver;
use crate::trust_list::TrustListParser;
use async_trait::async_trait;
use std::collections::VecDeque;
use url::Url;

/// Emits each trust-list URL followed by the locations it points to
///
/// With a depth above one, XML pointers are parsed as trust lists too. The
/// walk is breadth-first over a work-list and never visits a list twice.
#[derive(Debug, Clone)]
pub struct TrustListUrlSource {
    lists: Vec<Url>,
    parser: TrustListParser,
    resolver: Option<RedirectResolver>,
    depth: usize,
}

impl TrustListUrlSource {
    pub fn new(
        inputs: &[String],
        parser: TrustListParser,
        resolver: Option<RedirectResolver>,
        depth: usize,
    ) -> Result<Self> {
        let lists = distinct_inputs(inputs)
            .into_iter()
            .map(|input| parse_input_url("LOTL URL", input))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            lists,
            parser,
            resolver,
            depth: depth.max(1),
        })
    }

    pub fn lists(&self) -> &[Url] {
        &self.lists
    }

    /// Where a trust list is actually served from
    async fn locate(&self, list: &Url) -> Result<Url> {
        let Some(resolver) = &self.resolver else {
            return Ok(list.clone());
        };

        // A trust list that cannot be reached makes the run meaningless
        let mut chain = resolver.resolve(list).await?;
        Ok(chain.pop().unwrap_or_else(|| list.clone()))
    }
}

#[async_trait]
impl UrlSource for TrustListUrlSource {
    async fn discover(&self) -> Result<Vec<Url>> {
        let filter = DistinctUrlFilter::new();
        let mut visited: Vec<Url> = Vec::new();
        let mut discovered = Vec::new();

        for list in &self.lists {
            let start = self.locate(list).await?;
            let mut queue = VecDeque::from([(start, 1usize)]);

            while let Some((current, level)) = queue.pop_front() {
                if contains_equivalent(&visited, &current) {
                    continue;
                }
                visited.push(current.clone());

                if filter.admit(&current) {
                    discovered.push(current.clone());
                }

                for pointer in self.parser.parse(&current).await? {
                    if level < self.depth
                        && pointer.is_xml()
                        && is_supported_scheme(pointer.url.scheme())
                    {
                        tracing::debug!("Descending into nested trust list {}", pointer);
                        queue.push_back((pointer.url.clone(), level + 1));
                    }
                    if filter.admit(&pointer.url) {
                        discovered.push(pointer.url);
                    }
                }
            }
        }

        tracing::info!(
            "Discovered {} URLs from {} trust lists",
            discovered.len(),
            visited.len()
        );
        Ok(discovered)
    }
}
