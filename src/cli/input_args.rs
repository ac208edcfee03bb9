// Endpoint discovery arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// Where endpoint URLs come from
///
/// At least one of the two lists must be given.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Endpoint URLs to fetch certificate chains from
    #[arg(long = "url", value_name = "URL", num_args = 1..)]
    pub urls: Vec<String>,

    /// Lists of trust lists whose pointer locations are fetched
    #[arg(
        long = "lotl-url",
        visible_alias = "lotl",
        value_name = "URL",
        num_args = 1..
    )]
    pub lotl_urls: Vec<String>,
}

impl InputArgs {
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.lotl_urls.is_empty()
    }
}
