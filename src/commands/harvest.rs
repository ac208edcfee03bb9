// HarvestCommand - Generate a trust store from discovered endpoints
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::pipeline::Harvester;
use crate::{Args, Result, output};
use async_trait::async_trait;

/// HarvestCommand runs the full pipeline
///
/// Arguments are validated before anything touches the network, so an
/// input error never leaves a partial trust store behind.
pub struct HarvestCommand {
    args: Args,
}

impl HarvestCommand {
    pub fn new(args: Args) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Command for HarvestCommand {
    async fn execute(&self) -> Result<()> {
        let config = self.args.to_config()?;
        tracing::debug!("Harvest configuration: {:?}", config);

        let harvester = Harvester::from_config(&config)?;
        let report = harvester.run().await?;

        output::print_summary(&report);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "HarvestCommand"
    }
}
