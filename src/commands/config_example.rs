// ConfigExampleCommand - Write an example settings file
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::config::Settings;
use crate::{HarvestError, Result};
use async_trait::async_trait;
use colored::*;
use std::path::PathBuf;

pub struct ConfigExampleCommand {
    path: Option<PathBuf>,
}

impl ConfigExampleCommand {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Command for ConfigExampleCommand {
    async fn execute(&self) -> Result<()> {
        let path = self.path.as_ref().ok_or(HarvestError::MissingArgumentGroup {
            group: "config-example",
        })?;

        Settings::create_example(path)?;
        println!(
            "{} {}",
            "Example settings written to".green(),
            path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ConfigExampleCommand"
    }
}
