// CommandRouter - Routes CLI arguments to appropriate Command
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{Command, ConfigExampleCommand, HarvestCommand};
use crate::Args;

/// CommandRouter determines which Command to execute based on CLI arguments
///
/// Routing priority:
/// 1. Example settings file (--config-example)
/// 2. Trust store generation (default)
pub struct CommandRouter;

impl CommandRouter {
    /// Route CLI arguments to the appropriate Command
    pub fn route(args: Args) -> Box<dyn Command> {
        if args.config_example.is_some() {
            return Box::new(ConfigExampleCommand::new(args.config_example));
        }

        Box::new(HarvestCommand::new(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_config_example() {
        let mut args = Args::default();
        args.config_example = Some(std::path::PathBuf::from("trustharvest.toml"));
        let cmd = CommandRouter::route(args);
        assert_eq!(cmd.name(), "ConfigExampleCommand");
    }

    #[test]
    fn test_route_harvest_default() {
        let cmd = CommandRouter::route(Args::default());
        assert_eq!(cmd.name(), "HarvestCommand");
    }

    #[tokio::test]
    async fn test_harvest_without_input_fails_early() {
        let cmd = CommandRouter::route(Args::default());
        let err = cmd.execute().await.unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn test_config_example_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.toml");

        let mut args = Args::default();
        args.config_example = Some(path.clone());
        CommandRouter::route(args).execute().await.unwrap();

        assert!(path.exists());
    }
}
