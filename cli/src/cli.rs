//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Provision named compute instances and track them to completion
#[derive(Parser)]
#[command(
    name = "provctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Backend base URL (overrides server.url)
    #[arg(long, global = true, env = "PROVCTL_SERVER")]
    pub server: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a prefix, provision the instance and wait for the result
    Create(commands::create::CreateArgs),

    /// Check whether a prefix is free to use
    Validate(commands::validate::ValidateArgs),

    /// Follow a job submitted earlier until it finishes
    Watch(commands::watch::WatchArgs),

    /// Show the current status of a job
    Status(commands::status::StatusArgs),

    /// List created instances with their liveness
    List,

    /// Check whether an instance answers on the network
    Ping(commands::ping::PingArgs),

    /// Clear the server's instance cache
    ClearCache,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command
    /// fails outside the workflow's own failure handling.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            server,
            verbose: _,
            command,
        } = self;

        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes, server },
        };
        let app = || AppContext::new(&flags);

        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
            Command::Create(args) => commands::create::run(&app()?, &args).await,
            Command::Validate(args) => commands::validate::run(&app()?, &args).await,
            Command::Watch(args) => commands::watch::run(&app()?, &args).await,
            Command::Status(args) => commands::status::run(&app()?, &args).await,
            Command::List => commands::list::run(&app()?).await,
            Command::Ping(args) => commands::ping::run(&app()?, &args).await,
            Command::ClearCache => commands::clear_cache::run(&app()?).await,
            Command::Config(cmd) => commands::config::run(&app()?, cmd),
        }
    }
}
