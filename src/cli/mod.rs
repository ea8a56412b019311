//! cmdtree CLI - command definition admin and shell launcher.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod admin;

use crate::repl::ShellConfig;

/// cmdtree - hierarchical command shell with tab completion
#[derive(Parser)]
#[command(name = "cmdtree")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// JSON file holding the command definitions
    #[arg(
        short,
        long,
        global = true,
        env = "CMDTREE_COMMANDS",
        default_value = "commands.json"
    )]
    commands: PathBuf,

    /// Increase log verbosity (-v info, -vv debug); logs go to stderr
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Shell {
        /// Prompt text
        #[arg(long, env = "CMDTREE_PROMPT", default_value = "> ")]
        prompt: String,
        /// Disable the colored prompt
        #[arg(long)]
        no_color: bool,
    },
    /// Add a command chain, creating every missing level
    Add {
        /// Command words, e.g. `ssl certificate add <IP>`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Remove a command and everything below it
    Remove {
        /// Command words; at least two
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// List every definition as `<Parent> <Name>`
    List,
    /// Set the description and help lines of a command
    Describe {
        /// Command words
        #[arg(required = true)]
        words: Vec<String>,
        /// Short description shown next to suggestions
        #[arg(short, long, default_value = "")]
        description: String,
        /// Help line; repeat for several
        #[arg(long = "help-line")]
        help_lines: Vec<String>,
    },
    /// Print the help lines of a command
    Help {
        /// Command words
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Complete a partial line as Tab would
    Complete {
        /// Buffer contents; a trailing space means the last word is done
        #[arg(default_value = "")]
        buffer: String,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let commands = cli.commands;
    let mut out = std::io::stdout();
    let result = match cli.command {
        None => crate::repl::run(ShellConfig::default().with_commands_path(commands)),
        Some(Commands::Shell { prompt, no_color }) => crate::repl::run(
            ShellConfig::default()
                .with_commands_path(commands)
                .with_prompt(prompt)
                .with_color(!no_color),
        ),
        Some(Commands::Add { words }) => admin::cmd_add(&commands, &words, &mut out),
        Some(Commands::Remove { words }) => admin::cmd_remove(&commands, &words, &mut out),
        Some(Commands::List) => admin::cmd_list(&commands, &mut out),
        Some(Commands::Describe {
            words,
            description,
            help_lines,
        }) => admin::cmd_describe(&commands, &words, &description, help_lines, &mut out),
        Some(Commands::Help { words }) => admin::cmd_help(&commands, &words, &mut out),
        Some(Commands::Complete { buffer }) => admin::cmd_complete(&commands, &buffer, &mut out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
