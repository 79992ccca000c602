use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use logkeep::cli::{
    handle_config_command, handle_init_command, handle_list_command, handle_purge_command,
    handle_run_command, handle_slots_command, handle_toggle_command, ConfigCommands,
};
use logkeep::config::{LogkeepPaths, Settings};
use logkeep::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "logkeep",
    version,
    about = "Rolling numbered backups of log files",
    long_about = "logkeep keeps a rolling set of numbered backups of the log files \
                  in a folder. Slot 1 always holds the newest copy; older copies \
                  move up a slot on every backup until they fall off the end."
)]
struct Cli {
    /// Show progress messages on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up every enabled log
    Run {
        /// Extra folder to scan for logs (repeatable)
        #[arg(short, long = "folder")]
        folders: Vec<PathBuf>,
    },

    /// List known logs and their backup state
    #[command(alias = "ls")]
    List {
        /// Extra folder to scan for logs (repeatable)
        #[arg(short, long = "folder")]
        folders: Vec<PathBuf>,

        /// Also print the enabled and disabled lists
        #[arg(long)]
        lists: bool,
    },

    /// Enable backups for logs
    Enable {
        /// Log names, without extension
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Disable backups for logs
    Disable {
        /// Log names, without extension
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show the backups of one log
    Slots {
        /// Log name, without extension
        name: String,
    },

    /// Delete every backup
    Purge {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Create the configuration folder and default settings
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = LogkeepPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Run { folders }) => {
            handle_run_command(&paths, &settings, &folders)?;
        }
        Some(Commands::List { folders, lists }) => {
            handle_list_command(&paths, &settings, &folders, lists)?;
        }
        Some(Commands::Enable { names }) => {
            handle_toggle_command(&paths, &settings, &names, true)?;
        }
        Some(Commands::Disable { names }) => {
            handle_toggle_command(&paths, &settings, &names, false)?;
        }
        Some(Commands::Slots { name }) => {
            handle_slots_command(&paths, &settings, &name)?;
        }
        Some(Commands::Purge { force }) => {
            handle_purge_command(&paths, &settings, force)?;
        }
        Some(Commands::Config(cmd)) => {
            handle_config_command(&paths, &mut settings, cmd)?;
        }
        Some(Commands::Init) => {
            handle_init_command(&paths, &settings)?;
        }
        None => {
            println!("logkeep - rolling backups of log files");
            println!();
            println!("Run 'logkeep --help' for usage information.");
            if paths.is_initialized() {
                println!("Run 'logkeep run' to back up the logs folder.");
            } else {
                println!("Run 'logkeep init' to get started.");
            }
        }
    }

    Ok(())
}
