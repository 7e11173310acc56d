use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use latchkey_cli::OutputFormat;
use latchkey_cli::commands::{self, Locations};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "latchkey")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Detect login forms and autofill saved credentials",
    long_about = "Latchkey classifies form fields, scores likely login forms, matches saved \
                  credentials to sites and apps, and captures new logins from submitted forms."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Vault file (defaults to the user data directory)
    #[arg(long, global = true, env = "LATCHKEY_VAULT", value_name = "FILE")]
    vault: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "LATCHKEY_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the role assigned to every field of a page snapshot
    Classify {
        /// Page snapshot (JSON)
        #[arg(value_name = "PAGE")]
        page: PathBuf,
    },

    /// Score the login form candidates on a page snapshot
    Detect {
        /// Page snapshot (JSON)
        #[arg(value_name = "PAGE")]
        page: PathBuf,
    },

    /// Check whether two origins share credentials
    Match {
        /// URL or app identifier
        a: String,

        /// URL or app identifier
        b: String,
    },

    /// List saved logins that would be offered on a page
    Suggest {
        /// Page snapshot (JSON)
        #[arg(value_name = "PAGE")]
        page: PathBuf,
    },

    /// Save the login entered in a submitted page snapshot
    Save {
        /// Page snapshot with field values (JSON)
        #[arg(value_name = "PAGE")]
        page: PathBuf,
    },

    /// Search saved logins
    Search {
        /// Text to find in names, usernames and origins
        #[arg(short, long)]
        query: Option<String>,

        /// Only logins whose origin matches this URL or app
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Generate a random password
    Generate {
        /// Number of characters
        #[arg(short, long)]
        length: Option<usize>,

        /// Leave out uppercase letters
        #[arg(long)]
        no_uppercase: bool,

        /// Leave out lowercase letters
        #[arg(long)]
        no_lowercase: bool,

        /// Leave out digits
        #[arg(long)]
        no_numbers: bool,

        /// Leave out symbols
        #[arg(long)]
        no_symbols: bool,

        /// Allow look-alike characters such as 0/O and 1/l
        #[arg(long)]
        allow_similar: bool,
    },

    /// Rate the strength of a password
    Strength {
        /// Password to rate
        password: String,
    },

    /// Manage hosts that never get a save prompt
    NeverSave {
        /// Host or glob pattern to add (e.g. example.com, *.bank.example)
        host: Option<String>,

        /// Print the list
        #[arg(long)]
        list: bool,
    },

    /// Show logins saved here that a companion app has not imported yet
    Imports {
        /// Empty the queue after printing
        #[arg(long)]
        clear: bool,
    },

    /// Answer newline-delimited JSON requests on stdin
    Serve,

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  \
        bash, zsh, fish, powershell, elvish\n\n\
        INSTALLATION:\n  \
        bash:  latchkey completion --shell bash >> ~/.bashrc\n  \
        zsh:   latchkey completion --shell zsh >> ~/.zshrc\n  \
        fish:  latchkey completion --shell fish > ~/.config/fish/completions/latchkey.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = cli.format;
    let locations = || Locations::resolve(cli.vault.clone(), cli.config.clone());

    match cli.command {
        Commands::Classify { ref page } => commands::classify::execute(page, format),
        Commands::Detect { ref page } => {
            let settings = locations()?.load_settings()?;
            commands::detect::execute(page, &settings, format)
        }
        Commands::Match { ref a, ref b } => commands::matching::execute(a, b, format),
        Commands::Suggest { ref page } => {
            let locations = locations()?;
            let settings = locations.load_settings()?;
            let store = locations.open_store()?;
            commands::suggest::execute(page, &store, &settings, format)
        }
        Commands::Save { ref page } => {
            let locations = locations()?;
            let settings = locations.load_settings()?;
            let mut store = locations.open_store()?;
            commands::save::execute(page, &mut store, &settings, format)
        }
        Commands::Search { ref query, ref url } => {
            let locations = locations()?;
            let settings = locations.load_settings()?;
            let store = locations.open_store()?;
            commands::search::execute(&store, &settings, query.as_deref(), url.as_deref(), format)
        }
        Commands::Generate {
            length,
            no_uppercase,
            no_lowercase,
            no_numbers,
            no_symbols,
            allow_similar,
        } => {
            let settings = locations()?.load_settings()?;
            let args = commands::generate::GenerateArgs {
                length,
                no_uppercase,
                no_lowercase,
                no_numbers,
                no_symbols,
                allow_similar,
            };
            commands::generate::execute(&args, &settings.generator, format)
        }
        Commands::Strength { ref password } => commands::strength::execute(password, format),
        Commands::NeverSave { ref host, list } => {
            let locations = locations()?;
            commands::never_save::execute(&locations.settings, host.as_deref(), list, format)
        }
        Commands::Imports { clear } => {
            let mut store = locations()?.open_store()?;
            commands::imports::execute(&mut store, clear, format)
        }
        Commands::Serve => {
            let locations = locations()?;
            let mut settings = locations.load_settings()?;
            let mut store = locations.open_store()?;
            commands::serve::execute(
                io::stdin().lock(),
                io::stdout().lock(),
                &mut store,
                &mut settings,
                Some(&locations.settings),
            )
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            commands::completion::execute(shell, &mut cmd)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("latchkey=debug,latchkey_cli=debug,latchkey_core=debug,latchkey_detectors=debug")
    } else {
        EnvFilter::new("latchkey=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
