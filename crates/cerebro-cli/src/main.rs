use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use cerebro_core::config_file;
use cerebro_core::{
    ApiClient, Cerebro, FileStore, HistoryQuery, KeyValueStore, Settings, ambient_preference,
};

mod output;

use output::ColorMode;

/// Cerebro - AI-assisted web search from the command line
#[derive(Parser, Debug)]
#[command(name = "cerebro", version, about, long_about = None)]
struct Cli {
    /// Base URL of the Cerebro service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Directory holding the saved session and theme
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,

        /// Password (default: $CEREBRO_PASSWORD, else read from stdin)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Password (default: $CEREBRO_PASSWORD, else read from stdin)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Ask a question
    Search {
        /// Query text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List past queries
    History {
        /// Look back this many days
        #[arg(long)]
        days: Option<u32>,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show or toggle the color theme preference
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },

    /// Show session, server and storage details
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
}

/// Everything a subcommand needs.
struct Context {
    client: Cerebro,
    api: ApiClient,
    settings: Settings,
    storage_dir: PathBuf,
    color: ColorMode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let color = ColorMode(!cli.no_color);
    if let Err(e) = run(cli).await {
        output::print_error(&mut io::stderr(), &e.to_string(), color)?;
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // CLI flags > env vars > config file > defaults
    let settings = Settings::from_file(&config_file::load_config())
        .apply_env()
        .apply_overrides(cli.api_url, cli.timeout, cli.data_dir);
    let storage_dir = match settings.storage_dir.clone() {
        Some(dir) => dir,
        None => FileStore::default_dir()?,
    };
    tracing::debug!(
        base_url = %settings.base_url,
        storage = %storage_dir.display(),
        "resolved settings"
    );
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(storage_dir.clone()));
    let client = Cerebro::restore(store, ambient_preference())
        .with_history_defaults(settings.history_days, settings.page_size);
    let api = ApiClient::http(settings.base_url.clone(), settings.timeout);

    let mut ctx = Context {
        client,
        api,
        settings,
        storage_dir,
        color: ColorMode(!cli.no_color),
    };

    match cli.command {
        Command::Login { username, password } => login(&mut ctx, &username, password).await,
        Command::Signup {
            username,
            email,
            password,
        } => signup(&mut ctx, &username, &email, password).await,
        Command::Logout => logout(&mut ctx),
        Command::Search { query } => search(&mut ctx, &query.join(" ")).await,
        Command::History {
            days,
            page,
            page_size,
        } => history(&mut ctx, days, page, page_size).await,
        Command::Theme { action } => theme(&mut ctx, action),
        Command::Status => status(&ctx),
    }
}

async fn login(ctx: &mut Context, username: &str, password: Option<String>) -> anyhow::Result<()> {
    if ctx.client.is_authenticated() {
        anyhow::bail!("Already logged in. Run `cerebro logout` first.");
    }
    let password = resolve_password(password)?;

    let spinner = spinner(format!("Logging in as {username}..."));
    let result = ctx.client.login(&ctx.api, username, &password).await;
    spinner.finish_and_clear();
    result?;

    output::print_success(
        &mut io::stdout(),
        &format!("Logged in as {username}."),
        ctx.color,
    )?;
    Ok(())
}

async fn signup(
    ctx: &mut Context,
    username: &str,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    if ctx.client.is_authenticated() {
        anyhow::bail!("Already logged in. Run `cerebro logout` first.");
    }
    ctx.client.show_signup()?;
    let password = resolve_password(password)?;

    let spinner = spinner(format!("Creating account {username}..."));
    let result = ctx.client.signup(&ctx.api, username, email, &password).await;
    spinner.finish_and_clear();
    result?;

    let message = ctx.client.notice().unwrap_or("Signup successful!").to_string();
    output::print_success(&mut io::stdout(), &message, ctx.color)?;
    Ok(())
}

fn logout(ctx: &mut Context) -> anyhow::Result<()> {
    let was_logged_in = ctx.client.is_authenticated();
    ctx.client.logout();
    let message = if was_logged_in {
        "Logged out."
    } else {
        "Not logged in."
    };
    output::print_success(&mut io::stdout(), message, ctx.color)?;
    Ok(())
}

async fn search(ctx: &mut Context, query: &str) -> anyhow::Result<()> {
    require_login(ctx)?;
    if query.trim().is_empty() {
        anyhow::bail!("Nothing to search for.");
    }

    let spinner = spinner("Searching...".to_string());
    let result = ctx.client.search(&ctx.api, query).await;
    spinner.finish_and_clear();

    let Some(result) = result? else {
        return Ok(());
    };
    output::print_search_result(&mut io::stdout(), query, result, ctx.color)?;
    Ok(())
}

async fn history(
    ctx: &mut Context,
    days: Option<u32>,
    page: u32,
    page_size: Option<u32>,
) -> anyhow::Result<()> {
    require_login(ctx)?;
    let query = HistoryQuery {
        days: days.unwrap_or(ctx.settings.history_days),
        page: page.max(1),
        page_size: page_size.unwrap_or(ctx.settings.page_size).max(1),
    };

    let spinner = spinner("Fetching history...".to_string());
    let result = ctx
        .client
        .fetch_history(&ctx.api, query.days, query.page, query.page_size)
        .await;
    spinner.finish_and_clear();

    let entries = result?;
    output::print_history(&mut io::stdout(), query, entries, ctx.color)?;
    Ok(())
}

fn theme(ctx: &mut Context, action: ThemeAction) -> anyhow::Result<()> {
    if action == ThemeAction::Toggle {
        ctx.client.toggle_theme();
    }
    writeln!(io::stdout(), "{}", ctx.client.theme())?;
    Ok(())
}

fn status(ctx: &Context) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let session = if ctx.client.is_authenticated() {
        match ctx.client.user() {
            Some(user) => format!("logged in as {}", user.username),
            None => "logged in".to_string(),
        }
    } else {
        "logged out".to_string()
    };
    let timeout = ctx
        .settings
        .timeout
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "default".to_string());

    output::print_field(&mut out, "session", &session, ctx.color)?;
    output::print_field(&mut out, "server", &ctx.settings.base_url, ctx.color)?;
    output::print_field(&mut out, "timeout", &timeout, ctx.color)?;
    output::print_field(&mut out, "theme", ctx.client.theme().as_str(), ctx.color)?;
    output::print_field(
        &mut out,
        "storage",
        &ctx.storage_dir.display().to_string(),
        ctx.color,
    )?;
    Ok(())
}

fn require_login(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.client.is_authenticated() {
        anyhow::bail!("Not logged in. Run `cerebro login` first.");
    }
    Ok(())
}

/// Flag, then `$CEREBRO_PASSWORD`, then one line from stdin.
fn resolve_password(flag: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }
    if let Ok(password) = std::env::var("CEREBRO_PASSWORD")
        && !password.is_empty()
    {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn spinner(message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let bar = ProgressBar::new_spinner().with_style(style).with_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_joins_words() {
        let cli = Cli::try_parse_from(["cerebro", "search", "rust", "ownership"]).unwrap();
        match cli.command {
            Command::Search { query } => assert_eq!(query.join(" "), "rust ownership"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_needs_a_query() {
        assert!(Cli::try_parse_from(["cerebro", "search"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cerebro",
            "history",
            "--days",
            "30",
            "--api-url",
            "http://example:9000",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://example:9000"));
        assert!(cli.no_color);
        match cli.command {
            Command::History {
                days,
                page,
                page_size,
            } => {
                assert_eq!(days, Some(30));
                assert_eq!(page, 1);
                assert_eq!(page_size, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn theme_defaults_to_show() {
        let cli = Cli::try_parse_from(["cerebro", "theme"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Theme {
                action: ThemeAction::Show
            }
        ));
        let cli = Cli::try_parse_from(["cerebro", "theme", "toggle"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Theme {
                action: ThemeAction::Toggle
            }
        ));
    }

    #[test]
    fn login_requires_username() {
        assert!(Cli::try_parse_from(["cerebro", "login"]).is_err());
        let cli = Cli::try_parse_from(["cerebro", "login", "-u", "alice", "-p", "pw"]).unwrap();
        assert!(matches!(cli.command, Command::Login { password: Some(_), .. }));
    }

    #[test]
    fn flag_password_wins() {
        assert_eq!(resolve_password(Some("flag".into())).unwrap(), "flag");
    }
}
