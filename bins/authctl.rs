use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use configs::AppConfig;
use service::session::{StorageKeys, SystemClock};
use service::storage::JsonMapStore;
use service::validation::{format_phone, password_strength, LoginForm, RegistrationForm, ValidationErrors};
use service::{AuthClient, SessionStore};

const CLI_FILTER: &str = "warn,service=warn";

#[derive(Parser, Debug)]
#[command(name = "authctl", version, about = "Sign in to the finance API and manage the local session")]
struct Cli {
    /// TOML config file; defaults to CONFIG_PATH or ./config.toml
    #[arg(long, global = true)]
    config: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange email and password for a session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTHCTL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (log in afterwards)
    Register(RegisterArgs),
    /// Re-read the profile of the signed-in user
    Me,
    /// Show whether a valid session is stored
    Status,
    /// End the session
    Logout,
    /// Mask a phone number as (DD) DDDDD-DDDD
    FormatPhone { input: String },
    /// Score a password from 0 to 5
    Strength { password: String },
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, env = "AUTHCTL_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, env = "AUTHCTL_PASSWORD_CONFIRMATION", hide_env_values = true)]
    confirm_password: String,
    #[arg(long)]
    accept_terms: bool,
}

fn load_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut cfg = match path {
        Some(p) => configs::load_from_file(p).with_context(|| format!("reading config {p}"))?,
        None => configs::load_default()?,
    };
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

async fn open_client(cfg: &AppConfig) -> anyhow::Result<AuthClient> {
    let storage = JsonMapStore::<String, String>::new(&cfg.session.storage_path).await?;
    let store = SessionStore::load(storage, Arc::new(SystemClock), StorageKeys::from(&cfg.session)).await?;
    Ok(AuthClient::new(&cfg.api, Arc::new(store))?)
}

fn print_errors(errors: &ValidationErrors) {
    for (field, messages) in errors.iter() {
        for message in messages {
            eprintln!("{field}: {message}");
        }
    }
}

async fn run(cli: Cli, cfg: AppConfig) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::FormatPhone { input } => {
            println!("{}", format_phone(&input));
        }
        Command::Strength { password } => {
            let s = password_strength(&password);
            println!("{}/5 {}% {}", s.score, s.percent(), s.label());
        }
        Command::Login { email, password } => {
            let request = match LoginForm::new(email, password).into_request() {
                Ok(r) => r,
                Err(errors) => {
                    print_errors(&errors);
                    return Ok(ExitCode::from(2));
                }
            };
            let client = open_client(&cfg).await?;
            match client.login(&request).await {
                Ok(session) => {
                    let name = session.user.as_ref().map(|u| u.first_name.as_str()).unwrap_or("");
                    println!("Welcome, {name}!");
                }
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Register(args) => {
            let form = RegistrationForm {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                phone: format_phone(&args.phone),
                password: args.password,
                password_confirmation: args.confirm_password,
                accept_terms: args.accept_terms,
            };
            let request = match form.into_request() {
                Ok(r) => r,
                Err(errors) => {
                    print_errors(&errors);
                    return Ok(ExitCode::from(2));
                }
            };
            let client = open_client(&cfg).await?;
            match client.register(&request).await {
                Ok(user) => println!("Account created for {}. Log in to continue.", user.email),
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Me => {
            let client = open_client(&cfg).await?;
            match client.fetch_profile().await {
                Ok(user) => println!("{}", serde_json::to_string_pretty(&user)?),
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Status => {
            let client = open_client(&cfg).await?;
            let store = client.session();
            if store.is_valid().await? {
                let session = store.current_session().context("session vanished after validity check")?;
                let who = session.user.as_ref().map(|u| u.full_name()).unwrap_or_default();
                println!("signed in as {who}, {}s left", session.remaining_millis(now_millis()) / 1000);
            } else {
                println!("signed out");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Logout => {
            let client = open_client(&cfg).await?;
            if let Err(e) = client.logout().await {
                eprintln!("{e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("signed out");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn now_millis() -> i64 {
    use service::session::Clock;
    SystemClock.now_millis()
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    let cfg = load_config(cli.config.as_deref());
    let (json, filter) = match &cfg {
        Ok(c) => (cli.json_logs || c.logging.json, c.logging.filter.clone()),
        Err(_) => (cli.json_logs, None),
    };
    common::utils::logging::init_logging(json, Some(filter.as_deref().unwrap_or(CLI_FILTER)));

    let run_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "authctl", event = "panic", %run_id, message = %info, "unhandled panic occurred");
    }));

    let cfg = match cfg {
        Ok(c) => c,
        Err(e) => {
            error!(service = "authctl", event = "config_invalid", error = %e, "configuration rejected");
            eprintln!("configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    info!(service = "authctl", event = "start", %run_id, base_url = %cfg.api.base_url, "authctl starting");

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "authctl", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    rt.block_on(async move {
        match run(cli, cfg).await {
            Ok(code) => code,
            Err(e) => {
                error!(service = "authctl", event = "run_failed", error = %e, "command failed");
                eprintln!("{e:#}");
                ExitCode::FAILURE
            }
        }
    })
}
