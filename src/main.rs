use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bitbucket_hook::cli::{self, ApplyArgs, InfoArgs};
use bitbucket_hook::config::{self, ConnectionOverrides, ENV_TOKEN, ENV_USER};
use bitbucket_hook::domain::StateKind;
use bitbucket_hook::ui;

#[derive(clap::Parser)]
#[command(
    name = "bitbucket-hook",
    version,
    about = "Inspect and configure repository and project hooks on Bitbucket Server"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Bitbucket Server URL")]
    url: Option<String>,

    #[arg(
        long,
        alias = "user",
        global = true,
        env = ENV_USER,
        help = "Username for basic authentication"
    )]
    username: Option<String>,

    #[arg(long, global = true, help = "Password for basic authentication")]
    password: Option<String>,

    #[arg(
        long,
        global = true,
        env = ENV_TOKEN,
        hide_env_values = true,
        help = "Access token for bearer authentication"
    )]
    token: Option<String>,

    #[arg(long, global = true, help = "Do not validate TLS certificates")]
    insecure: bool,

    #[arg(long, global = true, help = "Ignore proxy environment variables")]
    no_proxy: bool,

    #[arg(long, global = true, help = "Retries after a connection failure [default: 3]")]
    retries: Option<u32>,

    #[arg(long, global = true, help = "Seconds to wait between retries [default: 5]")]
    sleep: Option<u64>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a hook's settings and whether it is enabled
    Info {
        #[command(flatten)]
        hook: HookArgs,
    },
    /// Enable, disable or reset a hook to its project configuration
    Set {
        #[command(flatten)]
        hook: HookArgs,

        #[arg(long, default_value = "enabled", value_parser = parse_state, help = "enabled, disabled or inherited")]
        state: StateKind,

        #[arg(long, help = "Hook settings as a JSON object (required for enabled)")]
        settings: Option<String>,

        #[arg(long, alias = "dry-run", help = "Report the change without applying it")]
        check: bool,
    },
}

#[derive(clap::Args)]
struct HookArgs {
    #[arg(long, alias = "project", help = "Bitbucket project key")]
    project_key: String,

    #[arg(long, default_value = "", help = "Repository slug; omit for a project-level hook")]
    repository: String,

    #[arg(long, alias = "hid", help = "Hook key, e.g. com.example.plugin:hook")]
    hook_id: String,
}

fn parse_state(value: &str) -> std::result::Result<StateKind, String> {
    value.parse::<StateKind>().map_err(|e| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Environment credentials are already folded in by clap
    let overrides = ConnectionOverrides {
        url: args.url,
        username: args.username,
        password: args.password,
        token: args.token,
        insecure: args.insecure,
        no_proxy: args.no_proxy,
        retries: args.retries,
        sleep: args.sleep,
    };
    let connection = config::load_config(args.config.as_deref())?
        .merge(overrides)
        .connection()?;
    let controller = cli::build_controller(connection)?;

    match args.command {
        Command::Info { hook } => {
            let report = cli::run_info(
                &controller,
                &InfoArgs {
                    project_key: hook.project_key,
                    repository: hook.repository,
                    hook_id: hook.hook_id,
                },
            )?;
            ui::print_report(&report)?;
        }
        Command::Set {
            hook,
            state,
            settings,
            check,
        } => {
            if check {
                ui::display_status("Check mode: nothing will be sent to the server");
            }
            let report = cli::run_apply(
                &controller,
                &ApplyArgs {
                    project_key: hook.project_key,
                    repository: hook.repository,
                    hook_id: hook.hook_id,
                    state,
                    settings,
                    check_mode: check,
                },
            )?;
            ui::display_success(&ui::format_change_summary(
                &report.state,
                &report.hook_id,
                check,
            ));
            ui::print_report(&report)?;
        }
    }

    Ok(())
}
