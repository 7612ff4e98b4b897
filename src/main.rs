//! ucm-services: Cisco UCM Control Center service monitoring.
//!
//! `agent` queries the appliance and prints agent output, `check` and
//! `discover` evaluate that output against the configured rules.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ucm_services::analyzer::rules::{self, discover_items};
use ucm_services::collector::service_status::{agent_output, fetch_service_status};
use ucm_services::collector::soap::{TlsVerification, UcmSession};
use ucm_services::config::Config;
use ucm_services::credentials::{DefaultResolver, SecretRef};
use ucm_services::report;
use ucm_services::section::parse_agent_output;
use ucm_services::types::{CheckOutcome, Section, Severity};

#[derive(Parser)]
#[command(name = "ucm-services")]
#[command(about = "Cisco UCM service monitoring: special agent and checks", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output (debug logging on stderr)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the Control Center Services API and print agent output
    Agent(AgentArgs),

    /// Run discovery and all checks on agent output
    Check(CheckArgs),

    /// Print the discovered service items, one per line
    Discover(InputArgs),
}

#[derive(Args)]
struct AgentArgs {
    /// Print the full error chain on failure
    #[arg(long)]
    debug: bool,

    /// Disable checking of the server's TLS certificate
    #[arg(long)]
    no_cert_check: bool,

    /// Connect to and verify the certificate against this name instead of HOST
    #[arg(long, conflicts_with = "no_cert_check")]
    cert_hostname: Option<String>,

    /// Network timeout in seconds, applied to each request (default 60)
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// HTTPS port (default 8443)
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Username for login
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Password for login
    #[arg(short = 's', long, conflicts_with_all = ["secret_env", "secret_file"])]
    secret: Option<String>,

    /// Read the password from this environment variable
    #[arg(long, conflicts_with = "secret_file")]
    secret_env: Option<String>,

    /// Read the password from the first line of this file
    #[arg(long)]
    secret_file: Option<PathBuf>,

    /// TOML config with a [connection] table; flags take precedence
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Host name or IP address of the UCM node
    #[arg(value_name = "HOST")]
    host_address: String,
}

#[derive(Args)]
struct InputArgs {
    /// TOML config with discovery, check and summary rules
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Agent output of one cluster node as NAME=PATH (repeatable)
    #[arg(long = "node", value_name = "NAME=PATH", value_parser = parse_node)]
    nodes: Vec<(String, PathBuf)>,

    /// Agent output file, `-` or nothing for stdin
    #[arg(conflicts_with = "nodes")]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct CheckArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Host name shown in the report
    #[arg(long)]
    host: Option<String>,

    /// Output JSON instead of the text report
    #[arg(long, conflicts_with = "brief")]
    json: bool,

    /// One `STATE - Service: summary` line per service instead of the report
    #[arg(long)]
    brief: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match &cli.command {
        Commands::Agent(args) => run_agent(args),
        Commands::Check(args) => run_check(args).unwrap_or_else(|e| {
            eprintln!("Error: {:#}", e);
            Severity::Unknown.exit_code()
        }),
        Commands::Discover(args) => match run_discover(args) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                Severity::Unknown.exit_code()
            }
        },
    };

    process::exit(code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_node(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got {:?}", raw)),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load {}", path.display())),
        None => Ok(Config::default()),
    }
}

// Agent: exit 0 on success, 1 with the error on stderr otherwise.
fn run_agent(args: &AgentArgs) -> i32 {
    match fetch_agent_output(args) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            0
        }
        Err(e) => {
            if args.debug {
                eprintln!("{:?}", e);
            } else {
                eprintln!("{}", e);
            }
            1
        }
    }
}

fn fetch_agent_output(args: &AgentArgs) -> Result<Vec<String>> {
    let mut connection = load_config(args.config.as_deref())?.connection;

    if let Some(user) = &args.user {
        connection.user = Some(user.clone());
    }
    if let Some(secret) = &args.secret {
        connection.secret = Some(SecretRef::Password(secret.clone()));
    } else if let Some(var) = &args.secret_env {
        connection.secret = Some(SecretRef::Env(var.clone()));
    } else if let Some(path) = &args.secret_file {
        connection.secret = Some(SecretRef::File(path.clone()));
    }
    if let Some(port) = args.port {
        connection.tcp_port = port;
    }
    if let Some(timeout) = args.timeout {
        connection.timeout = timeout;
    }
    if args.no_cert_check {
        connection.ssl = TlsVerification::Deactivated;
    } else if let Some(name) = &args.cert_hostname {
        connection.ssl = TlsVerification::CustomHostname(name.clone());
    }

    let settings = connection.settings(&args.host_address, &DefaultResolver)?;
    debug!("Connecting to {}:{} ({:?})", settings.target_host(), settings.port, settings.tls);

    let session = UcmSession::new(&settings)?;
    let services = fetch_service_status(&session)?;
    Ok(agent_output(&services))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn read_nodes(input: &InputArgs, host: &str) -> Result<Vec<(String, Option<Section>)>> {
    if input.nodes.is_empty() {
        let output = read_input(input.input.as_deref())?;
        return Ok(vec![(host.to_string(), parse_agent_output(&output))]);
    }

    input
        .nodes
        .iter()
        .map(|(name, path)| {
            let output = read_input(Some(path))?;
            Ok((name.clone(), parse_agent_output(&output)))
        })
        .collect()
}

fn run_check(args: &CheckArgs) -> Result<i32> {
    let start = Instant::now();
    let rules = load_config(args.input.config.as_deref())?.compile()?;

    let host = args.host.clone().unwrap_or_else(|| "localhost".to_string());
    let nodes = read_nodes(&args.input, &host)?;
    let node_names: Vec<String> = nodes.iter().map(|(name, _)| name.clone()).collect();

    let outcomes = rules::analyze(&rules, &nodes);
    let state = Severity::worst(outcomes.iter().map(CheckOutcome::state));
    info!("Overall state {}", state);

    if args.json {
        println!("{}", report::json::generate(&host, &node_names, &outcomes)?);
    } else if args.brief {
        for line in report::text::summary_lines(&outcomes) {
            println!("{}", line);
        }
    } else {
        let elapsed = start.elapsed().as_secs_f64();
        println!("{}", report::text::generate(&host, &node_names, &outcomes, elapsed));
    }

    Ok(state.exit_code())
}

fn run_discover(args: &InputArgs) -> Result<()> {
    let rules = load_config(args.config.as_deref())?.compile()?;
    let nodes = read_nodes(args, "localhost")?;
    for item in discover_items(&rules, &nodes) {
        println!("{}", item);
    }
    Ok(())
}
