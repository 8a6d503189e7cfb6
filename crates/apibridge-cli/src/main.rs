//! apibridge CLI.
//!
//! Generates ASP.NET Web API controllers and HTTP clients from WCF/ASMX services.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing::debug;

use apibridge_compiler::shape::{ClientCall, HttpVerb, ServicePlan};
use apibridge_compiler::{CompileResult, Compiler, CompilerConfig, ServiceFailure};

mod ui;

#[derive(Parser)]
#[command(name = "apibridge", version)]
#[command(about = "apibridge - migrates WCF/ASMX services to Web API controllers and HTTP clients")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (JSON). Missing file means defaults.
    #[arg(short, long, global = true, default_value = "apibridge.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Source locations; each flag overrides the configuration file.
#[derive(Args)]
struct SourceArgs {
    /// Directory containing the service classes
    #[arg(short, long)]
    services: Option<PathBuf>,

    /// Directory containing the client contracts
    #[arg(long)]
    clients: Option<PathBuf>,

    /// Source language
    #[arg(short, long)]
    language: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate controllers and HTTP clients
    Generate {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output directory for controllers
        #[arg(long)]
        service_out: Option<PathBuf>,

        /// Output directory for HTTP clients
        #[arg(long)]
        client_out: Option<PathBuf>,
    },

    /// Plan everything and report problems without writing files
    Check {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Print the planned call shapes
    Plan {
        #[command(flatten)]
        sources: SourceArgs,

        /// Print the plans as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let mut config = CompilerConfig::load_or_default(&cli.config)?;
    debug!(path = %cli.config.display(), language = %config.language, "Loaded configuration");

    match cli.command {
        Commands::Generate {
            sources,
            service_out,
            client_out,
        } => {
            apply_sources(&mut config, sources);
            if let Some(dir) = service_out {
                config.service_out_dir = dir;
            }
            if let Some(dir) = client_out {
                config.client_out_dir = dir;
            }
            generate(config)?;
        }

        Commands::Check { sources } => {
            apply_sources(&mut config, sources);
            check(config)?;
        }

        Commands::Plan { sources, json } => {
            apply_sources(&mut config, sources);
            plan(config, json)?;
        }
    }

    Ok(())
}

fn setup_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let formatter = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry().with(formatter).with(filter).init();
}

fn apply_sources(config: &mut CompilerConfig, sources: SourceArgs) {
    if let Some(dir) = sources.services {
        config.service_dir = dir;
    }
    if let Some(dir) = sources.clients {
        config.client_dir = Some(dir);
    }
    if let Some(language) = sources.language {
        config.language = language;
    }
}

fn generate(config: CompilerConfig) -> miette::Result<()> {
    let start = Instant::now();
    ui::print_compact_header(env!("CARGO_PKG_VERSION"));

    let spinner = ui::spinner("Generating controllers and clients...");
    let result = Compiler::new(config).compile();
    spinner.finish_and_clear();
    let result = result?;

    ui::success(&format!(
        "{} services {} {} actions {} {} client methods",
        result.services,
        ui::symbols::DOT,
        result.procedures,
        ui::symbols::DOT,
        result.client_procedures
    ));
    for file in &result.files {
        ui::file_line(&file.display().to_string());
    }
    println!();

    report_problems(&result);
    ui::timing("Generated", start.elapsed().as_millis());
    Ok(())
}

fn check(config: CompilerConfig) -> miette::Result<()> {
    let spinner = ui::spinner("Planning services...");
    let result = Compiler::new(config).check();
    spinner.finish_and_clear();
    let result = result?;

    if result.is_clean() {
        ui::all_correlated();
        println!();
        println!(
            "    {} services {} {} actions {} {} client methods",
            result.services,
            ui::symbols::DOT,
            result.procedures,
            ui::symbols::DOT,
            result.client_procedures
        );
        return Ok(());
    }

    ui::problems_header();
    report_problems(&result);

    let problems = result.skipped.len() + result.failed_services.len() + result.unmatched_clients.len();
    Err(miette::miette!("{} problem(s) found", problems))
}

fn plan(config: CompilerConfig, json: bool) -> miette::Result<()> {
    let plan = Compiler::new(config).plan()?;

    if json {
        let text = serde_json::to_string_pretty(&plan.plans).into_diagnostic()?;
        println!("{text}");
        return Ok(());
    }

    for service in &plan.plans {
        print_service_plan(service);
    }
    report_failures(&plan.failed_services);
    for client in &plan.unmatched_clients {
        ui::warning(&format!("No service found for client contract '{client}'"));
    }
    Ok(())
}

fn print_service_plan(plan: &ServicePlan) {
    let skipped = plan.correlation_errors().count();
    ui::service_line(&plan.service, plan.controller.len(), plan.correlated(), skipped);

    for shape in &plan.controller {
        let signature = format!("{} {:?}/{:?}", shape.key, shape.request_kind, shape.response_kind);
        ui::route_line(ui::verb_label(shape.http_verb == HttpVerb::Read), &shape.route_template, &signature);
    }

    for call in plan.client.iter().filter(|c| c.outcome.is_err()) {
        print_skipped(call);
    }
    println!();
}

fn print_skipped(call: &ClientCall) {
    if let Err(err) = &call.outcome {
        ui::warning(&format!("skipped {}", err.caller));
        ui::dim(&format!("    {}", err.failure));
        if let Some(location) = &err.location {
            ui::dim(&format!("    at {location}"));
        }
    }
}

fn report_failures(failures: &[ServiceFailure]) {
    for failure in failures {
        ui::error(&format!("{}: {}", failure.service, failure.error));
    }
}

fn report_problems(result: &CompileResult) {
    for err in &result.skipped {
        ui::warning(&format!("{}: skipped {}", err.service, err.caller));
        ui::dim(&format!("    {}", err.failure));
        if let Some(location) = &err.location {
            ui::dim(&format!("    at {location}"));
        }
    }
    report_failures(&result.failed_services);
    for client in &result.unmatched_clients {
        ui::warning(&format!("No service found for client contract '{client}'"));
    }
}
