//! EventForge - template event duplication
//!
//! Main entry point for the `eventforge` command-line tool and HTTP service.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use eventforge_api::utils::env::load_dotenv;
use eventforge_api::utils::logging::log_command_result;
use eventforge_api::{run_server, AppContext};
use eventforge_core::{DuplicationMode, DuplicationReport, InstancePlan, NameFormat};
use eventforge_domain::{
    Config, DuplicateInstance, Event, EventId, EventQuery, EventTimestamp, InstanceWindow,
};
use eventforge_infra::{config, init_tracing, LogFormat};

#[derive(Parser)]
#[command(name = "eventforge")]
#[command(about = "Duplicate template events across many dates", long_about = None)]
struct Cli {
    /// Path to a JSON or TOML config file (default: environment, then probed files)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the key fields of one event
    Show {
        #[arg(long)]
        event: EventId,
    },

    /// List events, optionally filtered
    List {
        /// Free-text search across the event text index
        #[arg(long)]
        search: Option<String>,

        /// Earliest start date
        #[arg(long)]
        from: Option<String>,

        /// Latest end date
        #[arg(long)]
        to: Option<String>,

        #[arg(long)]
        top: Option<u32>,

        #[arg(long)]
        skip: Option<u32>,
    },

    /// Create one copy of a template event per requested date
    #[command(group(ArgGroup::new("instances").required(true).args(["instance", "offset_minutes"])))]
    Duplicate {
        /// Template event id
        #[arg(long)]
        template: EventId,

        /// Instance as `START` or `START,END` (repeatable)
        #[arg(long, value_parser = parse_instance)]
        instance: Vec<DuplicateInstance>,

        /// Shift the template's own start and end by this many minutes (repeatable)
        #[arg(long, allow_negative_numbers = true)]
        offset_minutes: Vec<i64>,

        /// Name template, e.g. "${NAME} (${MM}/${DD})"
        #[arg(long)]
        name_format: Option<String>,

        /// clone or create
        #[arg(long, default_value = "clone")]
        mode: DuplicationMode,

        /// Plan the instances without creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Run the HTTP service
    Serve {
        /// Address to bind (default from config)
        #[arg(long)]
        bind: Option<IpAddr>,

        /// Port to listen on (default from config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv = load_dotenv();
    init_tracing(cli.log_format)?;
    dotenv.log();

    let config = load_config(cli.config)?;
    let ctx = Arc::new(AppContext::from_config(config)?);

    match cli.command {
        Command::Show { event } => show(&ctx, event).await?,
        Command::List { search, from, to, top, skip } => {
            let query = EventQuery { search, start_date_from: from, end_date_to: to, top, skip };
            list(&ctx, &query).await?;
        }
        Command::Duplicate {
            template,
            instance,
            offset_minutes,
            name_format,
            mode,
            dry_run,
        } => {
            let name_format = name_format.map(NameFormat::from);
            let instances = if offset_minutes.is_empty() {
                instance
            } else {
                shifted_instances(&ctx, template, &offset_minutes).await?
            };

            if dry_run {
                let plans =
                    ctx.duplication.preview(template, instances, name_format.as_ref()).await?;
                print_plans(&plans);
            } else {
                let start = Instant::now();
                let result = ctx
                    .duplication
                    .duplicate(template, instances, name_format.as_ref(), mode)
                    .await;
                log_command_result("cli::duplicate", start.elapsed(), &result);
                print_report(&result?);
            }
        }
        Command::Serve { bind, port } => {
            let ip = match bind {
                Some(ip) => ip,
                None => ctx.config.server.bind_address.parse().with_context(|| {
                    format!("invalid bind address '{}'", ctx.config.server.bind_address)
                })?,
            };
            let addr = SocketAddr::new(ip, port.unwrap_or(ctx.config.server.port));
            run_server(Arc::clone(&ctx), addr).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let loaded = match path {
        Some(path) => config::load_from_file(Some(path)),
        None => config::load(),
    };
    loaded.context("failed to load configuration")
}

/// Parse `START` or `START,END`.
fn parse_instance(raw: &str) -> Result<DuplicateInstance, String> {
    let parse = |value: &str| value.parse::<EventTimestamp>().map_err(|e| e.to_string());

    match raw.split_once(',') {
        Some((start, end)) => Ok(InstanceWindow::new(parse(start)?, Some(parse(end)?)).into()),
        None => Ok(DuplicateInstance::Start(parse(raw)?)),
    }
}

async fn shifted_instances(
    ctx: &AppContext,
    template_id: EventId,
    offsets: &[i64],
) -> anyhow::Result<Vec<DuplicateInstance>> {
    let template = ctx.duplication.get_event(template_id).await?;
    let instances = offsets
        .iter()
        .map(|minutes| InstanceWindow::shifted(&template, *minutes).map(DuplicateInstance::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(instances)
}

async fn show(ctx: &AppContext, event_id: EventId) -> anyhow::Result<()> {
    let start = Instant::now();
    let result = ctx.duplication.get_event(event_id).await;
    log_command_result("cli::show", start.elapsed(), &result);
    print_event_details(&result?);
    Ok(())
}

async fn list(ctx: &AppContext, query: &EventQuery) -> anyhow::Result<()> {
    let start = Instant::now();
    let result = ctx.duplication.list_events(query).await;
    log_command_result("cli::list", start.elapsed(), &result);

    print_event_rows(&result?);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_event_details(event: &Event) {
    println!("Id:        {}", event.id);
    println!("Name:      {}", event.name);
    println!("StartDate: {}", event.start_date);
    match &event.end_date {
        Some(end) => println!("EndDate:   {end}"),
        None => println!("EndDate:   -"),
    }
    if let Some(location) = event.extra.get("Location").and_then(|value| value.as_str()) {
        println!("Location:  {location}");
    }
    if let Some(url) = &event.url {
        println!("Url:       {url}");
    }
}

#[allow(clippy::print_stdout)]
fn print_event_rows(events: &[Event]) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }
    for event in events {
        println!("{:>10}  {}  {}", event.id, event.start_date, event.name);
    }
}

#[allow(clippy::print_stdout)]
fn print_plans(plans: &[InstancePlan]) {
    println!("Dry run: {} instance(s) planned, nothing created.", plans.len());
    for (index, plan) in plans.iter().enumerate() {
        let end = plan.end.map_or_else(|| "-".to_string(), |end| end.to_string());
        println!("  #{:<3} {}  ->  {}  {}", index + 1, plan.start, end, plan.name);
    }
}

#[allow(clippy::print_stdout)]
fn print_report(report: &DuplicationReport) {
    println!(
        "Template {}: created {} of {} event(s).",
        report.template_id,
        report.created.len(),
        report.requested()
    );
    for event in &report.created {
        println!("  ok     {:>10}  {}  {}", event.id, event.start_date, event.name);
    }
    for failure in &report.failures {
        println!("  failed #{:<3} {}  {}", failure.index + 1, failure.window.start, failure.error);
    }
}
