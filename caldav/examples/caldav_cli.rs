// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! CalDAV calendar collection tool.
//!
//! A standalone CLI example for exercising the calendar operations against a
//! real server. It doubles as example code for the `CalendarClient` API.

use std::error::Error;
use std::io::Write as _;

use clap::{Parser, Subcommand};
use colored::Colorize as _;
use sabredav_caldav::{
    AuthMethod, CalDavConfig, CalDavError, CalendarClient, Privilege, ShareRequest, ShareeType,
};
use tracing_subscriber::EnvFilter;

/// CalDAV calendar collection tool.
#[derive(Parser)]
#[command(name = "caldav_cli")]
#[command(about = "CalDAV calendar collection tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Calendar collection URL
    #[arg(long)]
    url: Option<String>,
    /// Principal URL, used to discover the calendar home
    #[arg(long)]
    principal: Option<String>,
    /// Calendar name inside the discovered home
    #[arg(long)]
    calendar: Option<String>,
    /// Username for basic auth
    #[arg(long)]
    username: Option<String>,
    /// Password for basic auth
    #[arg(long)]
    password: Option<String>,
    /// Bearer token for OAuth
    #[arg(long)]
    token: Option<String>,
    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve the calendar home of the principal
    Home,
    /// Show display name, sync token and ctag
    Info,
    /// Create the calendar collection
    Create {
        /// Display name
        name: String,
        /// Calendar description
        #[arg(long)]
        description: Option<String>,
    },
    /// Change display name and/or description
    Update {
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete the calendar collection
    Delete,
    /// Share the calendar or revoke shares
    Share {
        /// Addresses to share with
        #[arg(long)]
        add: Vec<String>,
        /// Addresses to revoke
        #[arg(long)]
        remove: Vec<String>,
        /// Invitation summary
        #[arg(long)]
        summary: Option<String>,
        /// Common name shown to sharees
        #[arg(long)]
        common_name: Option<String>,
        /// Access level: read or read-write
        #[arg(long, default_value = "read-write")]
        privilege: Privilege,
        /// Sharee address type
        #[arg(long = "type", default_value = "email")]
        sharee_type: ShareeType,
    },
    /// List the organizer and sharees
    Sharees,
    /// List resources changed since a sync token
    Changes {
        /// Sync token from a previous info or changes call
        token: String,
    },
}

impl Cli {
    fn build_config(&self, url: String) -> CalDavConfig {
        let username = self
            .username
            .clone()
            .or_else(|| std::env::var("CALDAV_USERNAME").ok());

        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("CALDAV_PASSWORD").ok());

        let token = self
            .token
            .clone()
            .or_else(|| std::env::var("CALDAV_TOKEN").ok());

        let auth = if let Some(token) = token {
            AuthMethod::Bearer { token }
        } else if let (Some(username), Some(password)) = (username, password) {
            AuthMethod::Basic { username, password }
        } else {
            AuthMethod::None
        };

        CalDavConfig {
            url,
            auth,
            timeout_secs: self.timeout,
            ..Default::default()
        }
    }

    fn principal_config(&self) -> Result<CalDavConfig, String> {
        let url = self
            .principal
            .clone()
            .or_else(|| std::env::var("CALDAV_PRINCIPAL_URL").ok())
            .ok_or_else(|| {
                "principal URL must be provided via --principal or CALDAV_PRINCIPAL_URL env var"
                    .to_string()
            })?;
        Ok(self.build_config(url))
    }

    async fn calendar_client(&self) -> Result<CalendarClient, Box<dyn Error>> {
        if let Some(url) = self.url.clone().or_else(|| std::env::var("CALDAV_URL").ok()) {
            return Ok(CalendarClient::new(&self.build_config(url))?);
        }

        let calendar = self
            .calendar
            .clone()
            .or_else(|| std::env::var("CALDAV_CALENDAR").ok())
            .ok_or_else(|| {
                "either --url/CALDAV_URL or --principal with --calendar must be provided"
                    .to_string()
            })?;
        let principal = self.principal_config()?;
        Ok(CalendarClient::discover(&principal, &calendar).await?)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn ok(message: &str) {
    println!("{} {message}", "✓".green());
}

async fn cmd_home(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let home = CalendarClient::resolve_home_url(&cli.principal_config()?).await?;
    if cli.json {
        return print_json(&home);
    }
    println!("Calendar home: {home}");
    Ok(())
}

async fn cmd_info(cli: &Cli, client: &CalendarClient) -> Result<(), Box<dyn Error>> {
    let info = client.info().await?;
    if cli.json {
        return print_json(&info);
    }

    println!("{:<12} {}", "Name:".bold(), info.display_name);
    println!("{:<12} {}", "URL:".bold(), info.url);
    println!("{:<12} {}", "Sync token:".bold(), info.sync_token);
    println!("{:<12} {}", "CTag:".bold(), info.ctag);
    Ok(())
}

async fn cmd_create(
    cli: &Cli,
    client: &CalendarClient,
    name: &str,
    description: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let info = client.create(name, description).await?;
    if cli.json {
        return print_json(&info);
    }
    ok(&format!("Created {}", info.url));
    Ok(())
}

async fn cmd_sharees(cli: &Cli, client: &CalendarClient) -> Result<(), Box<dyn Error>> {
    let sharees = client.fetch_sharees().await?;
    if cli.json {
        return print_json(&sharees);
    }

    println!("Organizer: {}", sharees.organizer.href);
    if sharees.sharees.is_empty() {
        println!("No sharees");
        return Ok(());
    }

    println!("{:-<80}", "");
    println!("{:<40} {:<12} {:<10}", "Sharee", "Access", "Status");
    println!("{:-<80}", "");
    for sharee in &sharees.sharees {
        let status = match sharee.status {
            Some(_) => "accepted".green(),
            None => "pending".yellow(),
        };
        let name = sharee.common_name.as_deref().unwrap_or(&sharee.href);
        println!("{name:<40} {:<12} {status}", sharee.access);
    }
    Ok(())
}

async fn cmd_changes(
    cli: &Cli,
    client: &CalendarClient,
    token: &str,
) -> Result<(), Box<dyn Error>> {
    let changes = client.fetch_changes(token).await?;
    if cli.json {
        return print_json(&changes);
    }

    for change in &changes.changes {
        println!("{} {:<50} {}", "M".yellow(), change.uri, change.etag.as_str());
    }
    for uri in &changes.deletions {
        println!("{} {uri}", "D".red());
    }
    println!("\nNext sync token: {}", changes.sync_token);
    Ok(())
}

async fn cmd_share(client: &CalendarClient, command: &Commands) -> Result<(), Box<dyn Error>> {
    let Commands::Share {
        add,
        remove,
        summary,
        common_name,
        privilege,
        sharee_type,
    } = command
    else {
        return Err("not a share command".into());
    };

    let mut request = ShareRequest::new()
        .privilege(*privilege)
        .sharee_type(sharee_type.clone());
    for address in add {
        request = request.add(address);
    }
    for address in remove {
        request = request.remove(address);
    }
    if let Some(summary) = summary {
        request = request.summary(summary);
    }
    if let Some(common_name) = common_name {
        request = request.common_name(common_name);
    }

    client.share(&request).await?;
    ok("Sharing updated");
    Ok(())
}

async fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Commands::Home => cmd_home(cli).await,
        Commands::Info => cmd_info(cli, &cli.calendar_client().await?).await,
        Commands::Create { name, description } => {
            let client = cli.calendar_client().await?;
            cmd_create(cli, &client, name, description.as_deref()).await
        }
        Commands::Update { name, description } => {
            let client = cli.calendar_client().await?;
            client
                .update(name.as_deref(), description.as_deref())
                .await?;
            ok("Calendar updated");
            Ok(())
        }
        Commands::Delete => {
            cli.calendar_client().await?.delete().await?;
            ok("Calendar deleted");
            Ok(())
        }
        command @ Commands::Share { .. } => {
            cmd_share(&cli.calendar_client().await?, command).await
        }
        Commands::Sharees => cmd_sharees(cli, &cli.calendar_client().await?).await,
        Commands::Changes { token } => {
            cmd_changes(cli, &cli.calendar_client().await?, token).await
        }
    }
}

/// Format error for user-friendly display.
fn format_error(err: &(dyn Error + 'static)) -> String {
    let prefix = "Error:".red().bold();
    match err.downcast_ref::<CalDavError>() {
        Some(CalDavError::Forbidden) => format!("{prefix} Access denied"),
        Some(CalDavError::NotFound) => format!("{prefix} Calendar not found"),
        Some(CalDavError::Conflict) => {
            format!("{prefix} Conflict - parent collection missing or calendar exists")
        }
        Some(CalDavError::PreconditionFailed) => {
            format!("{prefix} Precondition failed - calendar was modified by another client")
        }
        Some(CalDavError::Http(_)) => {
            format!("{prefix} Network error - check server URL and connection")
        }
        _ => format!("{prefix} {err}"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Priority: .env.local (highest) -> .env -> existing environment variables (lowest)
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;

    if let Err(e) = runtime.block_on(run(&cli)) {
        std::io::stdout().flush().ok();
        eprintln!("{}", format_error(e.as_ref()));
        std::process::exit(1);
    }

    Ok(())
}
