//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run CLI/UI.
//! No business logic here; dispatch rules live in the use cases.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use member_mailer::adapters::directory::{JsonFileDirectory, RestDirectory, UnconfiguredDirectory};
use member_mailer::adapters::mail::{DryRunMailer, GraphCredentials, GraphMailer};
use member_mailer::adapters::request::{load_addresses, load_request};
use member_mailer::adapters::ui::banner::{print_error, print_outcome};
use member_mailer::adapters::ui::progress::with_spinner;
use member_mailer::adapters::ui::tui::TuiInputPort;
use member_mailer::domain::{DispatchOutcome, EmailAddress};
use member_mailer::ports::{InputPort, MailProvider, MemberDirectory};
use member_mailer::shared::config::AppConfig;
use member_mailer::usecases::{
    AudienceResolver, BatchDispatcher, DispatchService, MessageRenderer, RenderOptions,
    TemplateAudience,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit code when the call succeeded but some batches were not delivered.
const EXIT_PARTIAL: i32 = 2;

#[derive(Parser)]
#[command(name = "member-mailer", version, about = "Send announcements to association members")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive compose and send (default).
    Compose,
    /// Send a request document (JSON, as posted by the portal mail screen).
    Send {
        #[arg(long)]
        request: PathBuf,
        /// Extra explicit addresses from a CSV file.
        #[arg(long)]
        recipients_csv: Option<PathBuf>,
        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Render a message to HTML without sending.
    Preview {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body_file: PathBuf,
        /// Non-member footer (booking confirmations).
        #[arg(long)]
        external: bool,
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found"),
    }

    let cli = Cli::parse();
    let cfg = AppConfig::load()?;

    match cli.command.unwrap_or(Command::Compose) {
        Command::Preview {
            subject,
            body_file,
            external,
            out,
        } => {
            let body = tokio::fs::read_to_string(&body_file).await?;
            let options = RenderOptions {
                audience: if external {
                    TemplateAudience::External
                } else {
                    TemplateAudience::Members
                },
                preview: true,
            };
            let rendered = MessageRenderer::new(options).render(&subject, &body);
            match out {
                Some(path) => {
                    tokio::fs::write(&path, rendered.html).await?;
                    info!(path = %path.display(), "preview written");
                }
                None => println!("{}", rendered.html),
            }
        }
        Command::Send {
            request,
            recipients_csv,
            json,
        } => {
            let service = build_service(&cfg)?;
            let mut request = load_request(&request).await?;
            if let Some(csv_path) = recipients_csv {
                let extra = load_addresses(&csv_path)?;
                info!(count = extra.len(), path = %csv_path.display(), "imported addresses");
                request.explicit_addresses.extend(extra);
            }

            match with_spinner("Sending announcement", service.send(&request)).await {
                Ok(outcome) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&outcome)?);
                    } else {
                        print_outcome(&outcome);
                    }
                    exit_for(&outcome);
                }
                Err(e) => {
                    error!(error = %e, "dispatch failed");
                    print_error(&e.to_string());
                    std::process::exit(1);
                }
            }
        }
        Command::Compose => {
            member_mailer::adapters::ui::init_ui();
            let service = Arc::new(build_service(&cfg)?);
            let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(service));

            match input_port.run().await {
                Ok(Some(outcome)) => {
                    print_outcome(&outcome);
                    exit_for(&outcome);
                }
                Ok(None) => info!("cancelled; nothing sent"),
                Err(e) => {
                    error!(error = %e, "dispatch failed");
                    print_error(&e.to_string());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn exit_for(outcome: &DispatchOutcome) {
    if !outcome.overall_succeeded {
        std::process::exit(EXIT_PARTIAL);
    }
}

/// Pick adapters from config and assemble the dispatch service.
fn build_service(cfg: &AppConfig) -> anyhow::Result<DispatchService> {
    let sender_raw = cfg.sender_address_or_default();
    let Some(sender) = EmailAddress::parse(&sender_raw) else {
        anyhow::bail!("MAILER_SENDER_ADDRESS is not a valid address: {}", sender_raw);
    };
    let timeout = cfg.http_timeout();

    let directory: Arc<dyn MemberDirectory> = if cfg.is_directory_configured() {
        info!("member directory: REST");
        Arc::new(RestDirectory::new(
            cfg.directory_url.clone().unwrap_or_default(),
            cfg.directory_key.clone().unwrap_or_default(),
            timeout,
        )?)
    } else if let Some(path) = cfg.members_file.as_deref() {
        info!(path, "member directory: JSON file");
        Arc::new(JsonFileDirectory::new(path))
    } else {
        warn!("no member directory configured; only explicit addresses can be resolved");
        Arc::new(UnconfiguredDirectory)
    };

    let provider: Arc<dyn MailProvider> = if cfg.is_graph_configured() {
        info!(sender = %sender, "mail provider: Microsoft Graph");
        Arc::new(GraphMailer::new(
            GraphCredentials {
                tenant_id: cfg.graph_tenant_id.clone().unwrap_or_default(),
                client_id: cfg.graph_client_id.clone().unwrap_or_default(),
                client_secret: cfg.graph_client_secret.clone().unwrap_or_default(),
            },
            cfg.login_base_url_or_default(),
            cfg.graph_base_url_or_default(),
            cfg.save_to_sent_items_or_default(),
            timeout,
        )?)
    } else {
        warn!("MAILER_GRAPH_* credentials not set, using dry-run mail provider");
        Arc::new(DryRunMailer::new())
    };

    Ok(DispatchService::new(
        AudienceResolver::new(directory),
        MessageRenderer::default(),
        BatchDispatcher::new(provider, sender),
    ))
}
