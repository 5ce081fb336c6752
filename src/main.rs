use std::env;
use std::process::ExitCode;

use chrono::Utc;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use agora_dashboard::models::Event;
use agora_dashboard::utils::error::DashboardError;
use agora_dashboard::{ApiClient, Config, EventDraftBuilder, RefreshBus, SessionHandle};

const USAGE: &str = "usage: agora-dashboard <event.json> [--submit]";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "Command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Loads an exported event, checks it as a fresh draft and optionally
/// submits it as a new event.
async fn run() -> Result<(), DashboardError> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| DashboardError::Config(USAGE.to_string()))?;
    let submit = args.any(|arg| arg == "--submit");

    let raw = tokio::fs::read_to_string(&path).await?;
    let event: Event = serde_json::from_str(&raw)?;
    let mut builder = EventDraftBuilder::duplicate(&event)?;

    for ticket in &builder.draft().pricing.ticket_types {
        println!("{} - {}", ticket.describe(), ticket.display_price());
    }
    let today = Utc::now().date_naive();
    for promo in &builder.draft().promo_codes {
        let expired = if promo.is_expired(today) {
            " (expired)"
        } else {
            ""
        };
        println!("{} - {}{}", promo.code, promo.discount_label(), expired);
    }
    builder.validate()?;
    println!("Draft \"{}\" is ready to submit", builder.draft().media.name);

    if !submit {
        return Ok(());
    }

    let config = Config::from_env();
    let credentials = config.partner_credentials.clone().ok_or_else(|| {
        DashboardError::Config(
            "PARTNER_EMAIL and PARTNER_PASSWORD must be set to submit".to_string(),
        )
    })?;

    let client = ApiClient::new(&config, SessionHandle::new())?;
    client
        .partner_login(&credentials.email, &credentials.password)
        .await?;

    let bus = RefreshBus::default();
    let created = builder.submit(&client, &bus).await;
    client.logout();

    let created = created?;
    println!("Created event {}", created.id);
    Ok(())
}
