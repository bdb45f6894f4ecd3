use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autofill_client::api_client::ApiClient;
use autofill_client::config::Config;
use autofill_client::credentials::StaticCredentials;
use autofill_client::notify::{drain, Notifier};
use autofill_client::profile::ProfileField;
use autofill_client::session::{DashboardSession, SaveOutcome, View};
use autofill_client::submission::SubmitOutcome;

#[derive(Debug, Parser)]
#[command(name = "autofill", version, about = "Keep one applicant profile and autofill recruitment forms with it")]
struct Cli {
    /// Backend base URL (overrides AUTOFILL_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token from the identity provider (overrides AUTOFILL_TOKEN)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the stored profile merged over the defaults
    Show,
    /// List every profile field key
    Fields,
    /// Edit fields and save the whole profile, e.g. `edit mobileNumber=9998887777`
    Edit {
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(ProfileField, String)>,
    },
    /// Submit the profile to the autofill service for a form URL
    Submit { form_url: String },
}

fn parse_assignment(raw: &str) -> Result<(ProfileField, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    let field = name.trim().parse::<ProfileField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

fn save_status(outcome: SaveOutcome) -> Result<()> {
    match outcome {
        SaveOutcome::Saved => Ok(()),
        SaveOutcome::Failed => bail!("Profile was not saved"),
    }
}

fn submit_status(outcome: &SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Succeeded { .. } => Ok(()),
        SubmitOutcome::Rejected => bail!("Form URL is required"),
        SubmitOutcome::Busy => bail!("A submission is already in flight"),
        SubmitOutcome::Failed => bail!("Autofill submission failed"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if cli.token.is_some() {
        config.token = cli.token;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = &config.rust_log;
            EnvFilter::new(format!(
                "{}={level},{}={level}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                env!("CARGO_CRATE_NAME")
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting autofill client v{}", env!("CARGO_PKG_VERSION"));

    if matches!(cli.command, Command::Fields) {
        for field in ProfileField::ALL {
            println!("{field}");
        }
        return Ok(());
    }

    let credentials = Arc::new(StaticCredentials::new(config.token.clone()));
    let api = ApiClient::new(config.api_url.clone());
    info!("Backend: {}", api.base_url());

    let (notifier, mut notifications) = Notifier::channel();
    let mut session = DashboardSession::start(credentials, api, notifier)
        .await
        .context("Sign in first: set AUTOFILL_TOKEN or pass --token")?;

    let status = match cli.command {
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(session.profile())?);
            Ok(())
        }
        Command::Edit { assignments } => {
            session.begin_edit();
            for (field, value) in &assignments {
                session
                    .set_field(*field, value)
                    .with_context(|| format!("Cannot set {field}"))?;
            }
            if !session.is_dirty() {
                info!("No field changed; saving anyway");
            }
            save_status(session.save()?.outcome().await)
        }
        Command::Submit { form_url } => {
            session.show(View::FillForm);
            session.set_form_url(form_url);
            submit_status(&session.submit().await)
        }
        Command::Fields => Ok(()),
    };

    session.sign_out();

    for notification in drain(&mut notifications) {
        println!("{notification}");
    }

    status
}
