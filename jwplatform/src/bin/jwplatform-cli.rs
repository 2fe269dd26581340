use clap::{Parser, Subcommand};
use eyre::Context;
use jwplatform::v1::Params;
use jwplatform::v2::QueryParams;
use jwplatform::{ClientConfig, JwPlatform};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Issue JW Platform API calls from the shell.
///
/// Base URLs, timeout and body encoding follow the JWPLATFORM_* environment
/// variables understood by `ClientConfig::from_env`.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Work with media items
    Media {
        /// Property (site) ID
        #[arg(long)]
        site: String,
        #[command(subcommand)]
        action: MediaAction,
    },
    /// List webhooks
    Webhooks {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Call a v1 endpoint with signed parameters
    V1 {
        #[command(flatten)]
        credentials: V1Credentials,
        /// Endpoint path, e.g. `/videos/show`
        path: String,
        /// Parameters as key=value
        params: Vec<String>,
    },
    /// Upload a file through the v1 two-step flow
    V1Upload {
        #[command(flatten)]
        credentials: V1Credentials,
        file: PathBuf,
        /// Parameters for /videos/create as key=value
        params: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum MediaAction {
    /// List media in the property
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one media item
    Get { media_id: String },
    /// Delete one media item
    Delete { media_id: String },
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long, default_value_t = 0)]
    page_length: u32,
    /// Search expression
    #[arg(long, short)]
    query: Option<String>,
    /// Sort order, e.g. created:dsc
    #[arg(long)]
    sort: Option<String>,
}

impl From<PageArgs> for QueryParams {
    fn from(args: PageArgs) -> Self {
        QueryParams {
            page: args.page,
            page_length: args.page_length,
            query: args.query.unwrap_or_default(),
            sort: args.sort.unwrap_or_default(),
        }
    }
}

#[derive(clap::Args, Debug)]
struct V1Credentials {
    #[arg(long, env = "JWPLATFORM_V1_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "JWPLATFORM_V1_API_SECRET", hide_env_values = true)]
    api_secret: String,
}

fn v2_secret() -> eyre::Result<String> {
    std::env::var("JWPLATFORM_API_SECRET").context("JWPLATFORM_API_SECRET must be set")
}

fn parse_params(pairs: &[String]) -> eyre::Result<Params> {
    let mut params = Params::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| eyre::eyre!("parameter `{pair}` is not in key=value form"))?;
        params.add(key, value);
    }
    Ok(params)
}

fn print_json(value: &impl serde::Serialize) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize response")?;
    println!("{json}");
    Ok(())
}

async fn run(command: Command, config: &ClientConfig) -> eyre::Result<()> {
    match command {
        Command::Media { site, action } => {
            let platform = JwPlatform::with_config(v2_secret()?, config)?;
            match action {
                MediaAction::List { page } => {
                    let params = QueryParams::from(page);
                    print_json(&platform.media.list(&site, Some(&params)).await?)
                }
                MediaAction::Get { media_id } => {
                    print_json(&platform.media.get(&site, &media_id).await?)
                }
                MediaAction::Delete { media_id } => {
                    platform.media.delete(&site, &media_id).await?;
                    eprintln!("deleted {media_id}");
                    Ok(())
                }
            }
        }
        Command::Webhooks { page } => {
            let platform = JwPlatform::with_config(v2_secret()?, config)?;
            let params = QueryParams::from(page);
            print_json(&platform.webhooks.list(Some(&params)).await?)
        }
        Command::V1 {
            credentials,
            path,
            params,
        } => {
            let client = jwplatform::v1::Client::with_config(
                credentials.api_key,
                credentials.api_secret,
                config,
            )?;
            let params = parse_params(&params)?;
            let response: serde_json::Value = client
                .make_request(http::Method::GET, &path, Some(params))
                .await?;
            print_json(&response)
        }
        Command::V1Upload {
            credentials,
            file,
            params,
        } => {
            let client = jwplatform::v1::Client::with_config(
                credentials.api_key,
                credentials.api_secret,
                config,
            )?;
            let params = parse_params(&params)?;
            let response: serde_json::Value = client.upload(&file, Some(params)).await?;
            print_json(&response)
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("load configuration from environment")?;

    run(cli.command, &config).await
}
