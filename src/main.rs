use std::time::Duration;

use clap::{Parser, Subcommand};
use flickr_connect::{
    FlickrClient, FlickrError, FlickrServer, FlickrSession, FlickrUser, OAuthClientConfig,
    ServerConfig,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "flickr-connect",
    about = "Sign in with Flickr and list photo albums as JSON."
)]
struct Cli {
    /// Flickr API key.
    #[arg(long, env = "FLICKR_API_KEY", global = true, default_value = "")]
    api_key: String,

    /// HTTP timeout in seconds for calls to Flickr.
    #[arg(long, env = "FLICKR_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the login, callback, logout and albums routes.
    Serve {
        #[arg(long, env = "FLICKR_API_SECRET")]
        api_secret: String,

        /// Origin Flickr redirects back to after authorization.
        #[arg(long, env = "FLICKR_PUBLIC_URL", default_value = "http://127.0.0.1:5000")]
        public_url: String,

        /// Listen address, when it differs from the public URL's host and port.
        #[arg(long, env = "FLICKR_BIND")]
        bind: Option<String>,
    },
    /// Print the albums of a Flickr user.
    Albums {
        /// The user's nsid, e.g. 12345678@N00.
        user_nsid: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), FlickrError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let timeout = cli.timeout_secs.map(Duration::from_secs);
    match cli.command {
        Command::Serve {
            api_secret,
            public_url,
            bind,
        } => run_serve(cli.api_key, api_secret, &public_url, bind, timeout).await,
        Command::Albums { user_nsid } => run_albums(cli.api_key, user_nsid, timeout).await,
    }
}

async fn run_serve(
    api_key: String,
    api_secret: String,
    public_url: &str,
    bind: Option<String>,
    timeout: Option<Duration>,
) -> Result<(), FlickrError> {
    let mut config = ServerConfig::from_public_url(api_key.clone(), public_url)?;
    if let Some(bind) = bind {
        let (host, port) = parse_bind(&bind)?;
        config = config.with_bind(host, port);
    }
    if let Some(timeout) = timeout {
        config = config.with_timeout(timeout);
    }

    let server = FlickrServer::new(config, OAuthClientConfig::new(api_key, api_secret))?;
    let listener = server.bind().await?;
    server
        .serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

async fn run_albums(
    api_key: String,
    user_nsid: String,
    timeout: Option<Duration>,
) -> Result<(), FlickrError> {
    let client = FlickrClient::new(api_key, timeout)?;
    let session = FlickrSession {
        flickr_user: Some(FlickrUser {
            username: String::new(),
            user_nsid,
        }),
        ..FlickrSession::default()
    };

    let albums = client.get_user_albums(&session).await;
    let output =
        serde_json::to_string_pretty(&albums).map_err(|err| FlickrError::InvalidResponse {
            message: err.to_string(),
            body: String::new(),
        })?;

    println!("{output}");
    Ok(())
}

fn parse_bind(bind: &str) -> Result<(String, u16), FlickrError> {
    let invalid = || FlickrError::InvalidConfig(format!("invalid bind address: {bind}"));
    let (host, port) = bind.rsplit_once(':').ok_or_else(invalid)?;
    let port = port.parse().map_err(|_| invalid())?;
    Ok((host.to_string(), port))
}
