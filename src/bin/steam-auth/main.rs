use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use steam_auth::http::RetryingClient;
use steam_auth::{Authenticator, Config};
use tracing::{error, warn};

mod cli;
mod logging;

use cli::Command;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	if let Err(error) = dotenvy::dotenv() {
		eprintln!("WARN: Failed to load `.env` file: {error}");
	}

	logging::init();

	let args = cli::args();
	let config = match &args.config_path {
		Some(path) => Config::from_file(path)
			.with_context(|| format!("failed to load config from `{}`", path.display()))?,
		None => Config::from_env().context("failed to load config from environment")?,
	};

	let http_client = RetryingClient::new(config.retries).context("failed to build http client")?;
	let mut stdout = io::stdout().lock();

	match args.command {
		Command::LoginUrl { request_uri } => {
			let url = Authenticator::new(&config, &http_client, request_uri).build_auth_url()?;

			writeln!(stdout, "{url}")?;
		}

		Command::Verify { callback_uri, api_key } => {
			let mut authenticator = Authenticator::new(&config, &http_client, callback_uri);

			if let Some(api_key) = api_key {
				authenticator.set_custom_api_key(api_key);
			}

			if let Err(error) = authenticator.auth().await {
				if error.is_rejection() {
					warn!(%error, "login rejected");
				} else {
					error!(%error, "failed to talk to steam");
				}

				return Ok(ExitCode::FAILURE);
			}

			let user = authenticator
				.into_steam_user()
				.context("authentication succeeded without a user")?;

			serde_json::to_writer_pretty(&mut stdout, &user)?;
			writeln!(stdout)?;
		}
	}

	Ok(ExitCode::SUCCESS)
}
