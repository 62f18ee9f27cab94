use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::{ClientConfig, ConfigError, DEFAULT_HOST};

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// OAuth2 client ID
    #[arg(long, env = "FINAUT_CLIENT_ID")]
    pub client_id: String,

    /// OAuth2 client secret
    #[arg(long, env = "FINAUT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// API host URL
    #[arg(long, env = "FINAUT_API_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Skip TLS certificate verification (test environments only)
    #[arg(long)]
    pub insecure: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig::new(&*self.client_id, &*self.client_secret)
            .with_host(&self.host)?
            .with_timeout(Duration::from_secs(self.timeout))
            .with_verify_ssl(!self.insecure)
            .with_debug(self.debug))
    }
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputTokenFormat {
    /// Returns only the access token without expiration data
    #[value(name = "plain")]
    Plain,
    /// Returns full token information in json format
    #[value(name = "json")]
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Obtain an access token with the configured credentials.
    RetrieveToken {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Select how the token should be printed
        #[arg(long, value_enum, default_value_t = OutputTokenFormat::Plain)]
        output_token_format: OutputTokenFormat,
    },
    /// List users, optionally filtered.
    ListUsers {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Filter by Norwegian social security number
        #[arg(long)]
        persnr: Option<String>,

        /// Filter by employee alias
        #[arg(long)]
        employee_alias: Option<String>,

        /// Page number for pagination
        #[arg(long)]
        page: Option<u32>,
    },
    /// List accessible companies.
    ListCompanies {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Page number for pagination
        #[arg(long)]
        page: Option<u32>,
    },
    /// Fetch a single user by ID.
    GetUser {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// User ID
        #[arg(long)]
        user_id: u64,
    },
    /// Print 40 valid Norwegian test D-numbers.
    GenTestPersnr,
}
