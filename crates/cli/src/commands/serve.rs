//! Serve command handler.

use clap::Args;
use sikkim_core::{config::AppConfig, AppResult};

/// Run the HTTP chat server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Bind address override
    #[arg(long)]
    pub host: Option<String>,

    /// Port override
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut config = config.clone();

        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        sikkim_server::serve(config).await
    }
}
