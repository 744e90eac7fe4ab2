//! VPNator - provision VPN servers from the terminal
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use vpnator::{HeadlessRequest, run_headless, run_tui};
use vpnator_app::config::{load_user_settings, resolve_endpoint};
use vpnator_core::prelude::*;
use vpnator_core::{logging, VpnProtocol};

/// VPNator - install VPN servers through a provisioning backend
#[derive(Parser, Debug)]
#[command(name = "vpnator", version)]
#[command(about = "Install VPN servers through a VPNator backend", long_about = None)]
struct Args {
    /// Backend WebSocket URL (overrides VPNATOR_ENDPOINT and the config file)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Path to config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Submit one request and print NDJSON events instead of the TUI
    #[arg(long)]
    headless: bool,

    /// VPN protocol: outline, openconnect, or xray
    #[arg(long, value_name = "PROTOCOL", requires = "headless")]
    protocol: Option<VpnProtocol>,

    /// Remote server address, host or host:port
    #[arg(long, value_name = "HOST", requires = "headless")]
    address: Option<String>,

    /// SSH username on the remote server
    #[arg(long, requires = "headless")]
    username: Option<String>,

    /// SSH password on the remote server
    #[arg(long, requires = "headless")]
    password: Option<String>,

    /// VPN account username (openconnect)
    #[arg(long, requires = "headless")]
    vpn_username: Option<String>,

    /// VPN account password (openconnect)
    #[arg(long, requires = "headless")]
    vpn_password: Option<String>,
}

impl Args {
    fn headless_request(&self) -> HeadlessRequest {
        HeadlessRequest {
            protocol: self.protocol,
            address: self.address.clone().unwrap_or_default(),
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            vpn_username: self.vpn_username.clone(),
            vpn_password: self.vpn_password.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init()?;

    let settings = load_user_settings(args.config.as_deref());
    let endpoint = match resolve_endpoint(args.endpoint.as_deref(), &settings) {
        Ok(resolved) => {
            info!("Using endpoint {} (from {})", resolved.url, resolved.source);
            resolved.url
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };

    if args.headless {
        let outcome = run_headless(settings, endpoint, args.headless_request()).await?;
        if !outcome.is_success() {
            if let Ok(log_file) = logging::get_current_log_file() {
                eprintln!("Details in {}", log_file.display());
            }
            std::process::exit(1);
        }
        Ok(())
    } else {
        run_tui(settings, endpoint).await
    }
}
