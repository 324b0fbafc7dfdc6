//! Command-line interface for the blob proxy.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::routes::DEFAULT_MAX_UPLOAD_BYTES;

const MIB: usize = 1024 * 1024;

/// cutoday-blobstore - image upload proxy
#[derive(Debug, Parser)]
#[command(name = "cutoday-blobstore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "BLOBSTORE_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = 8787)]
    pub port: u16,

    /// Directory holding stored objects
    #[arg(long, env = "BLOBSTORE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Base URL used in upload responses (defaults to http://<bind>:<port>)
    #[arg(long, env = "BLOBSTORE_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Maximum upload size in megabytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES / MIB)]
    pub max_upload_mb: usize,

    /// Log format: pretty, compact or json
    #[arg(long, default_value = "compact")]
    pub log_format: String,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}

impl Cli {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cutoday")
                .join("blobs")
        })
    }

    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.socket_addr()))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(MIB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["cutoday-blobstore"]).unwrap();
        assert_eq!(cli.max_upload_bytes(), DEFAULT_MAX_UPLOAD_BYTES);
        assert!(cli.storage_dir().ends_with("cutoday/blobs"));
    }

    #[test]
    fn public_url_follows_address() {
        let cli = Cli::try_parse_from([
            "cutoday-blobstore",
            "--bind",
            "127.0.0.1",
            "--port",
            "9000",
        ])
        .unwrap();
        assert_eq!(cli.public_url(), "http://127.0.0.1:9000");

        let cli = Cli::try_parse_from([
            "cutoday-blobstore",
            "--public-url",
            "https://images.example.org",
        ])
        .unwrap();
        assert_eq!(cli.public_url(), "https://images.example.org");
    }
}
