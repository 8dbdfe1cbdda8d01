use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Text-to-speech gateway with native and OpenAI compatible APIs
#[derive(Debug, Parser)]
#[command(name = "speechgate", version, about)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "speechgate.toml", env = "SPEECHGATE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "SPEECHGATE_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override only the listen port
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, default_value = "info", env = "SPEECHGATE_LOG")]
    pub log: String,
}

impl Args {
    /// Listen address after applying `--listen` and then `--port`
    pub fn listen_address(&self, configured: SocketAddr) -> SocketAddr {
        let mut address = self.listen.unwrap_or(configured);
        if let Some(port) = self.port {
            address.set_port(port);
        }
        address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("speechgate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn port_overrides_configured_address() {
        let configured: SocketAddr = "0.0.0.0:8070".parse().unwrap();

        assert_eq!(parse(&[]).listen_address(configured), configured);
        assert_eq!(
            parse(&["--port", "9000"]).listen_address(configured),
            "0.0.0.0:9000".parse().unwrap()
        );
        assert_eq!(
            parse(&["--listen", "127.0.0.1:7000", "--port", "7001"]).listen_address(configured),
            "127.0.0.1:7001".parse().unwrap()
        );
    }
}
