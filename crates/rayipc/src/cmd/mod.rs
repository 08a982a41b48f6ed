use std::time::Duration;

use clap::{Args, Subcommand};
use rayipc_client::ClientConfig;
use rayipc_value::DecodeOptions;

use crate::exit::{io_error, CliError, CliResult};
use crate::output::OutputFormat;

pub mod exec;
pub mod info;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a statement and print the result.
    Exec(ExecArgs),
    /// Send a statement without waiting for a result.
    Send(SendArgs),
    /// Probe a server: connect, handshake, report.
    Info(InfoArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Exec(args) => exec::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Info(args) => info::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Server address and connect deadline shared by all networked commands.
#[derive(Args, Debug)]
pub struct Target {
    /// Server address as HOST:PORT.
    #[arg(env = "RAYIPC_ADDR", value_name = "HOST:PORT")]
    pub addr: String,
    /// Connect and handshake deadline (e.g. 5s, 500ms).
    #[arg(long, env = "RAYIPC_CONNECT_TIMEOUT", default_value = "5s")]
    pub connect_timeout: String,
}

impl Target {
    pub fn host_port(&self) -> CliResult<(String, u16)> {
        parse_addr(&self.addr)
    }

    pub fn client_config(&self) -> CliResult<ClientConfig> {
        Ok(ClientConfig {
            connect_timeout: parse_duration(&self.connect_timeout)?,
            ..ClientConfig::default()
        })
    }
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    #[command(flatten)]
    pub target: Target,
    /// Statement to evaluate.
    pub statement: String,
    /// Response deadline (e.g. 30s, 500ms).
    #[arg(long, env = "RAYIPC_TIMEOUT", default_value = "30s")]
    pub timeout: String,
    /// Reject tables and dicts whose parts disagree in length.
    #[arg(long)]
    pub strict: bool,
}

impl ExecArgs {
    pub fn client_config(&self) -> CliResult<ClientConfig> {
        Ok(ClientConfig {
            request_timeout: parse_duration(&self.timeout)?,
            decode: DecodeOptions {
                strict: self.strict,
            },
            ..self.target.client_config()?
        })
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub target: Target,
    /// Statement to send.
    pub statement: String,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub target: Target,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Current-thread runtime for one command.
pub(crate) fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("failed to start runtime", err))
}

/// Parse `5s`, `500ms`, or bare seconds.
pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, millis) = match input.strip_suffix("ms") {
        Some(num) => (num, true),
        None => (input.strip_suffix('s').unwrap_or(input), false),
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

/// Split `HOST:PORT`. IPv6 hosts may be bracketed: `[::1]:5000`.
pub(crate) fn parse_addr(input: &str) -> CliResult<(String, u16)> {
    let (host, port) = input
        .trim()
        .rsplit_once(':')
        .ok_or_else(|| CliError::usage(format!("expected HOST:PORT, got {input:?}")))?;

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(CliError::usage(format!("missing host in {input:?}")));
    }
    let port: u16 = port
        .parse()
        .map_err(|_| CliError::usage(format!("invalid port in {input:?}")))?;

    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert_eq!(parse_duration("0s").unwrap_err().code, USAGE);
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn parse_addr_forms() {
        assert_eq!(
            parse_addr("localhost:5000").unwrap(),
            ("localhost".to_string(), 5000)
        );
        assert_eq!(parse_addr("[::1]:5001").unwrap(), ("::1".to_string(), 5001));
        assert_eq!(parse_addr("5000").unwrap_err().code, USAGE);
        assert!(parse_addr(":5000").is_err());
        assert!(parse_addr("host:port").is_err());
    }
}
