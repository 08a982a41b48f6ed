use std::time::Instant;

use rayipc_client::Connection;
use serde::Serialize;

use crate::cmd::{runtime, InfoArgs};
use crate::exit::{client_error, CliError, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

#[derive(Serialize)]
struct InfoOutput {
    addr: String,
    peer_addr: Option<String>,
    state: &'static str,
    protocol_version: u8,
    handshake_latency_ms: f64,
    connected: bool,
}

pub fn run(args: InfoArgs, format: OutputFormat) -> CliResult<i32> {
    let (host, port) = args.target.host_port()?;
    let config = args.target.client_config()?;

    let out = runtime()?.block_on(async {
        let started = Instant::now();
        let conn = Connection::connect_with_config(&host, port, &config)
            .await
            .map_err(|err| client_error("connect failed", err))?;
        let elapsed = started.elapsed();

        let out = InfoOutput {
            addr: args.target.addr.clone(),
            peer_addr: conn.peer_addr().map(|addr| addr.to_string()),
            state: conn.state().name(),
            protocol_version: conn.config().protocol_version,
            handshake_latency_ms: (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0,
            connected: conn.is_connected(),
        };
        conn.disconnect().await;
        Ok::<_, CliError>(out)
    })?;

    print_record(
        &out,
        &[
            ("addr", out.addr.clone()),
            (
                "peer_addr",
                out.peer_addr.clone().unwrap_or_else(|| "unavailable".to_string()),
            ),
            ("state", out.state.to_string()),
            ("protocol_version", out.protocol_version.to_string()),
            ("handshake_latency", format!("{:.2}ms", out.handshake_latency_ms)),
        ],
        format,
    );
    Ok(SUCCESS)
}
