use rayipc_client::Connection;
use serde::Serialize;

use crate::cmd::{runtime, SendArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

#[derive(Serialize)]
struct SendOutput<'a> {
    addr: &'a str,
    statement: &'a str,
    sent: bool,
}

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let (host, port) = args.target.host_port()?;
    let config = args.target.client_config()?;

    runtime()?.block_on(async {
        let conn = Connection::connect_with_config(&host, port, &config)
            .await
            .map_err(|err| client_error("connect failed", err))?;

        let result = conn.execute_async(&args.statement).await;
        conn.disconnect().await;
        result.map_err(|err| client_error("send failed", err))
    })?;

    let out = SendOutput {
        addr: &args.target.addr,
        statement: &args.statement,
        sent: true,
    };
    print_record(
        &out,
        &[
            ("addr", out.addr.to_string()),
            ("statement", out.statement.to_string()),
            ("sent", out.sent.to_string()),
        ],
        format,
    );
    Ok(SUCCESS)
}
