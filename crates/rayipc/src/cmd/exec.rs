use rayipc_client::Connection;
use tracing::debug;

use crate::cmd::{runtime, ExecArgs};
use crate::exit::{client_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_value, OutputFormat};

pub fn run(args: ExecArgs, format: OutputFormat) -> CliResult<i32> {
    let (host, port) = args.target.host_port()?;
    let config = args.client_config()?;

    let value = runtime()?.block_on(async {
        let conn = Connection::connect_with_config(&host, port, &config)
            .await
            .map_err(|err| client_error("connect failed", err))?;

        let result = conn.execute(&args.statement).await;
        conn.disconnect().await;
        result.map_err(|err| client_error("exec failed", err))
    })?;

    print_value(&value, format);

    if let rayipc_value::Value::Error { code, message } = &value {
        debug!(code, %message, "server reported an error");
        return Ok(FAILURE);
    }
    Ok(SUCCESS)
}
