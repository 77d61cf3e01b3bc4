mod command;
mod config;
mod view;

use std::{io, process, sync::Arc, thread};

use artic_core::{table::Table, webapi::WebApi};
use env_logger::{Builder, Env};

use crate::{
    command::{read_commands, HELP},
    config::Config,
    view::{SharedProps, TerminalView},
};

const ENV_LOG: &str = "ARTIC_LOG";
const ENV_LOG_STYLE: &str = "ARTIC_LOG_STYLE";

fn main() {
    // Setup logging from the env variables, with defaults.
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    let config = Config::load().unwrap_or_default();

    let webapi = match WebApi::new(
        &config.api_base,
        Config::proxy().as_deref(),
        config.timeout(),
    ) {
        Ok(webapi) => webapi,
        Err(err) => {
            log::error!("failed to set up the web API client: {err}");
            process::exit(1);
        }
    };

    let props = SharedProps::default();
    let view = TerminalView::new(io::stdout(), props.clone());
    let mut table = Table::with_rows_per_page(Arc::new(webapi), config.rows_per_page(), view);

    println!("{HELP}");
    let _input_thread = thread::spawn({
        let sender = table.sender();
        move || read_commands(io::stdin().lock(), sender, props)
    });

    table.mount();
    table.run();
}
