use std::process::ExitCode;

use vsip_cli::{actions, cli};

fn main() -> ExitCode {
    cli::run(actions::add_destination_tls)
}
