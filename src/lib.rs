// Library root
// -----------
// Every action binary under `src/bin/` is a thin wrapper around this
// library: it hands one function from `actions` to `cli::run` and exits
// with the code it returns.
//
// Module responsibilities:
// - `config`: endpoint credentials and per-action variables read from the
//   process environment (or any other `VarSource`), plus `.env` loading.
// - `api`: the transport layer. Builds account-scoped URLs and performs
//   one POST/GET/DELETE exchange, returning the parsed JSON object.
// - `actions`: one function per trunk provisioning action.
// - `cli`: the single place where results turn into printed messages and
//   process exit codes.
// - `error`: the failure type shared by all of the above.
// - `logging`: stderr diagnostics via `tracing`.
pub mod actions;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
