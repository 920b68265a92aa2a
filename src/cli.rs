// Entry-point plumbing shared by every binary in `src/bin/`.
// - `run` is what a binary's `main` calls: it wires the real environment
//   and the reqwest transport into `execute`, then hands the result to
//   `report`.
// - `execute` never touches the process, so tests can drive a whole action
//   with a map of variables and a stub transport.
// - `report` is the only place that prints the final line and decides the
//   exit code.

use std::process::ExitCode;

use tracing::{error, info};

use crate::actions::Outcome;
use crate::api::{ApiClient, ReqwestTransport, Transport};
use crate::config::{self, EndpointConfig, ProcessEnv, VarSource};
use crate::error::Result;
use crate::logging;

/// Run one action against the real API using the process environment.
pub fn run<F>(action: F) -> ExitCode
where
    F: FnOnce(&ApiClient<ReqwestTransport>, &ProcessEnv) -> Result<Outcome>,
{
    logging::init();
    let result = config::hydrate_env_file()
        .and_then(|()| execute(&ProcessEnv, ReqwestTransport::new, action));
    report(result)
}

/// Validate the endpoint configuration, build the client, run the action.
///
/// The transport factory is only called once the configuration is known to
/// be complete, so a missing variable never reaches the network.
pub fn execute<V, T, M, F>(vars: &V, make_transport: M, action: F) -> Result<Outcome>
where
    V: VarSource,
    T: Transport,
    M: FnOnce() -> Result<T>,
    F: FnOnce(&ApiClient<T>, &V) -> Result<Outcome>,
{
    let config = EndpointConfig::from_vars(vars)?;
    let api = ApiClient::new(config, make_transport()?);
    action(&api, vars)
}

/// Exit status for a finished action: 0 on success or skip, 1 on any error.
pub fn status_code(result: &Result<Outcome>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Print the final line for `result` and convert it to an exit code.
pub fn report(result: Result<Outcome>) -> ExitCode {
    let code = status_code(&result);
    match result {
        Ok(Outcome::Completed(message)) => {
            info!("action completed");
            println!("{message}");
        }
        Ok(Outcome::Skipped(reason)) => {
            info!(%reason, "action skipped");
            println!("Warning: {reason}");
        }
        Err(err) => {
            error!(kind = err.kind(), status = err.status(), "action failed");
            eprintln!("Error: {err}");
        }
    }
    ExitCode::from(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn skip_and_success_exit_zero() {
        assert_eq!(status_code(&Ok(Outcome::Completed("done"))), 0);
        assert_eq!(status_code(&Ok(Outcome::Skipped("nothing to do".into()))), 0);
    }

    #[test]
    fn any_error_exits_one() {
        assert_eq!(status_code(&Err(Error::MissingEndpointConfig)), 1);
        assert_eq!(
            status_code(&Err(Error::Http {
                status: 500,
                body: "boom".into()
            })),
            1
        );
    }
}
