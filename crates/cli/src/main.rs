//! `warden-lookup <username>`: resolve a username into a principal and print
//! it as JSON.
//!
//! Exit codes: 0 found, 1 not found, 2 invalid input / store or config failure.

use std::process::ExitCode;

use anyhow::Context;

use warden_auth::Principal;
use warden_infra::{DirectoryError, PostgresSecurityStore, SecurityDirectory, StoreConfig, connect_pool};

const EXIT_FOUND: u8 = 0;
const EXIT_NOT_FOUND: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    warden_observability::init();

    let Some(username) = std::env::args().nth(1) else {
        eprintln!("usage: warden-lookup <username>");
        return ExitCode::from(EXIT_FAILURE);
    };

    let outcome = lookup(&username).await;
    let code = exit_code(&outcome);

    match outcome {
        Ok(Some(principal)) => match serde_json::to_string_pretty(&principal) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!(error = %e, "failed to render principal");
                return ExitCode::from(EXIT_FAILURE);
            }
        },
        Ok(None) => tracing::info!(%username, "user not found"),
        Err(e) => tracing::error!(error = ?e, "lookup failed"),
    }

    ExitCode::from(code)
}

/// Map a lookup outcome onto the process exit code.
fn exit_code(outcome: &anyhow::Result<Option<Principal>>) -> u8 {
    match outcome {
        Ok(Some(_)) => EXIT_FOUND,
        Ok(None) => EXIT_NOT_FOUND,
        Err(_) => EXIT_FAILURE,
    }
}

async fn lookup(username: &str) -> anyhow::Result<Option<Principal>> {
    let config = StoreConfig::from_env().context("loading store configuration")?;
    tracing::debug!(?config, "store configuration");

    let pool = connect_pool(&config).context("building connection pool")?;
    let directory = SecurityDirectory::new(PostgresSecurityStore::new(pool));

    resolve(&directory, username).await
}

async fn resolve<S>(
    directory: &SecurityDirectory<S>,
    username: &str,
) -> anyhow::Result<Option<Principal>>
where
    S: warden_infra::PrincipalStore,
{
    match directory.load_principal(username).await {
        Ok(principal) => Ok(Some(principal)),
        Err(DirectoryError::NotFound) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("resolving principal for '{username}'")),
    }
}
