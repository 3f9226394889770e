//! Starts the embedded PostgreSQL cluster shared by one test binary.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` unless `PG_RUNTIME_DIR`
//! and `PG_DATA_DIR` say otherwise. Sandboxed runners reject writes there, so
//! missing directories are redirected under `target/pg-embed` while the
//! cluster boots. The redirect holds the `env-lock` guard only for the
//! bootstrap call.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::ClusterHandle;
use uuid::Uuid;

static BOOTSTRAP: OnceLock<Mutex<()>> = OnceLock::new();

const ATTEMPTS: u32 = 4;
const FIRST_BACKOFF: Duration = Duration::from_millis(500);

/// Download failures worth another attempt.
const TRANSIENT_MARKERS: [&str; 6] = [
    "error decoding response body",
    "connection reset",
    "connection refused",
    "timed out",
    "temporarily unavailable",
    "dns error",
];

fn scratch_root() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target"),
        PathBuf::from,
    )
    .join("pg-embed")
}

/// Fresh install and data directories, or `None` when both are configured.
fn scratch_install_dirs() -> Result<Option<(String, String)>, String> {
    if std::env::var_os("PG_RUNTIME_DIR").is_some() && std::env::var_os("PG_DATA_DIR").is_some() {
        return Ok(None);
    }

    let base = scratch_root().join(format!("habits-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    for dir in [&runtime_dir, &data_dir] {
        std::fs::create_dir_all(dir).map_err(|err| format!("create {}: {err}", dir.display()))?;
    }

    Ok(Some((
        runtime_dir.display().to_string(),
        data_dir.display().to_string(),
    )))
}

fn is_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Cluster handle shared by every test in the binary.
///
/// Transient download errors are retried with doubling backoff.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _serialised = BOOTSTRAP
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    let _redirect = scratch_install_dirs()?.map(|(runtime_dir, data_dir)| {
        env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir)),
            ("PG_DATA_DIR", Some(data_dir)),
        ])
    });

    let mut backoff = FIRST_BACKOFF;
    let mut attempt = 1;
    loop {
        let message = match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => format!("{err:?}"),
        };
        if attempt == ATTEMPTS || !is_transient(&message) {
            return Err(message);
        }
        eprintln!(
            "pg-embed: attempt {attempt}/{ATTEMPTS} failed, retrying in {backoff:?}: {message}"
        );
        std::thread::sleep(backoff);
        backoff *= 2;
        attempt += 1;
    }
}
