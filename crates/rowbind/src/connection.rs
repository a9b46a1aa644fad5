//! Process-wide connection provisioning.
//!
//! A driver is installed once at startup; the connection it provides is
//! opened on first use and shared for the rest of the process.
//!
//! ```ignore
//! rowbind::connection::install(Sqlite::new("sqlite:app.db")?)?;
//!
//! let authors = Repository::<Author>::of()?;
//! ```

use crate::{Error, Result, SharedConnection};

use rowbind_core::driver::Driver;

use std::sync::{Arc, Mutex, OnceLock};

static DRIVER: OnceLock<Box<dyn Driver>> = OnceLock::new();

static CONNECTION: OnceLock<SharedConnection> = OnceLock::new();

/// Serializes the first connect so the driver is asked exactly once.
static CONNECT: Mutex<()> = Mutex::new(());

/// Installs the driver that provides the shared connection.
///
/// Fails if a driver is already installed.
pub fn install(driver: impl Driver) -> Result<()> {
    let url = driver.url().into_owned();

    DRIVER.set(Box::new(driver)).map_err(|_| {
        Error::configuration(format!(
            "a connection driver is already installed; rejected url={url}"
        ))
    })?;

    log::info!("installed connection driver; url={url}");
    Ok(())
}

pub fn is_installed() -> bool {
    DRIVER.get().is_some()
}

/// Returns the shared connection, opening it on first call.
///
/// Every call returns the same connection.
pub fn shared() -> Result<SharedConnection> {
    if let Some(connection) = CONNECTION.get() {
        return Ok(connection.clone());
    }

    let driver = DRIVER.get().ok_or_else(|| {
        Error::configuration(
            "no connection driver installed; call `connection::install` first",
        )
    })?;

    let _guard = CONNECT
        .lock()
        .map_err(|_| Error::configuration("connection provisioning lock is poisoned"))?;

    if let Some(connection) = CONNECTION.get() {
        return Ok(connection.clone());
    }

    let connection = driver.connect().map_err(|e| {
        e.context(Error::configuration(format!(
            "failed to open the shared connection; url={}",
            driver.url()
        )))
    })?;

    log::debug!("opened shared connection; url={}", driver.url());

    Ok(CONNECTION
        .get_or_init(|| Arc::new(Mutex::new(connection)))
        .clone())
}
