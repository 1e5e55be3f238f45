use crate::error::{Error, Result};
use crate::generator::{Measurement, Window};
use std::time::Duration;

/// Run configuration.
///
/// Defaults match a local InfluxDB 1.x with a `testdb` database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Length of the generated window in minutes.
    pub minutes: usize,
    /// Maximum number of lines per write request.
    pub batch_size: usize,
    /// Number of simulated hosts.
    pub hosts: usize,
    pub seed: Option<u64>,
    /// Global timeout of a single write request.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 8086,
            database: "testdb".to_owned(),
            minutes: 120,
            batch_size: 1000,
            hosts: crate::fleet::DEFAULT_HOSTS,
            seed: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.minutes == 0 {
            return Err(Error::Config("minutes must be at least 1".to_owned()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".to_owned()));
        }
        if self.hosts == 0 {
            return Err(Error::Config("at least one host is required".to_owned()));
        }
        if self.database.is_empty() {
            return Err(Error::Config("database name is empty".to_owned()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_owned()));
        }

        Window::ending_now(self.minutes)?;

        let series: usize = Measurement::ALL.iter().map(|m| m.series_per_host()).sum();
        self.minutes
            .checked_mul(self.hosts)
            .and_then(|n| n.checked_mul(series))
            .ok_or_else(|| {
                Error::Config(format!(
                    "{} minutes over {} hosts is too many points",
                    self.minutes, self.hosts
                ))
            })?;

        Ok(())
    }

    /// `http://<host>:<port>/write?db=<database>`
    pub fn write_url(&self) -> String {
        format!(
            "http://{}:{}/write?db={}",
            self.host, self.port, self.database
        )
    }
}
