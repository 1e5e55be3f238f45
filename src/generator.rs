//! Metric generators with simple random-walk patterns.

use crate::error::{Error, Result};
use crate::fleet::{CORES, DEVICES, Fleet, INTERFACES};
use crate::point::Point;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MINUTE_NS: i64 = 60_000_000_000;

/// Measurement families produced by [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Cpu,
    Memory,
    Disk,
    Network,
    Temperature,
}

impl Measurement {
    /// Generation order.
    pub const ALL: [Measurement; 5] = [
        Measurement::Cpu,
        Measurement::Memory,
        Measurement::Disk,
        Measurement::Network,
        Measurement::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Measurement::Cpu => "cpu",
            Measurement::Memory => "memory",
            Measurement::Disk => "disk",
            Measurement::Network => "network",
            Measurement::Temperature => "temperature",
        }
    }

    pub fn tag_keys(&self) -> &'static [&'static str] {
        match self {
            Measurement::Cpu => &["host", "region", "core"],
            Measurement::Memory => &["host", "region"],
            Measurement::Disk => &["host", "region", "device"],
            Measurement::Network => &["host", "region", "interface"],
            Measurement::Temperature => &["host", "room"],
        }
    }

    pub fn field_keys(&self) -> &'static [&'static str] {
        match self {
            Measurement::Network => &["bytes_in", "bytes_out"],
            Measurement::Temperature => &["celsius"],
            _ => &["value"],
        }
    }

    /// Number of series per host.
    pub fn series_per_host(&self) -> usize {
        match self {
            Measurement::Cpu => CORES,
            Measurement::Disk => DEVICES.len(),
            Measurement::Network => INTERFACES.len(),
            Measurement::Memory | Measurement::Temperature => 1,
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run of whole minutes starting at `start_ns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_ns: i64,
    pub minutes: usize,
}

impl Window {
    pub fn new(start_ns: i64, minutes: usize) -> Self {
        Self { start_ns, minutes }
    }

    /// The `minutes` long window that ends at the current wall clock time.
    ///
    /// Fails when the window would start before the Unix epoch.
    pub fn ending_now(minutes: usize) -> Result<Self> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_nanos();
        let now = i64::try_from(now).unwrap_or(i64::MAX);

        let start_ns = span_ns(minutes)
            .and_then(|span| now.checked_sub(span))
            .filter(|start| *start >= 0)
            .ok_or_else(|| {
                Error::Config(format!("a {} minute window reaches before 1970", minutes))
            })?;

        Ok(Self::new(start_ns, minutes))
    }

    pub fn timestamp(&self, minute: usize) -> i64 {
        self.start_ns + minute as i64 * MINUTE_NS
    }

    fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.minutes).map(|minute| self.timestamp(minute))
    }
}

/// Length of `minutes` in nanoseconds, `None` if it does not fit an `i64`.
pub(crate) fn span_ns(minutes: usize) -> Option<i64> {
    i64::try_from(minutes).ok()?.checked_mul(MINUTE_NS)
}

/// Produces points for every measurement over a [`Window`].
///
/// Walk state (memory baselines, disk usage, temperatures) lives only for the
/// duration of one call; consecutive calls start fresh.
pub struct Generator {
    rng: StdRng,
    fleet: Fleet,
}

impl Generator {
    pub fn new(fleet: Fleet, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self { rng, fleet }
    }

    pub fn generate(&mut self, measurement: Measurement, window: &Window) -> Vec<Point> {
        match measurement {
            Measurement::Cpu => self.cpu(window),
            Measurement::Memory => self.memory(window),
            Measurement::Disk => self.disk(window),
            Measurement::Network => self.network(window),
            Measurement::Temperature => self.temperature(window),
        }
    }

    /// Runs every generator once, in [`Measurement::ALL`] order.
    pub fn generate_all(&mut self, window: &Window) -> Vec<(Measurement, Vec<Point>)> {
        Measurement::ALL
            .into_iter()
            .map(|measurement| (measurement, self.generate(measurement, window)))
            .collect()
    }

    /// Number of points `measurement` yields over `window`.
    ///
    /// Saturates instead of overflowing.
    pub fn expected_len(&self, measurement: Measurement, window: &Window) -> usize {
        window
            .minutes
            .saturating_mul(self.fleet.len())
            .saturating_mul(measurement.series_per_host())
    }

    /// Per-core utilisation in percent.
    pub fn cpu(&mut self, window: &Window) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.expected_len(Measurement::Cpu, window));

        for timestamp in window.timestamps() {
            for (i, host) in self.fleet.hosts().iter().enumerate() {
                for core in 0..CORES {
                    let base_load = self.rng.random_range(20.0..50.0);
                    let noise = gauss(&mut self.rng, 0.0, 5.0);
                    let peak = if self.rng.random_bool(0.1) {
                        self.rng.random_range(0.0..30.0)
                    } else {
                        0.0
                    };

                    let value = (base_load + noise + peak).clamp(0.0, 100.0);

                    points.push(
                        Point::new("cpu", timestamp)
                            .tag("host", host.as_str())
                            .tag("region", self.fleet.region(i))
                            .tag("core", core.to_string())
                            .field("value", value, 2),
                    );
                }
            }
        }

        points
    }

    /// Used memory in MiB; grows slowly with occasional reclamation drops.
    pub fn memory(&mut self, window: &Window) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.expected_len(Measurement::Memory, window));
        let mut used: Vec<f64> = (0..self.fleet.len())
            .map(|_| self.rng.random_range(4000.0..6000.0))
            .collect();

        for timestamp in window.timestamps() {
            for (i, host) in self.fleet.hosts().iter().enumerate() {
                if self.rng.random_bool(0.1) {
                    used[i] -= self.rng.random_range(500.0..2000.0);
                } else {
                    used[i] += self.rng.random_range(0.0..200.0);
                }
                used[i] = used[i].clamp(1024.0, 8192.0);

                points.push(
                    Point::new("memory", timestamp)
                        .tag("host", host.as_str())
                        .tag("region", self.fleet.region(i))
                        .field("value", used[i], 0),
                );
            }
        }

        points
    }

    /// Used disk space in MiB per device; only ever grows.
    pub fn disk(&mut self, window: &Window) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.expected_len(Measurement::Disk, window));
        let mut used: Vec<f64> = (0..self.fleet.len() * DEVICES.len())
            .map(|_| self.rng.random_range(1000.0..5000.0))
            .collect();

        for timestamp in window.timestamps() {
            for (i, host) in self.fleet.hosts().iter().enumerate() {
                for (d, device) in DEVICES.iter().enumerate() {
                    let slot = &mut used[i * DEVICES.len() + d];
                    *slot = (*slot + self.rng.random_range(0.0..100.0)).clamp(0.0, 10000.0);

                    points.push(
                        Point::new("disk", timestamp)
                            .tag("host", host.as_str())
                            .tag("region", self.fleet.region(i))
                            .tag("device", *device)
                            .field("value", *slot, 0),
                    );
                }
            }
        }

        points
    }

    /// Bytes in and out per interface, with rare traffic spikes.
    pub fn network(&mut self, window: &Window) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.expected_len(Measurement::Network, window));

        for timestamp in window.timestamps() {
            for (i, host) in self.fleet.hosts().iter().enumerate() {
                for interface in INTERFACES {
                    let mut bytes_in = self.rng.random_range(100.0..1000.0);
                    let mut bytes_out = self.rng.random_range(50.0..500.0);

                    if self.rng.random_bool(0.05) {
                        bytes_in *= self.rng.random_range(2.0..5.0);
                        bytes_out *= self.rng.random_range(2.0..5.0);
                    }

                    points.push(
                        Point::new("network", timestamp)
                            .tag("host", host.as_str())
                            .tag("region", self.fleet.region(i))
                            .tag("interface", *interface)
                            .field("bytes_in", bytes_in, 0)
                            .field("bytes_out", bytes_out, 0),
                    );
                }
            }
        }

        points
    }

    /// Host temperature in degrees Celsius, drifting slowly.
    pub fn temperature(&mut self, window: &Window) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.expected_len(Measurement::Temperature, window));
        let mut celsius: Vec<f64> = (0..self.fleet.len())
            .map(|_| self.rng.random_range(20.0..25.0))
            .collect();

        for timestamp in window.timestamps() {
            for (i, host) in self.fleet.hosts().iter().enumerate() {
                celsius[i] = (celsius[i] + gauss(&mut self.rng, 0.0, 0.2)).clamp(15.0, 35.0);

                points.push(
                    Point::new("temperature", timestamp)
                        .tag("host", host.as_str())
                        .tag("room", self.fleet.room(i))
                        .field("celsius", celsius[i], 2),
                );
            }
        }

        points
    }
}

/// Normally distributed sample using the Box-Muller transform.
fn gauss<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    // u1 in (0, 1] so ln(u1) stays finite
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}
