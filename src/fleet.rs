//! Simulated hosts and the dimensions each measurement is split by.

pub const REGIONS: &[&str] = &["us-west", "us-east", "eu-west"];
pub const ROOMS: &[&str] = &["rack01", "rack02", "rack03"];
pub const CORES: usize = 4;
pub const DEVICES: &[&str] = &["sda", "sdb", "sdc"];
pub const INTERFACES: &[&str] = &["eth0", "eth1"];

pub const DEFAULT_HOSTS: usize = 4;

/// The set of hosts data is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    hosts: Vec<String>,
}

impl Fleet {
    /// `count` hosts named `server01`, `server02`, ...
    pub fn with_hosts(count: usize) -> Self {
        Self {
            hosts: (1..=count).map(|i| format!("server{:02}", i)).collect(),
        }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Region of the host at `index`.
    ///
    /// Hosts are bucketed by position so the mapping is the same on every run.
    pub fn region(&self, index: usize) -> &'static str {
        REGIONS[index % REGIONS.len()]
    }

    /// Server room of the host at `index`.
    pub fn room(&self, index: usize) -> &'static str {
        ROOMS[index % ROOMS.len()]
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::with_hosts(DEFAULT_HOSTS)
    }
}
