//! Vehicle telemetry state: series, subsystem registry, packet table and
//! scalar vehicle readings.
//!
//! One [`VehicleTelemetry`] value holds everything the dashboard shows. It is
//! created once with the seed data below and mutated in place each tick.

use crate::series::{MetricSeries, SeriesBounds};

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Initial memory usage window.
pub const MEMORY_SEED: [i32; 8] = [30, 15, 25, 40, 35, 45, 60, 70];

/// Initial network traffic window.
pub const NETWORK_SEED: [i32; 9] = [40, 20, 60, 15, 30, 45, 55, 35, 25];

/// Onboard subsystems, in display order. All start operational.
pub const DEFAULT_SUBSYSTEMS: [&str; 13] = [
    "Engine",
    "OBC",
    "Transceiver",
    "Memory Module",
    "DEI",
    "Power controller",
    "Solar panels",
    "Thrusters",
    "ACT",
    "Sun Sensors",
    "Reaction wheels",
    "Magnetic torquers",
    "Gyroscopes",
];

/// Packet channels as `(name, loss, total)`.
pub const DEFAULT_PACKETS: [(&str, u32, u32); 5] = [
    ("packet_3", 0, 133),
    ("packet_8", 0, 98),
    ("packet_5", 0, 112),
    ("packet_22", 0, 76),
    ("packet_14", 2, 154),
];

pub const DEFAULT_SYSTEM_ID: u64 = 12_000_928_341_176;

// ---------------------------------------------------------------------------
// SubsystemRegistry
// ---------------------------------------------------------------------------

/// One named subsystem and whether it is operational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsystem {
    pub name: String,
    pub operational: bool,
}

/// Subsystems keyed by unique name, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsystemRegistry {
    entries: Vec<Subsystem>,
}

impl SubsystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a subsystem. Returns the previous flag if the name
    /// was already registered.
    pub fn insert(&mut self, name: impl Into<String>, operational: bool) -> Option<bool> {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            return Some(std::mem::replace(&mut entry.operational, operational));
        }
        self.entries.push(Subsystem { name, operational });
        None
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.operational)
    }

    /// Invert the flag of the entry at `index`, returning the updated entry.
    pub fn toggle_at(&mut self, index: usize) -> Option<&Subsystem> {
        let entry = self.entries.get_mut(index)?;
        entry.operational = !entry.operational;
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subsystem> {
        self.entries.iter()
    }

    pub fn operational_count(&self) -> usize {
        self.entries.iter().filter(|e| e.operational).count()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for SubsystemRegistry {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (name, operational) in iter {
            registry.insert(name, operational);
        }
        registry
    }
}

// ---------------------------------------------------------------------------
// PacketTable
// ---------------------------------------------------------------------------

/// Loss and total counters for one named packet channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketChannel {
    pub name: String,
    pub loss: u32,
    pub total: u32,
}

/// Packet channels keyed by unique name, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketTable {
    channels: Vec<PacketChannel>,
}

impl PacketTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a channel's counters.
    pub fn insert(&mut self, name: impl Into<String>, loss: u32, total: u32) {
        let name = name.into();
        match self.channels.iter_mut().find(|c| c.name == name) {
            Some(channel) => {
                channel.loss = loss;
                channel.total = total;
            }
            None => self.channels.push(PacketChannel { name, loss, total }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PacketChannel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PacketChannel> {
        self.channels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PacketChannel> {
        self.channels.iter_mut()
    }
}

// ---------------------------------------------------------------------------
// VehicleState
// ---------------------------------------------------------------------------

/// Scalar vehicle readings shown in the header and network panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleState {
    /// km/h.
    pub speed: u32,
    /// Percent; always 0 while `speed` is 0.
    pub engine_usage: u32,
    pub ping: String,
    /// Connection state label, e.g. "Online".
    pub link_state: String,
    pub system_id: u64,
    pub power_source: String,
    pub current_task: String,
    /// Number of completed updates.
    pub tick: u64,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            speed: 0,
            engine_usage: 0,
            ping: "5ms".to_string(),
            link_state: "Online".to_string(),
            system_id: DEFAULT_SYSTEM_ID,
            power_source: "WIRED".to_string(),
            current_task: "None".to_string(),
            tick: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// VehicleTelemetry
// ---------------------------------------------------------------------------

/// Everything the dashboard displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleTelemetry {
    pub memory: MetricSeries,
    pub network: MetricSeries,
    pub subsystems: SubsystemRegistry,
    pub packets: PacketTable,
    pub vehicle: VehicleState,
}

impl Default for VehicleTelemetry {
    fn default() -> Self {
        let mut packets = PacketTable::new();
        for (name, loss, total) in DEFAULT_PACKETS {
            packets.insert(name, loss, total);
        }

        Self {
            memory: MetricSeries::new(MEMORY_SEED, SeriesBounds::MEMORY),
            network: MetricSeries::new(NETWORK_SEED, SeriesBounds::NETWORK),
            subsystems: DEFAULT_SUBSYSTEMS.iter().map(|&name| (name, true)).collect(),
            packets,
            vehicle: VehicleState::default(),
        }
    }
}
