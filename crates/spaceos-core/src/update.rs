//! One simulation tick.
//!
//! [`advance`] moves every piece of telemetry forward by one step. The order
//! in which it consumes draws from the [`NoiseSource`] is fixed, so a seeded
//! or scripted source replays a run exactly:
//!
//! 1. memory delta
//! 2. network delta
//! 3. subsystem flip chance, then the flipped index if it fires
//! 4. per packet channel, in table order: loss chance, then the new loss
//! 5. on reroll ticks: speed, then engine usage if the vehicle is moving

use crate::noise::NoiseSource;
use crate::state::VehicleTelemetry;

/// Probability per tick that one subsystem flips its health.
pub const SUBSYSTEM_FLIP_CHANCE: f64 = 0.05;

/// Probability per tick, per channel, that packet loss is rerolled.
pub const PACKET_LOSS_CHANCE: f64 = 0.2;

/// Largest packet loss value a reroll can produce.
pub const PACKET_LOSS_MAX: u32 = 5;

/// Speed and engine usage are rerolled on ticks divisible by this.
pub const REROLL_PERIOD: u64 = 5;

pub const SPEED_MAX: u32 = 30;
pub const ENGINE_USAGE_MAX: u32 = 40;

/// What changed during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick counter value the update ran at (before incrementing).
    pub tick: u64,
    /// Sample appended to the memory series.
    pub memory: i32,
    /// Sample appended to the network series.
    pub network: i32,
    /// Subsystem that flipped, with its new operational flag.
    pub flipped: Option<(String, bool)>,
    /// Channels whose loss was rerolled, with the new loss value.
    pub packet_losses: Vec<(String, u32)>,
    /// Whether speed and engine usage were rerolled.
    pub rerolled: bool,
}

/// Advance `telemetry` by one tick.
pub fn advance<N: NoiseSource + ?Sized>(
    telemetry: &mut VehicleTelemetry,
    noise: &mut N,
) -> TickReport {
    let tick = telemetry.vehicle.tick;

    let memory = telemetry.memory.step(noise);
    let network = telemetry.network.step(noise);

    let mut flipped = None;
    if noise.chance(SUBSYSTEM_FLIP_CHANCE) && !telemetry.subsystems.is_empty() {
        let index = noise.index(telemetry.subsystems.len());
        if let Some(entry) = telemetry.subsystems.toggle_at(index) {
            log::debug!(
                "tick {tick}: subsystem {} is now {}",
                entry.name,
                if entry.operational { "OK" } else { "FAIL" }
            );
            flipped = Some((entry.name.clone(), entry.operational));
        }
    }

    let mut packet_losses = Vec::new();
    for channel in telemetry.packets.iter_mut() {
        if noise.chance(PACKET_LOSS_CHANCE) {
            channel.loss = noise.uniform(0, PACKET_LOSS_MAX as i32).max(0) as u32;
            packet_losses.push((channel.name.clone(), channel.loss));
        }
    }

    let rerolled = tick % REROLL_PERIOD == 0;
    if rerolled {
        let vehicle = &mut telemetry.vehicle;
        vehicle.speed = noise.uniform(0, SPEED_MAX as i32).max(0) as u32;
        vehicle.engine_usage = if vehicle.speed > 0 {
            noise.uniform(0, ENGINE_USAGE_MAX as i32).max(0) as u32
        } else {
            0
        };
        log::debug!(
            "tick {tick}: speed {} km/h, engine {}%",
            vehicle.speed,
            vehicle.engine_usage
        );
    }

    telemetry.vehicle.tick += 1;
    log::trace!("tick {tick}: memory {memory}%, network {network}%");

    TickReport {
        tick,
        memory,
        network,
        flipped,
        packet_losses,
        rerolled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{RngNoise, ScriptedNoise};

    #[test]
    fn first_tick_rerolls_speed() {
        let mut t = VehicleTelemetry::default();
        let mut noise = ScriptedNoise::new().with_uniforms([0, 0, 12, 33]);
        let report = advance(&mut t, &mut noise);
        assert!(report.rerolled);
        assert_eq!(t.vehicle.speed, 12);
        assert_eq!(t.vehicle.engine_usage, 33);
        assert_eq!(t.vehicle.tick, 1);
    }

    #[test]
    fn stationary_vehicle_has_idle_engine() {
        let mut t = VehicleTelemetry::default();
        t.vehicle.engine_usage = 25;
        // Speed 0 must not consume an engine draw.
        let mut noise = ScriptedNoise::new().with_uniforms([0, 0, 0, 17]);
        advance(&mut t, &mut noise);
        assert_eq!(t.vehicle.speed, 0);
        assert_eq!(t.vehicle.engine_usage, 0);
        assert_eq!(noise.remaining(), 1);
    }

    #[test]
    fn speed_held_between_reroll_ticks() {
        let mut t = VehicleTelemetry::default();
        let mut noise = RngNoise::seeded(99);
        let mut previous = (t.vehicle.speed, t.vehicle.engine_usage);
        for _ in 0..1000 {
            let report = advance(&mut t, &mut noise);
            let current = (t.vehicle.speed, t.vehicle.engine_usage);
            assert_eq!(report.rerolled, report.tick % REROLL_PERIOD == 0);
            if !report.rerolled {
                assert_eq!(current, previous, "changed on tick {}", report.tick);
            }
            if current.0 == 0 {
                assert_eq!(current.1, 0);
            }
            assert!(current.0 <= SPEED_MAX && current.1 <= ENGINE_USAGE_MAX);
            previous = current;
        }
    }

    #[test]
    fn flip_toggles_chosen_subsystem() {
        let mut t = VehicleTelemetry::default();
        let mut noise = ScriptedNoise::new().with_chances([true]).with_indices([2]);
        let report = advance(&mut t, &mut noise);
        assert_eq!(report.flipped, Some(("Transceiver".to_string(), false)));
        assert_eq!(t.subsystems.get("Transceiver"), Some(false));
        assert_eq!(t.subsystems.operational_count(), 12);
    }

    #[test]
    fn flip_rate_matches_probability() {
        let mut t = VehicleTelemetry::default();
        let mut noise = RngNoise::seeded(0x5EED);
        let ticks = 20_000;
        let flips = (0..ticks)
            .filter(|_| advance(&mut t, &mut noise).flipped.is_some())
            .count();
        let expected = ticks as f64 * SUBSYSTEM_FLIP_CHANCE;
        // sd ~= 31 flips; allow well over five sigma.
        assert!(
            (flips as f64 - expected).abs() < 200.0,
            "expected ~{expected} flips, got {flips}"
        );
    }

    #[test]
    fn packet_loss_stays_in_range() {
        let mut t = VehicleTelemetry::default();
        let mut noise = RngNoise::seeded(314);
        let totals: Vec<u32> = t.packets.iter().map(|c| c.total).collect();
        for _ in 0..2000 {
            advance(&mut t, &mut noise);
            for channel in t.packets.iter() {
                assert!(channel.loss <= PACKET_LOSS_MAX);
            }
        }
        let after: Vec<u32> = t.packets.iter().map(|c| c.total).collect();
        assert_eq!(totals, after);
    }

    #[test]
    fn packet_reroll_only_touches_firing_channels() {
        let mut t = VehicleTelemetry::default();
        // Flip chance, then one chance per channel.
        let mut noise = ScriptedNoise::new()
            .with_chances([false, false, true, false, false, true])
            .with_uniforms([0, 0, 4, 0, 0]);
        let report = advance(&mut t, &mut noise);
        assert_eq!(
            report.packet_losses,
            vec![("packet_8".to_string(), 4), ("packet_14".to_string(), 0)]
        );
        assert_eq!(t.packets.get("packet_8").map(|c| c.loss), Some(4));
        assert_eq!(t.packets.get("packet_3").map(|c| c.loss), Some(0));
        assert_eq!(t.packets.get("packet_14").map(|c| c.loss), Some(0));
    }

    #[test]
    fn tick_counter_is_monotonic() {
        let mut t = VehicleTelemetry::default();
        let mut noise = RngNoise::seeded(8);
        for expected in 0..50 {
            assert_eq!(advance(&mut t, &mut noise).tick, expected);
        }
        assert_eq!(t.vehicle.tick, 50);
    }

    #[test]
    fn empty_registry_never_flips() {
        let mut t = VehicleTelemetry::default();
        t.subsystems = Default::default();
        let mut noise = ScriptedNoise::new().with_chances([true]).with_indices([0]);
        let report = advance(&mut t, &mut noise);
        assert!(report.flipped.is_none());
    }
}
