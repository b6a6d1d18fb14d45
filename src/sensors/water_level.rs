//! Ultrasonic tank level conversion.
//!
//! An HC-SR04 mounted above the tank measures the distance down to the
//! water surface.  The echo round-trip time becomes a one-way distance,
//! and the distance becomes a fill percentage against the tank depth.
//!
//! ```text
//!   sensor ──┬──  distance
//!            │
//!   water ───┴──  ─┐
//!                  │ depth - distance
//!   floor ────────  ┘
//! ```

/// Speed of sound at ~20 °C in cm/µs.
const SOUND_CM_PER_US: f32 = 0.034;

/// One-way distance in whole centimetres for an echo round trip.
pub fn distance_cm(round_trip_us: u32) -> u32 {
    (round_trip_us as f32 * SOUND_CM_PER_US / 2.0) as u32
}

/// Fill percentage for a measured distance.
///
/// A distance beyond the tank depth (surface below the floor reference,
/// a stray reflection, or an empty tank) reads as 0 %, never negative.
pub fn level_percent(distance_cm: u32, tank_depth_cm: u16) -> u8 {
    let depth = u32::from(tank_depth_cm);
    if depth == 0 || distance_cm > depth {
        return 0;
    }
    ((depth - distance_cm) * 100 / depth).min(100) as u8
}

/// Fill percentage straight from an echo measurement; no echo reads as empty.
pub fn level_from_echo(round_trip_us: Option<u32>, tank_depth_cm: u16) -> u8 {
    match round_trip_us {
        Some(us) => level_percent(distance_cm(us), tank_depth_cm),
        None => 0,
    }
}
