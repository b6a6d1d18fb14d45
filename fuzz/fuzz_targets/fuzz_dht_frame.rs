//! Fuzz target: `dht22::decode_frame`
//!
//! Any 5-byte frame off the wire must decode or be rejected without
//! panicking. Accepted frames must carry a matching checksum and values
//! inside the 15-bit field range.
//!
//! cargo fuzz run fuzz_dht_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use waterharvest::drivers::dht22::decode_frame;

fuzz_target!(|data: &[u8]| {
    let Some(frame) = data.get(..5).and_then(|s| <[u8; 5]>::try_from(s).ok()) else {
        return;
    };

    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    match decode_frame(frame) {
        Ok((temperature, humidity)) => {
            assert_eq!(sum, frame[4], "accepted frame with bad checksum");
            assert!(temperature.abs() <= 3276.7);
            assert!((0.0..=6553.5).contains(&humidity));
        }
        Err(_) => assert_ne!(sum, frame[4], "rejected frame with good checksum"),
    }
});
