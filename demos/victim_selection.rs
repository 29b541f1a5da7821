use setlfu::tracker::SetFrequencyTracker;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = SetFrequencyTracker::new();

    for set in 0..4 {
        tracker.register(set, 8);
    }

    for set in [0, 1, 1, 3, 0, 0] {
        tracker.record_access(set)?;
    }

    println!("victim set: {}", tracker.least_used_set()?);
    Ok(())
}

// Expected output:
// victim set: 2
//
// Explanation: sets 0, 1 and 3 were accessed 3, 2 and 1 times; set 2 was
// never accessed, so it is the least-frequently-used victim.
