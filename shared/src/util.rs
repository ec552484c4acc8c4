use std::sync::Mutex;

/// 当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-millisecond sequence (4096 ids per ms)
///
/// Ids are strictly increasing across a process, including within a
/// single millisecond, so `ORDER BY id` matches insertion order.
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    // (last millisecond used, sequence within it)
    static STATE: Mutex<(i64, i64)> = Mutex::new((0, 0));

    let mut state = STATE.lock().unwrap_or_else(|e| e.into_inner());
    let now = now_millis().max(state.0); // tolerate clock going backwards
    if now == state.0 {
        state.1 += 1;
        if state.1 > 0xFFF {
            // sequence exhausted, spill into the next millisecond
            state.0 += 1;
            state.1 = 0;
        }
    } else {
        state.0 = now;
        state.1 = 0;
    }

    let ts = (state.0 - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    (ts << 12) | state.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_fits_in_53_bits() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1i64 << 53));
    }

    #[test]
    fn test_snowflake_monotonic_across_millis() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(b > a);
    }

    #[test]
    fn test_snowflake_strictly_increasing_within_millisecond() {
        // A tight loop lands many ids in the same millisecond; every one
        // must still be larger than the one before it.
        let mut prev = snowflake_id();
        for _ in 0..5_000 {
            let next = snowflake_id();
            assert!(next > prev, "{next} should sort after {prev}");
            prev = next;
        }
    }
}
