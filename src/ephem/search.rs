//! Zero-crossing search over a bounded time window.
//!
//! The function is sampled at a fixed step away from the start instant; the
//! first bracketing pair is refined by bisection.

/// Sampling step, in days.
const SCAN_STEP_DAYS: f64 = 10.0 / 1440.0;

/// How far from the start instant an event is looked for, in days.
pub const SEARCH_WINDOW_DAYS: f64 = 2.0;

/// 10 minutes halved 32 times is far below a millisecond.
const BISECTION_STEPS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Why no crossing was found inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// Every sample was non-negative.
    AlwaysNonNegative,
    /// Every sample was negative.
    AlwaysNegative,
    /// Both signs occurred, but never in the wanted order.
    NoCrossing,
}

/// Find where `f` goes from negative to non-negative as time advances,
/// searching from `start` (a Julian Date) in `direction`.
///
/// For [`Direction::Next`] the earliest such instant after `start` is
/// returned, for [`Direction::Previous`] the latest one before it.
pub fn find_upward_crossing<F>(f: F, start: f64, direction: Direction) -> Result<f64, SearchFailure>
where
    F: Fn(f64) -> f64,
{
    let steps = (SEARCH_WINDOW_DAYS / SCAN_STEP_DAYS).ceil() as usize;
    let sign = match direction {
        Direction::Next => 1.0,
        Direction::Previous => -1.0,
    };

    let mut prev_t = start;
    let mut prev_v = f(start);
    let mut seen_negative = prev_v < 0.0;
    let mut seen_non_negative = !seen_negative;

    for i in 1..=steps {
        let t = start + sign * i as f64 * SCAN_STEP_DAYS;
        let v = f(t);

        let (lo, lo_v, hi, hi_v) = match direction {
            Direction::Next => (prev_t, prev_v, t, v),
            Direction::Previous => (t, v, prev_t, prev_v),
        };
        if lo_v < 0.0 && hi_v >= 0.0 {
            return Ok(bisect(&f, lo, hi));
        }

        if v < 0.0 {
            seen_negative = true;
        } else {
            seen_non_negative = true;
        }
        prev_t = t;
        prev_v = v;
    }

    Err(match (seen_negative, seen_non_negative) {
        (false, _) => SearchFailure::AlwaysNonNegative,
        (true, false) => SearchFailure::AlwaysNegative,
        (true, true) => SearchFailure::NoCrossing,
    })
}

fn bisect<F: Fn(f64) -> f64>(f: &F, mut lo: f64, mut hi: f64) -> f64 {
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if f(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
