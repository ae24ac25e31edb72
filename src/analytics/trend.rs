use super::types::{Direction, Ratio, Trend, WindowCounts};

/// Compare the prior window's update counts against the current window's.
///
/// `change` is the absolute difference in matched counts and `direction` is
/// `up` when the current count is at least the prior one (a tie is `up` with
/// change 0). `percentage_change` is the percentage-point difference between
/// the two window ratios with its sign flipped to follow `direction`, or
/// `"--"` when either window has a zero total. Because the totals can
/// differ, a `down` direction can still carry a negative percentage-point
/// value.
pub fn compare(prior: WindowCounts, current: WindowCounts) -> Trend {
    let (direction, change) = if current.matched >= prior.matched {
        (Direction::Up, current.matched - prior.matched)
    } else {
        (Direction::Down, prior.matched - current.matched)
    };

    let percentage_change = if prior.total == 0 || current.total == 0 {
        Ratio::NotApplicable
    } else {
        let prior_ratio = prior.matched as f64 / prior.total as f64;
        let current_ratio = current.matched as f64 / current.total as f64;
        let diff = match direction {
            Direction::Up => current_ratio - prior_ratio,
            Direction::Down => prior_ratio - current_ratio,
        };
        Ratio::Percent((diff * 100.0).round() as i64)
    };

    Trend {
        change,
        percentage_change,
        direction,
    }
}
