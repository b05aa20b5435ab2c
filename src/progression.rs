//! Level and experience math.
//!
//! Pure functions: identical inputs always give identical outputs, so views
//! built on them can be recomputed or memoized freely.
//!
//! The curve is quadratic: reaching level `l + 1` takes `l² × 100` experience.

use crate::error::{Error, Result};
use crate::model::CharacterAttributes;

/// Experience points per squared level step.
const EXP_PER_LEVEL_SQUARED: i64 = 100;

/// Level reached with `experience` points: `floor(sqrt(e / 100)) + 1`.
///
/// # Errors
/// Negative experience is a contract violation and is rejected rather than
/// clamped.
pub fn level_for_experience(experience: i64) -> Result<i32> {
    if experience < 0 {
        return Err(Error::NegativeExperience(experience));
    }
    // Integer square root avoids float rounding at exact level boundaries.
    let steps = experience / EXP_PER_LEVEL_SQUARED;
    Ok(isqrt(steps) as i32 + 1)
}

/// Total experience at which level `level + 1` starts: `l² × 100`,
/// saturating at `i64::MAX`.
pub fn experience_for_level(level: i32) -> i64 {
    let l = level as i64;
    l.saturating_mul(l).saturating_mul(EXP_PER_LEVEL_SQUARED)
}

/// Fraction of the way from `level` to the next one, within `[0, 1]`.
pub fn level_progress(level: i32, experience: i64) -> f64 {
    let lo = experience_for_level(level.saturating_sub(1));
    let hi = experience_for_level(level);
    if hi > lo {
        (experience.saturating_sub(lo) as f64 / (hi - lo) as f64).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Experience still missing before the next level; never negative.
pub fn experience_to_next_level(level: i32, experience: i64) -> i64 {
    experience_for_level(level).saturating_sub(experience).max(0)
}

pub fn total_attribute_points(attributes: &CharacterAttributes) -> i32 {
    attributes.strength
        + attributes.intelligence
        + attributes.charisma
        + attributes.dexterity
        + attributes.wisdom
        + attributes.constitution
}

/// Does `level` match what `experience` implies?
pub fn is_consistent(level: i32, experience: i64) -> bool {
    level_for_experience(experience).is_ok_and(|expected| expected == level)
}

fn isqrt(n: i64) -> i64 {
    let mut x = (n as f64).sqrt() as i64;
    while x * x > n {
        x -= 1;
    }
    while (x + 1) * (x + 1) <= n {
        x += 1;
    }
    x
}
