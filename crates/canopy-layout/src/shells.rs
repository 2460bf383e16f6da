//! Shell capacity planning for non-root parents.
//!
//! Shell 0 holds one child straight ahead on the central axis. Shell `L` holds up to `3L + 1`
//! children; when filling a shell would leave fewer than a quarter of its capacity for the next
//! one, the remainder is folded into the current shell instead.

const TRAILING_SHELL_RATIO: f64 = 0.25;

pub fn shell_capacity(layer: usize) -> usize {
    3 * layer + 1
}

/// Number of children placed in each shell, innermost first. Sums to `count`.
pub fn plan_shells(count: usize) -> Vec<usize> {
    let mut shells = Vec::new();
    if count == 0 {
        return shells;
    }

    shells.push(1);
    let mut done = 1;
    let mut layer = 0;
    while done < count {
        layer += 1;
        let capacity = shell_capacity(layer);
        let remaining = count - done;
        let mut take = capacity.min(remaining);
        if ((remaining - take) as f64) < TRAILING_SHELL_RATIO * capacity as f64 {
            take = remaining;
        }
        shells.push(take);
        done += take;
    }
    shells
}
