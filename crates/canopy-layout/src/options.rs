use serde::{Deserialize, Serialize};

pub const MIN_FACTOR: f64 = 0.05;
pub const MAX_FACTOR: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutOptions {
    /// Scales every placement radius by `radius_factor^1.5`.
    pub radius_factor: f64,
    /// Scales the polar offset of outer shells.
    pub angle_factor: f64,
    /// Depth bound for the subtree weight that drives placement radius.
    pub weight_depth: u32,
    /// Radius contribution per `sqrt(subtree weight)`.
    pub radius_scale: f64,
    /// Radius contribution per visible sibling.
    pub sibling_spacing: f64,
    /// Polar offset numerator for shells: `layer * shell_spread / radius` degrees.
    pub shell_spread: f64,
    /// Place heavier subtrees first (stable for equal weights).
    pub sort_children_by_weight: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            radius_factor: 1.0,
            angle_factor: 1.0,
            weight_depth: canopy_tree::DEFAULT_WEIGHT_DEPTH,
            radius_scale: 7.0,
            sibling_spacing: 7.0,
            shell_spread: 1000.0,
            sort_children_by_weight: false,
        }
    }
}

impl LayoutOptions {
    pub fn with_factors(mut self, radius_factor: f64, angle_factor: f64) -> Self {
        self.radius_factor = radius_factor;
        self.angle_factor = angle_factor;
        self
    }

    /// Copy with factors clamped to `[MIN_FACTOR, MAX_FACTOR]` and negative spacings zeroed.
    /// Non-finite values fall back to the defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            radius_factor: clamp_factor(self.radius_factor),
            angle_factor: clamp_factor(self.angle_factor),
            weight_depth: self.weight_depth,
            radius_scale: non_negative(self.radius_scale, defaults.radius_scale),
            sibling_spacing: non_negative(self.sibling_spacing, defaults.sibling_spacing),
            shell_spread: non_negative(self.shell_spread, defaults.shell_spread),
            sort_children_by_weight: self.sort_children_by_weight,
        }
    }
}

fn clamp_factor(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(MIN_FACTOR, MAX_FACTOR)
    } else {
        1.0
    }
}

fn non_negative(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_factors() {
        let opts = LayoutOptions::default().with_factors(-3.0, 50.0).sanitized();
        assert_eq!(opts.radius_factor, MIN_FACTOR);
        assert_eq!(opts.angle_factor, MAX_FACTOR);

        let opts = LayoutOptions::default()
            .with_factors(f64::NAN, f64::INFINITY)
            .sanitized();
        assert_eq!(opts.radius_factor, 1.0);
        assert_eq!(opts.angle_factor, 1.0);
    }
}
