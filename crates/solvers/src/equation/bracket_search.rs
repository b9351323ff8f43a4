//! Locating a bracket for bisection when the given interval has none.
//!
//! Stages run in a fixed order and the first success wins:
//!
//! 1. [`Stage::Endpoint`]: either endpoint is already a root.
//! 2. [`Stage::Expansion`]: grow the interval symmetrically.
//! 3. [`Stage::Offset`]: shift the interval by small offsets, then repeat
//!    stages 1 and 2 on the shifted interval.
//! 4. [`Stage::Subdivision`]: split the interval into equal panels and look
//!    for a sign change between adjacent nodes.
//! 5. [`Stage::WideScan`]: walk outward from the interval at a coarse step.
//!
//! Points where the function is not finite are skipped.

use numeth_core::{Function, evaluate};
use tracing::{debug, info};

/// Search stage that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Stage {
    /// The interval already bracketed a root, or an endpoint is one.
    Endpoint,
    Expansion,
    Offset,
    Subdivision,
    WideScan,
}

impl Stage {
    /// Returns the stage name used in reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Stage::Endpoint => "endpoint",
            Stage::Expansion => "expansion",
            Stage::Offset => "offset",
            Stage::Subdivision => "subdivision",
            Stage::WideScan => "wide_scan",
        }
    }
}

/// A bracket found by the search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Found {
    /// Ordered interval with a sign change.
    pub bracket: [f64; 2],
    /// Stage that found it.
    pub stage: Stage,
    /// True when other brackets may exist elsewhere.
    ///
    /// Set whenever the bracket lies outside the requested interval, or when
    /// subdivision saw more than one sign change.
    pub others_possible: bool,
}

/// Outcome of a bracket search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "outcome", rename_all = "snake_case")
)]
pub enum Outcome {
    Found(Found),
    ExactRoot { x: f64, stage: Stage },
    NotFound { reason: String },
}

/// Tuning constants for the search stages.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub expansion_step: f64,
    pub expansion_attempts: usize,
    pub offsets: Vec<f64>,
    pub panels: usize,
    pub wide_radius: f64,
    pub wide_step: f64,
    pub wide_max_points: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            expansion_step: 0.5,
            expansion_attempts: 20,
            offsets: vec![0.1, -0.1, 0.5, -0.5],
            panels: 20,
            wide_radius: 100.0,
            wide_step: 0.5,
            wide_max_points: 1000,
        }
    }
}

/// Searches for a bracket around `[xi, xu]` using [`SearchConfig::default`].
///
/// `tolerance` decides when a function value counts as an exact root.
pub fn find_bracket<F: Function<1>>(f: &F, xi: f64, xu: f64, tolerance: f64) -> Outcome {
    find_bracket_with(f, xi, xu, tolerance, &SearchConfig::default())
}

/// Searches for a bracket around `[xi, xu]` with explicit search constants.
pub fn find_bracket_with<F: Function<1>>(
    f: &F,
    xi: f64,
    xu: f64,
    tolerance: f64,
    search: &SearchConfig,
) -> Outcome {
    if !xi.is_finite() || !xu.is_finite() {
        return Outcome::NotFound {
            reason: format!("interval [{xi}, {xu}] is not finite"),
        };
    }
    let (lo, hi) = if xi <= xu { (xi, xu) } else { (xu, xi) };
    let searcher = Searcher { f, tolerance };

    let outcome = searcher
        .at_endpoints(lo, hi, Stage::Endpoint)
        .or_else(|| searcher.expand(lo, hi, search, Stage::Expansion))
        .or_else(|| {
            search.offsets.iter().find_map(|offset| {
                let (a, b) = (lo + offset, hi + offset);
                searcher
                    .at_endpoints(a, b, Stage::Offset)
                    .or_else(|| searcher.expand(a, b, search, Stage::Offset))
            })
        })
        .or_else(|| searcher.subdivide(lo, hi, search.panels))
        .or_else(|| searcher.wide_scan(lo, hi, search));

    match outcome {
        Some(outcome) => {
            log_outcome(&outcome, lo, hi);
            outcome
        }
        None => {
            debug!(lo, hi, "no bracket found");
            Outcome::NotFound {
                reason: format!(
                    "no sign change found within {} of [{lo}, {hi}]",
                    search.wide_radius
                ),
            }
        }
    }
}

fn log_outcome(outcome: &Outcome, lo: f64, hi: f64) {
    match outcome {
        Outcome::Found(found) if found.stage != Stage::Endpoint => {
            let [left, right] = found.bracket;
            info!(
                lo,
                hi,
                left,
                right,
                stage = found.stage.name(),
                "adjusted interval to bracket a root"
            );
        }
        Outcome::ExactRoot { x, stage } => {
            info!(x, stage = stage.name(), "found an exact root while searching");
        }
        _ => {}
    }
}

struct Searcher<'a, F> {
    f: &'a F,
    tolerance: f64,
}

impl<F: Function<1>> Searcher<'_, F> {
    fn value(&self, x: f64) -> Option<f64> {
        evaluate(self.f, [x]).ok()
    }

    fn is_root(&self, fx: f64) -> bool {
        fx.abs() < self.tolerance
    }

    /// Exact-root check at both endpoints, then a plain sign-change check.
    fn at_endpoints(&self, a: f64, b: f64, stage: Stage) -> Option<Outcome> {
        let fa = self.value(a);
        let fb = self.value(b);

        for (x, fx) in [(a, fa), (b, fb)] {
            if fx.is_some_and(|fx| self.is_root(fx)) {
                return Some(Outcome::ExactRoot { x, stage });
            }
        }

        match (fa, fb) {
            (Some(fa), Some(fb)) if fa * fb < 0.0 => Some(Outcome::Found(Found {
                bracket: [a, b],
                stage,
                others_possible: stage != Stage::Endpoint,
            })),
            _ => None,
        }
    }

    fn expand(&self, a: f64, b: f64, search: &SearchConfig, stage: Stage) -> Option<Outcome> {
        (1..=search.expansion_attempts).find_map(|k| {
            let delta = k as f64 * search.expansion_step;
            let (a, b) = (a - delta, b + delta);
            let (fa, fb) = (self.value(a)?, self.value(b)?);

            if self.is_root(fa) && self.is_root(fb) {
                return None;
            }
            (fa * fb < 0.0).then_some(Outcome::Found(Found {
                bracket: [a, b],
                stage,
                others_possible: true,
            }))
        })
    }

    fn subdivide(&self, lo: f64, hi: f64, panels: usize) -> Option<Outcome> {
        if panels == 0 {
            return None;
        }
        let width = (hi - lo) / panels as f64;
        let nodes: Vec<(f64, Option<f64>)> = (0..=panels)
            .map(|i| {
                let x = if i == panels { hi } else { lo + i as f64 * width };
                (x, self.value(x))
            })
            .collect();

        let mut changes = nodes.windows(2).filter_map(|pair| match pair {
            [(a, Some(fa)), (b, Some(fb))] if fa * fb < 0.0 => Some([*a, *b]),
            _ => None,
        });

        if let Some(bracket) = changes.next() {
            return Some(Outcome::Found(Found {
                bracket,
                stage: Stage::Subdivision,
                others_possible: changes.next().is_some(),
            }));
        }

        nodes.iter().find_map(|&(x, fx)| {
            fx.is_some_and(|fx| self.is_root(fx))
                .then_some(Outcome::ExactRoot {
                    x,
                    stage: Stage::Subdivision,
                })
        })
    }

    /// Walks outward on both sides, nearest panels first.
    fn wide_scan(&self, lo: f64, hi: f64, search: &SearchConfig) -> Option<Outcome> {
        if search.wide_step <= 0.0 {
            return None;
        }
        let mut right = (hi, self.value(hi));
        let mut left = (lo, self.value(lo));
        let mut evaluated = 2;

        let mut k = 1;
        while k as f64 * search.wide_step <= search.wide_radius
            && evaluated + 2 <= search.wide_max_points
        {
            let delta = k as f64 * search.wide_step;

            let next_right = (hi + delta, self.value(hi + delta));
            let next_left = (lo - delta, self.value(lo - delta));
            evaluated += 2;

            for (x, fx) in [next_right, next_left] {
                if fx.is_some_and(|fx| self.is_root(fx)) {
                    return Some(Outcome::ExactRoot {
                        x,
                        stage: Stage::WideScan,
                    });
                }
            }
            if let (Some(fa), Some(fb)) = (right.1, next_right.1)
                && fa * fb < 0.0
            {
                return Some(self.wide_found([right.0, next_right.0]));
            }
            if let (Some(fa), Some(fb)) = (next_left.1, left.1)
                && fa * fb < 0.0
            {
                return Some(self.wide_found([next_left.0, left.0]));
            }

            right = next_right;
            left = next_left;
            k += 1;
        }
        None
    }

    fn wide_found(&self, bracket: [f64; 2]) -> Outcome {
        Outcome::Found(Found {
            bracket,
            stage: Stage::WideScan,
            others_possible: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use numeth_core::from_fn;

    const TOL: f64 = 1e-6;

    fn found(outcome: Outcome) -> Found {
        match outcome {
            Outcome::Found(found) => found,
            other => panic!("expected a bracket, got {other:?}"),
        }
    }

    #[test]
    fn valid_interval_is_returned_unchanged() {
        let f = from_fn(|x: f64| x * x - 4.0);
        let found = found(find_bracket(&f, 3.0, 0.0, TOL));

        assert_eq!(found.stage, Stage::Endpoint);
        assert_eq!(found.bracket, [0.0, 3.0]);
        assert!(!found.others_possible);
    }

    #[test]
    fn endpoint_root_is_reported() {
        let f = from_fn(|x: f64| x * x - 4.0);
        assert_eq!(
            find_bracket(&f, 2.0, 5.0, TOL),
            Outcome::ExactRoot {
                x: 2.0,
                stage: Stage::Endpoint
            }
        );
    }

    #[test]
    fn expansion_reaches_a_nearby_root() {
        // Root at 2.7, interval [0, 2] has f < 0 at both ends.
        let f = from_fn(|x: f64| x - 2.7);
        let found = found(find_bracket(&f, 0.0, 2.0, TOL));

        assert_eq!(found.stage, Stage::Expansion);
        let [a, b] = found.bracket;
        assert_relative_eq!(a, -1.0);
        assert_relative_eq!(b, 3.0);
        assert!(found.others_possible);
    }

    #[test]
    fn expansion_skips_pairs_that_are_both_near_zero() {
        // Tiny opposite-sign values at the first expanded pair, a real
        // sign change only at the second.
        let f = from_fn(|x: f64| {
            if (-0.6..-0.4).contains(&x) {
                -1e-7
            } else if (1.4..1.6).contains(&x) {
                1e-7
            } else if x < -0.75 {
                -1.0
            } else {
                1.0
            }
        });

        let found = found(find_bracket_with(&f, 0.0, 1.0, TOL, &SearchConfig::default()));

        assert_eq!(found.stage, Stage::Expansion);
        assert_relative_eq!(found.bracket[0], -1.0);
        assert_relative_eq!(found.bracket[1], 2.0);
    }

    #[test]
    fn offset_escapes_symmetric_functions() {
        // Even function on a symmetric interval: expansion never changes sign.
        let f = from_fn(|x: f64| x * x - 9.0);
        let found = found(find_bracket(&f, -1.0, 1.0, TOL));

        assert_eq!(found.stage, Stage::Offset);
        let [a, b] = found.bracket;
        assert_relative_eq!(a, -2.9, epsilon = 1e-12);
        assert_relative_eq!(b, 3.1, epsilon = 1e-12);
    }

    #[test]
    fn subdivision_finds_interior_pair_of_roots() {
        // Roots at 0.3 and 0.6; same sign at both ends.
        let f = from_fn(|x: f64| (x - 0.3) * (x - 0.6));
        let search = SearchConfig {
            expansion_attempts: 0,
            offsets: Vec::new(),
            ..SearchConfig::default()
        };
        let found = found(find_bracket_with(&f, 0.0, 1.0, TOL, &search));

        assert_eq!(found.stage, Stage::Subdivision);
        let [a, b] = found.bracket;
        assert!(a <= 0.3 && 0.3 <= b);
        assert!(found.others_possible);
    }

    #[test]
    fn wide_scan_finds_distant_root() {
        let f = from_fn(|x: f64| x - 40.2);
        let search = SearchConfig {
            expansion_attempts: 4,
            offsets: Vec::new(),
            ..SearchConfig::default()
        };
        let found = found(find_bracket_with(&f, 0.0, 1.0, TOL, &search));

        assert_eq!(found.stage, Stage::WideScan);
        let [a, b] = found.bracket;
        assert!(a < 40.2 && 40.2 < b);
        assert_relative_eq!(b - a, 0.5);
    }

    #[test]
    fn no_real_root_is_not_found() {
        let f = from_fn(|x: f64| x * x + 1.0);
        assert!(matches!(
            find_bracket(&f, -1.0, 1.0, TOL),
            Outcome::NotFound { .. }
        ));
    }

    #[test]
    fn wide_scan_reports_node_on_root() {
        let f = from_fn(|x: f64| x - 11.0);
        let search = SearchConfig {
            expansion_attempts: 0,
            offsets: Vec::new(),
            ..SearchConfig::default()
        };
        assert_eq!(
            find_bracket_with(&f, 0.0, 1.0, TOL, &search),
            Outcome::ExactRoot {
                x: 11.0,
                stage: Stage::WideScan
            }
        );
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let f = from_fn(|x: f64| if x < 0.0 { f64::NAN } else { x - 2.7 });
        let found = found(find_bracket(&f, 0.0, 1.0, TOL));
        let [a, b] = found.bracket;
        assert!(a < 2.7 && 2.7 < b);
    }
}
