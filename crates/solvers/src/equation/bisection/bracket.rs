use thiserror::Error;

/// Problems with the endpoints handed to bisection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BracketError {
    #[error("bracket endpoints must be finite")]
    NonFinite,
    #[error("bracket endpoints must differ")]
    ZeroWidth,
}

/// Which side of zero a function value falls on. Zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }
}

/// A finite, non-degenerate interval with `left < right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    left: f64,
    right: f64,
}

impl Bounds {
    /// Sorts the endpoints of `[a, b]`.
    ///
    /// # Errors
    ///
    /// Fails if either endpoint is NaN or infinite, or if `a == b`.
    #[allow(clippy::float_cmp)]
    pub fn new([a, b]: [f64; 2]) -> Result<Self, BracketError> {
        if !(a.is_finite() && b.is_finite()) {
            return Err(BracketError::NonFinite);
        }
        if a == b {
            return Err(BracketError::ZeroWidth);
        }
        let (left, right) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { left, right })
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.right
    }

    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.left, self.right]
    }
}

/// The shrinking search interval of a bisection run.
///
/// `f` changes sign across the interval, so only the sign at `left` is kept;
/// the sign at `right` is always its opposite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Bracket {
    left: f64,
    right: f64,
    left_sign: Sign,
}

impl Bracket {
    /// Returns `None` unless `f` changes sign across `bounds`.
    pub(super) fn new(bounds: Bounds, left_sign: Sign, right_sign: Sign) -> Option<Self> {
        if left_sign == right_sign {
            return None;
        }
        Some(Self {
            left: bounds.left,
            right: bounds.right,
            left_sign,
        })
    }

    pub(super) fn left(&self) -> f64 {
        self.left
    }

    pub(super) fn right(&self) -> f64 {
        self.right
    }

    pub(super) fn midpoint(&self) -> f64 {
        self.left + self.half_width()
    }

    /// Largest possible distance from the midpoint to the root.
    pub(super) fn half_width(&self) -> f64 {
        0.5 * (self.right - self.left)
    }

    /// Moves whichever endpoint shares `sign` to `x`.
    pub(super) fn shrink(&mut self, x: f64, sign: Sign) {
        if sign == self.left_sign {
            self.left = x;
        } else {
            self.right = x;
        }
    }
}
