//! Timing-class labels and the displacement metric.
//!
//! A segmentation label such as "ESMS" asserts one or more of the three
//! replication-timing classes (Early, Mid, Late) at a locus. Labels are
//! encoded as presence vectors over the three classes; the displacement
//! between two profiles at a tile is the shift of the index centroid of
//! the asserted classes.

use crate::error::RatError;

/// Canonical segmentation labels in temporal order.
pub const TIMING_LABELS: [&str; 7] = ["ES", "ESMS", "MS", "MSLS", "LS", "ESLS", "ESMSLS"];

/// Display colours for the canonical labels, kept for downstream
/// visualization consumers.
pub const LABEL_COLORS: [&str; 7] = [
    "#2250F1", "#28C5CC", "#1A8A12", "#FFFD33", "#FB0018", "#EA3CF2", "#FAB427",
];

pub fn label_color(label: &str) -> Option<&'static str> {
    TIMING_LABELS
        .iter()
        .position(|&l| l == label)
        .map(|i| LABEL_COLORS[i])
}

/// One replication-timing class. The discriminant order is temporal and
/// doubles as the index into a [`TimingVec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingClass {
    Early,
    Mid,
    Late,
}

impl TimingClass {
    fn from_token(token: &str) -> Option<TimingClass> {
        match token {
            "E" => Some(TimingClass::Early),
            "M" => Some(TimingClass::Mid),
            "L" => Some(TimingClass::Late),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TimingClass::Early => 0,
            TimingClass::Mid => 1,
            TimingClass::Late => 2,
        }
    }
}

/// Per-tile presence vector over (Early, Mid, Late). The default value
/// is all-false, meaning no timing class assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimingVec([bool; 3]);

impl TimingVec {
    pub const UNASSIGNED: TimingVec = TimingVec([false; 3]);

    pub fn is_unassigned(&self) -> bool {
        self.0 == [false; 3]
    }

    pub fn class_count(&self) -> usize {
        self.0.iter().filter(|&&set| set).count()
    }

    /// Arithmetic mean of the indices of the asserted classes.
    /// Callers must check `is_unassigned` first.
    fn index_mean(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0.0;
        for (i, &set) in self.0.iter().enumerate() {
            if set {
                sum += i as f64;
                count += 1.0;
            }
        }
        sum / count
    }
}

/// Encode a segmentation label into its timing-class presence vector.
///
/// A label is a concatenation of `S`-suffixed class tokens: "ESMS"
/// asserts Early and Mid, "ESMSLS" all three. Tokens are OR'd, so
/// order does not matter. A token outside {E, M, L} or a label not
/// ending in the `S` suffix is a format error.
pub fn encode(label: &str) -> Result<TimingVec, RatError> {
    let body = label.strip_suffix('S').ok_or_else(|| {
        RatError::Format(format!("timing label '{}' does not end in the S suffix", label))
    })?;
    if body.is_empty() {
        return Err(RatError::Format(format!("empty timing label '{}'", label)));
    }

    let mut bits = [false; 3];
    for token in body.split('S') {
        match TimingClass::from_token(token) {
            Some(class) => bits[class.index()] = true,
            None => {
                return Err(RatError::Format(format!(
                    "unrecognized timing token '{}' in label '{}'",
                    token, label
                )))
            }
        }
    }
    Ok(TimingVec(bits))
}

/// Signed shift of the index centroid from `a` to `b`.
///
/// Returns 0 exactly when either tile is unassigned, so that tiles with
/// no replication signal never contribute a spurious shift. Mixed
/// labels are compared by the centroid of their asserted classes, which
/// makes certain distinct pairs collide: {Early,Late} vs {Mid} both
/// have centroid 1 and yield 0. This is a known approximation of the
/// metric, kept as-is; EL and EML calls are rare enough in practice.
pub fn displacement(a: TimingVec, b: TimingVec) -> f64 {
    if a.is_unassigned() || b.is_unassigned() {
        return 0.0;
    }
    b.index_mean() - a.index_mean()
}
