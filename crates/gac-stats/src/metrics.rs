// Swing metrics: length, acceleration, 20-80 score, and nearest-centroid
// swing classification.
//
// Length and acceleration come from bat speed and time to contact using
// empirically calibrated constants. The classification assigns a
// (bat speed, acceleration, attack angle) point to the closest of eight
// reference swing clusters, each carrying a static scouting profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Time-to-contact divisor in the swing length formula.
pub const SWING_LENGTH_CALIBRATION: f64 = 1.3636;

/// Scale factor in the swing acceleration formula.
pub const SWING_ACCELERATION_FACTOR: f64 = 0.03343;

pub const SCORE_FLOOR: f64 = 20.0;
pub const SCORE_CEILING: f64 = 80.0;

pub const DEFAULT_MIN_ACCELERATION: f64 = 15.0;
pub const DEFAULT_MAX_ACCELERATION: f64 = 30.0;

/// Typical input ranges for the swing calculator (mph, degrees, seconds).
/// Advisory only: values outside them are still evaluated.
pub const BAT_SPEED_RANGE: RangeInclusive<f64> = 50.0..=90.0;
pub const ATTACK_ANGLE_RANGE: RangeInclusive<f64> = -5.0..=25.0;
pub const TIME_TO_CONTACT_RANGE: RangeInclusive<f64> = 0.1..=0.2;

pub const DEFAULT_BAT_SPEED: f64 = 65.0;
pub const DEFAULT_ATTACK_ANGLE: f64 = 0.0;
pub const DEFAULT_TIME_TO_CONTACT: f64 = 0.15;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("swing length is zero, swing acceleration is undefined")]
    ZeroSwingLength,

    #[error("{0} is not a finite number")]
    NonFinite(&'static str),

    #[error("invalid swing score scale: min acceleration {min} must be below max acceleration {max}")]
    InvalidScale { min: f64, max: f64 },
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Swing length in feet: `(time_to_contact / 1.3636) * bat_speed`.
///
/// No bounds checking; non-positive inputs give a zero or negative length.
pub fn swing_length(time_to_contact: f64, bat_speed: f64) -> f64 {
    (time_to_contact / SWING_LENGTH_CALIBRATION) * bat_speed
}

/// Swing acceleration in g: `0.03343 * bat_speed² / swing_length`.
pub fn swing_acceleration(bat_speed: f64, swing_length: f64) -> Result<f64, MetricError> {
    if swing_length == 0.0 {
        return Err(MetricError::ZeroSwingLength);
    }
    let acceleration = SWING_ACCELERATION_FACTOR * bat_speed.powi(2) / swing_length;
    if !acceleration.is_finite() {
        return Err(MetricError::NonFinite("swing acceleration"));
    }
    Ok(acceleration)
}

/// Maps swing acceleration linearly onto the 20-80 scouting scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingScoreScale {
    pub min_acceleration: f64,
    pub max_acceleration: f64,
}

impl SwingScoreScale {
    pub fn new(min_acceleration: f64, max_acceleration: f64) -> Result<Self, MetricError> {
        let scale = SwingScoreScale {
            min_acceleration,
            max_acceleration,
        };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<(), MetricError> {
        let (min, max) = (self.min_acceleration, self.max_acceleration);
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(MetricError::InvalidScale { min, max });
        }
        Ok(())
    }

    /// `clamp(20 + (acc - min) / (max - min) * 60, 20, 80)`.
    ///
    /// Always lands in [20, 80]; a NaN input scores the floor.
    pub fn score(&self, swing_acceleration: f64) -> f64 {
        let span = self.max_acceleration - self.min_acceleration;
        let raw = SCORE_FLOOR
            + (swing_acceleration - self.min_acceleration) / span * (SCORE_CEILING - SCORE_FLOOR);
        raw.max(SCORE_FLOOR).min(SCORE_CEILING)
    }
}

impl Default for SwingScoreScale {
    fn default() -> Self {
        SwingScoreScale {
            min_acceleration: DEFAULT_MIN_ACCELERATION,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
        }
    }
}

/// Swing score on the default 15-30 g scale.
pub fn swing_score(swing_acceleration: f64) -> f64 {
    SwingScoreScale::default().score(swing_acceleration)
}

// ---------------------------------------------------------------------------
// Swing space
// ---------------------------------------------------------------------------

/// A point in (bat speed, swing acceleration, attack angle) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwingPoint {
    pub bat_speed: f64,
    pub swing_acceleration: f64,
    pub attack_angle: f64,
}

impl SwingPoint {
    pub const fn new(bat_speed: f64, swing_acceleration: f64, attack_angle: f64) -> Self {
        SwingPoint {
            bat_speed,
            swing_acceleration,
            attack_angle,
        }
    }

    fn coords(&self) -> [f64; 3] {
        [self.bat_speed, self.swing_acceleration, self.attack_angle]
    }
}

/// Straight-line distance between two swing points.
pub fn euclidean_distance(a: &SwingPoint, b: &SwingPoint) -> f64 {
    a.coords()
        .iter()
        .zip(b.coords())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

// ---------------------------------------------------------------------------
// Swing clusters
// ---------------------------------------------------------------------------

/// The eight reference swing clusters.
///
/// Declaration order is the tie-break order: when two centroids are
/// equidistant, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SwingCluster {
    Orange,
    Purple,
    Red,
    Grey,
    Green,
    Pink,
    Brown,
    Blue,
}

/// League outcomes typical of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedMetrics {
    pub woba: f64,
    pub whiff_pct: f64,
    pub barrel_pct: f64,
    pub batting_avg: f64,
    pub iso: f64,
}

/// Static scouting profile of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClusterProfile {
    pub centroid: SwingPoint,
    pub comparables: [&'static str; 3],
    pub description: &'static str,
    pub expected: ExpectedMetrics,
}

impl SwingCluster {
    pub const ALL: [SwingCluster; 8] = [
        SwingCluster::Orange,
        SwingCluster::Purple,
        SwingCluster::Red,
        SwingCluster::Grey,
        SwingCluster::Green,
        SwingCluster::Pink,
        SwingCluster::Brown,
        SwingCluster::Blue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SwingCluster::Orange => "Orange",
            SwingCluster::Purple => "Purple",
            SwingCluster::Red => "Red",
            SwingCluster::Grey => "Grey",
            SwingCluster::Green => "Green",
            SwingCluster::Pink => "Pink",
            SwingCluster::Brown => "Brown",
            SwingCluster::Blue => "Blue",
        }
    }

    pub fn profile(&self) -> &'static ClusterProfile {
        &CLUSTER_PROFILES[*self as usize]
    }

    pub fn centroid(&self) -> SwingPoint {
        self.profile().centroid
    }
}

impl fmt::Display for SwingCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Indexed by `SwingCluster as usize`.
static CLUSTER_PROFILES: [ClusterProfile; 8] = [
    ClusterProfile {
        centroid: SwingPoint::new(73.3, 24.03, 8.84),
        comparables: ["Aaron Judge", "Shohei Ohtani", "Yordan Alvarez"],
        description: "Very efficient to the ball and finds success in utilizing the high bat \
            speed to hit pitches out in front for power. This group may be plagued by a high \
            whiff rate.",
        expected: ExpectedMetrics {
            woba: 0.323,
            whiff_pct: 25.9,
            barrel_pct: 11.51,
            batting_avg: 0.245,
            iso: 0.185,
        },
    },
    ClusterProfile {
        centroid: SwingPoint::new(71.2, 24.66, 8.41),
        comparables: ["Juan Soto", "Bobby Witt Jr.", "Gunnar Henderson"],
        description: "The most efficient group to the ball, full of complete hitters that can \
            hit for average and power. Hitters here who struggle are likely finding their \
            efficiency by hitting balls too deep.",
        expected: ExpectedMetrics {
            woba: 0.318,
            whiff_pct: 23.22,
            barrel_pct: 9.37,
            batting_avg: 0.245,
            iso: 0.168,
        },
    },
    ClusterProfile {
        centroid: SwingPoint::new(69.9, 22.21, 10.39),
        comparables: ["Trea Turner", "Jesse Winker", "Patrick Wisdom"],
        description: "Slightly longer than average swings that take longer than average from \
            start to impact, but generally benefit from hitting the ball in front of the plate. \
            These longer swings may result in too many whiffs.",
        expected: ExpectedMetrics {
            woba: 0.312,
            whiff_pct: 24.65,
            barrel_pct: 9.22,
            batting_avg: 0.241,
            iso: 0.172,
        },
    },
    ClusterProfile {
        centroid: SwingPoint::new(69.3, 22.21, 14.47),
        comparables: ["Max Muncy", "Christian Encarnacion-Strand", "Brandon Lowe"],
        description: "Relatively normal swings in the context of bat speed and swing length, \
            but a very uppercut path. These swings produce through power while hitting for a \
            low average and whiffing often.",
        expected: ExpectedMetrics {
            woba: 0.300,
            whiff_pct: 28.06,
            barrel_pct: 10.16,
            batting_avg: 0.216,
            iso: 0.171,
        },
    },
    ClusterProfile {
        centroid: SwingPoint::new(65.9, 22.29, 8.47),
        comparables: ["Steven Kwan", "Mookie Betts", "Josh Smith"],
        description: "Slow to average bat speeds but very efficient swings. Success comes from \
            strong bat-to-ball skills; the risk is too steep an attack angle.",
        expected: ExpectedMetrics {
            woba: 0.298,
            whiff_pct: 18.45,
            barrel_pct: 4.81,
            batting_avg: 0.242,
            iso: 0.111,
        },
    },
    ClusterProfile {
        centroid: SwingPoint::new(68.7, 20.48, 10.34),
        comparables: ["Jose Altuve", "Cody Bellinger", "Marcus Semien"],
        description: "High variance. The best hitters elevate to the pull side thanks to a \
            contact point well in front of the plate. Those who struggle have a long swing \
            length that comes from a truly long swing rather than a deep contact point.",
        expected: ExpectedMetrics {
            woba: 0.293,
            whiff_pct: 24.27,
            barrel_pct: 7.92,
            batting_avg: 0.221,
            iso: 0.150,
        },
    },
    ClusterProfile {
        centroid: SwingPoint::new(68.9, 22.47, 6.33),
        comparables: ["Brenton Doyle", "Yandy Diaz", "Kevin Kiermaier"],
        description: "Slightly slower swings with a very flat attack angle. Success usually \
            comes from a contact-oriented approach. They don't whiff much but may struggle to \
            hit for power.",
        expected: ExpectedMetrics {
            woba: 0.284,
            whiff_pct: 20.49,
            barrel_pct: 5.10,
            batting_avg: 0.235,
            iso: 0.113,
        },
    },
    ClusterProfile {
        centroid: SwingPoint::new(64.4, 20.4, 8.99),
        comparables: ["Charlie Blackmon", "Cavan Biggio", "Nicky Lopez"],
        description: "Generally struggles, with low bat speed that is slow to arrive. Hitters \
            who succeed do it with a contact-oriented approach and a razor-thin margin for \
            error.",
        expected: ExpectedMetrics {
            woba: 0.273,
            whiff_pct: 19.75,
            barrel_pct: 3.43,
            batting_avg: 0.222,
            iso: 0.093,
        },
    },
];

/// First candidate with the smallest distance to `point`.
fn nearest<T: Copy>(point: &SwingPoint, candidates: impl IntoIterator<Item = (T, SwingPoint)>) -> Option<T> {
    let mut best: Option<(T, f64)> = None;
    for (label, centroid) in candidates {
        let distance = euclidean_distance(point, &centroid);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ if distance.is_nan() => {}
            _ => best = Some((label, distance)),
        }
    }
    best.map(|(label, _)| label)
}

/// Nearest reference cluster for a swing. A point with a NaN coordinate
/// classifies as the first cluster.
pub fn classify(bat_speed: f64, swing_acceleration: f64, attack_angle: f64) -> SwingCluster {
    let point = SwingPoint::new(bat_speed, swing_acceleration, attack_angle);
    nearest(&point, SwingCluster::ALL.map(|c| (c, c.centroid())))
        .unwrap_or(SwingCluster::ALL[0])
}

// ---------------------------------------------------------------------------
// Full swing evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingInput {
    pub bat_speed: f64,
    pub attack_angle: f64,
    pub time_to_contact: f64,
}

impl Default for SwingInput {
    fn default() -> Self {
        SwingInput {
            bat_speed: DEFAULT_BAT_SPEED,
            attack_angle: DEFAULT_ATTACK_ANGLE,
            time_to_contact: DEFAULT_TIME_TO_CONTACT,
        }
    }
}

impl SwingInput {
    /// Names of inputs outside the calculator's typical ranges.
    pub fn out_of_range(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !BAT_SPEED_RANGE.contains(&self.bat_speed) {
            fields.push("bat speed");
        }
        if !ATTACK_ANGLE_RANGE.contains(&self.attack_angle) {
            fields.push("attack angle");
        }
        if !TIME_TO_CONTACT_RANGE.contains(&self.time_to_contact) {
            fields.push("time to contact");
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwingMetrics {
    pub input: SwingInput,
    pub swing_length: f64,
    pub swing_acceleration: f64,
    pub swing_score: f64,
    pub cluster: SwingCluster,
}

/// Compute every derived swing metric for one input.
pub fn evaluate(input: &SwingInput, scale: &SwingScoreScale) -> Result<SwingMetrics, MetricError> {
    for (name, value) in [
        ("bat speed", input.bat_speed),
        ("attack angle", input.attack_angle),
        ("time to contact", input.time_to_contact),
    ] {
        if !value.is_finite() {
            return Err(MetricError::NonFinite(name));
        }
    }
    let length = swing_length(input.time_to_contact, input.bat_speed);
    let acceleration = swing_acceleration(input.bat_speed, length)?;
    Ok(SwingMetrics {
        input: *input,
        swing_length: length,
        swing_acceleration: acceleration,
        swing_score: scale.score(acceleration),
        cluster: classify(input.bat_speed, acceleration, input.attack_angle),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // -- Formulas --

    #[test]
    fn swing_length_formula() {
        assert!(approx(swing_length(0.15, 65.0), 7.150190671751247));
        assert!(approx(swing_length(1.3636, 70.0), 70.0));
    }

    #[test]
    fn swing_length_degenerate_inputs_not_errors() {
        assert_eq!(swing_length(0.0, 70.0), 0.0);
        assert!(swing_length(-0.1, 70.0) < 0.0);
    }

    #[test]
    fn swing_acceleration_formula() {
        let acc = swing_acceleration(65.0, 7.150190671751247).unwrap();
        assert!(approx(acc, 19.753564133333334));
    }

    #[test]
    fn swing_acceleration_zero_length_is_error() {
        assert_eq!(
            swing_acceleration(70.0, 0.0),
            Err(MetricError::ZeroSwingLength)
        );
        assert_eq!(
            swing_acceleration(70.0, -0.0),
            Err(MetricError::ZeroSwingLength)
        );
    }

    #[test]
    fn swing_acceleration_overflow_is_error() {
        assert_eq!(
            swing_acceleration(70.0, f64::MIN_POSITIVE * 1e-10),
            Err(MetricError::NonFinite("swing acceleration"))
        );
    }

    #[test]
    fn swing_score_linear_inside_range() {
        assert!(approx(swing_score(15.0), 20.0));
        assert!(approx(swing_score(22.5), 50.0));
        assert!(approx(swing_score(30.0), 80.0));
        assert!(approx(swing_score(19.753564133333334), 39.01425653333334));
    }

    #[test]
    fn swing_score_clamped() {
        assert_eq!(swing_score(1000.0), 80.0);
        assert_eq!(swing_score(-1000.0), 20.0);
        assert_eq!(swing_score(f64::INFINITY), 80.0);
        assert_eq!(swing_score(f64::NEG_INFINITY), 20.0);
        assert_eq!(swing_score(f64::NAN), 20.0);
    }

    #[test]
    fn custom_scale() {
        let scale = SwingScoreScale::new(10.0, 20.0).unwrap();
        assert!(approx(scale.score(15.0), 50.0));
    }

    #[test]
    fn invalid_scale_rejected() {
        assert!(SwingScoreScale::new(30.0, 15.0).is_err());
        assert!(SwingScoreScale::new(15.0, 15.0).is_err());
        assert!(SwingScoreScale::new(f64::NAN, 15.0).is_err());
    }

    #[test]
    fn euclidean_distance_3d() {
        let a = SwingPoint::new(0.0, 0.0, 0.0);
        let b = SwingPoint::new(1.0, 2.0, 2.0);
        assert!(approx(euclidean_distance(&a, &b), 3.0));
        assert!(approx(euclidean_distance(&b, &a), 3.0));
        assert_eq!(euclidean_distance(&b, &b), 0.0);
    }

    // -- Classification --

    #[test]
    fn centroid_classifies_as_itself() {
        assert_eq!(classify(73.3, 24.03, 8.84), SwingCluster::Orange);
        assert_eq!(classify(73.3, 24.03, 8.84).name(), "Orange");
        for cluster in SwingCluster::ALL {
            let c = cluster.centroid();
            assert_eq!(
                classify(c.bat_speed, c.swing_acceleration, c.attack_angle),
                cluster
            );
        }
    }

    #[test]
    fn classify_nearest_centroid() {
        assert_eq!(classify(65.0, 19.753564133333334, 0.0), SwingCluster::Brown);
        assert_eq!(classify(60.0, 13.6755444, 9.0), SwingCluster::Blue);
        assert_eq!(classify(70.0, 19.94350225, 15.0), SwingCluster::Grey);
    }

    #[test]
    fn tie_goes_to_first_candidate() {
        let origin = SwingPoint::new(0.0, 0.0, 0.0);
        let candidates = [
            ("first", SwingPoint::new(0.0, 0.0, 1.0)),
            ("second", SwingPoint::new(0.0, 0.0, -1.0)),
            ("third", SwingPoint::new(0.0, 1.0, 0.0)),
        ];
        assert_eq!(nearest(&origin, candidates), Some("first"));
    }

    #[test]
    fn nan_point_falls_back_to_first_cluster() {
        assert_eq!(classify(f64::NAN, 20.0, 10.0), SwingCluster::Orange);
    }

    #[test]
    fn profiles_follow_declaration_order() {
        assert_eq!(SwingCluster::Blue.profile().comparables[0], "Charlie Blackmon");
        assert!((SwingCluster::Grey.profile().expected.whiff_pct - 28.06).abs() < f64::EPSILON);
        assert_eq!(SwingCluster::Purple.centroid(), SwingPoint::new(71.2, 24.66, 8.41));
    }

    // -- Evaluation --

    #[test]
    fn evaluate_default_input() {
        let m = evaluate(&SwingInput::default(), &SwingScoreScale::default()).unwrap();
        assert!(approx(m.swing_length, 7.150190671751247));
        assert!(approx(m.swing_acceleration, 19.753564133333334));
        assert!(approx(m.swing_score, 39.01425653333334));
        assert_eq!(m.cluster, SwingCluster::Brown);
    }

    #[test]
    fn evaluate_fast_swing() {
        let input = SwingInput {
            bat_speed: 80.0,
            attack_angle: 8.0,
            time_to_contact: 0.1,
        };
        let m = evaluate(&input, &SwingScoreScale::default()).unwrap();
        assert_eq!(m.swing_score, 80.0);
        assert_eq!(m.cluster, SwingCluster::Orange);
    }

    #[test]
    fn evaluate_zero_time_to_contact_is_error() {
        let input = SwingInput {
            time_to_contact: 0.0,
            ..SwingInput::default()
        };
        assert_eq!(
            evaluate(&input, &SwingScoreScale::default()),
            Err(MetricError::ZeroSwingLength)
        );
    }

    #[test]
    fn evaluate_rejects_non_finite_input() {
        let input = SwingInput {
            bat_speed: f64::NAN,
            ..SwingInput::default()
        };
        assert_eq!(
            evaluate(&input, &SwingScoreScale::default()),
            Err(MetricError::NonFinite("bat speed"))
        );
    }

    #[test]
    fn out_of_range_inputs_reported() {
        assert!(SwingInput::default().out_of_range().is_empty());
        let input = SwingInput {
            bat_speed: 95.0,
            attack_angle: -10.0,
            time_to_contact: 0.15,
        };
        assert_eq!(input.out_of_range(), vec!["bat speed", "attack angle"]);
    }
}
