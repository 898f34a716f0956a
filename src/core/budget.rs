use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Amounts above this are priced on the purchase (lakh/crore) scale,
/// everything else on the rental (thousands) scale.
pub const HIGH_VALUE_THRESHOLD: f64 = 100_000.0;

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

/// One of the twelve fixed budget brackets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BudgetRange {
    // High-value scale
    Under50Lakh,
    Lakh50To1Crore,
    Crore1To2,
    Crore2To3,
    Crore3To5,
    Above5Crore,
    // Low-value scale
    Under10K,
    K10To20,
    K20To30,
    K30To40,
    K40To60,
    Above60K,
}

impl BudgetRange {
    pub const HIGH_VALUE: [BudgetRange; 6] = [
        BudgetRange::Under50Lakh,
        BudgetRange::Lakh50To1Crore,
        BudgetRange::Crore1To2,
        BudgetRange::Crore2To3,
        BudgetRange::Crore3To5,
        BudgetRange::Above5Crore,
    ];

    pub const LOW_VALUE: [BudgetRange; 6] = [
        BudgetRange::Under10K,
        BudgetRange::K10To20,
        BudgetRange::K20To30,
        BudgetRange::K30To40,
        BudgetRange::K40To60,
        BudgetRange::Above60K,
    ];

    /// Display label as stored upstream
    pub fn label(&self) -> &'static str {
        match self {
            BudgetRange::Under50Lakh => "Under 50 Lakh",
            BudgetRange::Lakh50To1Crore => "50 Lakh - 1 Crore",
            BudgetRange::Crore1To2 => "1 Crore - 2 Crore",
            BudgetRange::Crore2To3 => "2 Crore - 3 Crore",
            BudgetRange::Crore3To5 => "3 Crore - 5 Crore",
            BudgetRange::Above5Crore => "Above 5 Crore",
            BudgetRange::Under10K => "Under 10K",
            BudgetRange::K10To20 => "10K - 20K",
            BudgetRange::K20To30 => "20K - 30K",
            BudgetRange::K30To40 => "30K - 40K",
            BudgetRange::K40To60 => "40K - 60K",
            BudgetRange::Above60K => "Above 60K",
        }
    }

    /// Exact, case-sensitive label lookup (surrounding whitespace ignored)
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::HIGH_VALUE
            .iter()
            .chain(Self::LOW_VALUE.iter())
            .copied()
            .find(|range| range.label() == label)
    }

    /// Half-open `[min, max)` interval; open-ended brackets use infinity
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            BudgetRange::Under50Lakh => (0.0, 50.0 * LAKH),
            BudgetRange::Lakh50To1Crore => (50.0 * LAKH, CRORE),
            BudgetRange::Crore1To2 => (CRORE, 2.0 * CRORE),
            BudgetRange::Crore2To3 => (2.0 * CRORE, 3.0 * CRORE),
            BudgetRange::Crore3To5 => (3.0 * CRORE, 5.0 * CRORE),
            BudgetRange::Above5Crore => (5.0 * CRORE, f64::INFINITY),
            BudgetRange::Under10K => (0.0, 10_000.0),
            BudgetRange::K10To20 => (10_000.0, 20_000.0),
            BudgetRange::K20To30 => (20_000.0, 30_000.0),
            BudgetRange::K30To40 => (30_000.0, 40_000.0),
            BudgetRange::K40To60 => (40_000.0, 60_000.0),
            BudgetRange::Above60K => (60_000.0, f64::INFINITY),
        }
    }

    /// Map a raw amount onto a bracket
    ///
    /// Amounts above [`HIGH_VALUE_THRESHOLD`] use the high-value scale,
    /// the rest the low-value scale. Negative or non-finite amounts are
    /// unclassifiable.
    pub fn classify_amount(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }

        let scale = if amount > HIGH_VALUE_THRESHOLD {
            &Self::HIGH_VALUE
        } else {
            &Self::LOW_VALUE
        };

        scale
            .iter()
            .copied()
            .find(|range| amount < range.bounds().1)
    }

    /// Inclusive-bound overlap test on the two intervals
    pub fn overlaps(&self, other: &BudgetRange) -> bool {
        let (min1, max1) = self.bounds();
        let (min2, max2) = other.bounds();
        min1 <= max2 && min2 <= max1
    }
}

impl fmt::Display for BudgetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BudgetRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A budget as it arrives from storage: a number, some text, or nothing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BudgetInput {
    Amount(f64),
    Text(String),
    #[default]
    Missing,
}

impl BudgetInput {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(BudgetInput::Amount).unwrap_or_default(),
            Value::String(s) => BudgetInput::Text(s.clone()),
            _ => BudgetInput::Missing,
        }
    }
}

impl From<f64> for BudgetInput {
    fn from(amount: f64) -> Self {
        BudgetInput::Amount(amount)
    }
}

impl From<&str> for BudgetInput {
    fn from(text: &str) -> Self {
        BudgetInput::Text(text.to_string())
    }
}

impl fmt::Display for BudgetInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetInput::Amount(a) => write!(f, "{}", a),
            BudgetInput::Text(t) => f.write_str(t),
            BudgetInput::Missing => f.write_str("<missing>"),
        }
    }
}

impl Serialize for BudgetInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BudgetInput::Amount(amount) => serializer.serialize_f64(*amount),
            BudgetInput::Text(text) => serializer.serialize_str(text),
            BudgetInput::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for BudgetInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.map(|v| BudgetInput::from_value(&v)).unwrap_or_default())
    }
}

/// Resolve a budget to a bracket
///
/// Known labels are used as-is; numbers and numeric strings are classified
/// by amount; anything else is unclassifiable.
pub fn classify_budget(input: &BudgetInput) -> Option<BudgetRange> {
    let range = match input {
        BudgetInput::Amount(amount) => BudgetRange::classify_amount(*amount),
        BudgetInput::Text(text) => BudgetRange::from_label(text).or_else(|| {
            text.trim()
                .parse::<f64>()
                .ok()
                .and_then(BudgetRange::classify_amount)
        }),
        BudgetInput::Missing => None,
    };

    tracing::trace!("Budget {} classified as {:?}", input, range.map(|r| r.label()));
    range
}

/// Outcome of comparing two budgets, kept for explaining negative verdicts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetCheck {
    #[serde(rename = "firstRange")]
    pub first: Option<BudgetRange>,
    #[serde(rename = "secondRange")]
    pub second: Option<BudgetRange>,
    pub overlaps: bool,
}

/// Classify both budgets and test the brackets for overlap
pub fn check_budget_overlap(first: &BudgetInput, second: &BudgetInput) -> BudgetCheck {
    tracing::debug!("Budget check: raw inputs {} / {}", first, second);

    let first_range = classify_budget(first);
    let second_range = classify_budget(second);

    let overlaps = match (first_range, second_range) {
        (Some(a), Some(b)) => {
            tracing::trace!("Budget bounds {:?} / {:?}", a.bounds(), b.bounds());
            a.overlaps(&b)
        }
        _ => {
            tracing::debug!("Budget check failed: unclassifiable budget");
            false
        }
    };

    tracing::debug!(
        "Budget check: {:?} vs {:?} -> {}",
        first_range.map(|r| r.label()),
        second_range.map(|r| r.label()),
        overlaps
    );

    BudgetCheck {
        first: first_range,
        second: second_range,
        overlaps,
    }
}

pub fn budgets_overlap(first: &BudgetInput, second: &BudgetInput) -> bool {
    check_budget_overlap(first, second).overlaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_ranges() -> Vec<BudgetRange> {
        BudgetRange::HIGH_VALUE
            .iter()
            .chain(BudgetRange::LOW_VALUE.iter())
            .copied()
            .collect()
    }

    #[test]
    fn test_label_round_trip() {
        for range in all_ranges() {
            assert_eq!(BudgetRange::from_label(range.label()), Some(range));
        }
        assert_eq!(BudgetRange::from_label("under 10k"), None);
        assert_eq!(BudgetRange::from_label(" Under 10K "), Some(BudgetRange::Under10K));
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(BudgetRange::classify_amount(100_000.0), Some(BudgetRange::Above60K));
        assert_eq!(BudgetRange::classify_amount(100_001.0), Some(BudgetRange::Under50Lakh));
    }

    #[test]
    fn test_classify_amounts() {
        assert_eq!(BudgetRange::classify_amount(0.0), Some(BudgetRange::Under10K));
        assert_eq!(BudgetRange::classify_amount(10_000.0), Some(BudgetRange::K10To20));
        assert_eq!(BudgetRange::classify_amount(45_000.0), Some(BudgetRange::K40To60));
        assert_eq!(BudgetRange::classify_amount(4_000_000.0), Some(BudgetRange::Under50Lakh));
        assert_eq!(BudgetRange::classify_amount(5_000_000.0), Some(BudgetRange::Lakh50To1Crore));
        assert_eq!(BudgetRange::classify_amount(12_000_000.0), Some(BudgetRange::Crore1To2));
        assert_eq!(BudgetRange::classify_amount(900_000_000.0), Some(BudgetRange::Above5Crore));
        assert_eq!(BudgetRange::classify_amount(-1.0), None);
        assert_eq!(BudgetRange::classify_amount(f64::NAN), None);
    }

    #[test]
    fn test_classify_budget_inputs() {
        assert_eq!(classify_budget(&"50 Lakh - 1 Crore".into()), Some(BudgetRange::Lakh50To1Crore));
        assert_eq!(classify_budget(&"25000".into()), Some(BudgetRange::K20To30));
        assert_eq!(classify_budget(&25_000.0.into()), Some(BudgetRange::K20To30));
        assert_eq!(classify_budget(&"cheap".into()), None);
        assert_eq!(classify_budget(&BudgetInput::Missing), None);
    }

    #[test]
    fn test_every_label_overlaps_itself() {
        for range in all_ranges() {
            assert!(budgets_overlap(&range.label().into(), &range.label().into()), "{}", range);
        }
    }

    #[test]
    fn test_overlap_is_symmetric() {
        for a in all_ranges() {
            for b in all_ranges() {
                assert_eq!(a.overlaps(&b), b.overlaps(&a), "{} / {}", a, b);
            }
        }
    }

    #[test]
    fn test_disjoint_ranges() {
        assert!(!budgets_overlap(&"Above 5 Crore".into(), &4_000_000.0.into()));
        assert!(!budgets_overlap(&"Under 10K".into(), &"30K - 40K".into()));
    }

    #[test]
    fn test_adjacent_ranges_touch() {
        // Inclusive comparison makes neighbouring brackets overlap at the edge
        assert!(budgets_overlap(&"Under 50 Lakh".into(), &"50 Lakh - 1 Crore".into()));
    }

    #[test]
    fn test_unclassifiable_never_overlaps() {
        let check = check_budget_overlap(&"whatever".into(), &"Under 10K".into());
        assert!(!check.overlaps);
        assert_eq!(check.first, None);
        assert_eq!(check.second, Some(BudgetRange::Under10K));
    }

    #[test]
    fn test_budget_input_deserialize() {
        let parsed: BudgetInput = serde_json::from_str("12000000").unwrap();
        assert_eq!(parsed, BudgetInput::Amount(12_000_000.0));
        let parsed: BudgetInput = serde_json::from_str("\"Under 10K\"").unwrap();
        assert_eq!(parsed, BudgetInput::Text("Under 10K".to_string()));
        let parsed: BudgetInput = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, BudgetInput::Missing);
        let parsed: BudgetInput = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, BudgetInput::Missing);
    }

    #[test]
    fn test_budget_input_serializes_as_given() {
        assert_eq!(serde_json::to_string(&BudgetInput::Amount(35000.0)).unwrap(), "35000.0");
        assert_eq!(serde_json::to_string(&BudgetInput::from("Under 10K")).unwrap(), "\"Under 10K\"");
        assert_eq!(serde_json::to_string(&BudgetInput::Missing).unwrap(), "null");
    }
}
