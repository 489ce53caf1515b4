//! Attribute comparison engine turning a guess into structured feedback.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::catalog::{Entity, name_key};
use crate::constants::{
    FALLBACK_CLASSIFICATION, FALLBACK_NAME, HEIGHT_PARTIAL_TOLERANCE_M, MASS_PARTIAL_TOLERANCE_KG,
};
use crate::numbers::finite_or_zero;

/// Absorbs representation error in decimal catalog values (0.8 - 0.3 > 0.5 in binary).
const MEASURE_SLACK: f64 = 1e-9;

/// Three-tier match quality for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Exact,
    Partial,
    #[serde(rename = "none")]
    Miss,
}

impl MatchStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Partial => "partial",
            Self::Miss => "none",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the target's value lies relative to the guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Higher,
    Lower,
}

impl Direction {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Higher => Self::Lower,
            Self::Lower => Self::Higher,
        }
    }

    fn from_ordering(target_vs_guess: Ordering) -> Option<Self> {
        match target_vs_guess {
            Ordering::Greater => Some(Self::Higher),
            Ordering::Less => Some(Self::Lower),
            Ordering::Equal => None,
        }
    }
}

/// Scored attributes in their fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Name,
    Category,
    Sequence,
    Classification,
    Height,
    Mass,
}

impl Attribute {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Category,
        Self::Sequence,
        Self::Classification,
        Self::Height,
        Self::Mass,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Category => "Type",
            Self::Sequence => "No.",
            Self::Classification => "Class",
            Self::Height => "Height",
            Self::Mass => "Weight",
        }
    }

    #[must_use]
    pub const fn is_ordinal(self) -> bool {
        matches!(self, Self::Sequence | Self::Height | Self::Mass)
    }
}

/// The guessed entity's value for an attribute, as reported back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(u32),
    Measure(f64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
            Self::Measure(m) => write!(f, "{m}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeFeedback {
    pub value: AttributeValue,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl AttributeFeedback {
    fn plain(value: AttributeValue, status: MatchStatus) -> Self {
        Self {
            value,
            status,
            direction: None,
        }
    }
}

/// Per-guess comparison result. Transient; recomputed from entities on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeReport {
    pub name: AttributeFeedback,
    pub category: AttributeFeedback,
    pub sequence: AttributeFeedback,
    pub classification: AttributeFeedback,
    pub height: AttributeFeedback,
    pub mass: AttributeFeedback,
}

impl AttributeReport {
    #[must_use]
    pub const fn get(&self, attribute: Attribute) -> &AttributeFeedback {
        match attribute {
            Attribute::Name => &self.name,
            Attribute::Category => &self.category,
            Attribute::Sequence => &self.sequence,
            Attribute::Classification => &self.classification,
            Attribute::Height => &self.height,
            Attribute::Mass => &self.mass,
        }
    }

    /// Feedback paired with its attribute, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &AttributeFeedback)> {
        Attribute::ALL.into_iter().map(|attr| (attr, self.get(attr)))
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.iter()
            .all(|(_, feedback)| feedback.status == MatchStatus::Exact)
    }
}

/// Entity view with fallbacks substituted for missing or malformed fields.
struct Normalized<'a> {
    name: &'a str,
    primary: &'a str,
    secondary: Option<&'a str>,
    sequence: u32,
    classification: &'a str,
    height: f64,
    mass: f64,
}

impl<'a> Normalized<'a> {
    fn of(entity: &'a Entity) -> Self {
        let name = entity.name.trim();
        let classification = entity.classification.as_str();
        Self {
            name: if name.is_empty() { FALLBACK_NAME } else { name },
            primary: entity.primary_category.trim(),
            secondary: entity
                .secondary_category
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
            sequence: entity.sequence_number,
            classification: if classification.is_empty() {
                FALLBACK_CLASSIFICATION
            } else {
                classification
            },
            height: finite_or_zero(entity.height),
            mass: finite_or_zero(entity.mass),
        }
    }

    fn category_pair(&self) -> Vec<&'a str> {
        let mut pair: Vec<&str> = std::iter::once(self.primary)
            .chain(self.secondary)
            .collect();
        pair.sort_unstable();
        pair
    }

    fn category_label(&self) -> String {
        match self.secondary {
            Some(secondary) => format!("{}/{secondary}", self.primary),
            None => self.primary.to_string(),
        }
    }
}

/// Score `guess` against `target`. Pure and total.
#[must_use]
pub fn compare(guess: &Entity, target: &Entity) -> AttributeReport {
    let g = Normalized::of(guess);
    let t = Normalized::of(target);

    AttributeReport {
        name: compare_name(&g, &t),
        category: compare_categories(&g, &t),
        sequence: compare_sequence(&g, &t),
        classification: compare_classification(&g, &t),
        height: compare_measure(g.height, t.height, HEIGHT_PARTIAL_TOLERANCE_M),
        mass: compare_measure(g.mass, t.mass, MASS_PARTIAL_TOLERANCE_KG),
    }
}

fn compare_name(g: &Normalized<'_>, t: &Normalized<'_>) -> AttributeFeedback {
    let status = if name_key(g.name) == name_key(t.name) {
        MatchStatus::Exact
    } else {
        MatchStatus::Miss
    };
    AttributeFeedback::plain(AttributeValue::Text(g.name.to_string()), status)
}

fn compare_categories(g: &Normalized<'_>, t: &Normalized<'_>) -> AttributeFeedback {
    let guess_pair = g.category_pair();
    let target_pair = t.category_pair();
    let status = if guess_pair == target_pair {
        MatchStatus::Exact
    } else if guess_pair
        .iter()
        .any(|cat| !cat.is_empty() && target_pair.contains(cat))
    {
        MatchStatus::Partial
    } else {
        MatchStatus::Miss
    };
    AttributeFeedback::plain(AttributeValue::Text(g.category_label()), status)
}

fn compare_sequence(g: &Normalized<'_>, t: &Normalized<'_>) -> AttributeFeedback {
    let direction = Direction::from_ordering(t.sequence.cmp(&g.sequence));
    AttributeFeedback {
        value: AttributeValue::Number(g.sequence),
        status: if direction.is_none() {
            MatchStatus::Exact
        } else {
            MatchStatus::Miss
        },
        direction,
    }
}

fn compare_classification(g: &Normalized<'_>, t: &Normalized<'_>) -> AttributeFeedback {
    let status = if g.classification == t.classification {
        MatchStatus::Exact
    } else {
        MatchStatus::Miss
    };
    AttributeFeedback::plain(
        AttributeValue::Text(g.classification.to_string()),
        status,
    )
}

fn compare_measure(guess: f64, target: f64, tolerance: f64) -> AttributeFeedback {
    let direction = target
        .partial_cmp(&guess)
        .and_then(Direction::from_ordering);
    let status = if direction.is_none() {
        MatchStatus::Exact
    } else if (guess - target).abs() <= tolerance + MEASURE_SLACK {
        MatchStatus::Partial
    } else {
        MatchStatus::Miss
    };
    AttributeFeedback {
        value: AttributeValue::Measure(guess),
        status,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha() -> Entity {
        Entity::new("Alpha")
            .with_categories("Fire", None)
            .with_sequence(1)
            .with_classification("Spark")
            .with_measurements(1.0, 10.0)
    }

    fn beta() -> Entity {
        Entity::new("Beta")
            .with_categories("Fire", Some("Water"))
            .with_sequence(2)
            .with_classification("Steam")
            .with_measurements(1.4, 14.0)
    }

    #[test]
    fn worked_example_scores_partial_with_directions() {
        let report = compare(&alpha(), &beta());
        assert_eq!(report.name.status, MatchStatus::Miss);
        assert_eq!(report.category.status, MatchStatus::Partial);
        assert_eq!(report.sequence.status, MatchStatus::Miss);
        assert_eq!(report.sequence.direction, Some(Direction::Higher));
        assert_eq!(report.classification.status, MatchStatus::Miss);
        assert_eq!(report.height.status, MatchStatus::Partial);
        assert_eq!(report.height.direction, Some(Direction::Higher));
        assert_eq!(report.mass.status, MatchStatus::Partial);
        assert_eq!(report.mass.direction, Some(Direction::Higher));
        assert!(!report.is_solved());
    }

    #[test]
    fn identical_entities_are_exact_everywhere() {
        for entity in [alpha(), beta(), Entity::default()] {
            let report = compare(&entity, &entity);
            assert!(report.is_solved());
            assert!(report.iter().all(|(_, fb)| fb.direction.is_none()));
        }
    }

    #[test]
    fn directions_are_antisymmetric() {
        let a = alpha();
        let b = beta();
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);
        for attr in [Attribute::Sequence, Attribute::Height, Attribute::Mass] {
            let forward = ab.get(attr).direction.unwrap();
            assert_eq!(ba.get(attr).direction, Some(forward.reversed()));
        }
    }

    #[test]
    fn category_pair_is_unordered() {
        let ab = Entity::new("A").with_categories("Rock", Some("Ground"));
        let ba = Entity::new("B").with_categories("Ground", Some("Rock"));
        let rock = Entity::new("C").with_categories("Rock", None);
        let ice = Entity::new("D").with_categories("Ice", None);
        assert_eq!(compare(&ab, &ba).category.status, MatchStatus::Exact);
        assert_eq!(compare(&rock, &ab).category.status, MatchStatus::Partial);
        assert_eq!(compare(&ab, &rock).category.status, MatchStatus::Partial);
        assert_eq!(compare(&ice, &ab).category.status, MatchStatus::Miss);
    }

    #[test]
    fn measure_thresholds_are_inclusive() {
        let short = Entity::new("Short").with_measurements(0.3, 10.0);
        let tall = Entity::new("Tall").with_measurements(0.8, 15.0);
        let taller = Entity::new("Taller").with_measurements(0.9, 15.1);
        let report = compare(&short, &tall);
        assert_eq!(report.height.status, MatchStatus::Partial);
        assert_eq!(report.mass.status, MatchStatus::Partial);
        let report = compare(&short, &taller);
        assert_eq!(report.height.status, MatchStatus::Miss);
        assert_eq!(report.mass.status, MatchStatus::Miss);
        assert_eq!(report.mass.direction, Some(Direction::Higher));
    }

    #[test]
    fn malformed_entities_degrade_to_fallbacks() {
        let mut broken = Entity::new("");
        broken.height = f64::NAN;
        broken.mass = f64::INFINITY;
        broken.classification = String::new();
        let report = compare(&broken, &alpha());
        assert_eq!(report.name.value, AttributeValue::Text(FALLBACK_NAME.into()));
        assert_eq!(
            report.classification.value,
            AttributeValue::Text(FALLBACK_CLASSIFICATION.into())
        );
        assert_eq!(report.height.direction, Some(Direction::Higher));
        assert_eq!(report.category.status, MatchStatus::Miss);
    }

    #[test]
    fn classification_is_case_sensitive() {
        let lower = Entity::new("A").with_classification("mouse");
        let upper = Entity::new("B").with_classification("Mouse");
        assert_eq!(
            compare(&lower, &upper).classification.status,
            MatchStatus::Miss
        );
    }

    #[test]
    fn report_iterates_in_fixed_order() {
        let report = compare(&alpha(), &beta());
        let order: Vec<_> = report.iter().map(|(attr, _)| attr).collect();
        assert_eq!(order, Attribute::ALL.to_vec());
        assert!(Attribute::ALL.iter().filter(|a| a.is_ordinal()).count() == 3);
    }
}
