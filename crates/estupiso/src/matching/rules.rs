use super::affinity::AffinityTable;
use super::domain::{Listing, OwnerPreferences, Person, Schedule};
use super::{CompatibilityFactor, ScoreComponent};

pub(crate) const BASE_SCORE: f64 = 50.0;
pub(crate) const OCCUPANT_WEIGHT: f64 = 0.4;

const SHARED_INTEREST_POINTS: f64 = 8.0;
const PEER_ZONE_POINTS: f64 = 10.0;
const PEER_BUDGET_TOLERANCE: u32 = 50;
const PEER_BUDGET_POINTS: f64 = 8.0;
const PEER_CLEANLINESS_EXACT: f64 = 12.0;
const PEER_CLEANLINESS_ADJACENT: f64 = 6.0;
const PEER_SCHEDULE_EXACT: f64 = 10.0;
const PEER_SCHEDULE_FLEXIBLE: f64 = 5.0;
const FIELD_AFFINITY_POINTS: f64 = 5.0;
const SMOKER_MISMATCH_PENALTY: f64 = -15.0;
const PETS_MISMATCH_PENALTY: f64 = -10.0;
const PARTIES_MISMATCH_PENALTY: f64 = -8.0;

const LISTING_ZONE_POINTS: f64 = 15.0;
const OWNER_GENDER_POINTS: f64 = 10.0;
const OWNER_AGE_POINTS: f64 = 10.0;
const OWNER_CLEANLINESS_EXACT: f64 = 15.0;
const OWNER_CLEANLINESS_ADJACENT: f64 = 5.0;
const OWNER_SCHEDULE_POINTS: f64 = 10.0;
const OWNER_FIELD_POINTS: f64 = 10.0;
const OWNER_HABIT_MATCH_POINTS: f64 = 8.0;
const OWNER_SMOKING_PENALTY: f64 = -20.0;
const OWNER_PETS_PENALTY: f64 = -15.0;
const OWNER_PARTIES_PENALTY: f64 = -10.0;

/// Running total plus the audit trail of every rule that fired.
pub(crate) struct Tally {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

impl Tally {
    fn new() -> Self {
        Self {
            total: BASE_SCORE,
            components: Vec::new(),
        }
    }

    fn add(&mut self, factor: CompatibilityFactor, points: f64, notes: impl Into<String>) {
        self.total += points;
        self.components.push(ScoreComponent {
            factor,
            points,
            notes: notes.into(),
        });
    }

    /// Final integer score in `[0, 100]`.
    pub fn clamped(&self) -> u8 {
        self.total.clamp(0.0, 100.0).round() as u8
    }
}

/// Flags differ and at least one side lacks the habit.
pub(crate) fn lifestyle_mismatch(candidate: bool, other: bool) -> bool {
    candidate != other && (!candidate || !other)
}

/// The owner forbids a habit the candidate has.
pub(crate) fn disallowed_habit(allowed: bool, candidate_has_habit: bool) -> bool {
    !allowed && candidate_has_habit
}

/// Points for the distance between a budget and a monthly price.
///
/// Gaps between 100 and 150 are neutral.
pub(crate) fn budget_bracket(distance: u32) -> Option<f64> {
    match distance {
        0..=25 => Some(20.0),
        26..=50 => Some(15.0),
        51..=100 => Some(10.0),
        101..=150 => None,
        _ => Some(-15.0),
    }
}

pub(crate) fn score_people(candidate: &Person, other: &Person, affinity: &AffinityTable) -> Tally {
    let mut tally = Tally::new();

    let shared: Vec<&String> = candidate.shared_interests(other).collect();
    if !shared.is_empty() {
        let joined: Vec<&str> = shared.iter().map(|interest| interest.as_str()).collect();
        tally.add(
            CompatibilityFactor::SharedInterests,
            shared.len() as f64 * SHARED_INTEREST_POINTS,
            format!("{} shared interest(s): {}", shared.len(), joined.join(", ")),
        );
    }

    if let (Some(zone), Some(other_zone)) = (&candidate.zone, &other.zone) {
        if zone == other_zone {
            tally.add(
                CompatibilityFactor::Zone,
                PEER_ZONE_POINTS,
                format!("both prefer {zone}"),
            );
        }
    }

    // A budget missing on either side skips the rule, so it never makes the score
    // depend on direction.
    if let (Some(budget), Some(other_budget)) = (candidate.max_budget, other.max_budget) {
        let distance = budget.abs_diff(other_budget);
        if distance <= PEER_BUDGET_TOLERANCE {
            tally.add(
                CompatibilityFactor::Budget,
                PEER_BUDGET_POINTS,
                format!("budgets {distance} apart"),
            );
        }
    }

    if let (Some(level), Some(other_level)) = (candidate.cleanliness, other.cleanliness) {
        if level == other_level {
            tally.add(
                CompatibilityFactor::Cleanliness,
                PEER_CLEANLINESS_EXACT,
                format!("same cleanliness ({})", level.label()),
            );
        } else if level.is_adjacent_step_to(other_level) {
            tally.add(
                CompatibilityFactor::Cleanliness,
                PEER_CLEANLINESS_ADJACENT,
                format!("{} next to {}", level.label(), other_level.label()),
            );
        }
    }

    if let (Some(schedule), Some(other_schedule)) = (candidate.schedule, other.schedule) {
        if schedule == other_schedule {
            tally.add(
                CompatibilityFactor::Schedule,
                PEER_SCHEDULE_EXACT,
                format!("same schedule ({})", schedule.label()),
            );
        } else if schedule == Schedule::Normal || other_schedule == Schedule::Normal {
            tally.add(
                CompatibilityFactor::Schedule,
                PEER_SCHEDULE_FLEXIBLE,
                "one side keeps a normal schedule",
            );
        }
    }

    if let (Some(field), Some(other_field)) = (&candidate.field_of_study, &other.field_of_study) {
        if affinity.is_related(field, other_field) {
            tally.add(
                CompatibilityFactor::FieldAffinity,
                FIELD_AFFINITY_POINTS,
                format!("{field} pairs well with {other_field}"),
            );
        }
    }

    if lifestyle_mismatch(candidate.smoker, other.smoker) {
        tally.add(
            CompatibilityFactor::Smoking,
            SMOKER_MISMATCH_PENALTY,
            "only one of the two smokes",
        );
    }

    if lifestyle_mismatch(candidate.has_pets, other.has_pets) {
        tally.add(
            CompatibilityFactor::Pets,
            PETS_MISMATCH_PENALTY,
            "only one of the two has pets",
        );
    }

    if candidate.enjoys_parties != other.enjoys_parties {
        tally.add(
            CompatibilityFactor::Parties,
            PARTIES_MISMATCH_PENALTY,
            "party preferences differ",
        );
    }

    tally
}

pub(crate) fn score_listing(
    candidate: &Person,
    listing: &Listing,
    affinity: &AffinityTable,
) -> Tally {
    let mut tally = Tally::new();

    if let Some(budget) = candidate.max_budget {
        let distance = budget.abs_diff(listing.monthly_price);
        if let Some(points) = budget_bracket(distance) {
            tally.add(
                CompatibilityFactor::Budget,
                points,
                format!(
                    "budget {budget} vs price {} ({distance} apart)",
                    listing.monthly_price
                ),
            );
        }
    }

    if candidate.zone.as_deref() == Some(listing.zone.as_str()) {
        tally.add(
            CompatibilityFactor::Zone,
            LISTING_ZONE_POINTS,
            format!("listing is in {}", listing.zone),
        );
    }

    if let Some(occupant) = &listing.current_occupant {
        let occupant_score = score_people(candidate, occupant, affinity).clamped();
        let adjustment = (f64::from(occupant_score) - BASE_SCORE) * OCCUPANT_WEIGHT;
        tally.add(
            CompatibilityFactor::Occupant,
            adjustment,
            format!("current occupant {} scores {occupant_score}", occupant.id),
        );
    }

    if let Some(preferences) = &listing.owner_preferences {
        apply_owner_preferences(&mut tally, candidate, preferences);
    }

    tally
}

fn apply_owner_preferences(tally: &mut Tally, candidate: &Person, preferences: &OwnerPreferences) {
    if let Some(gender) = preferences.preferred_gender.concrete() {
        if candidate.gender.as_deref() == Some(gender) {
            tally.add(
                CompatibilityFactor::Gender,
                OWNER_GENDER_POINTS,
                format!("owner prefers {gender}"),
            );
        }
    }

    if let (Some((min, max)), Some(age)) = (preferences.age_range(), candidate.age) {
        if (min..=max).contains(&age) {
            tally.add(
                CompatibilityFactor::AgeRange,
                OWNER_AGE_POINTS,
                format!("age {age} within {min}-{max}"),
            );
        } else {
            tally.add(
                CompatibilityFactor::AgeRange,
                -OWNER_AGE_POINTS,
                format!("age {age} outside {min}-{max}"),
            );
        }
    }

    if let (Some(required), Some(level)) = (preferences.cleanliness, candidate.cleanliness) {
        if level == required {
            tally.add(
                CompatibilityFactor::Cleanliness,
                OWNER_CLEANLINESS_EXACT,
                format!("meets required cleanliness ({})", required.label()),
            );
        } else if level.is_adjacent_step_to(required) {
            tally.add(
                CompatibilityFactor::Cleanliness,
                OWNER_CLEANLINESS_ADJACENT,
                format!("{} next to required {}", level.label(), required.label()),
            );
        }
    }

    if let (Some(preferred), Some(schedule)) = (preferences.schedule, candidate.schedule) {
        if schedule == preferred {
            tally.add(
                CompatibilityFactor::Schedule,
                OWNER_SCHEDULE_POINTS,
                format!("matches preferred schedule ({})", preferred.label()),
            );
        }
    }

    if let Some(field) = &candidate.field_of_study {
        if !preferences.preferred_fields.is_empty() && preferences.preferred_fields.contains(field)
        {
            tally.add(
                CompatibilityFactor::PreferredField,
                OWNER_FIELD_POINTS,
                format!("owner welcomes {field} students"),
            );
        }
    }

    // Match bonus and disallowed penalty are evaluated independently.
    apply_habit_rules(
        tally,
        CompatibilityFactor::Smoking,
        "smoking",
        preferences.smoking_allowed,
        candidate.smoker,
        OWNER_SMOKING_PENALTY,
    );
    apply_habit_rules(
        tally,
        CompatibilityFactor::Pets,
        "pets",
        preferences.pets_allowed,
        candidate.has_pets,
        OWNER_PETS_PENALTY,
    );
    apply_habit_rules(
        tally,
        CompatibilityFactor::Parties,
        "parties",
        preferences.parties_allowed,
        candidate.enjoys_parties,
        OWNER_PARTIES_PENALTY,
    );
}

fn apply_habit_rules(
    tally: &mut Tally,
    factor: CompatibilityFactor,
    habit: &str,
    allowed: bool,
    candidate_has_habit: bool,
    penalty: f64,
) {
    if candidate_has_habit == allowed {
        tally.add(
            factor,
            OWNER_HABIT_MATCH_POINTS,
            format!("{habit} policy matches candidate"),
        );
    }

    if disallowed_habit(allowed, candidate_has_habit) {
        tally.add(factor, penalty, format!("{habit} not allowed by owner"));
    }
}
