use chrono::Duration;

use super::common::*;
use crate::reviews::{
    can_rate, submit_rating, CooldownPolicy, MonthArithmetic, RatingSubmission, ReviewError,
};

#[test]
fn first_rating_of_a_pair_is_always_allowed() {
    assert!(can_rate(&user("ana"), &user("lucia"), &[], at(2025, 3, 1)));
}

#[test]
fn rating_blocks_immediately_after_submission() {
    let submitted_at = at(2025, 3, 1);
    let stored = submit_rating(
        RatingSubmission::new("ana", "lucia", 5, "Muy limpia"),
        &[],
        submitted_at,
    )
    .expect("first rating accepted");

    let ratings = vec![stored];
    assert!(!can_rate(
        &user("ana"),
        &user("lucia"),
        &ratings,
        submitted_at + Duration::seconds(1)
    ));
}

#[test]
fn thirty_day_months_unlock_at_day_two_hundred_seventy() {
    let start = at(2025, 1, 31);
    let ratings = vec![rating("ana", "lucia", 4, start)];
    let policy = CooldownPolicy::default();

    let just_before = days_after(start, 270) - Duration::seconds(1);
    let boundary = days_after(start, 270);

    assert!(!policy.can_rate(&user("ana"), &user("lucia"), &ratings, just_before));
    assert!(policy.can_rate(&user("ana"), &user("lucia"), &ratings, boundary));
    assert_eq!(policy.eligible_on(start), boundary);
}

#[test]
fn calendar_months_unlock_on_the_same_day_nine_months_later() {
    let start = at(2025, 1, 31);
    let ratings = vec![rating("ana", "lucia", 4, start)];
    let policy = CooldownPolicy::new(9, MonthArithmetic::Calendar);

    // Thirty-day months would already allow this on 2025-10-28.
    assert!(!policy.can_rate(&user("ana"), &user("lucia"), &ratings, at(2025, 10, 28)));
    assert!(!policy.can_rate(
        &user("ana"),
        &user("lucia"),
        &ratings,
        at(2025, 10, 31) - Duration::seconds(1)
    ));
    assert!(policy.can_rate(&user("ana"), &user("lucia"), &ratings, at(2025, 10, 31)));
    assert_eq!(policy.eligible_on(start), at(2025, 10, 31));
}

#[test]
fn calendar_months_clamp_to_month_end() {
    let arithmetic = MonthArithmetic::Calendar;
    assert_eq!(arithmetic.months_between(at(2025, 1, 31), at(2025, 2, 28)), 1);
    assert_eq!(arithmetic.months_between(at(2025, 1, 31), at(2025, 2, 27)), 0);
    assert_eq!(arithmetic.months_between(at(2024, 5, 15), at(2025, 5, 15)), 12);
}

#[test]
fn months_between_is_zero_for_future_timestamps() {
    for arithmetic in [MonthArithmetic::ThirtyDay, MonthArithmetic::Calendar] {
        assert_eq!(arithmetic.months_between(at(2025, 6, 1), at(2025, 1, 1)), 0);
    }
}

#[test]
fn cooldown_is_scoped_to_the_ordered_pair() {
    let now = at(2025, 3, 2);
    let ratings = vec![rating("ana", "lucia", 4, at(2025, 3, 1))];

    assert!(!can_rate(&user("ana"), &user("lucia"), &ratings, now));
    assert!(can_rate(&user("lucia"), &user("ana"), &ratings, now));
    assert!(can_rate(&user("ana"), &user("marta"), &ratings, now));
}

#[test]
fn most_recent_rating_drives_the_cooldown() {
    let ratings = vec![
        rating("ana", "lucia", 3, at(2023, 1, 1)),
        rating("ana", "lucia", 4, at(2025, 2, 1)),
    ];

    assert!(!can_rate(&user("ana"), &user("lucia"), &ratings, at(2025, 3, 1)));
}

#[test]
fn submit_reports_cooldown_with_unlock_date() {
    let last = at(2025, 3, 1);
    let ratings = vec![rating("ana", "lucia", 4, last)];

    let result = submit_rating(
        RatingSubmission::new("ana", "lucia", 2, "Otra vez"),
        &ratings,
        at(2025, 6, 1),
    );

    match result {
        Err(ReviewError::CooldownActive {
            rater,
            ratee,
            last_rated_at,
            eligible_on,
        }) => {
            assert_eq!(rater, user("ana"));
            assert_eq!(ratee, user("lucia"));
            assert_eq!(last_rated_at, last);
            assert_eq!(eligible_on, days_after(last, 270));
        }
        other => panic!("expected cooldown, got {other:?}"),
    }
}

#[test]
fn submit_rejects_scores_outside_range() {
    for score in [0, 6, -3] {
        let result = submit_rating(
            RatingSubmission::new("ana", "lucia", score, ""),
            &[],
            at(2025, 3, 1),
        );
        assert_eq!(result, Err(ReviewError::InvalidScore(score)));
    }
}

#[test]
fn invalid_score_is_reported_before_cooldown() {
    let ratings = vec![rating("ana", "lucia", 4, at(2025, 3, 1))];
    let result = submit_rating(
        RatingSubmission::new("ana", "lucia", 9, ""),
        &ratings,
        at(2025, 3, 2),
    );
    assert_eq!(result, Err(ReviewError::InvalidScore(9)));
}

#[test]
fn submit_rejects_missing_identities() {
    let result = submit_rating(RatingSubmission::new("ana", "", 4, ""), &[], at(2025, 3, 1));
    assert!(matches!(result, Err(ReviewError::MalformedInput(_))));
}

#[test]
fn accepted_rating_is_stamped_and_trimmed() {
    let now = at(2025, 3, 1);
    let stored = submit_rating(
        RatingSubmission::new("ana", "lucia", 5, "  Gran compañera \n"),
        &[],
        now,
    )
    .expect("rating accepted");

    assert_eq!(stored.score.get(), 5);
    assert_eq!(stored.comment, "Gran compañera");
    assert_eq!(stored.created_at, now);
}

#[test]
fn re_rating_after_cooldown_keeps_history() {
    let first = rating("ana", "lucia", 3, at(2024, 1, 1));
    let ratings = vec![first.clone()];

    let second = submit_rating(
        RatingSubmission::new("ana", "lucia", 5, "Ha mejorado"),
        &ratings,
        at(2024, 12, 1),
    )
    .expect("cooldown elapsed");

    assert_eq!(second.score.get(), 5);
    assert_eq!(ratings, vec![first]);
}
