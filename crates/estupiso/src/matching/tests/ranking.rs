use super::common::*;
use crate::domain::{ListingId, UserId};

#[test]
fn people_rank_descending_with_stable_ties() {
    let engine = engine();
    let candidate = tidy_student("ana");
    let others = vec![
        tidy_student("lucia"),
        blank("marta"),
        tidy_student("carmen"),
        {
            let mut smoker = blank("pablo");
            smoker.smoker = true;
            smoker
        },
    ];

    let ranked = engine.rank_people(&candidate, &others);

    let order: Vec<(&UserId, u8)> = ranked
        .iter()
        .map(|entry| (&entry.subject.id, entry.score))
        .collect();
    assert_eq!(
        order,
        vec![
            (&UserId::new("lucia"), 82),
            (&UserId::new("carmen"), 82),
            (&UserId::new("marta"), 50),
            (&UserId::new("pablo"), 35),
        ]
    );
}

#[test]
fn listings_rank_by_fit() {
    let engine = engine();
    let mut candidate = tidy_student("ana");
    candidate.max_budget = Some(350);
    let listings = vec![
        listing("lejos", 900, "Retiro"),
        listing("ideal", 360, "Centro"),
        listing("barato", 300, "Retiro"),
    ];

    let ranked = engine.rank_listings(&candidate, &listings);

    let ids: Vec<&ListingId> = ranked.iter().map(|entry| &entry.subject.id).collect();
    assert_eq!(
        ids,
        vec![
            &ListingId("ideal".to_string()),
            &ListingId("barato".to_string()),
            &ListingId("lejos".to_string()),
        ]
    );
    assert_eq!(ranked[0].score, 85);
}

#[test]
fn empty_input_ranks_to_empty_output() {
    let engine = engine();
    assert!(engine.rank_people(&blank("ana"), &[]).is_empty());
    assert!(engine.rank_listings(&blank("ana"), &[]).is_empty());
}
