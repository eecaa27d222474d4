use crate::infra::{build_engine, InMemoryRatingRepository};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::Args;
use estupiso::config::AppConfig;
use estupiso::domain::{ListingId, UserId};
use estupiso::error::AppError;
use estupiso::matching::{
    Cleanliness, CompatibilityBreakdown, CompatibilityEngine, GenderPreference, Listing,
    OwnerPreferences, Person, Schedule,
};
use estupiso::reviews::{RatingSubmission, ReviewService, ReviewServiceError};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// JSON file with a `candidate` plus optional `people` and `listings` arrays
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print every rule that contributed to each score
    #[arg(long)]
    pub(crate) breakdown: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date of the first review in the walkthrough (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Skip the review lifecycle portion of the demo.
    #[arg(long)]
    pub(crate) skip_reviews: bool,
}

#[derive(Debug, Deserialize)]
struct MatchInput {
    candidate: Person,
    #[serde(default)]
    people: Vec<Person>,
    #[serde(default)]
    listings: Vec<Listing>,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = build_engine(&config)?;

    let reader = BufReader::new(File::open(&args.input)?);
    let input: MatchInput = serde_json::from_reader(reader)?;

    render_matches(&engine, &input, args.breakdown);
    Ok(())
}

fn render_matches(engine: &CompatibilityEngine, input: &MatchInput, breakdown: bool) {
    let candidate = &input.candidate;
    println!("Compatibility for {}", candidate.id);

    if !input.people.is_empty() {
        println!("\nRoommates");
        for ranked in engine.rank_people(candidate, &input.people) {
            println!("- {:>3}  {}", ranked.score, ranked.subject.id);
            if breakdown {
                render_breakdown(&engine.person_breakdown(candidate, ranked.subject));
            }
        }
    }

    if !input.listings.is_empty() {
        println!("\nListings");
        for ranked in engine.rank_listings(candidate, &input.listings) {
            println!(
                "- {:>3}  {} ({} | {} EUR/month)",
                ranked.score, ranked.subject.id, ranked.subject.zone, ranked.subject.monthly_price
            );
            if breakdown {
                render_breakdown(&engine.listing_breakdown(candidate, ranked.subject));
            }
        }
    }
}

fn render_breakdown(breakdown: &CompatibilityBreakdown) {
    for component in &breakdown.components {
        println!(
            "        {:+6.1}  {:?}: {}",
            component.points, component.factor, component.notes
        );
    }
    println!("        raw total {:.1}", breakdown.raw_total);
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start,
        skip_reviews,
    } = args;

    let config = AppConfig::load()?;
    let engine = build_engine(&config)?;

    println!("EsTuPiso demo");
    let input = sample_input();
    render_matches(&engine, &input, true);

    if skip_reviews {
        return Ok(());
    }

    let start = start
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now);

    println!("\nReview lifecycle");
    let repository = Arc::new(InMemoryRatingRepository::default());
    let service = ReviewService::new(repository.clone(), config.reviews.cooldown_policy());
    review_walkthrough(&service, start);
    println!("- {} rating(s) stored", repository.len());

    Ok(())
}

fn review_walkthrough(service: &ReviewService<InMemoryRatingRepository>, start: DateTime<Utc>) {
    let ana = UserId::new("ana");
    let lucia = UserId::new("lucia");

    report_submission(
        service.submit(
            RatingSubmission::new("ana", "lucia", 5, "Muy ordenada y puntual con los pagos"),
            start,
        ),
        "ana rates lucia",
    );

    if let Ok(received) = service.received(&lucia) {
        println!(
            "  lucia sees {} review(s); {} hidden until they rate back",
            received.reviews.len(),
            received.hidden
        );
    }
    if let Ok(pending) = service.pending(&lucia) {
        let names: Vec<&str> = pending.iter().map(UserId::as_str).collect();
        println!("  lucia is prompted to rate: {}", names.join(", "));
    }

    report_submission(
        service.submit(
            RatingSubmission::new("lucia", "ana", 4, "Buena convivencia"),
            start + Duration::days(2),
        ),
        "lucia rates ana",
    );

    if let Ok(received) = service.received(&lucia) {
        let average = received
            .summary
            .average
            .map(|value| format!("{value:.1}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  lucia now sees {} review(s), average {average}",
            received.reviews.len()
        );
    }

    report_submission(
        service.submit(
            RatingSubmission::new("ana", "lucia", 3, "Segunda opinión"),
            start + Duration::days(30),
        ),
        "ana tries to rate lucia again a month later",
    );

    let later = service.policy().eligible_on(start);
    match service.can_rate(&ana, &lucia, later) {
        Ok(allowed) => println!("  ana may rate lucia again on {later}: {allowed}"),
        Err(err) => println!("  eligibility unavailable: {err}"),
    }
}

fn report_submission<T>(outcome: Result<T, ReviewServiceError>, label: &str) {
    match outcome {
        Ok(_) => println!("- {label}: accepted"),
        Err(err) => println!("- {label}: rejected ({err})"),
    }
}

fn sample_input() -> MatchInput {
    let candidate = Person {
        age: Some(22),
        field_of_study: Some("Medicina".to_string()),
        zone: Some("Centro".to_string()),
        max_budget: Some(380),
        interests: ["cocina", "running", "cine"]
            .into_iter()
            .map(String::from)
            .collect(),
        cleanliness: Some(Cleanliness::Tidy),
        schedule: Some(Schedule::Early),
        gender: Some("mujer".to_string()),
        ..Person::new("ana")
    };

    let lucia = Person {
        age: Some(23),
        field_of_study: Some("Enfermería".to_string()),
        zone: Some("Centro".to_string()),
        max_budget: Some(400),
        interests: ["cocina", "cine"].into_iter().map(String::from).collect(),
        cleanliness: Some(Cleanliness::VeryTidy),
        schedule: Some(Schedule::Normal),
        gender: Some("mujer".to_string()),
        ..Person::new("lucia")
    };

    let pablo = Person {
        age: Some(25),
        field_of_study: Some("Derecho".to_string()),
        zone: Some("Malasaña".to_string()),
        max_budget: Some(550),
        cleanliness: Some(Cleanliness::Relaxed),
        schedule: Some(Schedule::Late),
        smoker: true,
        enjoys_parties: true,
        ..Person::new("pablo")
    };

    let listings = vec![
        Listing {
            id: ListingId("piso-centro".to_string()),
            monthly_price: 390,
            zone: "Centro".to_string(),
            owner_preferences: Some(OwnerPreferences {
                preferred_gender: GenderPreference::Only("mujer".to_string()),
                min_age: Some(18),
                max_age: Some(30),
                cleanliness: Some(Cleanliness::Tidy),
                preferred_fields: ["Medicina", "Enfermería"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                ..OwnerPreferences::default()
            }),
            current_occupant: Some(lucia.clone()),
        },
        Listing {
            id: ListingId("estudio-malasana".to_string()),
            monthly_price: 600,
            zone: "Malasaña".to_string(),
            owner_preferences: Some(OwnerPreferences {
                smoking_allowed: true,
                parties_allowed: true,
                ..OwnerPreferences::default()
            }),
            current_occupant: Some(pablo.clone()),
        },
    ];

    MatchInput {
        candidate,
        people: vec![lucia, pablo],
        listings,
    }
}
