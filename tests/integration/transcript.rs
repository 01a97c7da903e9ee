//! Replay of a JSON transcript through the public API.

use rust_decimal_macros::dec;

use gavel::config::{AppConfig, EngineConfig};
use gavel::replay::{replay, GameTranscript};
use gavel::storage;
use gavel::strategy::BidEngine;
use gavel::types::{Category, Priority};

const TRANSCRIPT: &str = r#"{
  "participant_id": "me",
  "rounds": [
    {
      "round_index": 0,
      "current_category": "Picasso",
      "schedule": [
        "Picasso", "Picasso", "Van Gogh", "Picasso",
        "Picasso", "Picasso", "Picasso", "Van Gogh"
      ],
      "participants": [
        {"id": "me", "name": "Me", "owned": {}, "budget": 1001, "score": 0},
        {"id": "rival", "name": "Rival", "owned": {}, "budget": 1001, "score": 0}
      ],
      "winner_ids": [],
      "amounts_paid": [],
      "target": [3, 2, 1],
      "round_limit": 8,
      "starting_budget": 1001,
      "payment_rule": 1
    },
    {
      "round_index": 1,
      "current_category": "Picasso",
      "schedule": [
        "Picasso", "Picasso", "Van Gogh", "Picasso",
        "Picasso", "Picasso", "Picasso", "Van Gogh"
      ],
      "participants": [
        {"id": "me", "name": "Me", "owned": {"Picasso": 1}, "budget": 889, "score": 0},
        {"id": "rival", "name": "Rival", "owned": {}, "budget": 1001, "score": 0}
      ],
      "winner_ids": ["me"],
      "amounts_paid": [112],
      "target": [3, 2, 1],
      "round_limit": 8,
      "starting_budget": 1001,
      "payment_rule": 1
    },
    {
      "round_index": 2,
      "current_category": "Van Gogh",
      "schedule": [
        "Picasso", "Picasso", "Van Gogh", "Picasso",
        "Picasso", "Picasso", "Picasso", "Van Gogh"
      ],
      "participants": [
        {"id": "me", "name": "Me", "owned": {"Picasso": 1}, "budget": 889, "score": 0},
        {"id": "rival", "name": "Rival", "owned": {"Picasso": 1}, "budget": 881, "score": 0}
      ],
      "winner_ids": ["me", "rival"],
      "amounts_paid": [112, 120],
      "target": [3, 2, 1],
      "round_limit": 8,
      "starting_budget": 1001,
      "payment_rule": 1
    }
  ]
}"#;

fn temp_path(ext: &str) -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("gavel_it_{}.{ext}", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

#[test]
fn test_replay_transcript_file() {
    let path = temp_path("json");
    std::fs::write(&path, TRANSCRIPT).unwrap();
    let transcript = GameTranscript::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let report = replay(&transcript, &EngineConfig::default()).unwrap();
    assert_eq!(report.rounds, 3);

    // Round 0: nothing owned → HIGH, floor(1001 / 8) * 0.9 = 112.5 → 112.
    assert_eq!(report.decisions[0].priority, Priority::High);
    assert_eq!(report.decisions[0].bid, dec!(112));

    // Round 1: we won, countdown 7; Picasso leads the top slot → HIGH;
    // floor(889 / 7) * 0.9 = 114.3, capped at the one Picasso price of 112.
    let r1 = &report.decisions[1];
    assert_eq!(r1.items_still_needed, 7);
    assert_eq!(r1.priority, Priority::High);
    assert_eq!(r1.market_average, Some(dec!(112)));
    assert_eq!(r1.bid, dec!(112));

    // Round 2: Van Gogh unowned → HIGH, no Van Gogh history, so no cap.
    let r2 = &report.decisions[2];
    assert_eq!(r2.items_still_needed, 7);
    assert_eq!(r2.market_average, None);
    assert_eq!(r2.bid, dec!(114));

    let state = &report.final_state;
    let picasso = Category::from("Picasso");
    assert_eq!(state.price_history.prices(&picasso), &[dec!(112), dec!(120)]);
    assert_eq!(state.last_category, Some(Category::from("Van Gogh")));
}

#[test]
fn test_resume_from_saved_state_matches_uninterrupted_run() {
    let transcript: GameTranscript = serde_json::from_str(TRANSCRIPT).unwrap();
    let cfg = AppConfig::parse("").unwrap().engine;

    let mut straight = BidEngine::new("me", cfg.clone());
    let expected: Vec<_> = transcript.rounds.iter().map(|r| straight.bid(r)).collect();

    // Play two rounds, persist, then resume for the last one.
    let path = temp_path("json");
    let mut first = BidEngine::new("me", cfg.clone());
    let mut bids: Vec<_> = transcript.rounds[..2].iter().map(|r| first.bid(r)).collect();
    storage::save_state(first.participant_id(), first.state(), Some(&path)).unwrap();

    let (id, state) = storage::load_state(Some(&path)).unwrap().unwrap();
    storage::delete_state(Some(&path)).unwrap();
    let mut resumed = BidEngine::with_state(id, cfg, state);
    bids.push(resumed.bid(&transcript.rounds[2]));

    assert_eq!(bids, expected);
    let picasso = Category::from("Picasso");
    assert_eq!(resumed.last_average(&picasso), straight.last_average(&picasso));
    assert_eq!(resumed.state(), straight.state());
}
