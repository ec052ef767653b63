//! Registry integration tests.

mod common;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use durak::auth::authenticate;
use durak::{
    AuthError, Authenticator, ErrorKind, Game, GameOptions, GameSnapshot, Identity, JoinError,
    MatchError, MatchRegistry, Phase, Player, PlayError, PlayerId, StartError,
};

use common::{alice, bob, init_logging, stacked_deck};

fn registry() -> MatchRegistry {
    MatchRegistry::new(
        GameOptions::default()
            .with_defense_window(Duration::from_secs(60))
            .with_seed(99),
    )
}

fn identity(id: &PlayerId) -> Identity {
    Identity::new(id.clone(), id.as_str().to_uppercase())
}

struct StaticGate(HashMap<&'static str, (&'static str, Identity)>);

impl Authenticator for StaticGate {
    fn authenticate(&self, login: &str, credential: &str) -> Option<Identity> {
        self.0
            .get(login)
            .filter(|(secret, _)| *secret == credential)
            .map(|(_, identity)| identity.clone())
    }
}

#[test]
fn join_codes_are_unique_digit_strings() {
    let registry = registry();
    let creator = identity(&alice());

    let codes: HashSet<String> = (0..500)
        .map(|_| registry.create_game(&creator).1)
        .collect();

    assert_eq!(codes.len(), 500);
    assert_eq!(registry.len(), 500);
    assert!(codes
        .iter()
        .all(|code| code.len() == 8 && code.chars().all(|c| c.is_ascii_digit())));
}

#[test]
fn full_match_flow_through_registry() {
    init_logging();
    let registry = registry();
    let (game_id, code) = registry.create_game(&identity(&alice()));

    assert_eq!(registry.join_game(&code, &identity(&bob())).unwrap(), 2);

    let err = registry.start_game(&code, &bob()).unwrap_err();
    assert_eq!(
        err,
        MatchError::Start(StartError::NotCreator { player: bob() })
    );
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    let started = registry.start_game(&code, &alice()).unwrap();
    assert_eq!(started.turn_holder, alice());
    assert!(started.trump.is_some());

    let game = registry.get(&code).unwrap();
    assert_eq!(game.id(), game_id);
    let opening = game.hand(&alice()).unwrap()[0].to_string();

    let next = registry
        .play_cards(&code, &alice(), &[opening.as_str()])
        .unwrap();
    assert_eq!(next, bob());

    let state = registry.get_state(&code).unwrap();
    assert_eq!(state.game_id, game_id);
    assert_eq!(state.join_code, code);
    assert_eq!(state.players, vec!["ALICE", "BOB"]);
    assert_eq!(state.table.len(), 1);
    assert_eq!(state.table[0].attack.to_string(), opening);

    let err = registry
        .play_cards(&code, &alice(), &[opening.as_str()])
        .unwrap_err();
    assert!(matches!(
        err,
        MatchError::Play(PlayError::TurnViolation { .. })
    ));

    let err = registry.defend(&code, &bob(), &opening, "ZZ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(
        registry.join_game(&code, &identity(&PlayerId::new("carol"))).unwrap_err(),
        MatchError::Join(JoinError::AlreadyStarted)
    );
}

#[test]
fn unknown_join_code_is_not_found() {
    let registry = registry();
    let missing = MatchError::NotFound {
        join_code: "nope".to_owned(),
    };

    assert_eq!(
        registry.join_game("nope", &identity(&alice())).unwrap_err(),
        missing
    );
    assert_eq!(registry.start_game("nope", &alice()).unwrap_err(), missing);
    assert_eq!(
        registry.play_cards("nope", &alice(), &["6H"]).unwrap_err(),
        missing
    );
    assert_eq!(
        registry.defend("nope", &alice(), "6H", "7H").unwrap_err(),
        missing
    );
    assert_eq!(registry.get_state("nope").unwrap_err(), missing);
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}

#[test]
fn insert_refuses_taken_codes_and_remove_frees_them() {
    let registry = registry();
    let first = Game::with_deck(
        Player::new(alice(), "Alice"),
        "11111111",
        GameOptions::default(),
        stacked_deck(&[], "AD"),
    )
    .unwrap();
    let second = Game::new(Player::new(bob(), "Bob"), "11111111", GameOptions::default());

    assert!(registry.insert(first).is_ok());
    let refused = registry.insert(second).err().unwrap();
    assert_eq!(refused.creator(), &bob());
    assert_eq!(registry.get("11111111").unwrap().creator(), &alice());

    assert!(registry.remove("11111111").is_some());
    assert!(registry.is_empty());
    assert!(registry.insert(refused).is_ok());
}

#[test]
fn finished_matches_can_be_swept() {
    let registry = registry();
    let (_, live) = registry.create_game(&identity(&alice()));

    let done = Game::with_deck(
        Player::new(alice(), "Alice"),
        "22222222",
        GameOptions::default()
            .with_hand_size(1)
            .with_defense_window(Duration::from_secs(60)),
        stacked_deck(&["6H", "9H"], "AD"),
    )
    .unwrap();
    done.add_player(Player::new(bob(), "Bob")).unwrap();
    registry.insert(Arc::clone(&done)).unwrap();

    registry.start_game("22222222", &alice()).unwrap();
    registry.play_cards("22222222", &alice(), &["6H"]).unwrap();
    registry.defend("22222222", &bob(), "6H", "9H").unwrap();
    assert_eq!(done.phase(), Phase::Finished);

    assert_eq!(registry.remove_finished(), 1);
    assert!(registry.get("22222222").is_none());
    assert!(registry.get(&live).is_some());
}

#[test]
fn registry_sink_sees_every_match() {
    let seen: Arc<Mutex<Vec<GameSnapshot>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let registry = registry().with_sink(Arc::new(move |snapshot: &GameSnapshot| {
        sink.lock().unwrap().push(snapshot.clone());
    }));

    let (_, first) = registry.create_game(&identity(&alice()));
    let (_, second) = registry.create_game(&identity(&bob()));
    registry.join_game(&first, &identity(&bob())).unwrap();
    registry.join_game(&second, &identity(&alice())).unwrap();
    registry.start_game(&second, &bob()).unwrap();

    let seen = seen.lock().unwrap();
    let codes: Vec<&str> = seen.iter().map(|s| s.join_code.as_str()).collect();
    assert_eq!(codes, vec![first.as_str(), second.as_str(), second.as_str()]);
    assert_eq!(seen[2].phase, Phase::Started);
}

#[test]
fn concurrent_joins_never_overfill() {
    let registry = Arc::new(registry());
    let (_, code) = registry.create_game(&identity(&alice()));
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|seat| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            let code = code.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.join_game(&code, &identity(&PlayerId::new(format!("p{seat}"))))
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let joined = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(joined, 5);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|err| {
        *err == MatchError::Join(JoinError::GameFull { capacity: 6 })
    }));
    assert_eq!(registry.get(&code).unwrap().player_count(), 6);
}

#[test]
fn concurrent_attacks_admit_exactly_one() {
    let registry = Arc::new(registry());
    let (_, code) = registry.create_game(&identity(&alice()));
    registry.join_game(&code, &identity(&bob())).unwrap();
    registry.start_game(&code, &alice()).unwrap();

    let game = registry.get(&code).unwrap();
    let opening = game.hand(&alice()).unwrap()[0].to_string();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            let code = code.clone();
            let opening = opening.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.play_cards(&code, &alice(), &[opening.as_str()])
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(Result::is_ok)
        .count();

    assert_eq!(successes, 1);
    let state = game.get_state();
    assert_eq!(state.table.len(), 1);
    assert_eq!(state.turn_holder, Some(bob()));
    assert_eq!(game.hand(&alice()).unwrap().len(), 6);
}

#[test]
fn credential_gate_yields_identity() {
    let gate = StaticGate(HashMap::from([(
        "alice@example.com",
        ("hunter2", Identity::new(alice(), "Alice")),
    )]));

    let identity = authenticate(&gate, "alice@example.com", "hunter2").unwrap();
    assert_eq!(identity.id, alice());

    let err = authenticate(&gate, "alice@example.com", "wrong").unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(
        authenticate(&gate, "nobody", "hunter2").unwrap_err().kind(),
        ErrorKind::Validation
    );

    let registry = registry();
    let (_, code) = registry.create_game(&identity);
    assert_eq!(registry.get(&code).unwrap().creator(), &alice());
}
