use std::{collections::HashMap, sync::Arc, time::Duration};

use proptest::prelude::*;

use racetime::{
    clock::ManualClock,
    config::RegistrationPolicy,
    contestant::Registration,
    core::{
        ids::IdGenerator,
        store::{FinishError, FinishOutcome, RaceStore},
    },
    types::{ContestantId, Group},
};

#[derive(Debug, Clone)]
enum Action {
    Register { group: u8 },
    Start,
    Advance { ms: u16 },
    Finish { target: u8 },
    FinishUnknown,
    Reset,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (1u8..=30).prop_map(|group| Action::Register { group }),
        1 => Just(Action::Start),
        3 => (0u16..5000).prop_map(|ms| Action::Advance { ms }),
        4 => any::<u8>().prop_map(|target| Action::Finish { target }),
        1 => Just(Action::FinishUnknown),
        1 => Just(Action::Reset),
    ]
}

fn new_store(seed: u64, clock: &ManualClock) -> RaceStore {
    let policy = RegistrationPolicy {
        id_digits: 3,
        phone_required: false,
        ..RegistrationPolicy::default()
    };
    RaceStore::from_policy(policy)
        .with_clock(Arc::new(clock.clone()))
        .with_id_generator(IdGenerator::seeded(3, 4, seed))
}

proptest! {
    #[test]
    fn random_sequences_preserve_race_invariants(
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 1..200),
    ) {
        let clock = ManualClock::default();
        let mut store = new_store(seed, &clock);
        let mut live: Vec<ContestantId> = Vec::new();
        let mut recorded: HashMap<ContestantId, Duration> = HashMap::new();

        for action in actions {
            match action {
                Action::Register { group } => {
                    let group = Group::new(group).expect("group");
                    let id = store
                        .register(Registration::new(format!("runner {}", live.len()), group))
                        .expect("register");
                    prop_assert!(!live.contains(&id), "duplicate id {}", id);
                    live.push(id);
                }
                Action::Start => {
                    let before = store.started();
                    let out = store.start_race();
                    if let Some(before) = before {
                        prop_assert_eq!(out.start(), before);
                    }
                }
                Action::Advance { ms } => clock.advance(Duration::from_millis(u64::from(ms))),
                Action::Finish { target } => {
                    if live.is_empty() {
                        continue;
                    }
                    let id = &live[usize::from(target) % live.len()];
                    match store.record_finish(id.as_str()) {
                        Ok(FinishOutcome::Recorded(rec)) => {
                            prop_assert!(!recorded.contains_key(id));
                            recorded.insert(id.clone(), rec.finish_time);
                        }
                        Ok(FinishOutcome::AlreadyFinished(rec)) => {
                            prop_assert_eq!(recorded.get(id).copied(), Some(rec.finish_time));
                        }
                        Err(FinishError::RaceNotStarted) => {
                            prop_assert!(!store.is_running());
                            prop_assert!(!recorded.contains_key(id));
                        }
                        Err(FinishError::InvalidId(_)) => prop_assert!(false, "live id rejected"),
                    }
                }
                Action::FinishUnknown => {
                    let unknown = (100..1000)
                        .map(|n: u32| n.to_string())
                        .find(|c| store.get(c).is_none());
                    if let Some(token) = unknown {
                        let res = store.record_finish(&token);
                        prop_assert!(matches!(res, Err(FinishError::InvalidId(_))));
                    }
                }
                Action::Reset => {
                    store.reset_race();
                    live.clear();
                    recorded.clear();
                    prop_assert!(store.snapshot().is_empty());
                }
            }

            let snap = store.snapshot();
            prop_assert_eq!(snap.running, snap.started_at.is_some());
            prop_assert_eq!(snap.running, store.is_running());
            prop_assert_eq!(snap.rows.len(), live.len());

            let finish_times: Vec<Option<Duration>> = snap.rows.iter().map(|r| r.finish_time).collect();
            let finished = snap.finished_count();
            prop_assert!(finish_times[finished..].iter().all(Option::is_none));
            prop_assert!(finish_times[..finished].windows(2).all(|w| w[0] <= w[1]));

            for row in &snap.rows {
                prop_assert_eq!(row.finish_time, recorded.get(&row.id).copied());
            }
        }
    }
}
