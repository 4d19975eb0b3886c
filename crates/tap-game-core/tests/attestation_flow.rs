//! Integration tests for the attestation flow.
//!
//! These tests drive the attestor and verifier together the way the oracle
//! and a settling consumer do.

use std::sync::Arc;
use std::thread;

use tap_game_core::{
    attestation::DEFAULT_VALIDITY_SECS, Address, Attestor, GameId, ManualClock, Nonce,
    SettlementError, SettlementLedger, SigningIdentity, Verifier,
};

struct Harness {
    clock: ManualClock,
    attestor: Attestor,
    verifier: Verifier,
}

fn harness(start: u64) -> Harness {
    let clock = ManualClock::new(start);
    let identity = Arc::new(SigningIdentity::random());
    Harness {
        verifier: Verifier::new(Some(identity.address())).with_clock(Arc::new(clock.clone())),
        attestor: Attestor::new(Some(identity)).with_clock(Arc::new(clock.clone())),
        clock,
    }
}

fn winner_abcd() -> Address {
    "0xabcdabcdabcdabcdabcdabcdabcdabcdabcdabcd".parse().unwrap()
}

/// A signature produced outside this crate by key 0x00..01 is accepted as-is
#[test]
fn test_verifies_externally_produced_signature() {
    let clock = ManualClock::new(1030);
    let verifier = Verifier::new(Some(
        "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".parse().unwrap(),
    ))
    .with_clock(Arc::new(clock.clone()));
    let signature = concat!(
        "0xe4ceeeb627f72c9affe0fc79959c71d66e96ad811ad4f3c99e7950ae77b403bf",
        "6a187d29dd412741057958b872a4f509b1d6fa790b66a70b8fa265f2ce45a6bd",
        "1b",
    );
    let nonce = format!("0x{}", "11".repeat(32));

    assert!(verifier.check_encoded(
        signature,
        7,
        "0xabcdabcdabcdabcdabcdabcdabcdabcdabcdabcd",
        1000,
        &nonce,
    ));
    assert!(!verifier.check_encoded(
        signature,
        8,
        "0xabcdabcdabcdabcdabcdabcdabcdabcdabcdabcd",
        1000,
        &nonce,
    ));
}

/// gameId 7, 60s validity, issued at t=1000, checked at 1030 and 1061
#[test]
fn test_game_seven_scenario() {
    let h = harness(1000);
    let a = h
        .attestor
        .issue_with_validity(GameId::new(7), winner_abcd(), 60)
        .unwrap();
    assert_eq!(a.timestamp, 1000);
    assert_eq!(a.expiry, 1060);

    h.clock.set(1030);
    assert!(h
        .verifier
        .check(&a.signature, GameId::new(7), winner_abcd(), 1000, a.nonce));

    let other_winner: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
    assert!(!h
        .verifier
        .check(&a.signature, GameId::new(7), other_winner, 1000, a.nonce));

    h.clock.set(1061);
    assert!(!h
        .verifier
        .check(&a.signature, GameId::new(7), winner_abcd(), 1000, a.nonce));
}

#[test]
fn test_issue_then_check_for_many_pairs() {
    let h = harness(1_700_000_000);

    for id in [0u64, 1, 7, 255, 65_536, u64::MAX] {
        let winner = Address::from_bytes([(id % 251) as u8; 20]);
        let a = h.attestor.issue(GameId::new(id), winner).unwrap();
        assert!(
            h.verifier
                .check(&a.signature, a.game_id, a.winner_address, a.timestamp, a.nonce),
            "game {} failed to verify",
            id
        );
    }
}

#[test]
fn test_single_field_tampering_is_rejected() {
    let h = harness(1000);
    let a = h.attestor.issue(GameId::new(7), winner_abcd()).unwrap();
    let v = &h.verifier;

    assert!(v.check(&a.signature, a.game_id, a.winner_address, a.timestamp, a.nonce));

    assert!(!v.check(&a.signature, GameId::new(8), a.winner_address, a.timestamp, a.nonce));

    let mut winner = *a.winner_address.as_bytes();
    winner[19] ^= 0x01;
    assert!(!v.check(
        &a.signature,
        a.game_id,
        Address::from_bytes(winner),
        a.timestamp,
        a.nonce
    ));

    // Still inside the window, so only the hash changes
    assert!(!v.check(&a.signature, a.game_id, a.winner_address, a.timestamp - 1, a.nonce));

    let mut nonce = *a.nonce.as_bytes();
    nonce[0] ^= 0x80;
    assert!(!v.check(
        &a.signature,
        a.game_id,
        a.winner_address,
        a.timestamp,
        Nonce::from_bytes(nonce)
    ));

    for i in 0..a.signature.len() {
        let mut signature = a.signature.clone();
        signature[i] ^= 0x01;
        assert!(
            !v.check(&signature, a.game_id, a.winner_address, a.timestamp, a.nonce),
            "flipping signature byte {} was accepted",
            i
        );
    }
}

#[test]
fn test_attestations_do_not_cross_validate() {
    let h = harness(1000);
    let first = h.attestor.issue(GameId::new(7), winner_abcd()).unwrap();
    let second = h.attestor.issue(GameId::new(7), winner_abcd()).unwrap();

    assert_ne!(first.nonce, second.nonce);

    assert!(!h.verifier.check(
        &first.signature,
        second.game_id,
        second.winner_address,
        second.timestamp,
        second.nonce
    ));
    assert!(!h.verifier.check(
        &second.signature,
        first.game_id,
        first.winner_address,
        first.timestamp,
        first.nonce
    ));
}

#[test]
fn test_untrusted_key_always_rejected() {
    let h = harness(1000);
    let rogue =
        Attestor::new(Some(Arc::new(SigningIdentity::random()))).with_clock(Arc::new(h.clock.clone()));

    for id in 0..5 {
        let a = rogue.issue(GameId::new(id), winner_abcd()).unwrap();
        assert!(!h
            .verifier
            .check(&a.signature, a.game_id, a.winner_address, a.timestamp, a.nonce));
    }
}

#[test]
fn test_freshness_boundary_both_sides() {
    let h = harness(5000);
    let a = h.attestor.issue(GameId::new(1), winner_abcd()).unwrap();

    h.clock.set(5000 + DEFAULT_VALIDITY_SECS);
    assert!(h.verifier.verify_attestation(&a).is_ok());

    h.clock.set(5000 + DEFAULT_VALIDITY_SECS + 1);
    assert!(h.verifier.verify_attestation(&a).is_err());
}

#[test]
fn test_json_wire_round_trip_verifies() {
    let h = harness(1000);
    let a = h.attestor.issue(GameId::new(42), winner_abcd()).unwrap();

    let json = serde_json::to_string(&a).unwrap();
    let decoded: tap_game_core::Attestation = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, a);
    assert!(h.verifier.verify_attestation(&decoded).is_ok());
}

#[test]
fn test_configured_from_hex_strings() {
    let clock = ManualClock::new(1000);
    let key = format!("0x{}", "2a".repeat(32));
    let identity = Arc::new(SigningIdentity::from_hex(&key).unwrap());
    let trusted: Address = identity.address().to_lower_hex().parse().unwrap();

    let attestor = Attestor::new(Some(identity)).with_clock(Arc::new(clock.clone()));
    let verifier = Verifier::new(Some(trusted)).with_clock(Arc::new(clock));

    let a = attestor.issue(GameId::new(3), winner_abcd()).unwrap();
    assert!(verifier.verify_attestation(&a).is_ok());
}

#[test]
fn test_concurrent_issue_and_check() {
    let h = Arc::new(harness(1000));

    let handles: Vec<_> = (0..8u64)
        .map(|worker| {
            let h = Arc::clone(&h);
            thread::spawn(move || {
                for round in 0..10u64 {
                    let game_id = GameId::new(worker * 100 + round);
                    let a = h.attestor.issue(game_id, winner_abcd()).unwrap();
                    assert!(h.verifier.verify_attestation(&a).is_ok());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_settlement_blocks_replay_within_window() {
    let h = harness(1000);
    let ledger = SettlementLedger::new().with_clock(Arc::new(h.clock.clone()));
    let a = h.attestor.issue(GameId::new(7), winner_abcd()).unwrap();

    assert!(ledger.settle(&a, &h.verifier).is_ok());

    h.clock.advance(10);
    assert!(h.verifier.verify_attestation(&a).is_ok());
    assert_eq!(
        ledger.settle(&a, &h.verifier),
        Err(SettlementError::AlreadySettled(GameId::new(7)))
    );
}
