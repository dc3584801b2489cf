use chrono::{DateTime, Utc};
use potsettle::{
    Decimal, EngineConfig, PlayerName, PlayerResult, SessionStatus, SettlementError,
    SettlementSession, TransferLeg, TransferOrigin,
};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn t0() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

fn name(s: &str) -> PlayerName {
    PlayerName::new(s)
}

fn club_night() -> SettlementSession {
    SettlementSession::new("friday", EngineConfig::default()).with_players(vec![
        PlayerResult::with_rebuys("Ana", d("50"), &[d("50")], d("185")),
        PlayerResult::new("Ben", d("50"), d("0")),
        PlayerResult::with_rebuys("Cleo", d("50"), &[d("25")], d("40")),
        PlayerResult::new("Dev", d("50"), d("50")),
    ])
}

#[test]
fn test_cash_out_edit_after_ledger_requires_recompute() {
    let mut session = club_night();
    session.recompute(t0()).unwrap();
    assert!(!session.is_stale());

    session.set_cash_out(&name("Dev"), d("45")).unwrap();
    assert!(session.is_stale());
    assert_eq!(session.status(), SessionStatus::Pending);
    assert!(matches!(session.ledger(), Err(SettlementError::Stale)));
    // The last ledger is still there for display.
    assert_eq!(session.state().last_ledger().len(), 2);

    session.set_cash_out(&name("Ana"), d("190")).unwrap();
    let report = session.recompute(t0()).unwrap();
    assert!(report.changed);
    assert!(report.is_balanced());
    assert!(!session.is_stale());
}

#[test]
fn test_full_session_flow() {
    let mut session = club_night();
    // Ana +85, Ben -50, Cleo -35, Dev 0.
    let report = session.recompute(t0()).unwrap();
    assert!(report.imbalance.is_zero());
    assert_eq!(report.balances.get(&name("Ana")), Some(d("85")));

    // Cleo already handed Ana 20 in cash.
    session.pin(TransferLeg::new("Cleo", "Ana", d("20")));
    let report = session.recompute(t0()).unwrap();
    assert_eq!(report.residual.get(&name("Cleo")), Some(d("-15")));
    assert_eq!(report.residual.get(&name("Ana")), Some(d("65")));

    let ledger = session.ledger().unwrap();
    let summary: Vec<_> = ledger
        .iter()
        .map(|t| (t.id.to_string(), t.amount, t.origin))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Cleo_Ana".to_string(), d("20"), TransferOrigin::Manual),
            ("Ben_Ana".to_string(), d("50"), TransferOrigin::Optimized),
            ("Cleo_Ana_2".to_string(), d("15"), TransferOrigin::Optimized),
        ]
    );
    assert_eq!(ledger.amount_between(&name("Cleo"), &name("Ana")), d("35"));

    let ids: Vec<_> = ledger.iter().map(|t| t.id.clone()).collect();
    assert_eq!(session.mark_paid(&ids[0], true).unwrap(), SessionStatus::Partial);
    assert_eq!(session.mark_paid(&ids[1], true).unwrap(), SessionStatus::Partial);
    assert_eq!(session.mark_paid(&ids[2], true).unwrap(), SessionStatus::Completed);

    let paid = session.paid_map().unwrap();
    assert_eq!(paid.len(), 3);
    assert!(paid.values().all(|p| *p));
}

#[test]
fn test_unbalanced_session_surfaces_leftover() {
    let mut session = SettlementSession::new("short", EngineConfig::default()).with_players(vec![
        PlayerResult::new("A", d("100"), d("160")),
        PlayerResult::new("B", d("100"), d("50")),
    ]);
    let report = session.recompute(t0()).unwrap();
    assert_eq!(report.imbalance, d("10"));
    assert!(!report.is_balanced());
    assert_eq!(report.unsettled.len(), 1);
    assert_eq!(report.unsettled[0].name, name("A"));
    assert_eq!(report.unsettled[0].amount, d("10"));
    assert_eq!(session.ledger().unwrap().total_amount(), d("50"));
}

#[test]
fn test_duplicate_players_rejected_at_boundary() {
    let mut session = SettlementSession::new("dup", EngineConfig::default()).with_players(vec![
        PlayerResult::new("A", d("10"), d("20")),
        PlayerResult::new("A", d("10"), d("0")),
    ]);
    assert!(matches!(
        session.recompute(t0()),
        Err(SettlementError::Validation(_))
    ));
    assert!(session.is_stale());
}
