use super::state::SessionSettlementState;
use crate::approval::SessionStatus;
use crate::config::EngineConfig;
use crate::domain::{Decimal, PinnedTransfer, PlayerName, PlayerResult, TransferId};
use crate::engine::{
    apply_pinned, apply_pinned_lenient, compute_balances, optimize, validate_pinned,
    validate_players, Balance, Balances, RejectedPin, ValidationError,
};
use crate::error::SettlementError;
use crate::ledger::{build_ledger, Ledger};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// What one recompute produced besides the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecomputeReport {
    /// Net result per player before pinned transfers.
    pub balances: Balances,
    /// Balances left for the optimizer after pinned transfers.
    pub residual: Balances,
    /// Sum of all net results; zero when buy-ins equal cash-outs.
    pub imbalance: Decimal,
    /// Positions the optimizer could not match.
    pub unsettled: Vec<Balance>,
    /// Pins skipped in lenient mode. Always empty in strict mode.
    pub skipped_pins: Vec<RejectedPin>,
    pub transfer_count: usize,
    /// Whether the ledger's instructions differ from the previous build.
    pub changed: bool,
}

impl RecomputeReport {
    pub fn is_balanced(&self) -> bool {
        self.unsettled.is_empty()
    }
}

/// Single owner of one session's settlement inputs and ledger.
///
/// Every edit to a player's figures or to the pinned list marks the ledger
/// stale; [`SettlementSession::recompute`] is the only way back to fresh.
#[derive(Debug, Clone)]
pub struct SettlementSession {
    id: String,
    config: EngineConfig,
    players: Vec<PlayerResult>,
    pinned: Vec<PinnedTransfer>,
    state: SessionSettlementState,
}

impl SettlementSession {
    pub fn new(id: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            id: id.into(),
            config,
            players: Vec::new(),
            pinned: Vec::new(),
            state: SessionSettlementState::new(),
        }
    }

    pub fn with_players(mut self, players: Vec<PlayerResult>) -> Self {
        self.players = players;
        self.state.mark_stale();
        self
    }

    pub fn with_pinned(mut self, pinned: Vec<PinnedTransfer>) -> Self {
        self.pinned = pinned;
        self.state.mark_stale();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn players(&self) -> &[PlayerResult] {
        &self.players
    }

    pub fn pinned(&self) -> &[PinnedTransfer] {
        &self.pinned
    }

    pub fn state(&self) -> &SessionSettlementState {
        &self.state
    }

    pub fn is_stale(&self) -> bool {
        self.state.is_stale()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    /// Add a player, or replace the one with the same name.
    pub fn upsert_player(&mut self, player: PlayerResult) {
        match self.players.iter_mut().find(|p| p.name == player.name) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
        self.state.mark_stale();
    }

    pub fn remove_player(&mut self, name: &PlayerName) -> Result<PlayerResult, SettlementError> {
        let index = self.player_index(name)?;
        self.state.mark_stale();
        Ok(self.players.remove(index))
    }

    pub fn set_buy_in(
        &mut self,
        name: &PlayerName,
        total_buy_in: Decimal,
    ) -> Result<(), SettlementError> {
        let index = self.player_index(name)?;
        self.players[index].total_buy_in = total_buy_in;
        self.state.mark_stale();
        Ok(())
    }

    pub fn set_cash_out(
        &mut self,
        name: &PlayerName,
        cash_out: Decimal,
    ) -> Result<(), SettlementError> {
        let index = self.player_index(name)?;
        self.players[index].cash_out = cash_out;
        self.state.mark_stale();
        Ok(())
    }

    /// Append a pinned transfer; returns its index.
    pub fn pin(&mut self, transfer: PinnedTransfer) -> usize {
        self.pinned.push(transfer);
        self.state.mark_stale();
        self.pinned.len() - 1
    }

    pub fn unpin(&mut self, index: usize) -> Result<PinnedTransfer, SettlementError> {
        if index >= self.pinned.len() {
            return Err(SettlementError::UnknownPin(index));
        }
        self.state.mark_stale();
        Ok(self.pinned.remove(index))
    }

    /// Rebuild the ledger from the current players and pins.
    ///
    /// Input is validated first; on any error the previous state, including
    /// staleness, is left untouched. Paid flags are reset.
    pub fn recompute(&mut self, now: DateTime<Utc>) -> Result<RecomputeReport, SettlementError> {
        validate_players(&self.players)?;

        let balances = compute_balances(&self.players);
        let imbalance = balances.total();
        if !imbalance.is_negligible(self.config.epsilon) {
            tracing::warn!(
                "Session {}: buy-ins and cash-outs differ by {}",
                self.id,
                imbalance
            );
        }

        // Pins settle at ledger precision on both sides.
        let pinned: Vec<PinnedTransfer> = self
            .pinned
            .iter()
            .map(|pin| PinnedTransfer {
                amount: pin.amount.round_currency(self.config.currency_scale),
                ..pin.clone()
            })
            .collect();

        let (residual, skipped_pins) = if self.config.strict_pins {
            validate_pinned(&self.players, &pinned)?;
            (apply_pinned(&balances, &pinned)?, Vec::new())
        } else {
            let application = apply_pinned_lenient(&balances, &pinned);
            (application.residual, application.rejected)
        };

        let applied: Vec<PinnedTransfer> = pinned
            .iter()
            .enumerate()
            .filter(|(index, _)| !skipped_pins.iter().any(|r| r.index == *index))
            .map(|(_, pin)| pin.clone())
            .collect();

        let optimization = optimize(&residual, &self.config);
        let ledger = build_ledger(
            &applied,
            &optimization.transfers,
            self.config.currency_scale,
            now,
        );

        let changed = self.state.computed_at().is_none()
            || self.state.last_ledger().fingerprint() != ledger.fingerprint();
        let transfer_count = ledger.len();

        tracing::info!(
            "Session {}: recomputed ledger with {} manual and {} optimized transfer(s){}",
            self.id,
            applied.len(),
            optimization.transfers.len(),
            if changed { "" } else { " (unchanged)" }
        );

        self.state.install(ledger, now);

        Ok(RecomputeReport {
            balances,
            residual,
            imbalance,
            unsettled: optimization.unsettled,
            skipped_pins,
            transfer_count,
            changed,
        })
    }

    /// The current ledger; fails with [`SettlementError::Stale`] until
    /// recomputed after an edit.
    pub fn ledger(&self) -> Result<&Ledger, SettlementError> {
        self.state.ledger()
    }

    pub fn mark_paid(
        &mut self,
        id: &TransferId,
        paid: bool,
    ) -> Result<SessionStatus, SettlementError> {
        self.state
            .update_payments(|ledger| Ok(ledger.mark_paid(id, paid)?))
    }

    /// Re-apply persisted paid flags (keyed by transfer id) to the fresh ledger.
    pub fn restore_paid(
        &mut self,
        flags: &BTreeMap<String, bool>,
    ) -> Result<SessionStatus, SettlementError> {
        self.state
            .update_payments(|ledger| Ok(ledger.with_paid_flags(flags)))
    }

    pub fn paid_map(&self) -> Result<BTreeMap<String, bool>, SettlementError> {
        Ok(self.ledger()?.paid_map())
    }

    fn player_index(&self, name: &PlayerName) -> Result<usize, SettlementError> {
        self.players
            .iter()
            .position(|p| &p.name == name)
            .ok_or_else(|| ValidationError::UnknownPlayer(name.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransferLeg;

    fn player(name: &str, buy_in: i64, cash_out: i64) -> PlayerResult {
        PlayerResult::new(name, Decimal::from_units(buy_in), Decimal::from_units(cash_out))
    }

    fn session() -> SettlementSession {
        SettlementSession::new("s1", EngineConfig::default())
            .with_players(vec![player("A", 100, 150), player("B", 100, 50)])
    }

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn test_recompute_makes_fresh() {
        let mut session = session();
        assert!(session.is_stale());
        assert!(matches!(session.ledger(), Err(SettlementError::Stale)));

        let report = session.recompute(now()).unwrap();
        assert!(report.changed);
        assert!(report.is_balanced());
        assert_eq!(report.transfer_count, 1);
        assert!(!session.is_stale());
        assert_eq!(session.status(), SessionStatus::Pending);
    }

    #[test]
    fn test_every_edit_marks_stale() {
        let mut session = session();
        let recompute_and_check = |session: &mut SettlementSession| {
            session.recompute(now()).unwrap();
            assert!(!session.is_stale());
        };

        recompute_and_check(&mut session);
        session.set_cash_out(&"A".into(), Decimal::from_units(140)).unwrap();
        assert!(session.is_stale());

        recompute_and_check(&mut session);
        session.set_buy_in(&"B".into(), Decimal::from_units(90)).unwrap();
        assert!(session.is_stale());

        recompute_and_check(&mut session);
        session.pin(TransferLeg::new("B", "A", Decimal::from_units(5)));
        assert!(session.is_stale());

        recompute_and_check(&mut session);
        session.unpin(0).unwrap();
        assert!(session.is_stale());

        recompute_and_check(&mut session);
        session.upsert_player(player("C", 10, 10));
        assert!(session.is_stale());

        recompute_and_check(&mut session);
        session.remove_player(&"C".into()).unwrap();
        assert!(session.is_stale());
    }

    #[test]
    fn test_unchanged_recompute_reports_no_change() {
        let mut session = session();
        session.recompute(now()).unwrap();
        session.set_cash_out(&"A".into(), Decimal::from_units(150)).unwrap();
        let report = session.recompute(now()).unwrap();
        assert!(!report.changed);
    }

    #[test]
    fn test_recompute_resets_paid_flags() {
        let mut session = session();
        session.recompute(now()).unwrap();
        let status = session.mark_paid(&TransferId::from("B_A"), true).unwrap();
        assert_eq!(status, SessionStatus::Completed);

        session.set_cash_out(&"A".into(), Decimal::from_units(150)).unwrap();
        session.recompute(now()).unwrap();
        assert_eq!(session.status(), SessionStatus::Pending);
    }

    #[test]
    fn test_mark_paid_refused_while_stale() {
        let mut session = session();
        session.recompute(now()).unwrap();
        session.set_cash_out(&"A".into(), Decimal::from_units(160)).unwrap();
        let result = session.mark_paid(&TransferId::from("B_A"), true);
        assert!(matches!(result, Err(SettlementError::Stale)));
    }

    #[test]
    fn test_invalid_input_keeps_previous_state() {
        let mut session = session();
        session.upsert_player(player("C", 10, 10));
        session.set_cash_out(&"C".into(), Decimal::from_units(-5)).unwrap();
        assert!(matches!(
            session.recompute(now()),
            Err(SettlementError::Validation(ValidationError::NegativeAmount { .. }))
        ));
        assert!(session.is_stale());
    }

    #[test]
    fn test_strict_mode_rejects_unknown_pin() {
        let mut session = session();
        session.pin(TransferLeg::new("B", "Z", Decimal::from_units(10)));
        match session.recompute(now()) {
            Err(SettlementError::PinsRejected(rejection)) => assert_eq!(rejection.0.len(), 1),
            other => panic!("Expected PinsRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_mode_skips_unknown_pin() {
        let config = EngineConfig {
            strict_pins: false,
            ..EngineConfig::default()
        };
        let mut session = SettlementSession::new("s1", config)
            .with_players(vec![player("A", 100, 150), player("B", 100, 50)])
            .with_pinned(vec![
                TransferLeg::new("B", "Z", Decimal::from_units(10)),
                TransferLeg::new("B", "A", Decimal::from_units(20)),
            ]);

        let report = session.recompute(now()).unwrap();
        assert_eq!(report.skipped_pins.len(), 1);
        assert_eq!(report.skipped_pins[0].index, 0);

        let ledger = session.ledger().unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].id.as_str(), "B_A");
        assert_eq!(ledger.entries()[1].id.as_str(), "B_A_2");
        assert_eq!(
            ledger.amount_between(&"B".into(), &"A".into()),
            Decimal::from_units(50)
        );
    }

    #[test]
    fn test_unknown_player_edit() {
        let mut session = session();
        let result = session.set_cash_out(&"Nobody".into(), Decimal::from_units(1));
        assert!(matches!(
            result,
            Err(SettlementError::Validation(ValidationError::UnknownPlayer(_)))
        ));
        assert!(matches!(session.unpin(3), Err(SettlementError::UnknownPin(3))));
    }

    #[test]
    fn test_restore_paid_from_persisted_map() {
        let mut session = session();
        session.recompute(now()).unwrap();
        let mut flags = BTreeMap::new();
        flags.insert("B_A".to_string(), true);
        assert_eq!(session.restore_paid(&flags).unwrap(), SessionStatus::Completed);
        assert_eq!(session.paid_map().unwrap(), flags);
    }

    #[test]
    fn test_pins_apply_at_ledger_precision() {
        let mut session = session().with_pinned(vec![TransferLeg::new(
            "B",
            "A",
            Decimal::from_str_canonical("10.005").unwrap(),
        )]);
        let report = session.recompute(now()).unwrap();
        assert_eq!(
            report.residual.get(&"A".into()),
            Some(Decimal::from_str_canonical("39.99").unwrap())
        );

        let ledger = session.ledger().unwrap();
        let amounts: Vec<_> = ledger.iter().map(|t| t.amount).collect();
        assert_eq!(
            amounts,
            vec![
                Decimal::from_str_canonical("10.01").unwrap(),
                Decimal::from_str_canonical("39.99").unwrap(),
            ]
        );
        assert_eq!(ledger.total_amount(), Decimal::from_units(50));
    }
}
