//! Token ledger state machine
//!
//! This module provides the `Ledger` that applies calls to the balance
//! table, total supply and escrow, and records the outcome in the event log.
//!
//! The ledger enforces:
//! - Access control: only the administrator may issue supply
//! - Conservation: total supply always equals the sum of all balances
//! - Non-negativity: every debit is checked, nothing wraps
//! - Atomicity: every check runs before the first write, so a failed call
//!   leaves state bit-identical to before
//!
//! Each committed call is assigned the next sequence number; genesis is
//! sequence 0.

use crate::core::balance_table::{BalanceTable, Posting};
use crate::core::config::{DepositPolicy, FeePolicy, LedgerConfig};
use crate::core::event_log::{EventLog, Events};
use crate::core::fee::FeeSchedule;
use crate::core::snapshot::LedgerSnapshot;
use crate::core::traits::LedgerView;
use crate::types::{
    AccountId, Amount, Call, CallRequest, DepositRecord, EventKind, Intake, LedgerError,
    LedgerEvent, Receipt, Seq, TransferRecord,
};
use tracing::debug;

/// Single-token ledger with an attached native-currency escrow
///
/// Owns all ledger state. Writes take `&mut self` and reads take `&self`,
/// so a `Ledger` is a single-writer state machine; see `SharedLedger` for
/// concurrent access.
#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
    fees: FeeSchedule,
    balances: BalanceTable,
    total_supply: Amount,
    escrow_balance: Amount,
    fees_routed: Amount,
    fees_burned: Amount,
    log: EventLog,
    latest_seq: Seq,
}

impl Ledger {
    /// Create a ledger from a configuration
    ///
    /// If `initial_supply` is non-zero it is minted to the administrator at
    /// genesis and recorded as a transfer from the sentinel account with
    /// sequence 0.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration fails validation.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;

        let mut ledger = Ledger {
            fees: config.fee_schedule(),
            balances: BalanceTable::new(),
            total_supply: 0,
            escrow_balance: 0,
            fees_routed: 0,
            fees_burned: 0,
            log: EventLog::new(),
            latest_seq: 0,
            config,
        };

        let initial = ledger.config.initial_supply;
        if initial > 0 {
            let admin = ledger.config.administrator;
            ledger.balances.credit("genesis", admin, initial)?;
            ledger.total_supply = initial;
            ledger.log.append(LedgerEvent::Transfer(TransferRecord {
                seq: 0,
                from: AccountId::ZERO,
                to: admin,
                value: initial,
            }));
        }

        Ok(ledger)
    }

    /// Rebuild a ledger from a snapshot
    ///
    /// The snapshot's administrator must match the configuration and its
    /// supply must equal the sum of its balances. The sentinel account may
    /// not hold a balance, and the event log must be ordered by sequence
    /// number with no event newer than `latest_seq`.
    ///
    /// # Errors
    ///
    /// Returns `InconsistentSnapshot` if supply and balances disagree,
    /// `InvalidConfig` for every other rejected snapshot.
    pub fn restore(config: LedgerConfig, snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        config.validate()?;

        if snapshot.administrator != config.administrator {
            return Err(LedgerError::invalid_config(format!(
                "snapshot administrator {} does not match configured administrator {}",
                snapshot.administrator, config.administrator
            )));
        }
        snapshot.check_conservation()?;

        if snapshot.balances.get(&AccountId::ZERO).is_some_and(|&b| b > 0) {
            return Err(LedgerError::invalid_config(format!(
                "snapshot credits the sentinel account {}",
                AccountId::ZERO
            )));
        }

        let mut log = EventLog::new();
        let mut previous: Seq = 0;
        for event in snapshot.event_log {
            let seq = event.seq();
            if seq > snapshot.latest_seq {
                return Err(LedgerError::invalid_config(format!(
                    "snapshot event at sequence {} is newer than latest sequence {}",
                    seq, snapshot.latest_seq
                )));
            }
            if seq < previous {
                return Err(LedgerError::invalid_config(format!(
                    "snapshot event at sequence {} follows sequence {}",
                    seq, previous
                )));
            }
            previous = seq;
            log.append(event);
        }

        Ok(Ledger {
            fees: config.fee_schedule(),
            balances: BalanceTable::from_entries(snapshot.balances),
            total_supply: snapshot.total_supply,
            escrow_balance: snapshot.escrow_balance,
            fees_routed: snapshot.fees_routed,
            fees_burned: snapshot.fees_burned,
            log,
            latest_seq: snapshot.latest_seq,
            config,
        })
    }

    /// Copy of the complete ledger state
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            administrator: self.config.administrator,
            total_supply: self.total_supply,
            balances: self.balances.sorted().into_iter().collect(),
            escrow_balance: self.escrow_balance,
            fees_routed: self.fees_routed,
            fees_burned: self.fees_burned,
            latest_seq: self.latest_seq,
            event_log: self.log.all().to_vec(),
        }
    }

    /// The configuration this ledger was created with
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ----- read-only operations -----

    /// The immutable administrator identity
    pub fn administrator(&self) -> AccountId {
        self.config.administrator
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of any account, zero if never credited
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.balance_of(account)
    }

    /// Balance of the calling account
    pub fn my_balance(&self, caller: &AccountId) -> Amount {
        self.balances.balance_of(caller)
    }

    /// Fee owed on a transfer of `amount`
    ///
    /// Pure: depends only on `amount` and the rate fixed at creation.
    pub fn calculate_transfer_fee(&self, amount: Amount) -> Result<Amount, LedgerError> {
        self.fees.fee_for(amount)
    }

    /// Native-currency value held in escrow
    pub fn escrow_balance(&self) -> Amount {
        self.escrow_balance
    }

    /// Sequence number of the last committed call
    pub fn latest_seq(&self) -> Seq {
        self.latest_seq
    }

    /// Events of `kind` committed with `from_seq <= seq <= to_seq`
    ///
    /// Pass `Seq::MAX` as `to_seq` for "latest".
    pub fn get_past_events(&self, kind: EventKind, from_seq: Seq, to_seq: Seq) -> Events<'_> {
        self.log.query(kind, from_seq, to_seq)
    }

    /// Transfer records committed with `from_seq <= seq <= to_seq`
    pub fn past_transfers(
        &self,
        from_seq: Seq,
        to_seq: Seq,
    ) -> impl Iterator<Item = &TransferRecord> + Clone + '_ {
        self.log.transfers(from_seq, to_seq)
    }

    // ----- state-changing operations -----

    /// Apply a call request
    ///
    /// Routes the request to the matching operation. Non-payable calls with
    /// attached value are rejected before anything else is checked.
    ///
    /// # Returns
    ///
    /// * `Ok(Receipt)` with the assigned sequence number and the events the
    ///   call appended
    /// * `Err(LedgerError)` if the call failed; state is unchanged
    pub fn process(&mut self, request: CallRequest) -> Result<Receipt, LedgerError> {
        let CallRequest {
            caller,
            value,
            call,
        } = request;

        if !call.is_payable() && value > 0 {
            return Err(LedgerError::non_payable(call.name(), value));
        }

        let start = self.log.len();
        match call {
            Call::Issue { to, amount } => {
                self.issue(caller, to, amount)?;
            }
            Call::Transfer { to, amount } => {
                self.transfer_token(caller, to, amount)?;
            }
            Call::Deposit => {
                self.deposit(caller, value)?;
            }
            Call::Send { payload } => {
                self.intake(caller, value, Intake::from_payload(payload))?;
            }
        }

        Ok(Receipt {
            seq: self.latest_seq,
            events: self.log.since(start).to_vec(),
        })
    }

    /// Issue new supply to `to` (administrator only)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not the administrator: `Unauthorized`
    /// - The amount is zero or supply would overflow: `InvalidAmount`
    /// - The recipient is the sentinel account: `InvalidRecipient`
    pub fn issue(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<TransferRecord, LedgerError> {
        if caller != self.config.administrator {
            return Err(LedgerError::unauthorized(caller, "issue"));
        }

        if amount == 0 {
            return Err(LedgerError::invalid_amount(amount, "issue"));
        }

        if to.is_zero() {
            return Err(LedgerError::invalid_recipient(caller, to));
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| LedgerError::invalid_amount(amount, "issue"))?;
        let seq = self.next_seq()?;

        // Balances never exceed supply
        self.balances
            .credit("issue", to, amount)
            .map_err(|_| LedgerError::invalid_amount(amount, "issue"))?;
        self.total_supply = new_supply;

        let record = TransferRecord {
            seq,
            from: AccountId::ZERO,
            to,
            value: amount,
        };
        self.commit(seq, vec![LedgerEvent::Transfer(record.clone())]);

        debug!(seq, %to, amount, supply = self.total_supply, "issue committed");
        Ok(record)
    }

    /// Transfer `amount` from the caller to `to`, deducting the fee
    ///
    /// The caller is debited `amount`; the recipient receives
    /// `amount - fee`. Under `FeePolicy::Route` the fee is credited to the
    /// administrator, under `FeePolicy::Burn` it is removed from supply. One
    /// transfer record is appended for the recipient's leg.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is the sentinel account: `Unauthorized`
    /// - The recipient is the sentinel or the caller: `InvalidRecipient`
    /// - The amount is zero: `InvalidAmount`
    /// - The caller's balance is below `amount`: `InsufficientBalance`
    /// - A credit would overflow: `Overflow`
    pub fn transfer_token(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<TransferRecord, LedgerError> {
        if caller.is_zero() {
            return Err(LedgerError::unauthorized(caller, "transfer"));
        }

        if to.is_zero() || to == caller {
            return Err(LedgerError::invalid_recipient(caller, to));
        }

        if amount == 0 {
            return Err(LedgerError::invalid_amount(amount, "transfer"));
        }

        let fee = self.calculate_transfer_fee(amount)?;
        let net = amount
            .checked_sub(fee)
            .ok_or_else(|| LedgerError::overflow("transfer fee"))?;

        let balance = self.balances.balance_of(&caller);
        if balance < amount {
            return Err(LedgerError::insufficient_balance(caller, balance, amount));
        }

        let seq = self.next_seq()?;

        let mut postings = vec![Posting::Debit(caller, amount), Posting::Credit(to, net)];
        let mut new_supply = self.total_supply;
        match self.config.fee_policy {
            FeePolicy::Route => {
                if fee > 0 {
                    postings.push(Posting::Credit(self.config.administrator, fee));
                }
            }
            FeePolicy::Burn => {
                new_supply = new_supply
                    .checked_sub(fee)
                    .ok_or_else(|| LedgerError::overflow("transfer burn"))?;
            }
        }

        self.balances.apply("transfer", &postings)?;
        self.total_supply = new_supply;
        // Statistics only; saturate rather than block transfers
        match self.config.fee_policy {
            FeePolicy::Route => self.fees_routed = self.fees_routed.saturating_add(fee),
            FeePolicy::Burn => self.fees_burned = self.fees_burned.saturating_add(fee),
        }

        let record = TransferRecord {
            seq,
            from: caller,
            to,
            value: net,
        };
        self.commit(seq, vec![LedgerEvent::Transfer(record.clone())]);

        debug!(seq, from = %caller, %to, amount, fee, "transfer committed");
        Ok(record)
    }

    /// Accept native-currency value through the explicit deposit call
    pub fn deposit(&mut self, caller: AccountId, value: Amount) -> Result<DepositRecord, LedgerError> {
        self.intake(caller, value, Intake::Deposit)
    }

    /// Accept native-currency value sent without a matching call
    ///
    /// An empty payload takes the receive path; anything else takes the
    /// fallback path and is otherwise ignored.
    pub fn receive(
        &mut self,
        caller: AccountId,
        value: Amount,
        payload: Vec<u8>,
    ) -> Result<DepositRecord, LedgerError> {
        self.intake(caller, value, Intake::from_payload(payload))
    }

    /// Escrow intake shared by every value-accepting path
    ///
    /// Adds `value` to escrow and appends a deposit record. Under
    /// `DepositPolicy::CreditAtRate`, explicit deposits and plain receipts
    /// also mint tokens to the sender; data-bearing receipts never touch
    /// token balances.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No value is attached: `ZeroValue`
    /// - Escrow, minted amount or supply would overflow: `Overflow`
    /// - Tokens would be minted to the sentinel account: `InvalidRecipient`
    pub fn intake(
        &mut self,
        caller: AccountId,
        value: Amount,
        intake: Intake,
    ) -> Result<DepositRecord, LedgerError> {
        let path = intake.path();
        if value == 0 {
            return Err(LedgerError::zero_value(caller, path));
        }

        let new_escrow = self
            .escrow_balance
            .checked_add(value)
            .ok_or_else(|| LedgerError::overflow("escrow intake"))?;

        let minted = match (self.config.deposit_policy, &intake) {
            (DepositPolicy::CreditAtRate { tokens_per_unit }, Intake::Deposit)
            | (DepositPolicy::CreditAtRate { tokens_per_unit }, Intake::PlainReceipt) => value
                .checked_mul(tokens_per_unit)
                .ok_or_else(|| LedgerError::overflow("deposit credit"))?,
            _ => 0,
        };

        if minted > 0 && caller.is_zero() {
            return Err(LedgerError::invalid_recipient(caller, caller));
        }

        let new_supply = self
            .total_supply
            .checked_add(minted)
            .ok_or_else(|| LedgerError::overflow("deposit credit"))?;
        let seq = self.next_seq()?;

        if minted > 0 {
            self.balances.credit("deposit credit", caller, minted)?;
        }
        self.total_supply = new_supply;
        self.escrow_balance = new_escrow;

        let record = DepositRecord {
            seq,
            from: caller,
            value,
            path,
        };
        let mut events = vec![LedgerEvent::Deposit(record.clone())];
        if minted > 0 {
            events.push(LedgerEvent::Transfer(TransferRecord {
                seq,
                from: AccountId::ZERO,
                to: caller,
                value: minted,
            }));
        }
        self.commit(seq, events);

        debug!(seq, from = %caller, value, %path, minted, "escrow intake committed");
        Ok(record)
    }

    fn next_seq(&self) -> Result<Seq, LedgerError> {
        self.latest_seq
            .checked_add(1)
            .ok_or_else(|| LedgerError::overflow("sequence number"))
    }

    fn commit(&mut self, seq: Seq, events: Vec<LedgerEvent>) {
        self.latest_seq = seq;
        for event in events {
            self.log.append(event);
        }
    }
}

impl LedgerView for Ledger {
    fn administrator(&self) -> AccountId {
        Ledger::administrator(self)
    }

    fn total_supply(&self) -> Amount {
        Ledger::total_supply(self)
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        Ledger::balance_of(self, account)
    }

    fn escrow_balance(&self) -> Amount {
        Ledger::escrow_balance(self)
    }

    fn latest_seq(&self) -> Seq {
        Ledger::latest_seq(self)
    }

    fn fees_routed(&self) -> Amount {
        self.fees_routed
    }

    fn fees_burned(&self) -> Amount {
        self.fees_burned
    }

    fn accounts(&self) -> Vec<(AccountId, Amount)> {
        self.balances.sorted()
    }

    fn event_log(&self) -> &[LedgerEvent] {
        self.log.all()
    }
}
