//! Headless state machine behind the transactions screen
//!
//! The screen owns the displayed list and the refresh flag. User intents
//! arrive as [`Command`]s; `dispatch` answers with the [`Effect`] to run.
//! The caller performs the effect (see [`perform`]) and feeds the resulting
//! [`Event`] back through `apply`, which replaces the list and may ask for a
//! follow-up effect (the reload after a refund).
//!
//! Loads carry a generation token: only the newest load is ever applied, so
//! overlapping refreshes settle on the last one dispatched. At most one refund
//! is in flight at a time.

use crate::api::{ApiError, TransactionsApi};
use crate::session::UserSession;
use crate::types::{Transaction, TransactionId};
use thiserror::Error;
use tracing::{debug, info, warn};

/// User intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// First load when the screen is shown
    Load,
    /// Pull-to-refresh
    Refresh,
    /// Refund button tapped on a row
    Refund(TransactionId),
}

/// Async work the caller must perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Fetch { token: u64 },
    Refund { token: u64, id: TransactionId },
}

/// Completion of an [`Effect`]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Loaded {
        token: u64,
        result: Result<Vec<Transaction>, ApiError>,
    },
    Refunded {
        token: u64,
        id: TransactionId,
        result: Result<(), ApiError>,
    },
}

impl Event {
    /// Failed completion for an effect whose worker never reported back
    pub fn failed(effect: Effect, error: ApiError) -> Self {
        match effect {
            Effect::Fetch { token } => Event::Loaded { token, result: Err(error) },
            Effect::Refund { token, id } => Event::Refunded { token, id, result: Err(error) },
        }
    }
}

/// Errors surfaced by the screen
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("Loading transactions failed: {0}")]
    Load(ApiError),
    #[error("Refund of transaction #{id} failed: {source}")]
    Refund { id: TransactionId, source: ApiError },
    #[error("Another refund is still in progress")]
    RefundInFlight,
    #[error("Transaction #{0} is not eligible for a refund")]
    NotRefundable(TransactionId),
    #[error("Transaction #{0} is not in the list")]
    UnknownTransaction(TransactionId),
}

/// Answer to a dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Run(Effect),
    Rejected(ScreenError),
}

/// What an applied event meant for the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded { count: usize },
    LoadFailed(ScreenError),
    Refunded { id: TransactionId },
    RefundFailed(ScreenError),
    /// A response that was superseded before it arrived
    Stale,
}

/// Result of `apply`: the outcome plus any follow-up work
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub outcome: Outcome,
    pub follow_up: Option<Effect>,
}

impl Applied {
    fn settled(outcome: Outcome) -> Self {
        Self { outcome, follow_up: None }
    }
}

#[derive(Debug, Default)]
pub struct TransactionsScreen {
    transactions: Vec<Transaction>,
    refreshing: bool,
    last_error: Option<ScreenError>,
    /// Token of the newest dispatched fetch
    load_token: u64,
    /// Whether the fetch carrying `load_token` is still outstanding
    load_pending: bool,
    next_refund_token: u64,
    refund_in_flight: Option<(u64, TransactionId)>,
}

impl TransactionsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_loading(&self) -> bool {
        self.load_pending
    }

    pub fn last_error(&self) -> Option<&ScreenError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Transaction currently being refunded, if any
    pub fn refund_in_flight(&self) -> Option<TransactionId> {
        self.refund_in_flight.map(|(_, id)| id)
    }

    pub fn dispatch(&mut self, command: Command) -> Dispatch {
        match command {
            Command::Load => Dispatch::Run(self.start_fetch()),
            Command::Refresh => {
                self.refreshing = true;
                Dispatch::Run(self.start_fetch())
            }
            Command::Refund(id) => self.start_refund(id),
        }
    }

    fn start_fetch(&mut self) -> Effect {
        self.load_token += 1;
        self.load_pending = true;
        debug!(token = self.load_token, "Dispatching transactions fetch");
        Effect::Fetch { token: self.load_token }
    }

    fn start_refund(&mut self, id: TransactionId) -> Dispatch {
        if self.refund_in_flight.is_some() {
            return Dispatch::Rejected(ScreenError::RefundInFlight);
        }
        match self.transactions.iter().find(|tx| tx.id == id) {
            None => return Dispatch::Rejected(ScreenError::UnknownTransaction(id)),
            Some(tx) if !tx.is_refundable() => {
                return Dispatch::Rejected(ScreenError::NotRefundable(id));
            }
            Some(_) => {}
        }
        self.next_refund_token += 1;
        let token = self.next_refund_token;
        self.refund_in_flight = Some((token, id));
        info!(transaction_id = id, "Dispatching refund");
        Dispatch::Run(Effect::Refund { token, id })
    }

    pub fn apply(&mut self, event: Event) -> Applied {
        match event {
            Event::Loaded { token, result } => self.apply_loaded(token, result),
            Event::Refunded { token, id, result } => self.apply_refunded(token, id, result),
        }
    }

    fn apply_loaded(&mut self, token: u64, result: Result<Vec<Transaction>, ApiError>) -> Applied {
        if token != self.load_token || !self.load_pending {
            debug!(token, current = self.load_token, "Ignoring stale transactions response");
            return Applied::settled(Outcome::Stale);
        }
        self.load_pending = false;
        self.refreshing = false;

        match result {
            Ok(list) => {
                let count = list.len();
                self.transactions = list;
                self.last_error = None;
                info!(count, "Transactions loaded");
                Applied::settled(Outcome::Loaded { count })
            }
            Err(e) => {
                warn!("Error loading transactions: {}", e);
                let error = ScreenError::Load(e);
                self.last_error = Some(error.clone());
                Applied::settled(Outcome::LoadFailed(error))
            }
        }
    }

    fn apply_refunded(&mut self, token: u64, id: TransactionId, result: Result<(), ApiError>) -> Applied {
        match self.refund_in_flight {
            Some((current, _)) if current == token => {}
            _ => {
                debug!(token, transaction_id = id, "Ignoring unexpected refund response");
                return Applied::settled(Outcome::Stale);
            }
        }
        self.refund_in_flight = None;

        match result {
            Ok(()) => {
                info!(transaction_id = id, "Refund accepted, reloading transactions");
                Applied {
                    outcome: Outcome::Refunded { id },
                    follow_up: Some(self.start_fetch()),
                }
            }
            Err(e) => {
                warn!(transaction_id = id, "Error refunding transaction: {}", e);
                let error = ScreenError::Refund { id, source: e };
                self.last_error = Some(error.clone());
                Applied::settled(Outcome::RefundFailed(error))
            }
        }
    }
}

/// Run one effect against the API
pub async fn perform<A: TransactionsApi>(api: &A, session: &UserSession, effect: Effect) -> Event {
    match effect {
        Effect::Fetch { token } => Event::Loaded {
            token,
            result: api.fetch_transactions(session.user_id()).await,
        },
        Effect::Refund { token, id } => Event::Refunded {
            token,
            id,
            result: api.refund_transaction(session.user_id(), id).await,
        },
    }
}

/// Dispatch a command and drive it to completion, follow-ups included.
///
/// Returns every outcome in order; a rejected command yields no outcome
/// and its error is returned instead.
pub async fn run_command<A: TransactionsApi>(
    screen: &mut TransactionsScreen,
    api: &A,
    session: &UserSession,
    command: Command,
) -> Result<Vec<Outcome>, ScreenError> {
    let mut next = match screen.dispatch(command) {
        Dispatch::Run(effect) => Some(effect),
        Dispatch::Rejected(e) => return Err(e),
    };
    let mut outcomes = Vec::new();
    while let Some(effect) = next.take() {
        let event = perform(api, session, effect).await;
        let applied = screen.apply(event);
        outcomes.push(applied.outcome);
        next = applied.follow_up;
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi};
    use crate::types::{TransactionStatus, UserId};
    use tokio_test::block_on;

    fn tx(id: TransactionId, status: &str) -> Transaction {
        Transaction {
            id,
            date_of_transaction: "2024-01-01".to_string(),
            total_price: 100.0,
            status: TransactionStatus::from(status),
        }
    }

    fn session() -> UserSession {
        UserSession::new(UserId::new("user-1"))
    }

    fn loaded_screen(api: &FakeApi) -> TransactionsScreen {
        let mut screen = TransactionsScreen::new();
        block_on(run_command(&mut screen, api, &session(), Command::Load)).unwrap();
        screen
    }

    // ==================== load tests ====================

    #[test]
    fn test_initial_load_replaces_list() {
        let api = FakeApi::with_list(vec![tx(1, "completed"), tx(2, "pending"), tx(3, "refunded")]);
        let mut screen = TransactionsScreen::new();

        let outcomes = block_on(run_command(&mut screen, &api, &session(), Command::Load)).unwrap();

        assert_eq!(outcomes, vec![Outcome::Loaded { count: 3 }]);
        let ids: Vec<_> = screen.transactions().iter().map(|t| t.key()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(api.calls(), vec![Call::Fetch(UserId::new("user-1"))]);
        assert!(!screen.is_loading());
    }

    #[test]
    fn test_failed_initial_load_leaves_list_empty() {
        let api = FakeApi::default();
        api.push_fetch(Err(ApiError::Timeout));
        let mut screen = TransactionsScreen::new();

        let outcomes = block_on(run_command(&mut screen, &api, &session(), Command::Load)).unwrap();

        assert_eq!(outcomes, vec![Outcome::LoadFailed(ScreenError::Load(ApiError::Timeout))]);
        assert!(screen.transactions().is_empty());
        assert_eq!(screen.last_error(), Some(&ScreenError::Load(ApiError::Timeout)));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_list() {
        let api = FakeApi::with_list(vec![tx(1, "completed"), tx(2, "pending")]);
        let mut screen = loaded_screen(&api);

        api.push_fetch(Err(ApiError::Request("connection reset".into())));
        block_on(run_command(&mut screen, &api, &session(), Command::Refresh)).unwrap();

        assert_eq!(screen.transactions().len(), 2);
        assert!(matches!(screen.last_error(), Some(ScreenError::Load(_))));
    }

    #[test]
    fn test_successful_load_clears_error() {
        let api = FakeApi::with_list(vec![tx(1, "completed")]);
        api.push_fetch(Err(ApiError::Timeout));
        let mut screen = TransactionsScreen::new();
        block_on(run_command(&mut screen, &api, &session(), Command::Load)).unwrap();
        assert!(screen.last_error().is_some());

        block_on(run_command(&mut screen, &api, &session(), Command::Refresh)).unwrap();

        assert!(screen.last_error().is_none());
        assert_eq!(screen.transactions().len(), 1);
    }

    // ==================== refresh tests ====================

    #[test]
    fn test_refresh_sets_flag_until_load_completes() {
        let mut screen = TransactionsScreen::new();
        let effect = match screen.dispatch(Command::Refresh) {
            Dispatch::Run(effect) => effect,
            other => panic!("unexpected dispatch: {other:?}"),
        };
        assert!(screen.is_refreshing());

        screen.apply(Event::failed(effect, ApiError::Timeout));
        assert!(!screen.is_refreshing());
    }

    #[test]
    fn test_refresh_ends_false_on_success_and_failure() {
        let api = FakeApi::with_list(vec![tx(1, "completed")]);
        let mut screen = TransactionsScreen::new();

        block_on(run_command(&mut screen, &api, &session(), Command::Refresh)).unwrap();
        assert!(!screen.is_refreshing());

        api.push_fetch(Err(ApiError::from_status(503, "maintenance")));
        block_on(run_command(&mut screen, &api, &session(), Command::Refresh)).unwrap();
        assert!(!screen.is_refreshing());
    }

    #[test]
    fn test_stale_load_response_ignored() {
        let mut screen = TransactionsScreen::new();
        let first = screen.dispatch(Command::Refresh);
        let second = screen.dispatch(Command::Refresh);
        let (first, second) = match (first, second) {
            (Dispatch::Run(a), Dispatch::Run(b)) => (a, b),
            other => panic!("unexpected dispatch: {other:?}"),
        };
        let first_token = match first {
            Effect::Fetch { token } => token,
            _ => unreachable!(),
        };
        let second_token = match second {
            Effect::Fetch { token } => token,
            _ => unreachable!(),
        };

        // Newest response lands first, then the superseded one
        let applied = screen.apply(Event::Loaded { token: second_token, result: Ok(vec![tx(2, "pending")]) });
        assert_eq!(applied.outcome, Outcome::Loaded { count: 1 });
        assert!(!screen.is_refreshing());

        let applied = screen.apply(Event::Loaded {
            token: first_token,
            result: Ok(vec![tx(1, "completed"), tx(3, "completed")]),
        });
        assert_eq!(applied.outcome, Outcome::Stale);
        assert_eq!(screen.transactions(), &[tx(2, "pending")]);
    }

    #[test]
    fn test_superseded_refresh_keeps_spinner_until_newest_completes() {
        let mut screen = TransactionsScreen::new();
        let _ = screen.dispatch(Command::Refresh);
        let newest = match screen.dispatch(Command::Load) {
            Dispatch::Run(effect) => effect,
            other => panic!("unexpected dispatch: {other:?}"),
        };
        screen.apply(Event::Loaded { token: 1, result: Ok(vec![]) });
        assert!(screen.is_refreshing());

        screen.apply(Event::failed(newest, ApiError::Worker("gone".into())));
        assert!(!screen.is_refreshing());
    }

    // ==================== refund tests ====================

    #[test]
    fn test_refund_then_exactly_one_refetch() {
        let api = FakeApi::with_list(vec![tx(1, "completed")]);
        let mut screen = loaded_screen(&api);
        api.set_list(vec![tx(1, "refunded")]);

        let outcomes = block_on(run_command(&mut screen, &api, &session(), Command::Refund(1))).unwrap();

        assert_eq!(outcomes, vec![Outcome::Refunded { id: 1 }, Outcome::Loaded { count: 1 }]);
        assert_eq!(
            api.calls(),
            vec![
                Call::Fetch(UserId::new("user-1")),
                Call::Refund(UserId::new("user-1"), 1),
                Call::Fetch(UserId::new("user-1")),
            ]
        );
        assert_eq!(api.fetch_count(), 2);
        assert_eq!(screen.transactions()[0].status, TransactionStatus::Refunded);
        assert!(screen.refund_in_flight().is_none());
    }

    #[test]
    fn test_failed_refund_does_not_refetch() {
        let api = FakeApi::with_list(vec![tx(1, "completed")]);
        let mut screen = loaded_screen(&api);
        api.push_refund(Err(ApiError::from_status(409, "already refunded")));

        let outcomes = block_on(run_command(&mut screen, &api, &session(), Command::Refund(1))).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            &outcomes[0],
            Outcome::RefundFailed(ScreenError::Refund { id: 1, source: ApiError::Status { code: 409, .. } })
        ));
        assert_eq!(api.fetch_count(), 1);
        assert_eq!(screen.transactions(), &[tx(1, "completed")]);
        assert!(screen.refund_in_flight().is_none());
    }

    #[test]
    fn test_refund_rejected_while_another_in_flight() {
        let api = FakeApi::with_list(vec![tx(1, "completed"), tx(2, "completed")]);
        let mut screen = loaded_screen(&api);

        let first = screen.dispatch(Command::Refund(1));
        assert!(matches!(first, Dispatch::Run(Effect::Refund { id: 1, .. })));
        assert_eq!(screen.refund_in_flight(), Some(1));

        assert_eq!(screen.dispatch(Command::Refund(2)), Dispatch::Rejected(ScreenError::RefundInFlight));
    }

    #[test]
    fn test_refund_of_non_completed_rejected() {
        let api = FakeApi::with_list(vec![tx(5, "pending")]);
        let mut screen = loaded_screen(&api);

        let result = block_on(run_command(&mut screen, &api, &session(), Command::Refund(5)));

        assert_eq!(result, Err(ScreenError::NotRefundable(5)));
        assert!(!api.calls().iter().any(|c| matches!(c, Call::Refund(..))));
    }

    #[test]
    fn test_refund_of_unknown_transaction_rejected() {
        let mut screen = TransactionsScreen::new();
        assert_eq!(
            screen.dispatch(Command::Refund(99)),
            Dispatch::Rejected(ScreenError::UnknownTransaction(99))
        );
    }

    #[test]
    fn test_unexpected_refund_response_is_stale() {
        let mut screen = TransactionsScreen::new();
        let applied = screen.apply(Event::Refunded { token: 3, id: 1, result: Ok(()) });
        assert_eq!(applied.outcome, Outcome::Stale);
        assert!(applied.follow_up.is_none());
    }

    // ==================== scenario ====================

    #[test]
    fn test_single_completed_transaction_scenario() {
        let json = r#"[{"id":1,"status":"completed","totalPrice":100,"dateOfTransaction":"2024-01-01"}]"#;
        let list: Vec<Transaction> = serde_json::from_str(json).unwrap();
        let api = FakeApi::with_list(list);
        let mut screen = loaded_screen(&api);

        assert_eq!(screen.transactions().len(), 1);
        assert!(screen.transactions()[0].is_refundable());

        block_on(run_command(&mut screen, &api, &session(), Command::Refund(1))).unwrap();

        assert_eq!(api.calls()[1], Call::Refund(UserId::new("user-1"), 1));
        assert_eq!(api.calls()[2], Call::Fetch(UserId::new("user-1")));
        assert_eq!(api.calls().len(), 3);
    }
}
