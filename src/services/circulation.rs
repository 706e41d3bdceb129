//! Borrow/return coordinator.
//!
//! Validates requested quantities against the last known availability,
//! issues the mutation, and reconciles the view with authoritative server
//! state after every confirmed mutation.
//!
//! The local pre-check is advisory only: the availability snapshot may be
//! stale while other sessions borrow. The authoritative check happens once,
//! atomically, on the server — a losing race for the last copy surfaces here
//! as a rejected mutation carrying the server's message, never as an
//! inconsistent display. Two rules hold throughout: no local counter is ever
//! decremented before server confirmation, and every confirmed mutation is
//! followed by a full re-fetch of the book's server state.

use serde::Serialize;

use crate::{
    error::{AppError, AppResult, GENERIC_FAILURE},
    gateway::ApiGateway,
    models::{Book, SessionToken},
};

const QUANTITY_MESSAGE: &str = "Quantity must be a positive integer greater than 0";

/// Parse a requested quantity. Positive integers only; anything else is
/// rejected before any network traffic.
pub fn parse_quantity(raw: &str) -> Result<i64, String> {
    let qty: i64 = raw
        .trim()
        .parse()
        .map_err(|_| QUANTITY_MESSAGE.to_string())?;
    if qty < 1 {
        return Err(QUANTITY_MESSAGE.to_string());
    }
    Ok(qty)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Rejected,
}

/// Final display state of one borrow/return attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub outcome: Outcome,
    pub message: String,
    /// Fresh server state after a confirmed mutation. `None` on rejection
    /// (previously displayed availability stays untouched) or when the
    /// reconciling fetch itself failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
}

impl Settlement {
    pub fn success(message: impl Into<String>, book: Option<Book>) -> Self {
        Self {
            outcome: Outcome::Success,
            message: message.into(),
            book,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Rejected,
            message: message.into(),
            book: None,
        }
    }
}

/// Lifecycle of one borrow/return attempt within a single detail view
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoanPhase {
    #[default]
    Idle,
    Submitting,
    Settled(Settlement),
}

/// Returned when an action is dispatched while another is in flight
#[derive(Debug, PartialEq, Eq)]
pub struct InFlight;

/// State machine serializing actions within one view instance. A second
/// action cannot begin while one is `Submitting`; a settled attempt is
/// re-enterable and simply overwrites the message.
#[derive(Debug, Default)]
pub struct LoanAttempt {
    phase: LoanPhase,
}

impl LoanAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &LoanPhase {
        &self.phase
    }

    /// Enter `Submitting` from `Idle` or `Settled`
    pub fn begin(&mut self) -> Result<(), InFlight> {
        if self.phase == LoanPhase::Submitting {
            return Err(InFlight);
        }
        self.phase = LoanPhase::Submitting;
        Ok(())
    }

    pub fn settle(&mut self, settlement: Settlement) {
        self.phase = LoanPhase::Settled(settlement);
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Borrow,
    Return,
}

impl Action {
    fn segment(self) -> &'static str {
        match self {
            Action::Borrow => "borrow",
            Action::Return => "return",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Action::Borrow => "Book borrowed successfully",
            Action::Return => "Book returned successfully",
        }
    }
}

#[derive(Serialize)]
struct QuantityBody {
    qty: i64,
}

#[derive(Clone)]
pub struct CirculationService {
    gateway: ApiGateway,
}

impl CirculationService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Borrow `qty` copies of `book`.
    ///
    /// Quantities above the last known availability settle as a validation
    /// rejection without a network call. This fast-fail does not replace the
    /// server-side check — the snapshot may already be stale.
    pub async fn borrow(
        &self,
        token: &SessionToken,
        book: &Book,
        qty: i64,
    ) -> AppResult<Settlement> {
        if book.available_quantity < 1 {
            return Ok(Settlement::rejected(
                "Cannot borrow book as it is not available",
            ));
        }
        if qty > book.available_quantity {
            return Ok(Settlement::rejected(format!(
                "Only {} copies available",
                book.available_quantity
            )));
        }
        self.submit(token, book, qty, Action::Borrow).await
    }

    /// Return `qty` copies of `book`. No client-side upper bound: the server
    /// is authoritative on how many copies the user actually holds.
    pub async fn return_copies(
        &self,
        token: &SessionToken,
        book: &Book,
        qty: i64,
    ) -> AppResult<Settlement> {
        self.submit(token, book, qty, Action::Return).await
    }

    async fn submit(
        &self,
        token: &SessionToken,
        book: &Book,
        qty: i64,
        action: Action,
    ) -> AppResult<Settlement> {
        let mut attempt = LoanAttempt::new();
        attempt
            .begin()
            .map_err(|InFlight| AppError::Internal("loan attempt already submitting".into()))?;

        let path = format!("/v1/books/{}/{}", book.id, action.segment());
        let result: AppResult<serde_json::Value> = self
            .gateway
            .post(&path, &QuantityBody { qty }, Some(token))
            .await;

        let settlement = match result {
            Ok(_) => {
                // Reconcile from the server rather than trusting local
                // arithmetic: concurrent mutations by other sessions are
                // absorbed by the re-fetch.
                let fresh = match self.reload(token, &book.id).await {
                    Ok(book) => Some(book),
                    Err(error) => {
                        tracing::warn!(
                            "Reconciling fetch after {} of {} failed: {}",
                            action.segment(),
                            book.id,
                            error
                        );
                        None
                    }
                };
                Settlement::success(action.success_message(), fresh)
            }
            Err(AppError::Authentication(message)) => {
                return Err(AppError::Authentication(message));
            }
            Err(AppError::Remote { message, .. }) => Settlement::rejected(message),
            Err(error) => {
                tracing::error!("{} of {} failed: {}", action.segment(), book.id, error);
                Settlement::rejected(GENERIC_FAILURE)
            }
        };

        attempt.settle(settlement.clone());
        Ok(settlement)
    }

    async fn reload(&self, token: &SessionToken, id: &str) -> AppResult<Book> {
        self.gateway
            .get(&format!("/v1/books/{}", id), &[], Some(token))
            .await
    }
}
