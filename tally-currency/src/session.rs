//! Currency conversion session with sequenced rate fetches
//!
//! Every fetch is issued a ticket carrying an increasing sequence number.
//! A response is applied only if its ticket is the latest one issued;
//! anything older is discarded, whatever order responses arrive in.

use serde::Serialize;
use tracing::{debug, info, warn};
use crate::error::{normalize_code, CurrencyError};
use crate::snapshot::{convert_detailed, Conversion, ExchangeRateSnapshot};
use crate::source::RateSource;

/// Proof that a fetch was requested for `base` at position `seq`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchTicket {
    pub seq: u64,
    pub base: String,
}

/// What happened to a fetch result handed to `apply`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyOutcome {
    /// Snapshot replaced
    Applied,
    /// A newer fetch has been issued since; result dropped
    Stale,
    /// Latest fetch failed; previous snapshot kept, notice recorded
    Failed,
}

#[derive(Debug, Clone)]
pub struct CurrencySession {
    from: String,
    to: String,
    next_seq: u64,
    latest: Option<FetchTicket>,
    snapshot: Option<ExchangeRateSnapshot>,
    notice: Option<String>,
}

impl CurrencySession {
    /// Start a session; the returned ticket is the initial fetch for `from`
    pub fn new(from: &str, to: &str) -> Result<(Self, FetchTicket), CurrencyError> {
        let mut session = CurrencySession {
            from: normalize_code(from)?,
            to: normalize_code(to)?,
            next_seq: 1,
            latest: None,
            snapshot: None,
            notice: None,
        };
        let ticket = session.issue();
        Ok((session, ticket))
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn snapshot(&self) -> Option<&ExchangeRateSnapshot> {
        self.snapshot.as_ref()
    }

    /// Non-fatal message from the last failed fetch
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The ticket a response must carry to be applied
    pub fn pending(&self) -> Option<&FetchTicket> {
        self.latest.as_ref()
    }

    fn issue(&mut self) -> FetchTicket {
        let ticket = FetchTicket { seq: self.next_seq, base: self.from.clone() };
        self.next_seq += 1;
        self.latest = Some(ticket.clone());
        debug!(seq = ticket.seq, base = %ticket.base, "rate fetch issued");
        ticket
    }

    /// Change the source currency. A change issues a new fetch ticket.
    pub fn set_from(&mut self, code: &str) -> Result<Option<FetchTicket>, CurrencyError> {
        let code = normalize_code(code)?;
        if code == self.from {
            return Ok(None);
        }
        self.from = code;
        Ok(Some(self.issue()))
    }

    /// Change the target currency; the current snapshot is reused
    pub fn set_to(&mut self, code: &str) -> Result<(), CurrencyError> {
        self.to = normalize_code(code)?;
        Ok(())
    }

    /// Exchange source and target. Refetches because the source changed.
    pub fn swap(&mut self) -> Option<FetchTicket> {
        if self.from == self.to {
            return None;
        }
        std::mem::swap(&mut self.from, &mut self.to);
        Some(self.issue())
    }

    /// Ticket for refetching the current source, e.g. after a failure
    pub fn refresh_ticket(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Hand a fetch result back to the session
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<ExchangeRateSnapshot, CurrencyError>) -> ApplyOutcome {
        if self.latest.as_ref() != Some(ticket) {
            warn!(seq = ticket.seq, base = %ticket.base, "discarding stale rate response");
            return ApplyOutcome::Stale;
        }
        self.latest = None;

        match result {
            Ok(snapshot) if snapshot.is_for(&ticket.base) => {
                info!(base = %snapshot.base, rates = snapshot.rates.len(), "rates updated");
                self.snapshot = Some(snapshot);
                self.notice = None;
                ApplyOutcome::Applied
            }
            Ok(snapshot) => {
                let msg = format!("asked for {} rates, received {}", ticket.base, snapshot.base);
                warn!(%msg, "rate response for wrong base");
                self.notice = Some(msg);
                ApplyOutcome::Failed
            }
            Err(e) => {
                warn!(error = %e, base = %ticket.base, "rate fetch failed");
                self.notice = Some(format!("Could not load exchange rates for {}: {}", ticket.base, e));
                ApplyOutcome::Failed
            }
        }
    }

    /// Issue a ticket if needed, fetch once from `source`, apply the result
    pub async fn refresh<S: RateSource + ?Sized>(&mut self, source: &S) -> ApplyOutcome {
        let ticket = match self.latest.clone() {
            Some(t) => t,
            None => self.issue(),
        };
        let result = source.fetch(&ticket.base).await;
        self.apply(&ticket, result)
    }

    /// Whether the held snapshot can serve the current source currency
    pub fn is_ready(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.is_for(&self.from))
    }

    /// Convert with the held snapshot; RateUnavailable while loading or after a failure
    pub fn convert(&self, amount: f64) -> Result<Conversion, CurrencyError> {
        let snapshot = self.snapshot.as_ref().ok_or_else(|| {
            CurrencyError::RateUnavailable(
                self.notice.clone().unwrap_or_else(|| format!("rates for {} are still loading", self.from)),
            )
        })?;
        convert_detailed(amount, &self.from, &self.to, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticRateSource;
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn snapshot(base: &str, pairs: &[(&str, f64)]) -> ExchangeRateSnapshot {
        ExchangeRateSnapshot::new(base, pairs.iter().map(|(c, r)| (c.to_string(), *r)))
    }

    struct FailingSource;

    #[async_trait]
    impl RateSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _base: &str) -> Result<ExchangeRateSnapshot, CurrencyError> {
            Err(CurrencyError::RateUnavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn test_convert_before_rates_arrive() {
        let (session, _ticket) = CurrencySession::new("USD", "EUR").unwrap();
        assert!(session.convert(1.0).unwrap_err().is_rate_unavailable());
        assert!(!session.is_ready());
    }

    #[test]
    fn test_apply_latest_ticket() {
        let (mut session, ticket) = CurrencySession::new("USD", "EUR").unwrap();
        let outcome = session.apply(&ticket, Ok(snapshot("USD", &[("EUR", 0.85)])));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_relative_eq!(session.convert(100.0).unwrap().result, 85.0, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_order_response_is_stale() {
        let (mut session, first) = CurrencySession::new("USD", "EUR").unwrap();
        let second = session.set_from("GBP").unwrap().unwrap();
        assert!(second.seq > first.seq);

        // the newer response lands first, then the older one
        assert_eq!(session.apply(&second, Ok(snapshot("GBP", &[("EUR", 1.16)]))), ApplyOutcome::Applied);
        assert_eq!(session.apply(&first, Ok(snapshot("USD", &[("EUR", 0.85)]))), ApplyOutcome::Stale);

        assert_eq!(session.snapshot().map(|s| s.base.as_str()), Some("GBP"));
        assert_relative_eq!(session.convert(10.0).unwrap().result, 11.6, epsilon = 1e-12);
    }

    #[test]
    fn test_set_to_reuses_snapshot() {
        let (mut session, ticket) = CurrencySession::new("USD", "EUR").unwrap();
        session.apply(&ticket, Ok(snapshot("USD", &[("EUR", 0.85), ("INR", 74.5)])));
        session.set_to("INR").unwrap();
        assert!(session.pending().is_none());
        assert_relative_eq!(session.convert(2.0).unwrap().result, 149.0, epsilon = 1e-12);
    }

    #[test]
    fn test_set_from_same_code_does_not_refetch() {
        let (mut session, _) = CurrencySession::new("USD", "EUR").unwrap();
        assert_eq!(session.set_from("usd").unwrap(), None);
    }

    #[test]
    fn test_swap_refetches_for_new_source() {
        let (mut session, ticket) = CurrencySession::new("USD", "EUR").unwrap();
        session.apply(&ticket, Ok(snapshot("USD", &[("EUR", 0.85)])));
        let swap = session.swap().unwrap();
        assert_eq!(swap.base, "EUR");
        assert_eq!((session.from(), session.to()), ("EUR", "USD"));
        // old USD snapshot cannot serve EUR → USD
        assert!(session.convert(1.0).unwrap_err().is_rate_unavailable());
        session.apply(&swap, Ok(snapshot("EUR", &[("USD", 1.18)])));
        assert_relative_eq!(session.convert(1.0).unwrap().result, 1.18, epsilon = 1e-12);
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let (mut session, ticket) = CurrencySession::new("USD", "EUR").unwrap();
        session.apply(&ticket, Ok(snapshot("USD", &[("EUR", 0.85)])));

        let retry = session.refresh_ticket();
        let outcome = session.apply(&retry, Err(CurrencyError::RateUnavailable("timeout".into())));
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(session.notice().is_some_and(|n| n.contains("timeout")));
        assert_relative_eq!(session.convert(100.0).unwrap().result, 85.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_base_response_fails() {
        let (mut session, ticket) = CurrencySession::new("USD", "EUR").unwrap();
        let outcome = session.apply(&ticket, Ok(snapshot("JPY", &[("EUR", 0.0077)])));
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(session.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_refresh_with_in_memory_source() {
        let mut table = HashMap::new();
        table.insert("USD".to_string(), HashMap::from([("EUR".to_string(), 0.85)]));
        let source = StaticRateSource::new(table);

        let (mut session, _) = CurrencySession::new("USD", "EUR").unwrap();
        assert_eq!(session.refresh(&source).await, ApplyOutcome::Applied);
        assert_eq!(session.convert(100.0).unwrap().display(), "100.00 USD = 85.00 EUR");

        session.set_from("CAD").unwrap();
        assert_eq!(session.refresh(&source).await, ApplyOutcome::Failed);
        assert!(session.convert(1.0).unwrap_err().is_rate_unavailable());
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces_notice() {
        let (mut session, _) = CurrencySession::new("USD", "EUR").unwrap();
        assert_eq!(session.refresh(&FailingSource).await, ApplyOutcome::Failed);
        let err = session.convert(1.0).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
