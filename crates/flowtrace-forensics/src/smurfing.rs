//! Smurfing (fan-in / fan-out velocity) detection.

use crate::types::Transaction;
use chrono::{DateTime, Duration, Utc};
use flowtrace_core::{domain::Domain, kernel::KernelMetadata, traits::AnalyticKernel};
use std::collections::{BTreeSet, HashMap};

/// Configuration for the smurfing detector.
#[derive(Debug, Clone)]
pub struct SmurfingConfig {
    /// Rolling window length in hours.
    pub window_hours: i64,
    /// Number of transactions that must fall inside one window.
    pub burst_size: usize,
}

impl Default for SmurfingConfig {
    fn default() -> Self {
        Self {
            window_hours: 72,
            burst_size: 10,
        }
    }
}

/// Accounts flagged for burst activity, split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanActivity {
    /// Receivers with a qualifying incoming burst.
    pub fan_in: BTreeSet<String>,
    /// Senders with a qualifying outgoing burst.
    pub fan_out: BTreeSet<String>,
}

/// Smurfing detection kernel.
///
/// Flags an account when any `burst_size` consecutive transactions on one
/// side of it fall within the rolling time window: many senders converging
/// on one receiver (fan-in) or one sender dispersing to many receivers
/// (fan-out). The account is flagged, not the window; one qualifying window
/// is enough.
#[derive(Debug, Clone)]
pub struct SmurfingDetection {
    metadata: KernelMetadata,
}

impl Default for SmurfingDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl SmurfingDetection {
    /// Create a new smurfing detection kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("forensics/smurfing", Domain::Forensics)
                .with_description("Fan-in / fan-out burst detection over a rolling window")
                .with_throughput(200_000)
                .with_latency_us(20.0),
        }
    }

    /// Detect burst activity on both sides of every account.
    #[must_use]
    pub fn compute(transactions: &[Transaction], config: &SmurfingConfig) -> FanActivity {
        FanActivity {
            fan_in: Self::burst_accounts(transactions, config, |tx| tx.receiver_id.as_str()),
            fan_out: Self::burst_accounts(transactions, config, |tx| tx.sender_id.as_str()),
        }
    }

    /// Accounts whose transaction group contains a qualifying burst.
    ///
    /// Rows without a timestamp count toward the group size but can never
    /// complete a window, so a group needs `burst_size` dated rows to flag.
    fn burst_accounts<'a>(
        transactions: &'a [Transaction],
        config: &SmurfingConfig,
        account_of: impl Fn(&'a Transaction) -> &'a str,
    ) -> BTreeSet<String> {
        let mut groups: HashMap<&str, (usize, Vec<DateTime<Utc>>)> = HashMap::new();
        for tx in transactions {
            let entry = groups.entry(account_of(tx)).or_default();
            entry.0 += 1;
            if let Some(ts) = tx.timestamp {
                entry.1.push(ts);
            }
        }

        let window = Duration::hours(config.window_hours);
        let span = config.burst_size.saturating_sub(1);
        let mut flagged = BTreeSet::new();

        for (account, (total, mut times)) in groups {
            if total < config.burst_size {
                continue;
            }
            times.sort_unstable();
            for i in span..times.len() {
                if times[i] - times[i - span] <= window {
                    flagged.insert(account.to_string());
                    break;
                }
            }
        }

        flagged
    }
}

impl AnalyticKernel for SmurfingDetection {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
