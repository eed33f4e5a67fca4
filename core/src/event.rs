//! Evaluation trace.
//!
//! Each query records what the engine did to reach its number. The trace
//! is optional: `BalanceEngine::evaluate` discards it, `evaluate_traced`
//! hands it back so tooling can write it out as JSON lines.

use crate::{
    error::BalanceResult,
    reconstructor::Replay,
    types::{AccountId, Amount, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluationEvent {
    UnknownAccount {
        account_id:          AccountId,
        reference_timestamp: Timestamp,
    },
    OpeningBalanceReconstructed {
        account_id:         AccountId,
        window_start:       Timestamp,
        creation_timestamp: Timestamp,
        replay:             Replay,
        adjustment:         Amount,
        start_balance:      Amount,
    },
    EmptyWindow {
        account_id:          AccountId,
        reference_timestamp: Timestamp,
        start_balance:       Amount,
    },
    WindowAveraged {
        account_id:          AccountId,
        reference_timestamp: Timestamp,
        day_anchor:          Timestamp,
        bucket_count:        usize,
        transaction_count:   usize,
        average:             Amount,
    },
}

impl EvaluationEvent {
    pub fn account_id(&self) -> &str {
        match self {
            Self::UnknownAccount { account_id, .. }
            | Self::OpeningBalanceReconstructed { account_id, .. }
            | Self::EmptyWindow { account_id, .. }
            | Self::WindowAveraged { account_id, .. } => account_id,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::UnknownAccount { .. }              => "unknown_account",
            Self::OpeningBalanceReconstructed { .. } => "opening_balance_reconstructed",
            Self::EmptyWindow { .. }                 => "empty_window",
            Self::WindowAveraged { .. }              => "window_averaged",
        }
    }

    /// One JSON line, as written to trace files.
    pub fn to_json_line(&self) -> BalanceResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_timestamp;

    #[test]
    fn json_line_is_tagged_and_reads_back() {
        let event = EvaluationEvent::UnknownAccount {
            account_id:          "ac_ghost".into(),
            reference_timestamp: parse_timestamp("2022-04-01 12:00").unwrap(),
        };
        let line = event.to_json_line().unwrap();

        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], event.type_name());
        assert_eq!(serde_json::from_str::<EvaluationEvent>(&line).unwrap(), event);
    }
}
