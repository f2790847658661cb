//! Wire types for the propose / submit-selection exchange, plus the
//! [`BookingBackend`] seam the negotiation driver talks through.
//!
//! Field names and flag encodings match the backend contract exactly:
//! proposal payloads are camelCase JSON, submissions are snake_case form
//! fields with `"0"`/`"1"` boolean flags.

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// Serialize a bool the way the selection endpoint expects it.
mod flag_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "1" } else { "0" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected \"0\" or \"1\", got {other:?}"
            ))),
        }
    }
}

/// Time-change proposal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRequest {
    /// Selected girl id; empty on the store calendar.
    pub girl_id: String,
    /// Clicked day, `YYYY-MM-DD(曜)`.
    pub day: String,
    /// Clicked timeslot label, `～` already normalized to `-`.
    pub day_time: String,
}

/// Server answer to a proposal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalResponse {
    /// `true` when the server proposes an alternate time.
    pub result: bool,
    #[serde(rename = "resultData", skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub result_data: Option<ProposalData>,
}

/// The server-proposed alternate slot and its display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ProposalData {
    pub proposal_day: String,
    pub proposal_day_time: String,
    pub proposal_day_of_week: String,
    /// Display form of the proposed time for the modal.
    pub disp_proposal_day_time: String,
    /// Display form of the originally selected time for the modal.
    pub disp_selected_day_time: String,
    pub selected_day_of_week: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_message: Option<String>,
}

/// Final selection submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[allow(missing_docs)]
    pub girl_id: String,
    #[allow(missing_docs)]
    pub day: String,
    #[allow(missing_docs)]
    pub day_time: String,
    /// Waitlist flag, wire-encoded as `"0"`/`"1"`.
    #[serde(with = "flag_string")]
    pub waitlist_notification: bool,
    /// Originally clicked day, preserved for audit when a proposal was
    /// accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub backup_day_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub backup_day_of_week: Option<String>,
}

impl SubmissionRequest {
    /// Submission without audit fields.
    #[must_use]
    pub const fn plain(girl_id: String, day: String, day_time: String, waitlist: bool) -> Self {
        Self {
            girl_id,
            day,
            day_time,
            waitlist_notification: waitlist,
            backup_day: None,
            backup_day_time: None,
            backup_day_of_week: None,
        }
    }
}

/// Seam to whatever transport performs the two outbound calls. The engine
/// never blocks on it; drivers decide how requests are actually sent.
pub trait BookingBackend {
    /// Send a time-change proposal request.
    fn propose(&mut self, request: &ProposalRequest) -> Result<ProposalResponse>;

    /// Submit the final selection. Success is opaque; the caller navigates
    /// afterwards.
    fn submit(&mut self, request: &SubmissionRequest) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn proposal_response_parses_camel_case() {
        let value = json!({
            "result": true,
            "resultData": {
                "proposalDay": "2024-04-02",
                "proposalDayTime": "12:00-",
                "proposalDayOfWeek": "火",
                "dispProposalDayTime": "4月2日(火) 12:00",
                "dispSelectedDayTime": "4月2日(火) 12:30",
                "selectedDayOfWeek": "火",
                "proposalMessage": "前枠のご案内です"
            }
        });
        let response: ProposalResponse = serde_json::from_value(value).unwrap();
        assert!(response.result);
        let data = response.result_data.unwrap();
        assert_eq!(data.proposal_day_of_week, "火");
        assert_eq!(data.proposal_message.as_deref(), Some("前枠のご案内です"));
    }

    #[test]
    fn proposal_response_without_data() {
        let response: ProposalResponse = serde_json::from_value(json!({ "result": false })).unwrap();
        assert!(!response.result);
        assert_eq!(response.result_data, None);
    }

    #[test]
    fn submission_serializes_flag_as_string() {
        let request = SubmissionRequest::plain(
            "g-1".to_string(),
            "2024-04-02(火)".to_string(),
            "12:00-12:25".to_string(),
            true,
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["waitlist_notification"], json!("1"));
        assert!(value.get("backup_day").is_none());
    }

    #[test]
    fn submission_round_trips_with_backups() {
        let mut request = SubmissionRequest::plain(
            "g-1".to_string(),
            "2024-04-02(火)".to_string(),
            "12:00-".to_string(),
            false,
        );
        request.backup_day = Some("2024-04-02(火)".to_string());
        request.backup_day_time = Some("12:30-".to_string());
        request.backup_day_of_week = Some("火".to_string());
        let raw = serde_json::to_string(&request).unwrap();
        let back: SubmissionRequest = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn bad_flag_value_is_rejected() {
        let value = json!({
            "girl_id": "g-1",
            "day": "2024-04-02(火)",
            "day_time": "12:00-",
            "waitlist_notification": "yes"
        });
        assert!(serde_json::from_value::<SubmissionRequest>(value).is_err());
    }
}
