//! Notification request decoding.
//!
//! The CLI payload is a flat JSON object with a `type` discriminator. It is
//! decoded into a loose shape first and then converted into the tagged
//! [`Notification`] enum, so every variant carries exactly the fields it needs
//! and an unknown `type` is reported with its offending value.

use crate::error::RequestError;
use lettre::message::Mailbox;
use serde::Deserialize;

pub const TYPE_DAY_START: &str = "day_start";
pub const TYPE_MISSION_UNLOCK: &str = "mission_unlock";
pub const TYPE_BLACKMARKET: &str = "blackmarket";

/// One of the three fixed notification emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Day `day` of the game has begun.
    DayStart { day: u32 },
    /// Missions for day `day` unlock at `unlock_hour` (hour of day).
    MissionUnlock { day: u32, unlock_hour: u32 },
    /// The black market opens at `open_time` in five minutes.
    Blackmarket { open_time: String, items_count: u32 },
}

impl Notification {
    /// The `type` discriminator this variant was decoded from.
    pub fn type_name(&self) -> &'static str {
        match self {
            Notification::DayStart { .. } => TYPE_DAY_START,
            Notification::MissionUnlock { .. } => TYPE_MISSION_UNLOCK,
            Notification::Blackmarket { .. } => TYPE_BLACKMARKET,
        }
    }

    /// Short human description used in the final success line.
    pub fn summary(&self) -> String {
        match self {
            Notification::DayStart { day } => format!("Day {} start email", day),
            Notification::MissionUnlock { day, .. } => {
                format!("Day {} mission unlock reminder", day)
            }
            Notification::Blackmarket { .. } => "Black market reminder".to_string(),
        }
    }
}

/// A decoded request: which email to send, and to whom.
///
/// Every recipient receives the identical message.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub notification: Notification,
    pub recipients: Vec<Mailbox>,
}

/// Wire shape of the payload before the `type` is resolved.
#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(rename = "type")]
    kind: String,
    day: Option<u32>,
    unlock_hour: Option<u32>,
    open_time: Option<String>,
    #[serde(default)]
    items_count: u32,
    #[serde(default)]
    recipients: Vec<String>,
}

impl NotificationRequest {
    /// Decode the CLI JSON payload.
    ///
    /// # Errors
    ///
    /// * `RequestError::InvalidJson` - malformed JSON or wrongly typed fields
    /// * `RequestError::UnknownType` - `type` is not one of the three known emails
    /// * `RequestError::MissingField` - a field required by the chosen type is absent
    /// * `RequestError::NoRecipients` / `InvalidRecipient` - unusable recipient list
    pub fn from_json(payload: &str) -> Result<Self, RequestError> {
        let raw: RawRequest =
            serde_json::from_str(payload).map_err(|e| RequestError::InvalidJson(e.to_string()))?;

        let notification = match raw.kind.as_str() {
            TYPE_DAY_START => Notification::DayStart {
                day: require(raw.day, TYPE_DAY_START, "day")?,
            },
            TYPE_MISSION_UNLOCK => Notification::MissionUnlock {
                day: require(raw.day, TYPE_MISSION_UNLOCK, "day")?,
                unlock_hour: require(raw.unlock_hour, TYPE_MISSION_UNLOCK, "unlock_hour")?,
            },
            TYPE_BLACKMARKET => Notification::Blackmarket {
                open_time: require(raw.open_time, TYPE_BLACKMARKET, "open_time")?,
                items_count: raw.items_count,
            },
            other => return Err(RequestError::UnknownType(other.to_string())),
        };

        if raw.recipients.is_empty() {
            return Err(RequestError::NoRecipients);
        }

        let recipients = raw
            .recipients
            .iter()
            .map(|addr| {
                addr.trim()
                    .parse::<Mailbox>()
                    .map_err(|e| RequestError::InvalidRecipient {
                        address: addr.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            notification,
            recipients,
        })
    }

    /// Recipient addresses joined with `", "`, as shown in logs and the `To` header.
    pub fn recipient_list(&self) -> String {
        self.recipients
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn require<T>(value: Option<T>, kind: &'static str, field: &'static str) -> Result<T, RequestError> {
    value.ok_or(RequestError::MissingField { kind, field })
}
