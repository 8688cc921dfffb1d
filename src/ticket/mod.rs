pub mod task;

use chrono::{DateTime, Duration, Utc};
use serde::{de::Deserializer, Deserialize, Serialize};
use serde_json::Value;

use crate::display::model::Tone;
use crate::errors::{DisplayError, DisplayResult};

pub use task::CustomFormTask;

const SHORT_SUMMARY_LEN: usize = 100;
const ATTENTION_AGE_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Pending,
    Resolved,
    Closed,
    #[serde(other)]
    Unknown,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Pending => "pending",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
            TicketStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Bug,
    Feature,
    Support,
    #[default]
    Task,
    #[serde(other)]
    Unknown,
}

/// Workflow stage a task currently sits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkflowStage {
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub stage_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub order: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub is_final: bool,
    pub instructions: Option<String>,
    pub workflow: Option<Workflow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Workflow {
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
}

/// Form payload attached to a ticket created from a workflow task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomFormData {
    pub task_id: Option<u64>,
    pub workflow_stage: Option<WorkflowStage>,
    /// Raw submission; shape-checked by [`crate::form::FormSubmission`].
    pub form_data: Option<Value>,
    pub reference_id: Option<String>,
    pub form_id: Option<u64>,
    pub category: Option<String>,
    pub form_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TicketStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: TicketPriority,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub ticket_type: TicketType,
    #[serde(default)]
    pub reporter_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub custom_form_data: Option<CustomFormData>,
}

/// Label plus tone for a status or priority badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: &'static str,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDisplay {
    pub name: String,
    pub icon: &'static str,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowProgress {
    pub stage: String,
    pub is_final: bool,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub label: &'static str,
    pub action: &'static str,
    pub tone: Tone,
    pub icon: &'static str,
}

impl Ticket {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: TicketStatus::default(),
            priority: TicketPriority::default(),
            ticket_type: TicketType::default(),
            reporter_name: None,
            created_at: None,
            updated_at: None,
            tags: Vec::new(),
            custom_form_data: None,
        }
    }

    /// The raw form payload, when the ticket carries one.
    pub fn form_data(&self) -> Option<&Value> {
        self.custom_form_data.as_ref()?.form_data.as_ref()
    }

    /// Single-line description capped for list views.
    pub fn short_summary(&self) -> String {
        let flattened = self.description.replace('\n', " ");
        if flattened.chars().count() <= SHORT_SUMMARY_LEN {
            return flattened;
        }
        let cut: String = flattened.chars().take(SHORT_SUMMARY_LEN).collect();
        format!("{}...", cut)
    }

    /// `petty-cash-request` → `Petty Cash Request`; `General` when unset.
    pub fn form_type_display_name(&self) -> String {
        let Some(form_type) = self
            .custom_form_data
            .as_ref()
            .and_then(|data| data.form_type.as_deref())
            .filter(|value| !value.is_empty())
        else {
            return "General".to_string();
        };
        form_type
            .split('-')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn category_display(&self) -> CategoryDisplay {
        let name = self
            .custom_form_data
            .as_ref()
            .and_then(|data| data.category.clone())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "General".to_string());
        let (icon, tone) = match name.as_str() {
            "Finance" => ("dollar-sign", Tone::Success),
            "HR" => ("users", Tone::Info),
            "IT" => ("laptop", Tone::Warning),
            "Operations" => ("cog", Tone::Secondary),
            _ => ("file-text", Tone::Primary),
        };
        CategoryDisplay { name, icon, tone }
    }

    pub fn workflow_progress(&self) -> WorkflowProgress {
        let stage = self
            .custom_form_data
            .as_ref()
            .and_then(|data| data.workflow_stage.as_ref());
        match stage {
            Some(stage) => WorkflowProgress {
                stage: if stage.name.is_empty() {
                    "Unknown".to_string()
                } else {
                    stage.name.clone()
                },
                is_final: stage.is_final,
                order: stage.order,
            },
            None => WorkflowProgress {
                stage: "Unknown".to_string(),
                is_final: false,
                order: 0,
            },
        }
    }

    pub fn status_badge(&self) -> Badge {
        let (text, tone) = match self.status {
            TicketStatus::Pending => ("Pending", Tone::Warning),
            TicketStatus::InProgress => ("In Progress", Tone::Info),
            TicketStatus::Resolved => ("Resolved", Tone::Success),
            TicketStatus::Closed => ("Closed", Tone::Secondary),
            TicketStatus::Open | TicketStatus::Unknown => ("Open", Tone::Primary),
        };
        Badge { text, tone }
    }

    pub fn priority_badge(&self) -> Badge {
        let (text, tone) = match self.priority {
            TicketPriority::Low => ("Low", Tone::Light),
            TicketPriority::High => ("High", Tone::Warning),
            TicketPriority::Critical => ("Critical", Tone::Danger),
            TicketPriority::Medium | TicketPriority::Unknown => ("Medium", Tone::Primary),
        };
        Badge { text, tone }
    }

    /// High or critical priority, a final workflow stage, or pending for more
    /// than two days as of `now`.
    pub fn requires_attention(&self, now: DateTime<Utc>) -> bool {
        if matches!(
            self.priority,
            TicketPriority::High | TicketPriority::Critical
        ) {
            return true;
        }
        if self.workflow_progress().is_final {
            return true;
        }
        let stale_cutoff = now - Duration::days(ATTENTION_AGE_DAYS);
        matches!(
            (self.status, self.created_at),
            (TicketStatus::Pending, Some(created)) if created < stale_cutoff
        )
    }

    /// Approve/reject while pending, plus view details.
    pub fn action_buttons(&self) -> Vec<ActionButton> {
        let mut buttons = Vec::new();
        if self.status == TicketStatus::Pending {
            buttons.push(ActionButton {
                label: "Approve",
                action: "approve",
                tone: Tone::Success,
                icon: "check",
            });
            buttons.push(ActionButton {
                label: "Reject",
                action: "reject",
                tone: Tone::Danger,
                icon: "x",
            });
        }
        buttons.push(ActionButton {
            label: "View Details",
            action: "view",
            tone: Tone::Info,
            icon: "eye",
        });
        buttons
    }
}

/// Reads an explicit JSON `null` as the field's default value; `#[serde(default)]`
/// alone only covers absent keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a ticket from JSON text. Task payloads (snake_case, carrying a
/// `custom_form_response`) are converted into tickets.
pub fn parse_ticket(text: &str) -> DisplayResult<Ticket> {
    let value: Value = serde_json::from_str(text)?;
    let Some(object) = value.as_object() else {
        return Err(DisplayError::InvalidTicket(
            "expected a JSON object".to_string(),
        ));
    };
    if object.contains_key("custom_form_response") {
        let task: CustomFormTask = serde_json::from_value(value)?;
        tracing::debug!(task = task.id, "converted task payload into ticket");
        return Ok(task.into());
    }
    Ok(serde_json::from_value(value)?)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
