use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{null_as_default, CustomFormData, Ticket, TicketPriority, TicketStatus, TicketType, WorkflowStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    InProgress,
    Completed,
    #[serde(other)]
    Unknown,
}

impl From<TaskStatus> for TicketStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::InProgress => TicketStatus::InProgress,
            TaskStatus::Approved | TaskStatus::Completed => TicketStatus::Resolved,
            TaskStatus::Rejected => TicketStatus::Closed,
            TaskStatus::Pending | TaskStatus::Unknown => TicketStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CustomFormResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub custom_form_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub reference_id: String,
    pub form_data: Option<Value>,
    pub created_by: Option<u64>,
    pub status: Option<String>,
}

/// A workflow task as delivered by the task API (snake_case JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFormTask {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow_stage: WorkflowStage,
    pub custom_form_response: CustomFormResponse,
}

impl From<CustomFormTask> for Ticket {
    fn from(task: CustomFormTask) -> Self {
        let workflow = task.workflow_stage.workflow.clone().unwrap_or_default();
        let response = task.custom_form_response;
        let description = task
            .workflow_stage
            .instructions
            .clone()
            .filter(|text| !text.is_empty())
            .or_else(|| workflow.description.clone())
            .unwrap_or_default();
        let tags = [&task.workflow_stage.slug, &task.workflow_stage.stage_type]
            .into_iter()
            .filter(|tag| !tag.is_empty())
            .cloned()
            .collect();

        Ticket {
            id: task.id.to_string(),
            title: format!("{} - {}", workflow.name, response.reference_id),
            description,
            status: task.status.into(),
            priority: TicketPriority::Medium,
            ticket_type: TicketType::Task,
            reporter_name: Some("Form Submitter".to_string()),
            created_at: task.created_at,
            updated_at: task.updated_at,
            tags,
            custom_form_data: Some(CustomFormData {
                task_id: Some(task.id),
                workflow_stage: Some(task.workflow_stage),
                form_data: response.form_data,
                reference_id: Some(response.reference_id),
                form_id: Some(response.custom_form_id),
                category: None,
                form_type: None,
            }),
        }
    }
}
