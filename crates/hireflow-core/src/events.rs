//! Hiring-domain webhook event catalog.
//!
//! The catalog is fixed: subscriptions may only reference the event types
//! listed here, and `test.ping` is reserved for endpoint verification.

use serde::{Deserialize, Serialize};

/// Event types that webhook configurations can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    /// A new candidate profile was created.
    #[serde(rename = "candidate.created")]
    CandidateCreated,
    /// A candidate profile was updated.
    #[serde(rename = "candidate.updated")]
    CandidateUpdated,
    /// A candidate applied to a job.
    #[serde(rename = "application.created")]
    ApplicationCreated,
    /// An application moved to a different pipeline stage.
    #[serde(rename = "application.stage_changed")]
    ApplicationStageChanged,
    /// An application's status changed.
    #[serde(rename = "application.status_changed")]
    ApplicationStatusChanged,
    /// An interview was scheduled.
    #[serde(rename = "interview.scheduled")]
    InterviewScheduled,
    /// An interview was marked completed.
    #[serde(rename = "interview.completed")]
    InterviewCompleted,
    /// An interview was cancelled.
    #[serde(rename = "interview.cancelled")]
    InterviewCancelled,
    /// An offer was drafted for a candidate.
    #[serde(rename = "offer.created")]
    OfferCreated,
    /// An offer was sent to a candidate.
    #[serde(rename = "offer.sent")]
    OfferSent,
    /// A candidate accepted an offer.
    #[serde(rename = "offer.accepted")]
    OfferAccepted,
    /// A candidate declined an offer.
    #[serde(rename = "offer.declined")]
    OfferDeclined,
    /// A job requisition was created.
    #[serde(rename = "job.created")]
    JobCreated,
    /// A job was published to the careers page.
    #[serde(rename = "job.published")]
    JobPublished,
    /// A job was closed.
    #[serde(rename = "job.closed")]
    JobClosed,
    /// A candidate was hired.
    #[serde(rename = "hire.completed")]
    HireCompleted,
    /// Reserved for endpoint verification; not subscribable.
    #[serde(rename = "test.ping")]
    TestPing,
}

impl WebhookEventType {
    /// Every subscribable event type, in catalog order.
    #[must_use]
    pub fn all() -> [Self; 16] {
        [
            Self::CandidateCreated,
            Self::CandidateUpdated,
            Self::ApplicationCreated,
            Self::ApplicationStageChanged,
            Self::ApplicationStatusChanged,
            Self::InterviewScheduled,
            Self::InterviewCompleted,
            Self::InterviewCancelled,
            Self::OfferCreated,
            Self::OfferSent,
            Self::OfferAccepted,
            Self::OfferDeclined,
            Self::JobCreated,
            Self::JobPublished,
            Self::JobClosed,
            Self::HireCompleted,
        ]
    }

    /// Parse from the dot-separated string form (e.g. `"candidate.created"`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "candidate.created" => Some(Self::CandidateCreated),
            "candidate.updated" => Some(Self::CandidateUpdated),
            "application.created" => Some(Self::ApplicationCreated),
            "application.stage_changed" => Some(Self::ApplicationStageChanged),
            "application.status_changed" => Some(Self::ApplicationStatusChanged),
            "interview.scheduled" => Some(Self::InterviewScheduled),
            "interview.completed" => Some(Self::InterviewCompleted),
            "interview.cancelled" => Some(Self::InterviewCancelled),
            "offer.created" => Some(Self::OfferCreated),
            "offer.sent" => Some(Self::OfferSent),
            "offer.accepted" => Some(Self::OfferAccepted),
            "offer.declined" => Some(Self::OfferDeclined),
            "job.created" => Some(Self::JobCreated),
            "job.published" => Some(Self::JobPublished),
            "job.closed" => Some(Self::JobClosed),
            "hire.completed" => Some(Self::HireCompleted),
            "test.ping" => Some(Self::TestPing),
            _ => None,
        }
    }

    /// Convert to the dot-separated string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CandidateCreated => "candidate.created",
            Self::CandidateUpdated => "candidate.updated",
            Self::ApplicationCreated => "application.created",
            Self::ApplicationStageChanged => "application.stage_changed",
            Self::ApplicationStatusChanged => "application.status_changed",
            Self::InterviewScheduled => "interview.scheduled",
            Self::InterviewCompleted => "interview.completed",
            Self::InterviewCancelled => "interview.cancelled",
            Self::OfferCreated => "offer.created",
            Self::OfferSent => "offer.sent",
            Self::OfferAccepted => "offer.accepted",
            Self::OfferDeclined => "offer.declined",
            Self::JobCreated => "job.created",
            Self::JobPublished => "job.published",
            Self::JobClosed => "job.closed",
            Self::HireCompleted => "hire.completed",
            Self::TestPing => "test.ping",
        }
    }

    /// Whether configurations may subscribe to this event type.
    #[must_use]
    pub const fn is_subscribable(&self) -> bool {
        !matches!(self, Self::TestPing)
    }

    /// The resource category the event belongs to (the segment before the dot).
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::CandidateCreated | Self::CandidateUpdated => "candidate",
            Self::ApplicationCreated
            | Self::ApplicationStageChanged
            | Self::ApplicationStatusChanged => "application",
            Self::InterviewScheduled | Self::InterviewCompleted | Self::InterviewCancelled => {
                "interview"
            }
            Self::OfferCreated | Self::OfferSent | Self::OfferAccepted | Self::OfferDeclined => {
                "offer"
            }
            Self::JobCreated | Self::JobPublished | Self::JobClosed => "job",
            Self::HireCompleted => "hire",
            Self::TestPing => "test",
        }
    }

    /// Human-readable name for catalog listings.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CandidateCreated => "Candidate Created",
            Self::CandidateUpdated => "Candidate Updated",
            Self::ApplicationCreated => "Application Created",
            Self::ApplicationStageChanged => "Application Stage Changed",
            Self::ApplicationStatusChanged => "Application Status Changed",
            Self::InterviewScheduled => "Interview Scheduled",
            Self::InterviewCompleted => "Interview Completed",
            Self::InterviewCancelled => "Interview Cancelled",
            Self::OfferCreated => "Offer Created",
            Self::OfferSent => "Offer Sent",
            Self::OfferAccepted => "Offer Accepted",
            Self::OfferDeclined => "Offer Declined",
            Self::JobCreated => "Job Created",
            Self::JobPublished => "Job Published",
            Self::JobClosed => "Job Closed",
            Self::HireCompleted => "Hire Completed",
            Self::TestPing => "Test Ping",
        }
    }

    /// Human-readable description for catalog listings.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::CandidateCreated => "Triggered when a new candidate profile is created",
            Self::CandidateUpdated => "Triggered when a candidate profile is updated",
            Self::ApplicationCreated => "Triggered when a candidate applies to a job",
            Self::ApplicationStageChanged => {
                "Triggered when an application moves to a different pipeline stage"
            }
            Self::ApplicationStatusChanged => {
                "Triggered when an application's status changes"
            }
            Self::InterviewScheduled => "Triggered when an interview is scheduled",
            Self::InterviewCompleted => "Triggered when an interview is marked completed",
            Self::InterviewCancelled => "Triggered when an interview is cancelled",
            Self::OfferCreated => "Triggered when an offer is drafted for a candidate",
            Self::OfferSent => "Triggered when an offer is sent to a candidate",
            Self::OfferAccepted => "Triggered when a candidate accepts an offer",
            Self::OfferDeclined => "Triggered when a candidate declines an offer",
            Self::JobCreated => "Triggered when a job requisition is created",
            Self::JobPublished => "Triggered when a job is published to the careers page",
            Self::JobClosed => "Triggered when a job is closed",
            Self::HireCompleted => "Triggered when a candidate is hired",
            Self::TestPing => "Reserved event used to verify a webhook endpoint",
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
