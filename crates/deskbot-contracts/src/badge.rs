// Display badges for status, priority and email state
//
// The presentation layer maps `Tone` onto its own styling. Matches here are
// total: adding an enum variant fails compilation instead of falling through
// to an "Unknown" badge, and the email badge always reflects the real
// tri-state value.

use crate::status::{EmailStatus, TicketPriority, TicketStatus};

/// Visual emphasis class for a badge. Presentation decides colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Progress,
    Warning,
    Success,
    Danger,
    Muted,
}

/// Label plus tone for one enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

impl TicketStatus {
    pub fn badge(self) -> Badge {
        match self {
            TicketStatus::Open => Badge {
                label: "Open",
                tone: Tone::Info,
            },
            TicketStatus::InProgress => Badge {
                label: "In Progress",
                tone: Tone::Progress,
            },
            TicketStatus::AwaitingInfo => Badge {
                label: "Awaiting Info",
                tone: Tone::Warning,
            },
            TicketStatus::Closed => Badge {
                label: "Closed",
                tone: Tone::Muted,
            },
            TicketStatus::Resolved => Badge {
                label: "Resolved",
                tone: Tone::Success,
            },
        }
    }
}

impl TicketPriority {
    pub fn badge(self) -> Badge {
        match self {
            TicketPriority::Low => Badge {
                label: "Low",
                tone: Tone::Muted,
            },
            TicketPriority::Medium => Badge {
                label: "Medium",
                tone: Tone::Info,
            },
            TicketPriority::High => Badge {
                label: "High",
                tone: Tone::Warning,
            },
            TicketPriority::Urgent => Badge {
                label: "Urgent",
                tone: Tone::Danger,
            },
        }
    }
}

impl EmailStatus {
    pub fn badge(self) -> Badge {
        match self {
            EmailStatus::Pending => Badge {
                label: "Sending email",
                tone: Tone::Muted,
            },
            EmailStatus::Sent => Badge {
                label: "Email sent",
                tone: Tone::Success,
            },
            EmailStatus::Failed => Badge {
                label: "Email failed",
                tone: Tone::Danger,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn status_badges_cover_every_variant_with_distinct_labels() {
        let labels: HashSet<_> = TicketStatus::ALL.iter().map(|s| s.badge().label).collect();
        assert_eq!(labels.len(), TicketStatus::ALL.len());
    }

    #[test]
    fn resolved_has_its_own_badge() {
        // A view written before `resolved` existed must still render it.
        let badge = TicketStatus::Resolved.badge();
        assert_eq!(badge.label, "Resolved");
        assert_eq!(badge.tone, Tone::Success);
    }

    #[test]
    fn email_badge_reflects_each_delivery_state() {
        assert_eq!(EmailStatus::Pending.badge().label, "Sending email");
        assert_eq!(EmailStatus::Sent.badge().label, "Email sent");
        assert_eq!(EmailStatus::Failed.badge().tone, Tone::Danger);
    }

    #[test]
    fn priority_badges_escalate_in_tone() {
        assert_eq!(TicketPriority::Urgent.badge().tone, Tone::Danger);
        assert_eq!(TicketPriority::Low.badge().tone, Tone::Muted);
    }
}
