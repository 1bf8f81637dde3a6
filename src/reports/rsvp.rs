//! RSVP summary for an event's invitations

use serde::Serialize;

use crate::models::{Invitation, RsvpStatus};

/// Counts per RSVP status; the four counts always add up to `total`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RsvpSummary {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub declined: usize,
    pub maybe: usize,
    /// Guests covered by accepted invitations
    pub expected_attendees: u64,
    /// Guests covered by maybe responses
    pub tentative_attendees: u64,
}

impl RsvpSummary {
    pub fn from_invitations(invitations: &[Invitation]) -> Self {
        let mut summary = Self {
            total: invitations.len(),
            ..Self::default()
        };

        for invitation in invitations {
            match invitation.status {
                RsvpStatus::Pending => summary.pending += 1,
                RsvpStatus::Accepted => {
                    summary.accepted += 1;
                    summary.expected_attendees += u64::from(invitation.guest_count);
                }
                RsvpStatus::Declined => summary.declined += 1,
                RsvpStatus::Maybe => {
                    summary.maybe += 1;
                    summary.tentative_attendees += u64::from(invitation.guest_count);
                }
            }
        }

        summary
    }

    pub fn count(&self, status: RsvpStatus) -> usize {
        match status {
            RsvpStatus::Pending => self.pending,
            RsvpStatus::Accepted => self.accepted,
            RsvpStatus::Declined => self.declined,
            RsvpStatus::Maybe => self.maybe,
        }
    }

    /// Share of invitations that have been answered, in whole percent
    pub fn response_rate(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        ((self.total - self.pending) * 100 + self.total / 2) / self.total
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Invitations: {}  (responded {}%)\n",
            self.total,
            self.response_rate()
        ));
        for status in RsvpStatus::all() {
            output.push_str(&format!("  {:<10} {:>4}\n", status.as_str(), self.count(*status)));
        }
        output.push_str(&format!("Expected attendees: {}", self.expected_attendees));
        if self.tentative_attendees > 0 {
            output.push_str(&format!(" (+{} maybe)", self.tentative_attendees));
        }
        output.push('\n');
        output
    }
}
