//! Dashboard tallies over a student's applications.

use serde::Serialize;

use super::domain::{Application, ApplicationStatus, OfferStatus};

/// Pure tally across a set of applications; no weighting, no deduplication.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub draft: usize,
    pub in_review: usize,
    pub submitted: usize,
    pub offers_received: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub completed: usize,
    pub total_offers: usize,
    pub pending_offers: usize,
    pub accepted_offers: usize,
}

/// Reduce a collection of applications into dashboard counts in one pass.
pub fn summarize<'a, I>(applications: I) -> ApplicationSummary
where
    I: IntoIterator<Item = &'a Application>,
{
    let mut summary = ApplicationSummary::default();

    for application in applications {
        summary.total += 1;

        match application.status {
            ApplicationStatus::Draft => summary.draft += 1,
            ApplicationStatus::InReview => summary.in_review += 1,
            ApplicationStatus::Submitted => summary.submitted += 1,
            ApplicationStatus::OffersReceived => summary.offers_received += 1,
            ApplicationStatus::Accepted => summary.accepted += 1,
            ApplicationStatus::Rejected => summary.rejected += 1,
            ApplicationStatus::Completed => summary.completed += 1,
            // Visa-stage applications count toward the total only.
            ApplicationStatus::VisaApplied => {}
        }

        for offer in &application.offer_letters {
            summary.total_offers += 1;
            match offer.status {
                OfferStatus::Pending => summary.pending_offers += 1,
                OfferStatus::Accepted => summary.accepted_offers += 1,
                OfferStatus::Rejected => {}
            }
        }
    }

    summary
}
