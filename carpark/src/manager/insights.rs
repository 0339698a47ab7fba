use crate::common::current_time;
use crate::errors::CarparkResult;
use crate::manager::StorageManager;
use crate::model::{Analytics, Email, Guest, Period, RecipientCount, Stats};
use indexmap::IndexMap;
use itertools::Itertools;

impl StorageManager {
    /// Dashboard counters, recomputed from the stored collections on every call.
    pub fn get_stats(&self) -> CarparkResult<Stats> {
        let guests = self.get_guests()?;
        let emails = self.get_emails()?;
        let scheduled = self.get_scheduled_emails()?;

        let total_guests = guests.len();
        Ok(Stats {
            total_guests,
            active_vehicles: guests.iter().filter(|guest| guest.is_active()).count(),
            emails_sent: emails.len(),
            scheduled_emails: scheduled.iter().filter(|email| email.is_pending()).count(),
            total_revenue_impact: total_guests as u64 * self.config().revenue_per_guest(),
        })
    }

    /// Activity within the window ending now.
    ///
    /// `averagePerDay` divides the e-mails sent in the window by the window's
    /// length in days (1, 7, or the length of the previous calendar month).
    pub fn get_analytics(&self, period: Period) -> CarparkResult<Analytics> {
        let now = current_time();
        let cutoff = period.cutoff(now);

        let guests: Vec<Guest> = self.get_guests()?;
        let recent_emails: Vec<Email> = self
            .get_emails()?
            .into_iter()
            .filter(|email| email.sent_at >= cutoff)
            .collect();

        let days = period.days(now);
        let average_per_day = if days > 0.0 {
            recent_emails.len() as f64 / days
        } else {
            0.0
        };

        Ok(Analytics {
            period,
            new_guests: guests
                .iter()
                .filter(|guest| guest.registered_at >= cutoff)
                .count(),
            emails_sent: recent_emails.len(),
            average_per_day,
            top_recipients: Self::get_top_recipients(
                &recent_emails,
                self.config().top_recipients_limit(),
            ),
        })
    }

    /// The `limit` most frequent recipients across `emails`, most frequent
    /// first. Equal counts keep the order in which the addresses first appear.
    pub fn get_top_recipients(emails: &[Email], limit: usize) -> Vec<RecipientCount> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for recipient in emails.iter().flat_map(|email| email.recipients.iter()) {
            *counts.entry(recipient.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(limit)
            .map(|(email, count)| RecipientCount {
                email: email.to_string(),
                count,
            })
            .collect()
    }

    /// Guests whose name, e-mail, vehicle registration or room number contains
    /// `query`, ignoring case.
    pub fn search_guests(&self, query: &str) -> CarparkResult<Vec<Guest>> {
        let needle = query.to_lowercase();
        Ok(self
            .get_guests()?
            .into_iter()
            .filter(|guest| guest.matches(&needle))
            .collect())
    }
}
