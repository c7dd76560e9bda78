// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use lineoa_core::{Contact, LineOaError};
use lineoa_storage::ConsoleStore;
use serde::Serialize;

/// Headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub contacts: usize,
    pub messages: usize,
    /// Estimated as 80% of contacts, rounded up.
    pub active: usize,
    pub unread: u64,
}

impl DashboardStats {
    pub fn from_contacts(contacts: &[Contact]) -> Self {
        let n = contacts.len();
        Self {
            contacts: n,
            messages: contacts.iter().map(|c| c.messages.len()).sum(),
            active: (n * 4).div_ceil(5),
            unread: contacts.iter().map(|c| u64::from(c.unread_count)).sum(),
        }
    }

    pub async fn load(store: &ConsoleStore) -> Result<Self, LineOaError> {
        Ok(Self::from_contacts(&store.get_contacts().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts(n: usize) -> Vec<Contact> {
        (0..n).map(|_| Contact::new_customer()).collect()
    }

    #[test]
    fn active_rounds_up() {
        assert_eq!(DashboardStats::from_contacts(&contacts(0)).active, 0);
        assert_eq!(DashboardStats::from_contacts(&contacts(1)).active, 1);
        assert_eq!(DashboardStats::from_contacts(&contacts(2)).active, 2);
        assert_eq!(DashboardStats::from_contacts(&contacts(5)).active, 4);
        assert_eq!(DashboardStats::from_contacts(&contacts(6)).active, 5);
    }

    #[test]
    fn totals_sum_over_contacts() {
        let mut list = contacts(2);
        list[0].push_message(lineoa_core::Message::user("a"));
        list[0].push_message(lineoa_core::Message::bot("b"));
        list[1].unread_count = 3;
        let stats = DashboardStats::from_contacts(&list);
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.unread, 3);
    }
}
