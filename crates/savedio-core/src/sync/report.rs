//! Reporting of reconciliation results to the user.

use std::collections::BTreeSet;

use tokio::sync::mpsc;

/// Lists that gained created or updated bookmarks during a reconciliation
/// and asked to be notified about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChangeNotification {
    /// List names in lexicographic order
    pub lists: Vec<String>,
}

impl ListChangeNotification {
    /// Build a notification, `None` when no list qualifies
    pub fn new(lists: BTreeSet<String>) -> Option<Self> {
        if lists.is_empty() {
            None
        } else {
            Some(Self {
                lists: lists.into_iter().collect(),
            })
        }
    }

    /// Short title of the notification
    pub fn headline(&self) -> String {
        match self.lists.as_slice() {
            [single] => format!("List {single} has new bookmarks"),
            _ => "Your lists have new bookmarks".to_string(),
        }
    }

    /// Longer description naming every list
    pub fn body(&self) -> String {
        match self.lists.as_slice() {
            [single] => format!("Bookmarks were added or changed in {single}."),
            lists => format!(
                "Bookmarks were added or changed in {} lists: {}.",
                lists.len(),
                lists.join(", ")
            ),
        }
    }

    /// The list to open when the notification is acted upon, if exactly one changed
    pub fn target_list(&self) -> Option<&str> {
        match self.lists.as_slice() {
            [single] => Some(single.as_str()),
            _ => None,
        }
    }
}

/// Receives list change notifications produced by a reconciliation
pub trait SyncReporter {
    /// Called after a committed reconciliation changed notify-enabled lists
    fn lists_changed(&self, notification: &ListChangeNotification);
}

/// Reporter that writes notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl SyncReporter for TracingReporter {
    fn lists_changed(&self, notification: &ListChangeNotification) {
        tracing::info!(
            lists = ?notification.lists,
            "{}",
            notification.headline()
        );
    }
}

impl SyncReporter for mpsc::UnboundedSender<ListChangeNotification> {
    fn lists_changed(&self, notification: &ListChangeNotification) {
        if self.send(notification.clone()).is_err() {
            tracing::debug!("List change notification dropped; receiver closed");
        }
    }
}

impl<R: SyncReporter + ?Sized> SyncReporter for &R {
    fn lists_changed(&self, notification: &ListChangeNotification) {
        (**self).lists_changed(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(lists: &[&str]) -> ListChangeNotification {
        ListChangeNotification::new(lists.iter().map(|l| (*l).to_string()).collect()).unwrap()
    }

    #[test]
    fn empty_set_produces_no_notification() {
        assert!(ListChangeNotification::new(BTreeSet::new()).is_none());
    }

    #[test]
    fn single_list_targets_that_list() {
        let single = notification(&["work"]);
        assert_eq!(single.target_list(), Some("work"));
        assert!(single.headline().contains("work"));
    }

    #[test]
    fn several_lists_are_sorted_and_counted() {
        let many = notification(&["work", "news"]);
        assert_eq!(many.lists, vec!["news".to_string(), "work".to_string()]);
        assert_eq!(many.target_list(), None);
        assert_eq!(
            many.body(),
            "Bookmarks were added or changed in 2 lists: news, work."
        );
    }

    #[test]
    fn channel_reporter_forwards_notifications() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.lists_changed(&notification(&["work"]));
        assert_eq!(rx.try_recv().unwrap().lists, vec!["work".to_string()]);
    }
}
