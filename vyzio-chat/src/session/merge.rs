//! Pure reconciliation of local and server conversation records.
//!
//! Confirmed conversations are deduplicated by server chat id; pending ones
//! are correlated by advertisement id. A pending entry and its confirmed
//! counterpart never coexist after a merge.

use crate::models::Conversation;

/// Merge a server list response into local state.
///
/// The server response replaces local state wholesale, except that local
/// pending conversations whose advertisement is absent from the response are
/// preserved (prepended, like the optimistic UI does). Locally known fields
/// of records the server re-sent, such as the counterpart id, survive.
pub(crate) fn merge_server_list(
    local: Vec<Conversation>,
    incoming: Vec<Conversation>,
) -> Vec<Conversation> {
    let mut merged: Vec<Conversation> = Vec::with_capacity(incoming.len());

    for inc in incoming {
        match local
            .iter()
            .find(|c| c.chat_id().is_some() && c.chat_id() == inc.chat_id())
        {
            Some(prev) => {
                let mut conv = prev.clone();
                conv.absorb(inc);
                merged.push(conv);
            }
            None => merged.push(inc),
        }
    }

    for conv in local {
        if conv.is_pending() && !merged.iter().any(|c| c.ad_id == conv.ad_id) {
            merged.insert(0, conv);
        }
    }

    merged
}

/// Insert or merge a pending conversation, keyed by advertisement id.
///
/// Returns the index of the resulting entry. An existing confirmed entry for
/// the same advertisement is updated in place, never downgraded.
pub(crate) fn upsert_pending(list: &mut Vec<Conversation>, pending: Conversation) -> usize {
    match list.iter().position(|c| c.ad_id == pending.ad_id) {
        Some(idx) => {
            list[idx].absorb(pending);
            idx
        }
        None => {
            list.insert(0, pending);
            0
        }
    }
}

/// Replace the pending entry for an advertisement with its server-confirmed
/// record.
///
/// If a conversation with the same server id already exists (for example,
/// discovered by a concurrent list refresh), the records are merged rather
/// than duplicated; the server id is authoritative for de-duplication.
pub(crate) fn reconcile_confirmed(
    mut list: Vec<Conversation>,
    confirmed: Conversation,
) -> Vec<Conversation> {
    let mut merged = match list
        .iter()
        .position(|c| c.is_pending() && c.ad_id == confirmed.ad_id)
    {
        Some(idx) => {
            let mut pending = list.remove(idx);
            pending.absorb(confirmed);
            pending
        }
        None => confirmed,
    };

    match list
        .iter()
        .position(|c| c.chat_id().is_some() && c.chat_id() == merged.chat_id())
    {
        Some(idx) => {
            let existing = list.remove(idx);
            merged.absorb(existing);
            list.insert(idx, merged);
        }
        None => list.insert(0, merged),
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdId, ChatHandle, ChatId, UserId};
    use pretty_assertions::assert_eq;

    fn pending(ad: i64) -> Conversation {
        Conversation::pending(ad, format!("Ad {ad}"), 7i64, "Alice")
    }

    fn confirmed(ad: i64, chat: i64) -> Conversation {
        Conversation {
            ad_id: AdId::from(ad),
            ad_title: format!("Ad {ad}"),
            handle: ChatHandle::Confirmed(ChatId::from(chat)),
            counterpart_name: "Alice".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_server_list_replaces_wholesale() {
        let local = vec![confirmed(1, 10), confirmed(2, 20)];
        let incoming = vec![confirmed(2, 20)];

        let merged = merge_server_list(local, incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].ad_id, AdId::from(2i64));
    }

    #[test]
    fn test_server_list_preserves_unlisted_pending() {
        let local = vec![pending(42)];
        let incoming = vec![confirmed(5, 50)];

        let merged = merge_server_list(local, incoming);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].is_pending());
        assert_eq!(merged[0].ad_id, AdId::from(42i64));
    }

    #[test]
    fn test_server_list_drops_pending_once_listed() {
        // The server already knows about ad 42; the pending placeholder must
        // not survive next to the confirmed record.
        let local = vec![pending(42)];
        let incoming = vec![confirmed(42, 501)];

        let merged = merge_server_list(local, incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].chat_id(), Some(&ChatId::from(501i64)));
    }

    #[test]
    fn test_server_list_keeps_local_counterpart_id() {
        let mut conv = confirmed(42, 501);
        conv.counterpart_id = Some(UserId::from(7i64));
        let local = vec![conv];

        let merged = merge_server_list(local, vec![confirmed(42, 501)]);
        assert_eq!(merged[0].counterpart_id, Some(UserId::from(7i64)));
    }

    #[test]
    fn test_upsert_pending_never_duplicates() {
        let mut list = Vec::new();
        let idx = upsert_pending(&mut list, pending(42));
        assert_eq!(idx, 0);

        let idx = upsert_pending(&mut list, pending(42));
        assert_eq!(idx, 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_upsert_pending_keeps_confirmed_entry() {
        let mut list = vec![confirmed(42, 501)];
        list[0].unread_count = 3;
        upsert_pending(&mut list, pending(42));

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].chat_id(), Some(&ChatId::from(501i64)));
        assert_eq!(list[0].counterpart_id, Some(UserId::from(7i64)));
        // No mark-read happened, so the counter survives the re-open.
        assert_eq!(list[0].unread_count, 3);
    }

    #[test]
    fn test_reconcile_swaps_pending_for_confirmed() {
        let list = vec![pending(42), confirmed(5, 50)];
        let merged = reconcile_confirmed(list, confirmed(42, 501));

        assert_eq!(merged.len(), 2);
        let entry = merged.iter().find(|c| c.ad_id == AdId::from(42i64)).unwrap();
        assert_eq!(entry.chat_id(), Some(&ChatId::from(501i64)));
        assert!(!merged.iter().any(|c| c.is_pending()));
        // Locally known counterpart survives the swap.
        assert_eq!(entry.counterpart_id, Some(UserId::from(7i64)));
    }

    #[test]
    fn test_reconcile_merges_concurrent_list_discovery() {
        // A concurrent list refresh already delivered chat 501 before the
        // create call resolved; the two records must collapse into one.
        let mut listed = confirmed(42, 501);
        listed.last_message = "Is it available?".into();
        let list = vec![pending(42), listed];

        let merged = reconcile_confirmed(list, confirmed(42, 501));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].chat_id(), Some(&ChatId::from(501i64)));
        assert_eq!(merged[0].last_message, "Is it available?");
    }

    #[test]
    fn test_reconcile_without_pending() {
        let merged = reconcile_confirmed(Vec::new(), confirmed(42, 501));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].chat_id(), Some(&ChatId::from(501i64)));
    }
}
