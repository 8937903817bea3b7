//! Merge of a canonical pull into the local feed.

use chrono::Duration;

use crate::models::WishRecord;

/// What one merge changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Provisional records replaced by their confirmed copy
    pub reconciled: usize,
    /// Canonical records new to the feed
    pub inserted: usize,
    /// Canonical records already present by id
    pub unchanged: usize,
}

impl PollSummary {
    /// Whether the merge altered the feed
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.reconciled > 0 || self.inserted > 0
    }
}

fn closest_provisional(
    records: &[WishRecord],
    claimed: &[usize],
    incoming: &WishRecord,
    tolerance: Duration,
) -> Option<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(index, existing)| {
            existing.is_provisional()
                && !claimed.contains(index)
                && existing.same_submission(incoming, tolerance)
        })
        .min_by_key(|(_, existing)| existing.time_distance(incoming))
        .map(|(index, _)| index)
}

/// Merge `canonical` (most recent first) into `records`.
///
/// The closest unreconciled provisional record with the same text within
/// `tolerance` is replaced in place by the canonical one; an older copy of
/// that canonical record is then removed. Otherwise a canonical record known
/// by id is left alone, and anything left is inserted in front of the first
/// record that is strictly older, which keeps unmatched provisional records
/// where they are.
pub fn reconcile(
    records: &mut Vec<WishRecord>,
    canonical: Vec<WishRecord>,
    tolerance: Duration,
) -> PollSummary {
    let mut summary = PollSummary::default();
    // Positions already reconciled during this merge; a second canonical
    // twin must not claim the same provisional slot.
    let mut claimed: Vec<usize> = Vec::new();

    for incoming in canonical {
        let matched = closest_provisional(records, &claimed, &incoming, tolerance);
        let known = records.iter().position(|existing| existing.id == incoming.id);

        match (matched, known) {
            (Some(index), known) => {
                tracing::debug!(
                    "Reconciled provisional wish {} as {}",
                    records[index].id,
                    incoming.id
                );
                records[index] = incoming;
                claimed.push(index);
                // The same wish may already be listed by id when a poll ran
                // while its submission was still in flight.
                if let Some(duplicate) = known {
                    records.remove(duplicate);
                    for slot in &mut claimed {
                        if *slot > duplicate {
                            *slot -= 1;
                        }
                    }
                }
                summary.reconciled += 1;
            }
            (None, Some(_)) => summary.unchanged += 1,
            (None, None) => {
                let position = records
                    .iter()
                    .position(|existing| existing.created_at < incoming.created_at)
                    .unwrap_or(records.len());
                records.insert(position, incoming);
                for slot in &mut claimed {
                    if *slot >= position {
                        *slot += 1;
                    }
                }
                summary.inserted += 1;
            }
        }
    }

    summary
}
