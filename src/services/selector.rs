use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::{Result, RotatorError};
use crate::storage::{Banner, BannerId, Counter, GroupId, SlotId, Storage};

/// UCB bandit selector over the rotation counters.
///
/// Stateless between calls; everything it knows lives in the store. The
/// read and the show-record are two separate store operations on purpose:
/// two concurrent picks for one key may both score against the same
/// counters and pick the same banner, which only nudges exploration a
/// little. Locking the whole pick would serialize all traffic on a slot.
pub struct BannerSelector {
    storage: Arc<dyn Storage>,
}

impl BannerSelector {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Picks the banner to show next for (slot, group), records the show
    /// and returns the banner.
    ///
    /// Fails with `NoCandidates` when the slot has no rotation entries or
    /// the group has no counters for them.
    #[instrument(skip(self))]
    pub async fn pick(&self, slot_id: SlotId, group_id: GroupId) -> Result<Banner> {
        let banner_ids = self.storage.banners_for_slot(slot_id).await?;
        if banner_ids.is_empty() {
            return Err(RotatorError::no_candidates(format!(
                "no banners in rotation for slot {}",
                slot_id
            )));
        }

        let counters = self.storage.get_counters(slot_id, group_id, &banner_ids).await?;
        let chosen = choose_ucb(&counters).ok_or_else(|| {
            RotatorError::no_candidates(format!(
                "no counters for slot {} / group {}",
                slot_id, group_id
            ))
        })?;

        self.storage.increment_show(chosen, slot_id, group_id).await?;
        debug!(
            "selected banner {} for slot {} / group {}",
            chosen, slot_id, group_id
        );

        match self.storage.get_banner(chosen).await? {
            Some(banner) => Ok(banner),
            None => Err(RotatorError::not_found(format!(
                "banner {} missing from catalog",
                chosen
            ))),
        }
    }

    /// 点击回传，转发给计数器存储
    pub async fn record_click(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        group_id: GroupId,
    ) -> Result<()> {
        self.storage.increment_click(banner_id, slot_id, group_id).await
    }
}

/// UCB1 choice over one (slot, group) counter set.
///
/// A banner that was never shown wins outright, first in counter order.
/// Otherwise every banner is scored as observed click rate plus an
/// uncertainty bonus, with the total computed once before the loop:
///
/// ```text
/// score = clicks/shows + sqrt(2 * ln(total_shows) / shows)
/// ```
///
/// The running best is replaced only on a strictly greater score, so
/// exact ties go to the earliest counter. `counters` must already be in
/// the store's deterministic (ascending banner id) order.
fn choose_ucb(counters: &[Counter]) -> Option<BannerId> {
    if counters.is_empty() {
        return None;
    }

    if let Some(cold) = counters.iter().find(|c| c.shows == 0) {
        return Some(cold.banner_id);
    }

    let total_shows: u64 = counters.iter().map(|c| c.shows).sum();
    if total_shows == 0 {
        // 理论上到不了：上面已兜住 shows == 0 的情况
        return None;
    }
    let ln_total = (total_shows as f64).ln();

    let mut best = &counters[0];
    let mut best_score = ucb_score(best, ln_total);
    for counter in &counters[1..] {
        let score = ucb_score(counter, ln_total);
        if score > best_score {
            best = counter;
            best_score = score;
        }
    }
    Some(best.banner_id)
}

fn ucb_score(counter: &Counter, ln_total: f64) -> f64 {
    let shows = counter.shows as f64;
    counter.clicks as f64 / shows + (2.0 * ln_total / shows).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(banner_id: BannerId, shows: u64, clicks: u64) -> Counter {
        Counter {
            banner_id,
            slot_id: 1,
            group_id: 1,
            shows,
            clicks,
        }
    }

    #[test]
    fn cold_start_picks_first_unshown() {
        let counters: Vec<Counter> = (1..=5).map(|id| counter(id, 0, 0)).collect();
        assert_eq!(choose_ucb(&counters), Some(1));
    }

    #[test]
    fn unshown_banner_beats_shown_ones() {
        let counters = vec![
            counter(1, 1, 0),
            counter(2, 0, 0),
            counter(3, 0, 0),
            counter(4, 0, 0),
            counter(5, 0, 0),
        ];
        assert_eq!(choose_ucb(&counters), Some(2));
    }

    #[test]
    fn clicks_win_at_equal_shows() {
        let counters = vec![
            counter(1, 10, 0),
            counter(2, 10, 3),
            counter(3, 10, 0),
            counter(4, 10, 0),
            counter(5, 10, 0),
        ];
        assert_eq!(choose_ucb(&counters), Some(2));
    }

    #[test]
    fn fewer_shows_win_at_equal_clicks() {
        let counters = vec![
            counter(1, 10, 3),
            counter(2, 10, 3),
            counter(3, 10, 3),
            counter(4, 10, 3),
            counter(5, 9, 3),
        ];
        assert_eq!(choose_ucb(&counters), Some(5));
    }

    #[test]
    fn exact_ties_go_to_first_counter() {
        let counters = vec![counter(1, 10, 2), counter(2, 10, 2), counter(3, 10, 2)];
        assert_eq!(choose_ucb(&counters), Some(1));
    }

    #[test]
    fn single_candidate_is_always_chosen() {
        let counters = vec![counter(7, 42, 1)];
        assert_eq!(choose_ucb(&counters), Some(7));
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(choose_ucb(&[]), None);
    }
}
