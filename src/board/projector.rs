use crate::{contestant::Contestant, format::format_finish};

use super::{LeaderboardRow, RowStatus};

/// Builds leaderboard rows from contestants given in registration order.
///
/// Finishers come first, fastest first; equal times keep registration order.
/// Everyone without a time follows, also in registration order.
pub fn project<'a>(contestants: impl IntoIterator<Item = &'a Contestant>) -> Vec<LeaderboardRow> {
    let mut sorted: Vec<&Contestant> = contestants.into_iter().collect();
    sorted.sort_by_key(|c| (c.finish_time.is_none(), c.finish_time));

    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, c)| {
            let finished = c.finish_time.is_some();
            LeaderboardRow {
                rank: finished.then_some(idx + 1),
                id: c.id.clone(),
                name: c.name.clone(),
                phone: c.phone.clone(),
                group: c.group,
                finish_time: c.finish_time,
                time: format_finish(c.finish_time),
                status: if finished {
                    RowStatus::Finished
                } else {
                    RowStatus::InProgress
                },
            }
        })
        .collect()
}
