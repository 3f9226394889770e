//! Leaderboard filters and ranking.
//!
//! Stores return at most `limit` [`LeaderboardStanding`] rows that match the
//! search term, chosen by [`compare_standings`]. [`rank`] reapplies that
//! ordering and assigns positions so every adapter ranks identically.

use std::cmp::Ordering;

use super::{BadgeAward, UserId};

/// Rows returned when no limit is supplied.
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 50;
/// Largest page a caller may request.
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

/// Column the leaderboard is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardOrder {
    #[default]
    Points,
    Username,
    BadgesCount,
}

impl LeaderboardOrder {
    /// Parse a query value, falling back to [`LeaderboardOrder::Points`].
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("username") => Self::Username,
            Some("badges_count") => Self::BadgesCount,
            _ => Self::Points,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Username => "username",
            Self::BadgesCount => "badges_count",
        }
    }
}

/// Sort direction applied to the primary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a query value case-insensitively, falling back to descending.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Effective leaderboard filters after defaults and clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRequest {
    search: Option<String>,
    order_by: LeaderboardOrder,
    direction: SortDirection,
    limit: u32,
}

impl Default for LeaderboardRequest {
    fn default() -> Self {
        Self {
            search: None,
            order_by: LeaderboardOrder::default(),
            direction: SortDirection::default(),
            limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

impl LeaderboardRequest {
    /// Build a request; blank searches are dropped and `limit` is clamped to
    /// `1..=MAX_LEADERBOARD_LIMIT`.
    ///
    /// # Examples
    /// ```
    /// use habits_backend::domain::{LeaderboardOrder, LeaderboardRequest, SortDirection};
    ///
    /// let request = LeaderboardRequest::new(
    ///     Some("  "),
    ///     LeaderboardOrder::Points,
    ///     SortDirection::Desc,
    ///     Some(500),
    /// );
    /// assert_eq!(request.search(), None);
    /// assert_eq!(request.limit(), 100);
    /// ```
    pub fn new(
        search: Option<&str>,
        order_by: LeaderboardOrder,
        direction: SortDirection,
        limit: Option<i64>,
    ) -> Self {
        let search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_owned);
        let limit = limit.map_or(DEFAULT_LEADERBOARD_LIMIT, |raw| {
            let clamped = raw.clamp(1, i64::from(MAX_LEADERBOARD_LIMIT));
            u32::try_from(clamped).unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        });
        Self {
            search,
            order_by,
            direction,
            limit,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub const fn order_by(&self) -> LeaderboardOrder {
        self.order_by
    }

    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Case-insensitive substring match against the search term.
    pub fn matches(&self, username: &str) -> bool {
        self.search.as_deref().is_none_or(|term| {
            username
                .to_lowercase()
                .contains(term.to_lowercase().as_str())
        })
    }
}

/// A user's aggregate standing before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardStanding {
    pub user_id: UserId,
    pub username: String,
    pub points: u32,
    pub completions_count: u64,
    /// Held badges, newest award first.
    pub badges: Vec<BadgeAward>,
}

impl LeaderboardStanding {
    pub fn badges_count(&self) -> u64 {
        self.badges.len() as u64
    }
}

/// A ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// One-based position in the returned page.
    pub position: u32,
    pub standing: LeaderboardStanding,
}

/// Leaderboard page plus the filters that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub request: LeaderboardRequest,
    pub entries: Vec<LeaderboardEntry>,
}

fn primary_ordering(
    order_by: LeaderboardOrder,
    left: &LeaderboardStanding,
    right: &LeaderboardStanding,
) -> Ordering {
    match order_by {
        LeaderboardOrder::Points => left.points.cmp(&right.points),
        LeaderboardOrder::Username => left.username.cmp(&right.username),
        LeaderboardOrder::BadgesCount => left.badges_count().cmp(&right.badges_count()),
    }
}

/// Leaderboard ordering for `request`.
///
/// The direction applies to the primary column only; ties always fall back
/// to ascending username and then id so pages are stable.
pub fn compare_standings(
    request: &LeaderboardRequest,
    left: &LeaderboardStanding,
    right: &LeaderboardStanding,
) -> Ordering {
    let primary = primary_ordering(request.order_by(), left, right);
    let primary = match request.direction() {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary
        .then_with(|| left.username.cmp(&right.username))
        .then_with(|| left.user_id.cmp(&right.user_id))
}

/// Order, truncate, and number the standings.
pub fn rank(
    mut standings: Vec<LeaderboardStanding>,
    request: &LeaderboardRequest,
) -> Vec<LeaderboardEntry> {
    standings.sort_by(|left, right| compare_standings(request, left, right));

    standings
        .into_iter()
        .take(request.limit() as usize)
        .zip(1_u32..)
        .map(|(standing, position)| LeaderboardEntry { position, standing })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn standing(username: &str, points: u32, badges: usize) -> LeaderboardStanding {
        use chrono::{TimeZone, Utc};

        use crate::domain::{Badge, BadgeId, BadgeName};

        let badges = (0..badges)
            .map(|index| BadgeAward {
                badge: Badge {
                    id: BadgeId::random(),
                    name: BadgeName::new(format!("Badge {index}")).expect("badge name"),
                    description: String::new(),
                    points_threshold: 0,
                },
                awarded_date: Utc.timestamp_opt(1_700_000_000, 0).single().expect("timestamp"),
            })
            .collect();
        LeaderboardStanding {
            user_id: UserId::random(),
            username: username.to_owned(),
            points,
            completions_count: 0,
            badges,
        }
    }

    #[fixture]
    fn standings() -> Vec<LeaderboardStanding> {
        vec![
            standing("carol", 50, 1),
            standing("alice", 120, 2),
            standing("bob", 120, 3),
            standing("dave", 0, 0),
        ]
    }

    fn usernames(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries
            .iter()
            .map(|entry| entry.standing.username.as_str())
            .collect()
    }

    #[rstest]
    fn default_order_is_points_descending_with_username_tie_break(
        standings: Vec<LeaderboardStanding>,
    ) {
        let entries = rank(standings, &LeaderboardRequest::default());
        assert_eq!(usernames(&entries), vec!["alice", "bob", "carol", "dave"]);
        let positions: Vec<u32> = entries.iter().map(|entry| entry.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn orders_by_badges_ascending(standings: Vec<LeaderboardStanding>) {
        let request = LeaderboardRequest::new(
            None,
            LeaderboardOrder::BadgesCount,
            SortDirection::Asc,
            None,
        );
        let entries = rank(standings, &request);
        assert_eq!(usernames(&entries), vec!["dave", "carol", "alice", "bob"]);
    }

    #[rstest]
    fn limit_truncates_after_sorting(standings: Vec<LeaderboardStanding>) {
        let request = LeaderboardRequest::new(
            None,
            LeaderboardOrder::Username,
            SortDirection::Desc,
            Some(2),
        );
        let entries = rank(standings, &request);
        assert_eq!(usernames(&entries), vec!["dave", "carol"]);
    }

    #[rstest]
    #[case(None, DEFAULT_LEADERBOARD_LIMIT)]
    #[case(Some(0), 1)]
    #[case(Some(-7), 1)]
    #[case(Some(25), 25)]
    #[case(Some(1_000), MAX_LEADERBOARD_LIMIT)]
    fn limit_is_clamped(#[case] raw: Option<i64>, #[case] expected: u32) {
        let request = LeaderboardRequest::new(
            None,
            LeaderboardOrder::Points,
            SortDirection::Desc,
            raw,
        );
        assert_eq!(request.limit(), expected);
    }

    #[rstest]
    #[case(None, LeaderboardOrder::Points)]
    #[case(Some("USERNAME"), LeaderboardOrder::Username)]
    #[case(Some("badges_count"), LeaderboardOrder::BadgesCount)]
    #[case(Some("created_at; drop table users"), LeaderboardOrder::Points)]
    fn order_falls_back_to_points(#[case] raw: Option<&str>, #[case] expected: LeaderboardOrder) {
        assert_eq!(LeaderboardOrder::parse_lenient(raw), expected);
    }

    #[rstest]
    #[case(Some("ASC"), SortDirection::Asc)]
    #[case(Some("sideways"), SortDirection::Desc)]
    #[case(None, SortDirection::Desc)]
    fn direction_falls_back_to_desc(#[case] raw: Option<&str>, #[case] expected: SortDirection) {
        assert_eq!(SortDirection::parse_lenient(raw), expected);
    }

    #[rstest]
    fn search_is_case_insensitive_substring() {
        let request = LeaderboardRequest::new(
            Some("LIC"),
            LeaderboardOrder::Points,
            SortDirection::Desc,
            None,
        );
        assert!(request.matches("alice"));
        assert!(!request.matches("bob"));
        assert!(LeaderboardRequest::default().matches("anyone"));
    }
}
