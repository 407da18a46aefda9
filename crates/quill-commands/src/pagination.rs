//! Page state for the interactive help menu.
//!
//! The controller is pure state: it never talks to Discord. The help command
//! drives it from button presses and renders whatever [`Page`] it returns.

use quill_common::UserId;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Idle time after which a session expires by default.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Why a page turn was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Someone other than the session owner pressed a button.
    #[error("Only the person who opened this menu can turn its pages.")]
    Unauthorized,
    /// The session has already expired.
    #[error("This menu has expired. Run the command again.")]
    Expired,
}

/// One rendered page. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// 1-based page number.
    pub page_number: usize,
    /// Total number of pages, at least 1.
    pub total_pages: usize,
    /// Items on this page.
    pub items: &'a [T],
    /// 1-based index of the first item shown, 0 when there are none.
    pub first_item: usize,
    /// 1-based index of the last item shown, 0 when there are none.
    pub last_item: usize,
    /// Items across all pages.
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// Whether a previous page exists.
    pub const fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// Whether a next page exists.
    pub const fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// "Showing 1-5 of 10 · Page 1/2", or a no-items notice.
    pub fn footer(&self) -> String {
        if self.total_items == 0 {
            return "No items to show".to_string();
        }
        format!(
            "Showing {}-{} of {} · Page {}/{}",
            self.first_item, self.last_item, self.total_items, self.page_number, self.total_pages
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active(usize),
    /// Keeps the page that was showing when the session ended.
    Expired(usize),
}

/// One help-menu session, owned by the user who opened it.
#[derive(Debug, Clone)]
pub struct PaginationController<T> {
    items: Vec<T>,
    per_page: usize,
    owner: UserId,
    state: State,
    created_at: Instant,
    last_activity: Instant,
    expires_after: Duration,
}

impl<T> PaginationController<T> {
    /// Opens a session on page 1. A page size of zero is treated as one.
    pub fn open(items: Vec<T>, per_page: usize, owner: UserId) -> Self {
        let now = Instant::now();
        Self {
            items,
            per_page: per_page.max(1),
            owner,
            state: State::Active(1),
            created_at: now,
            last_activity: now,
            expires_after: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Overrides the idle timeout.
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.expires_after = timeout;
        self
    }

    /// `ceil(items / per_page)`, at least 1.
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page).max(1)
    }

    /// Current page number, `None` once expired.
    pub const fn current_page(&self) -> Option<usize> {
        match self.state {
            State::Active(page) => Some(page),
            State::Expired(_) => None,
        }
    }

    /// The user allowed to turn pages.
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// When the session was opened.
    pub const fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Whether the session has expired.
    pub const fn is_expired(&self) -> bool {
        matches!(self.state, State::Expired(_))
    }

    /// Time left before idle expiry, measured from the last owner interaction.
    pub fn remaining(&self, now: Instant) -> Duration {
        if self.is_expired() {
            return Duration::ZERO;
        }
        self.last_activity
            .checked_add(self.expires_after)
            .map_or(Duration::MAX, |deadline| {
                deadline.saturating_duration_since(now)
            })
    }

    /// Advances one page; a no-op on the last page.
    pub fn next(&mut self, actor: UserId) -> Result<Page<'_, T>, PaginationError> {
        let page = self.authorize(actor)?;
        self.state = State::Active((page + 1).min(self.total_pages()));
        Ok(self.render())
    }

    /// Goes back one page; a no-op on page 1.
    pub fn previous(&mut self, actor: UserId) -> Result<Page<'_, T>, PaginationError> {
        let page = self.authorize(actor)?;
        self.state = State::Active(page.saturating_sub(1).max(1));
        Ok(self.render())
    }

    /// Ends the session. Further turns fail with [`PaginationError::Expired`].
    pub fn expire(&mut self) {
        if let State::Active(page) = self.state {
            self.state = State::Expired(page);
        }
    }

    /// The current page. After expiry this is the last page shown.
    pub fn render(&self) -> Page<'_, T> {
        let (State::Active(page) | State::Expired(page)) = self.state;
        render_page(&self.items, self.per_page, page)
    }

    fn authorize(&mut self, actor: UserId) -> Result<usize, PaginationError> {
        let State::Active(page) = self.state else {
            return Err(PaginationError::Expired);
        };
        if actor != self.owner {
            return Err(PaginationError::Unauthorized);
        }
        self.last_activity = Instant::now();
        Ok(page)
    }
}

/// Slices page `page` (1-based) out of `items`.
pub fn render_page<T>(items: &[T], per_page: usize, page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * per_page).min(items.len());
    let end = (start + per_page).min(items.len());
    let slice = &items[start..end];

    Page {
        page_number: page,
        total_pages,
        items: slice,
        first_item: if slice.is_empty() { 0 } else { start + 1 },
        last_item: end,
        total_items: items.len(),
    }
}
