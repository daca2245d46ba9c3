use std::time::Duration;

use futures_util::{Stream, StreamExt};

use super::normalize::DisplayItem;

/// How long a menu waits for a button press before its buttons are removed.
pub const MENU_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Prev,
    Next,
    Stop,
}

impl Control {
    pub const ALL: [Self; 3] = [Self::Prev, Self::Stop, Self::Next];

    pub fn emoji(self) -> char {
        match self {
            Self::Prev => '⬅',
            Self::Next => '➡',
            Self::Stop => '❌',
        }
    }

    /// Button id, unique to the menu identified by `menu_id`.
    pub fn custom_id(self, menu_id: u64) -> String {
        let suffix = match self {
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Stop => "stop",
        };
        format!("{menu_id}:{suffix}")
    }

    pub fn from_custom_id(custom_id: &str, menu_id: u64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|control| control.custom_id(menu_id) == custom_id)
    }
}

/// Whether a button press belongs to menu `menu_id` and comes from `owner`,
/// the user who opened it.
pub fn accepts_press(custom_id: &str, presser: u64, menu_id: u64, owner: u64) -> bool {
    presser == owner && Control::from_custom_id(custom_id, menu_id).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Idle,
    Showing(usize),
    Expired,
}

/// A set of pages browsed one at a time. Once expired it stays on the last
/// page shown and ignores all controls.
#[derive(Debug)]
pub struct Menu {
    pages: Vec<DisplayItem>,
    state: MenuState,
    last_shown: Option<usize>,
}

impl Menu {
    pub fn new(pages: Vec<DisplayItem>) -> Self {
        Self {
            pages,
            state: MenuState::Idle,
            last_shown: None,
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[cfg(test)]
    pub fn pages(&self) -> &[DisplayItem] {
        &self.pages
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state == MenuState::Expired
    }

    /// The page on screen, which stays put after expiry.
    pub fn current(&self) -> Option<&DisplayItem> {
        self.last_shown.and_then(|page| self.pages.get(page))
    }

    /// First render. Does nothing unless the menu is idle.
    pub fn start(&mut self) -> Option<&DisplayItem> {
        if self.state == MenuState::Idle && !self.pages.is_empty() {
            self.show(0);
        }
        self.current()
    }

    pub fn apply(&mut self, control: Control) -> MenuState {
        if let MenuState::Showing(page) = self.state {
            match control {
                Control::Prev => self.show(page.saturating_sub(1)),
                Control::Next => self.show((page + 1).min(self.pages.len() - 1)),
                Control::Stop => self.expire(),
            }
        }
        self.state
    }

    pub fn expire(&mut self) {
        self.state = MenuState::Expired;
    }

    fn show(&mut self, page: usize) {
        self.state = MenuState::Showing(page);
        self.last_shown = Some(page);
    }
}

/// Waits for the next press, expiring `menu` if none arrives within
/// [`MENU_TIMEOUT`] or the presses run out.
pub async fn next_press<S>(menu: &mut Menu, presses: &mut S) -> Option<S::Item>
where
    S: Stream + Unpin,
{
    if menu.is_expired() {
        return None;
    }
    match tokio::time::timeout(MENU_TIMEOUT, presses.next()).await {
        Ok(Some(press)) => Some(press),
        Ok(None) | Err(_) => {
            menu.expire();
            None
        }
    }
}

pub enum PresentationPlan {
    Single(DisplayItem),
    Paginated(Menu),
}

pub fn present(mut items: Vec<DisplayItem>) -> PresentationPlan {
    if items.len() == 1 {
        PresentationPlan::Single(items.remove(0))
    } else {
        PresentationPlan::Paginated(Menu::new(items))
    }
}
