//! Page navigation state.
//!
//! A [`Navigator`] tracks which page is showing and whether the view is in
//! fullscreen mode. Every transition clamps into `1..=total_pages`, so moving
//! past either end is a no-op rather than an error. Each transition reports
//! whether it changed anything, which tells a caller when to redraw.

/// Keys the paginated view responds to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Escape,
    /// The `f` key, which toggles fullscreen
    Fullscreen,
}

impl Key {
    /// Parses a DOM `KeyboardEvent.key` value
    ///
    /// ```
    /// use page_flow::Key;
    ///
    /// assert_eq!(Key::from_name("ArrowRight"), Some(Key::ArrowRight));
    /// assert_eq!(Key::from_name("Esc"), Some(Key::Escape));
    /// assert_eq!(Key::from_name("q"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "Escape" | "Esc" => Key::Escape,
            "f" | "F" => Key::Fullscreen,
            _ => return None,
        };
        Some(key)
    }
}

/// A navigation request, independent of how it was triggered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    First,
    Last,
    /// Jump to a 1-based page number
    JumpTo(usize),
    ToggleFullscreen,
    ExitFullscreen,
}

impl Action {
    /// The action a key press maps to, if any
    pub fn for_key(key: Key) -> Option<Action> {
        match key {
            Key::ArrowRight | Key::ArrowDown | Key::PageDown => Some(Action::Next),
            Key::ArrowLeft | Key::ArrowUp | Key::PageUp => Some(Action::Previous),
            Key::Home => Some(Action::First),
            Key::End => Some(Action::Last),
            Key::Escape => Some(Action::ExitFullscreen),
            Key::Fullscreen => Some(Action::ToggleFullscreen),
        }
    }
}

/// The current page and the fullscreen flag of a paginated view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    total: usize,
    fullscreen: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Navigator::new(1)
    }
}

impl Navigator {
    /// Starts on the first of `total_pages` pages. A total of zero is treated as one.
    pub fn new(total_pages: usize) -> Navigator {
        Navigator {
            current: 1,
            total: total_pages.max(1),
            fullscreen: false,
        }
    }

    /// The 1-based number of the page being shown
    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> usize {
        self.total
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// Updates the page count after the pages were recomputed, keeping the
    /// current page if it still exists and moving to the last page otherwise
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total = total_pages.max(1);
        if self.current > self.total {
            log::debug!(
                "page {} no longer exists, moving to page {}",
                self.current,
                self.total
            );
            self.current = self.total;
        }
    }

    pub fn next(&mut self) -> bool {
        self.jump_to(self.current.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.jump_to(self.current.saturating_sub(1))
    }

    pub fn first(&mut self) -> bool {
        self.jump_to(1)
    }

    pub fn last(&mut self) -> bool {
        self.jump_to(self.total)
    }

    /// Moves to the given 1-based page, clamped into range
    pub fn jump_to(&mut self, page: usize) -> bool {
        let target = page.clamp(1, self.total);
        if target == self.current {
            return false;
        }
        log::trace!("page {} -> {} of {}", self.current, target, self.total);
        self.current = target;
        true
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        true
    }

    pub fn enter_fullscreen(&mut self) -> bool {
        !std::mem::replace(&mut self.fullscreen, true)
    }

    pub fn exit_fullscreen(&mut self) -> bool {
        std::mem::replace(&mut self.fullscreen, false)
    }

    /// Applies an action, returning whether the state changed
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Next => self.next(),
            Action::Previous => self.previous(),
            Action::First => self.first(),
            Action::Last => self.last(),
            Action::JumpTo(page) => self.jump_to(page),
            Action::ToggleFullscreen => self.toggle_fullscreen(),
            Action::ExitFullscreen => self.exit_fullscreen(),
        }
    }

    /// Handles a key press, returning whether the state changed
    pub fn handle_key(&mut self, key: Key) -> bool {
        match Action::for_key(key) {
            Some(action) => self.apply(action),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_at_both_ends() {
        let mut nav = Navigator::new(3);
        assert!(!nav.previous());
        assert_eq!(nav.current_page(), 1);
        assert!(nav.next());
        assert!(nav.next());
        assert!(nav.is_last());
        assert!(!nav.next());
        assert_eq!(nav.current_page(), 3);
    }

    #[test]
    fn jumps_are_clamped() {
        let mut nav = Navigator::new(5);
        assert!(nav.jump_to(4));
        assert_eq!(nav.current_page(), 4);
        assert!(nav.jump_to(99));
        assert_eq!(nav.current_page(), 5);
        assert!(nav.jump_to(0));
        assert_eq!(nav.current_page(), 1);
        assert!(!nav.jump_to(1));
    }

    #[test]
    fn first_and_last() {
        let mut nav = Navigator::new(4);
        assert!(nav.last());
        assert_eq!(nav.current_page(), 4);
        assert!(nav.first());
        assert!(nav.is_first());
    }

    #[test]
    fn zero_pages_is_one_page() {
        let mut nav = Navigator::new(0);
        assert_eq!(nav.total_pages(), 1);
        assert!(!nav.next());
        assert!(!nav.previous());
    }

    #[test]
    fn shrinking_reclamps_current_page() {
        let mut nav = Navigator::new(10);
        nav.jump_to(8);
        nav.set_total_pages(12);
        assert_eq!(nav.current_page(), 8);
        nav.set_total_pages(3);
        assert_eq!(nav.current_page(), 3);
        nav.set_total_pages(0);
        assert_eq!(nav.current_page(), 1);
    }

    #[test]
    fn fullscreen_is_independent_of_page() {
        let mut nav = Navigator::new(3);
        nav.jump_to(2);
        assert!(nav.handle_key(Key::Fullscreen));
        assert!(nav.is_fullscreen());
        assert_eq!(nav.current_page(), 2);
        assert!(nav.handle_key(Key::Escape));
        assert!(!nav.is_fullscreen());
        assert!(!nav.handle_key(Key::Escape));
        assert!(nav.enter_fullscreen());
        assert!(!nav.enter_fullscreen());
    }

    #[test]
    fn keys_drive_transitions() {
        let mut nav = Navigator::new(3);
        assert!(nav.handle_key(Key::ArrowRight));
        assert!(nav.handle_key(Key::PageDown));
        assert!(!nav.handle_key(Key::ArrowDown));
        assert!(nav.handle_key(Key::Home));
        assert_eq!(nav.current_page(), 1);
        assert!(nav.handle_key(Key::End));
        assert_eq!(nav.current_page(), 3);
        assert!(nav.handle_key(Key::ArrowLeft));
        assert!(nav.handle_key(Key::ArrowUp));
        assert!(!nav.handle_key(Key::PageUp));
    }
}
