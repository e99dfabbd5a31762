use crate::location::display_name;

pub const TUTORIAL_TITLE: &str = "SAMPLE / TUTORIAL";
pub const STOPPED_LABEL: &str = "(STOPPED)";

/// What is open and whether it may be played.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_file: Option<String>,
    pub tutorial_mode: bool,
    pub compiled_without_errors: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_file_open(&self) -> bool {
        self.tutorial_mode || self.current_file.is_some()
    }

    pub fn can_play(&self) -> bool {
        self.is_file_open() && self.compiled_without_errors
    }
}

/// Which parts of the interface should be shown for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// `"<file> > <node>"`, or `None` when nothing is open.
    pub title: Option<String>,
    pub work_area_visible: bool,
    pub sidebar_visible: bool,
    pub compile_readout_visible: bool,
    pub play_button_visible: bool,
}

impl SessionView {
    pub fn new(state: &SessionState, running: bool, current_node: Option<&str>) -> Self {
        let open = state.is_file_open();

        let title = open.then(|| {
            let file = if state.tutorial_mode {
                TUTORIAL_TITLE.to_string()
            } else {
                state.current_file.as_deref().map(display_name).unwrap_or_default()
            };
            let node = current_node
                .filter(|n| running && !n.is_empty())
                .unwrap_or(STOPPED_LABEL);
            format!("{file} > {node}")
        });

        Self {
            title,
            work_area_visible: open,
            sidebar_visible: !open,
            compile_readout_visible: open && !running,
            play_button_visible: state.can_play(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_open_shows_sidebar_only() {
        let view = SessionView::new(&SessionState::new(), false, None);
        assert_eq!(
            view,
            SessionView {
                title: None,
                work_area_visible: false,
                sidebar_visible: true,
                compile_readout_visible: false,
                play_button_visible: false,
            }
        );
    }

    #[test]
    fn test_open_file_stopped() {
        let state = SessionState {
            current_file: Some("file:///stories/My%20Quest.yarn.txt".to_string()),
            tutorial_mode: false,
            compiled_without_errors: false,
        };
        let view = SessionView::new(&state, false, None);

        assert_eq!(view.title.as_deref(), Some("My Quest.yarn > (STOPPED)"));
        assert!(view.work_area_visible);
        assert!(!view.sidebar_visible);
        assert!(view.compile_readout_visible);
        assert!(!view.play_button_visible);
    }

    #[test]
    fn test_running_hides_compile_readout() {
        let state = SessionState {
            current_file: Some("a.yarn".to_string()),
            tutorial_mode: false,
            compiled_without_errors: true,
        };
        let view = SessionView::new(&state, true, Some("Start"));

        assert_eq!(view.title.as_deref(), Some("a > Start"));
        assert!(!view.compile_readout_visible);
        assert!(view.play_button_visible);
    }

    #[test]
    fn test_tutorial_title() {
        let state = SessionState {
            current_file: None,
            tutorial_mode: true,
            compiled_without_errors: true,
        };
        let view = SessionView::new(&state, false, Some("Stale"));
        assert_eq!(view.title.as_deref(), Some("SAMPLE / TUTORIAL > (STOPPED)"));
    }

    #[test]
    fn test_can_play_needs_open_file() {
        let state = SessionState {
            compiled_without_errors: true,
            ..SessionState::default()
        };
        assert!(!state.can_play());
    }
}
