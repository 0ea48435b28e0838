//! View routing for the dashboard.
//!
//! The UI is a finite set of named views keyed by a stable route string.
//! `Router` holds the single source of truth for the current view; callers
//! navigate by route string or by view value, and unknown routes are
//! rejected rather than silently ignored.

/// The five screens of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Tasks,
    Clients,
    Deliveries,
    Finance,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Tasks,
        View::Clients,
        View::Deliveries,
        View::Finance,
    ];

    /// Stable route string for this view.
    pub fn route(&self) -> &'static str {
        match self {
            View::Dashboard => "/dashboard",
            View::Tasks => "/tarefas",
            View::Clients => "/cadastros",
            View::Deliveries => "/entregas",
            View::Finance => "/financeiro",
        }
    }

    /// Resolve a route string to a view.
    pub fn from_route(route: &str) -> Option<View> {
        View::ALL.iter().copied().find(|v| v.route() == route)
    }

    /// Screen heading.
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard — Visão Geral",
            View::Tasks => "Tarefas",
            View::Clients => "Cadastros",
            View::Deliveries => "Entregas",
            View::Finance => "Financeiro",
        }
    }

    /// Position in the navigation strip, also the numeric hotkey minus one.
    pub fn index(&self) -> usize {
        View::ALL
            .iter()
            .position(|v| v == self)
            .unwrap_or_default()
    }
}

/// Owner of the current view.
#[derive(Debug)]
pub struct Router {
    current: View,
}

impl Router {
    pub fn new(initial: View) -> Self {
        Router { current: initial }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Navigate by route string. Returns false (and stays put) for an
    /// unknown route.
    pub fn navigate(&mut self, route: &str) -> bool {
        match View::from_route(route) {
            Some(view) => {
                self.current = view;
                true
            }
            None => false,
        }
    }

    /// Navigate directly to a view.
    pub fn set(&mut self, view: View) {
        self.current = view;
    }

    /// Cycle to the next view in strip order.
    pub fn next(&mut self) {
        let idx = (self.current.index() + 1) % View::ALL.len();
        self.current = View::ALL[idx];
    }

    /// Cycle to the previous view in strip order.
    pub fn prev(&mut self) {
        let idx = (self.current.index() + View::ALL.len() - 1) % View::ALL.len();
        self.current = View::ALL[idx];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_round_trip() {
        for view in View::ALL {
            assert_eq!(View::from_route(view.route()), Some(view));
        }
    }

    #[test]
    fn test_unknown_route_is_rejected() {
        let mut router = Router::new(View::Dashboard);
        assert!(!router.navigate("/inexistente"));
        assert_eq!(router.current(), View::Dashboard);
        assert!(router.navigate("/tarefas"));
        assert_eq!(router.current(), View::Tasks);
    }

    #[test]
    fn test_cycle_wraps() {
        let mut router = Router::new(View::Finance);
        router.next();
        assert_eq!(router.current(), View::Dashboard);
        router.prev();
        assert_eq!(router.current(), View::Finance);
    }
}
