use tokio::sync::watch;

use crate::data_interface::{Classification, FaultStatus};
use crate::filter::state::FilterState;

/// Owns the filter selections and publishes a complete snapshot after every
/// mutation.
///
/// Consumers hold a `watch::Receiver` and only ever see immutable
/// snapshots; the channel is seeded with the default state so a subscriber
/// observes the initial value without waiting for a change. There is no
/// debouncing.
pub struct FilterPanel {
    state: FilterState,
    expanded: bool,
    tx: watch::Sender<FilterState>,
}

impl FilterPanel {
    pub fn new() -> Self {
        let state = FilterState::default();
        let (tx, _rx) = watch::channel(state.clone());
        Self {
            state,
            expanded: false,
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }

    /// Collapse state is purely presentational and does not notify.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Adds the classification if absent, removes it if present.
    pub fn toggle_classification(&mut self, classification: Classification) {
        toggle(&mut self.state.classifications, classification);
        self.publish();
    }

    /// Adds the status if absent, removes it if present.
    pub fn toggle_status(&mut self, status: FaultStatus) {
        toggle(&mut self.state.statuses, status);
        self.publish();
    }

    pub fn set_structures_visible(&mut self, visible: bool) {
        self.state.show_structures = visible;
        self.publish();
    }

    pub fn set_faults_visible(&mut self, visible: bool) {
        self.state.show_faults = visible;
        self.publish();
    }

    /// Resets every field to its default and notifies once.
    pub fn clear_all(&mut self) {
        self.state = FilterState::default();
        self.publish();
    }

    fn publish(&self) {
        self.tx.send_replace(self.state.clone());
    }
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn toggle<T: PartialEq>(selection: &mut Vec<T>, value: T) {
    if let Some(pos) = selection.iter().position(|existing| *existing == value) {
        selection.remove(pos);
    } else {
        selection.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_sees_initial_default_state() {
        let panel = FilterPanel::new();
        let rx = panel.subscribe();
        assert_eq!(*rx.borrow(), FilterState::default());
    }

    #[test]
    fn every_mutation_publishes_a_full_snapshot() {
        let mut panel = FilterPanel::new();
        let mut rx = panel.subscribe();

        panel.toggle_classification(Classification::Alta);
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().classifications,
            vec![Classification::Alta]
        );

        panel.set_faults_visible(true);
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert!(snapshot.show_faults);
        assert_eq!(snapshot.classifications, vec![Classification::Alta]);
    }

    #[test]
    fn toggling_twice_removes_the_selection() {
        let mut panel = FilterPanel::new();
        panel.toggle_status(FaultStatus::Abierta);
        panel.toggle_status(FaultStatus::EnAtencion);
        panel.toggle_status(FaultStatus::Abierta);
        assert_eq!(panel.state().statuses, vec![FaultStatus::EnAtencion]);
        assert_eq!(panel.active_filter_count(), 1);
    }

    #[test]
    fn clear_all_restores_defaults_from_any_state() {
        let mut panel = FilterPanel::new();
        panel.toggle_classification(Classification::Alta);
        panel.toggle_classification(Classification::Baja);
        panel.toggle_status(FaultStatus::Cerrada);
        panel.set_structures_visible(true);
        panel.set_faults_visible(true);

        panel.clear_all();
        assert_eq!(*panel.state(), FilterState::default());
        assert_eq!(panel.active_filter_count(), 0);
    }

    #[test]
    fn expand_collapse_does_not_notify() {
        let mut panel = FilterPanel::new();
        let rx = panel.subscribe();
        panel.toggle_expanded();
        assert!(panel.is_expanded());
        assert!(!rx.has_changed().unwrap());
        panel.toggle_expanded();
        assert!(!panel.is_expanded());
    }
}
