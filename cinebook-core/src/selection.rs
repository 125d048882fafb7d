//! Seat selection controller.
//!
//! Selection state lives here, not on the layout: re-rendering a layout never
//! changes which seats are selected.
use crate::draft::{SelectedSeat, sum_prices};
use crate::seat::{Seat, SeatLayout, SeatStatus};

/// Result of a seat click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// The selection is at its cap; nothing changed.
    LimitReached { cap: usize },
    /// Occupied or blocked seats cannot be toggled; nothing changed.
    Unavailable(SeatStatus),
    /// The id is not part of the current layout; nothing changed.
    UnknownSeat,
}

impl ToggleOutcome {
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Selected | Self::Deselected)
    }
}

/// Ordered, duplicate-free list of selected seats with a hard maximum and an
/// optional ticket-count target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSelection {
    seats: Vec<SelectedSeat>,
    max_seats: usize,
    target: Option<usize>,
}

impl SeatSelection {
    #[must_use]
    pub fn new(max_seats: usize) -> Self {
        Self {
            seats: Vec::new(),
            max_seats: max_seats.max(1),
            target: None,
        }
    }

    /// Restore a selection, dropping repeated ids and anything past the maximum.
    #[must_use]
    pub fn from_seats(seats: impl IntoIterator<Item = SelectedSeat>, max_seats: usize) -> Self {
        let mut selection = Self::new(max_seats);
        for seat in seats {
            if selection.seats.len() >= selection.max_seats {
                break;
            }
            if !selection.contains(&seat.id) {
                selection.seats.push(seat);
            }
        }
        selection
    }

    #[must_use]
    pub const fn max_seats(&self) -> usize {
        self.max_seats
    }

    #[must_use]
    pub const fn target(&self) -> Option<usize> {
        self.target
    }

    /// Effective cap: the ticket-count target when one is set, else the maximum.
    #[must_use]
    pub fn cap(&self) -> usize {
        self.target.map_or(self.max_seats, |t| t.min(self.max_seats))
    }

    #[must_use]
    pub fn seats(&self) -> &[SelectedSeat] {
        &self.seats
    }

    #[must_use]
    pub fn into_seats(self) -> Vec<SelectedSeat> {
        self.seats
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.seats.iter().map(|seat| seat.id.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    #[must_use]
    pub fn contains(&self, seat_id: &str) -> bool {
        self.seats.iter().any(|seat| seat.id == seat_id)
    }

    /// Sum of selected seat prices, always derived from the list.
    #[must_use]
    pub fn total(&self) -> i64 {
        sum_prices(&self.seats)
    }

    /// Seats still to pick before the ticket-count target is met.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.target
            .map_or(0, |target| target.saturating_sub(self.seats.len()))
    }

    /// Select or deselect a seat. Deselecting is always allowed, even at the cap.
    pub fn toggle(&mut self, seat: &Seat) -> ToggleOutcome {
        if seat.status != SeatStatus::Available {
            return ToggleOutcome::Unavailable(seat.status);
        }
        if let Some(pos) = self.seats.iter().position(|s| s.id == seat.id) {
            self.seats.remove(pos);
            return ToggleOutcome::Deselected;
        }
        let cap = self.cap();
        if self.seats.len() >= cap {
            return ToggleOutcome::LimitReached { cap };
        }
        self.seats.push(SelectedSeat::from(seat));
        ToggleOutcome::Selected
    }

    /// Toggle a seat by id within a layout.
    pub fn toggle_in(&mut self, layout: &SeatLayout, seat_id: &str) -> ToggleOutcome {
        match layout.find(seat_id) {
            Some(seat) => self.toggle(seat),
            None => ToggleOutcome::UnknownSeat,
        }
    }

    /// Toggle several seats in order, reporting each outcome.
    pub fn toggle_many<'a, I>(&mut self, layout: &SeatLayout, seat_ids: I) -> Vec<(String, ToggleOutcome)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        seat_ids
            .into_iter()
            .map(|id| (id.to_string(), self.toggle_in(layout, id)))
            .collect()
    }

    /// Set the ticket-count target, clamped to `[1, max]`. A lower count keeps
    /// the earliest-selected seats and drops the rest.
    pub fn set_seat_count(&mut self, count: usize) -> usize {
        let count = count.clamp(1, self.max_seats);
        self.target = Some(count);
        self.seats.truncate(count);
        count
    }

    pub fn clear(&mut self) {
        self.seats.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PriceBands, SeatBanding};
    use crate::seat::{Inventory, LayoutSpec, generate_layout};

    fn layout_with(inventory: &Inventory) -> SeatLayout {
        generate_layout(
            &LayoutSpec::grid(10, 10),
            &SeatBanding::default(),
            &PriceBands::default(),
            inventory,
            &SeatSelection::new(8),
        )
    }

    fn layout() -> SeatLayout {
        layout_with(&Inventory::default())
    }

    #[test]
    fn toggle_twice_removes_and_third_time_reselects() {
        let layout = layout();
        let mut selection = SeatSelection::new(8);
        assert_eq!(selection.toggle_in(&layout, "B7"), ToggleOutcome::Selected);
        assert_eq!(selection.toggle_in(&layout, "B7"), ToggleOutcome::Deselected);
        assert!(selection.is_empty());
        assert_eq!(selection.toggle_in(&layout, "B7"), ToggleOutcome::Selected);
        assert_eq!(selection.ids(), vec!["B7"]);
    }

    #[test]
    fn ninth_seat_is_rejected_at_max_of_eight() {
        let layout = layout();
        let mut selection = SeatSelection::new(8);
        let ids = ["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9"];
        let outcomes = selection.toggle_many(&layout, ids);
        assert!(outcomes[..8].iter().all(|(_, o)| *o == ToggleOutcome::Selected));
        assert_eq!(outcomes[8], ("A9".to_string(), ToggleOutcome::LimitReached { cap: 8 }));
        assert_eq!(selection.len(), 8);
        assert!(!selection.contains("A9"));

        assert_eq!(selection.toggle_in(&layout, "A3"), ToggleOutcome::Deselected);
        assert_eq!(selection.len(), 7);
    }

    #[test]
    fn occupied_and_blocked_seats_are_inert() {
        let mut inventory = Inventory::with_occupied(["C5"]);
        inventory.blocked.insert("C6".to_string());
        let layout = layout_with(&inventory);
        let mut selection = SeatSelection::new(8);
        assert_eq!(
            selection.toggle_in(&layout, "C5"),
            ToggleOutcome::Unavailable(SeatStatus::Occupied)
        );
        assert_eq!(
            selection.toggle_in(&layout, "C6"),
            ToggleOutcome::Unavailable(SeatStatus::Blocked)
        );
        assert_eq!(selection.toggle_in(&layout, "Z99"), ToggleOutcome::UnknownSeat);
        assert!(selection.is_empty());
    }

    #[test]
    fn total_tracks_every_mutation() {
        let layout = layout();
        let mut selection = SeatSelection::new(8);
        let steps = ["A1", "D1", "H1", "D1", "A2"];
        for id in steps {
            selection.toggle_in(&layout, id);
            let expected: i64 = selection.seats().iter().map(|s| s.price).sum();
            assert_eq!(selection.total(), expected);
        }
        assert_eq!(selection.total(), 250 + 450 + 250);
        selection.clear();
        assert_eq!(selection.total(), 0);
    }

    #[test]
    fn lowering_seat_count_keeps_earliest_selected() {
        let layout = layout();
        let mut selection = SeatSelection::new(8);
        selection.toggle_many(&layout, ["E4", "A1", "J10", "C2", "B3"]);
        assert_eq!(selection.set_seat_count(3), 3);
        assert_eq!(selection.ids(), vec!["E4", "A1", "J10"]);
        assert_eq!(selection.total(), 350 + 250 + 450);
    }

    #[test]
    fn seat_count_is_clamped_and_caps_toggles() {
        let layout = layout();
        let mut selection = SeatSelection::new(8);
        assert_eq!(selection.set_seat_count(0), 1);
        assert_eq!(selection.set_seat_count(42), 8);
        selection.set_seat_count(2);
        selection.toggle_in(&layout, "A1");
        assert_eq!(selection.remaining(), 1);
        selection.toggle_in(&layout, "A2");
        assert_eq!(
            selection.toggle_in(&layout, "A3"),
            ToggleOutcome::LimitReached { cap: 2 }
        );
        assert_eq!(selection.remaining(), 0);
    }

    #[test]
    fn restoring_drops_duplicates_and_overflow() {
        let layout = layout();
        let a1 = SelectedSeat::from(layout.find("A1").unwrap());
        let a2 = SelectedSeat::from(layout.find("A2").unwrap());
        let selection = SeatSelection::from_seats(vec![a1.clone(), a1, a2], 8);
        assert_eq!(selection.ids(), vec!["A1", "A2"]);
    }
}
