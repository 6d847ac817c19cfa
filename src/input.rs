// Pointer-to-cell resolution and the press/release button state machine
// A reveal only commits when press and release land on the same cell;
// dragging off the cell before release cancels it.

use crate::field::{Minefield, Reveal};

/// Presentational state of one cell button, recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Up,
    Down,
    Hover,
}

/// Maps terminal (column, row) positions onto grid cells. Each cell owns a
/// fixed-size rectangle of `cell_cols` x `cell_rows` screen cells starting at
/// `origin`. Upper bounds are exclusive, so touching rectangles never share a
/// boundary position.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub origin: (u16, u16),
    pub cell_cols: u16,
    pub cell_rows: u16,
    pub width: i32,
    pub height: i32,
}

impl GridLayout {
    /// The grid cell under a screen position, if any.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<(i32, i32)> {
        if column < self.origin.0 || row < self.origin.1 {
            return None;
        }
        let x = ((column - self.origin.0) / self.cell_cols) as i32;
        let y = ((row - self.origin.1) / self.cell_rows) as i32;
        (x < self.width && y < self.height).then_some((x, y))
    }
}

/// One press/release cycle: Idle, or primary button held with an optional
/// committed candidate cell. A press on a flagged cell is absorbed (the
/// button goes down with no candidate), so releasing over it reveals nothing.
pub struct InputResolver {
    layout: GridLayout,
    primary_down: bool,
    pending: Option<(i32, i32)>,
}

impl InputResolver {
    pub fn new(layout: GridLayout) -> Self {
        InputResolver {
            layout,
            primary_down: false,
            pending: None,
        }
    }

    /// Re-anchor the grid on screen, e.g. after the terminal is resized.
    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
    }

    /// Primary button went down. Records the unflagged cell under the pointer
    /// as the reveal candidate.
    pub fn press(&mut self, column: u16, row: u16, field: &Minefield) {
        self.primary_down = true;
        self.pending = self
            .layout
            .cell_at(column, row)
            .filter(|&(x, y)| field.cell(x, y).is_some_and(|c| !c.is_flagged));
    }

    /// Primary button came up. Commits the reveal only if the release landed
    /// on the cell recorded at press time.
    pub fn release(&mut self, column: u16, row: u16, field: &mut Minefield) -> Reveal {
        self.primary_down = false;
        match (self.pending.take(), self.layout.cell_at(column, row)) {
            (Some(pressed), Some(under)) if pressed == under => field.reveal(under.0, under.1),
            _ => Reveal::Ignored,
        }
    }

    /// Secondary button went down: flag whatever cell the pointer occupies,
    /// independent of the primary press/release cycle.
    pub fn flag(&mut self, column: u16, row: u16, field: &mut Minefield) {
        if let Some((x, y)) = self.layout.cell_at(column, row) {
            field.toggle_flag(x, y);
        }
    }

    /// Drop any in-flight press, e.g. when a new game starts mid-cycle.
    pub fn reset(&mut self) {
        self.primary_down = false;
        self.pending = None;
    }

    /// Project the visual state of one cell from the pointer position and the
    /// machine state. Pure and side-effect free; safe to call any number of
    /// times per frame. Flagged cells always read Up, the pending cell reads
    /// Down while the button is held, and the hovered cell reads Hover when
    /// nothing is held.
    pub fn visual_state(
        &self,
        x: i32,
        y: i32,
        pointer: (u16, u16),
        field: &Minefield,
    ) -> ButtonState {
        if field.cell(x, y).is_some_and(|c| c.is_flagged) {
            return ButtonState::Up;
        }
        if self.primary_down {
            return if self.pending == Some((x, y)) {
                ButtonState::Down
            } else {
                ButtonState::Up
            };
        }
        if self.layout.cell_at(pointer.0, pointer.1) == Some((x, y)) {
            ButtonState::Hover
        } else {
            ButtonState::Up
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_3x3() -> GridLayout {
        GridLayout {
            origin: (10, 5),
            cell_cols: 2,
            cell_rows: 1,
            width: 3,
            height: 3,
        }
    }

    fn field_3x3() -> Minefield {
        Minefield::new(3, 3, 1).unwrap()
    }

    #[test]
    fn hit_testing_maps_positions_to_cells() {
        let layout = layout_3x3();
        assert_eq!(layout.cell_at(10, 5), Some((0, 0)));
        assert_eq!(layout.cell_at(11, 5), Some((0, 0)));
        // exclusive upper bound: the next column starts the next cell
        assert_eq!(layout.cell_at(12, 5), Some((1, 0)));
        assert_eq!(layout.cell_at(15, 7), Some((2, 2)));
        assert_eq!(layout.cell_at(16, 5), None);
        assert_eq!(layout.cell_at(10, 8), None);
        assert_eq!(layout.cell_at(9, 5), None);
        assert_eq!(layout.cell_at(10, 4), None);
    }

    #[test]
    fn press_release_on_same_cell_commits_reveal() {
        let mut field = field_3x3();
        let mut resolver = InputResolver::new(layout_3x3());
        resolver.press(12, 6, &field);
        assert_eq!(resolver.release(13, 6, &mut field), Reveal::Opened);
        assert!(field.cell(1, 1).unwrap().is_opened);
    }

    #[test]
    fn drag_out_cancels_the_reveal() {
        let mut field = field_3x3();
        let mut resolver = InputResolver::new(layout_3x3());
        resolver.press(10, 5, &field);
        assert_eq!(resolver.release(14, 7, &mut field), Reveal::Ignored);
        assert!(!field.cell(0, 0).unwrap().is_opened);
        assert!(!field.cell(2, 2).unwrap().is_opened);
    }

    #[test]
    fn release_outside_the_grid_cancels() {
        let mut field = field_3x3();
        let mut resolver = InputResolver::new(layout_3x3());
        resolver.press(10, 5, &field);
        assert_eq!(resolver.release(0, 0, &mut field), Reveal::Ignored);
        assert!(!field.cell(0, 0).unwrap().is_opened);
    }

    #[test]
    fn flagged_cell_absorbs_the_press() {
        let mut field = field_3x3();
        field.toggle_flag(1, 1);
        let mut resolver = InputResolver::new(layout_3x3());
        resolver.press(12, 6, &field);
        assert_eq!(resolver.release(12, 6, &mut field), Reveal::Ignored);
        assert!(!field.cell(1, 1).unwrap().is_opened);
    }

    #[test]
    fn secondary_press_flags_immediately() {
        let mut field = field_3x3();
        let mut resolver = InputResolver::new(layout_3x3());
        resolver.flag(14, 5, &mut field);
        assert!(field.cell(2, 0).unwrap().is_flagged);
        resolver.flag(14, 5, &mut field);
        assert!(!field.cell(2, 0).unwrap().is_flagged);
        // off-grid flags are no-ops
        resolver.flag(0, 0, &mut field);
    }

    #[test]
    fn visual_state_projection() {
        let mut field = field_3x3();
        let mut resolver = InputResolver::new(layout_3x3());

        // hover follows the pointer when nothing is held
        assert_eq!(
            resolver.visual_state(1, 1, (12, 6), &field),
            ButtonState::Hover
        );
        assert_eq!(
            resolver.visual_state(0, 0, (12, 6), &field),
            ButtonState::Up
        );

        // while held, only the pending cell is down, even under the pointer
        resolver.press(12, 6, &field);
        assert_eq!(
            resolver.visual_state(1, 1, (14, 6), &field),
            ButtonState::Down
        );
        assert_eq!(
            resolver.visual_state(2, 1, (14, 6), &field),
            ButtonState::Up
        );

        // projection is idempotent
        assert_eq!(
            resolver.visual_state(1, 1, (14, 6), &field),
            ButtonState::Down
        );

        // flagged cells always read up, even hovered
        resolver.reset();
        field.toggle_flag(1, 1);
        assert_eq!(
            resolver.visual_state(1, 1, (12, 6), &field),
            ButtonState::Up
        );
    }

    #[test]
    fn pressing_a_flagged_cell_shows_no_down_state() {
        let mut field = field_3x3();
        field.toggle_flag(0, 0);
        let mut resolver = InputResolver::new(layout_3x3());
        resolver.press(10, 5, &field);
        assert_eq!(
            resolver.visual_state(0, 0, (10, 5), &field),
            ButtonState::Up
        );
    }
}
