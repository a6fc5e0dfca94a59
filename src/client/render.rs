use log::warn;

use crate::{
    client::view::{CellClass, CellKey, GridView},
    GridSnapshot,
};

/// What a repaint did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub painted: usize,
    /// cells the snapshot has no entry for; they keep what they showed before
    pub missing: Vec<CellKey>,
}

/// Repaints every cell of the view from a snapshot, whether it changed or not.
///
/// A cell gets the raw marker as text and the class matching it, if any. A
/// cell without an entry in the snapshot is left alone and reported.
pub fn render_snapshot<V>(view: &mut V, snapshot: &GridSnapshot) -> RenderReport
where
    V: GridView + ?Sized,
{
    let mut report = RenderReport::default();
    for key in view.cell_keys() {
        let marker = key
            .position()
            .and_then(|(row, col)| snapshot.marker(row, col))
            .map(str::to_string);
        match marker {
            Some(marker) => {
                view.paint(&key, &marker, CellClass::from_marker(&marker));
                report.painted += 1;
            }
            None => report.missing.push(key),
        }
    }
    if !report.missing.is_empty() {
        warn!(
            "snapshot has no entry for {} cell(s), left as they were: {:?}",
            report.missing.len(),
            report.missing
        );
    }
    report
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::client::view::MemoryGrid;

    fn snapshot(rows: &[[&str; 3]]) -> GridSnapshot {
        GridSnapshot::new(
            rows.iter()
                .map(|row| row.iter().map(|marker| marker.to_string()).collect())
                .collect(),
        )
    }

    fn class_of(view: &MemoryGrid, row: usize, col: usize) -> Option<CellClass> {
        view.cell(&CellKey::new(row, col)).and_then(|cell| cell.class)
    }

    #[test]
    fn paint_scenario() {
        let mut view = MemoryGrid::new(3, 3);
        let report = render_snapshot(
            &mut view,
            &snapshot(&[["red", "", ""], ["", "blue", ""], ["", "", "yellow"]]),
        );
        assert_eq!(report.painted, 9);
        assert!(report.missing.is_empty());

        assert_eq!(view.text(&CellKey::new(0, 0)), Some("red"));
        assert_eq!(class_of(&view, 0, 0), Some(CellClass::Red));
        assert_eq!(view.text(&CellKey::new(1, 1)), Some("blue"));
        assert_eq!(class_of(&view, 1, 1), Some(CellClass::Blue));
        assert_eq!(view.text(&CellKey::new(2, 2)), Some("yellow"));
        assert_eq!(class_of(&view, 2, 2), Some(CellClass::Yellow));

        for key in view.cell_keys() {
            if key.row == key.col {
                continue;
            }
            assert_eq!(view.text(&key), Some(""));
            assert_eq!(view.cell(&key).and_then(|cell| cell.class), None);
        }
    }

    #[test]
    fn unknown_markers_get_no_class() {
        let mut view = MemoryGrid::new(3, 3);
        render_snapshot(
            &mut view,
            &snapshot(&[["green", "Red", ""], ["", "", ""], ["", "", ""]]),
        );
        assert_eq!(view.text(&CellKey::new(0, 0)), Some("green"));
        assert_eq!(class_of(&view, 0, 0), None);
        assert_eq!(view.text(&CellKey::new(0, 1)), Some("Red"));
        assert_eq!(class_of(&view, 0, 1), None);
    }

    #[test]
    fn classes_are_replaced_not_accumulated() {
        let mut view = MemoryGrid::new(3, 3);
        render_snapshot(
            &mut view,
            &snapshot(&[["red", "", ""], ["", "", ""], ["", "", ""]]),
        );
        render_snapshot(
            &mut view,
            &snapshot(&[["blue", "", ""], ["", "", ""], ["", "", ""]]),
        );
        assert_eq!(class_of(&view, 0, 0), Some(CellClass::Blue));

        render_snapshot(
            &mut view,
            &snapshot(&[["", "", ""], ["", "", ""], ["", "", ""]]),
        );
        assert_eq!(view.text(&CellKey::new(0, 0)), Some(""));
        assert_eq!(class_of(&view, 0, 0), None);
    }

    #[test]
    fn replaying_a_snapshot_is_idempotent() {
        let update = snapshot(&[["red", "blue", ""], ["", "yellow", ""], ["", "", "red"]]);
        let mut view = MemoryGrid::new(3, 3);

        render_snapshot(&mut view, &update);
        let once = view.clone();
        render_snapshot(&mut view, &update);
        assert_eq!(view, once);
    }

    #[test]
    fn cells_missing_from_the_snapshot_are_left_alone() {
        let mut view = MemoryGrid::with_cells([
            CellKey::new(0, 0),
            CellKey::new(0, 3),
            CellKey::new(4, 0),
            CellKey::new("x", 0),
        ]);
        view.paint(&CellKey::new(0, 3), "stale", None);

        let report = render_snapshot(
            &mut view,
            &snapshot(&[["red", "", ""], ["", "", ""], ["", "", ""]]),
        );

        assert_eq!(report.painted, 1);
        assert_eq!(report.missing.len(), 3);
        assert!(report.missing.contains(&CellKey::new(0, 3)));
        assert!(report.missing.contains(&CellKey::new("x", 0)));
        assert_eq!(view.text(&CellKey::new(0, 0)), Some("red"));
        assert_eq!(view.text(&CellKey::new(0, 3)), Some("stale"));
        assert_eq!(view.text(&CellKey::new(4, 0)), Some(""));
    }

    #[test]
    fn smaller_view_ignores_extra_entries() {
        let mut view = MemoryGrid::new(2, 2);
        let report = render_snapshot(
            &mut view,
            &snapshot(&[["red", "", "blue"], ["", "", ""], ["yellow", "", ""]]),
        );
        assert_eq!(report.painted, 4);
        assert!(report.missing.is_empty());
        assert_eq!(view.len(), 4);
    }
}
