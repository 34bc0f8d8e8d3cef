use super::*;

fn grid() -> StaggerGrid {
    StaggerGrid::new(4, 4, 40.0)
}

#[test]
fn apply_stroke_paints_hit_cell() {
    let g = grid();
    let mut cells = CellMap::new();

    let outcome = apply_stroke(&g, &mut cells, 60.0, 60.0, "#ff0000", false);

    assert_eq!(outcome.cell, Some((1, 1)));
    assert!(outcome.changed);
    assert_eq!(cells.color_at(1, 1), Some("#ff0000"));
}

#[test]
fn apply_stroke_repaint_same_color_is_unchanged() {
    let g = grid();
    let mut cells = CellMap::new();
    cells.paint(1, 1, "#ff0000");

    let outcome = apply_stroke(&g, &mut cells, 60.0, 60.0, "#ff0000", false);

    assert_eq!(outcome.cell, Some((1, 1)));
    assert!(!outcome.changed);
}

#[test]
fn apply_stroke_erases() {
    let g = grid();
    let mut cells = CellMap::new();
    cells.paint(1, 1, "#ff0000");

    let outcome = apply_stroke(&g, &mut cells, 60.0, 60.0, "", true);

    assert_eq!(outcome.cell, Some((1, 1)));
    assert!(outcome.changed);
    assert!(cells.is_empty());
}

#[test]
fn apply_stroke_erase_on_empty_cell_is_unchanged() {
    let g = grid();
    let mut cells = CellMap::new();

    let outcome = apply_stroke(&g, &mut cells, 60.0, 60.0, "", true);

    assert_eq!(outcome.cell, Some((1, 1)));
    assert!(!outcome.changed);
}

#[test]
fn apply_stroke_misses_dead_zone() {
    let g = grid();
    let mut cells = CellMap::new();

    // Left dead-zone of an offset row.
    let outcome = apply_stroke(&g, &mut cells, 10.0, 60.0, "#ff0000", false);

    assert_eq!(outcome.cell, None);
    assert!(!outcome.changed);
    assert!(cells.is_empty());
}

#[test]
fn apply_stroke_respects_zoom() {
    let g = grid().with_zoom(2.0);
    let mut cells = CellMap::new();

    let outcome = apply_stroke(&g, &mut cells, 120.0, 120.0, "#00ff00", false);

    assert_eq!(outcome.cell, Some((1, 1)));
}

#[test]
fn dimensions_must_be_positive() {
    assert!(check_dimensions(4, 4, 40).is_ok());
    assert!(matches!(check_dimensions(0, 4, 40), Err(DesignError::InvalidDimensions)));
    assert!(matches!(check_dimensions(4, -1, 40), Err(DesignError::InvalidDimensions)));
    assert!(matches!(check_dimensions(4, 4, 0), Err(DesignError::InvalidDimensions)));
}

#[test]
fn clipped_entries_drops_out_of_range() {
    let g = grid();
    let entries = vec![
        CellEntry { row: 0, col: 0, color: "#111111".into() },
        CellEntry { row: 1, col: 3, color: "#222222".into() }, // odd row has cols-1
        CellEntry { row: 9, col: 0, color: "#333333".into() },
    ];

    let kept = clipped_entries(&entries, &g);

    assert_eq!(kept.len(), 1);
    assert_eq!((kept[0].row, kept[0].col), (0, 0));
}

#[test]
fn cells_json_round_trip() {
    let entries = vec![
        CellEntry { row: 0, col: 1, color: "#abcdef".into() },
        CellEntry { row: 2, col: 0, color: "#123456".into() },
    ];

    let value = encode_cells(&entries);
    let back = decode_cells(&value).unwrap();

    assert_eq!(back, entries);
}

#[test]
fn decode_rejects_malformed_cells() {
    let value = serde_json::json!([{ "row": "nope" }]);
    assert!(matches!(decode_cells(&value), Err(DesignError::InvalidCells(_))));
}
