//! Exhaustive checks of the board rules over every possible cell assignment.

use arena_board::{
    Board, Cell, LINES, Mark, Position, Role, detect_winner, is_draw, is_full, validate_move,
};

/// Decodes `n` (base 3, one digit per cell) into a board.
fn board_from_code(mut n: u32) -> Board {
    let mut cells = [Cell::Empty; 9];
    for cell in &mut cells {
        *cell = match n % 3 {
            0 => Cell::Empty,
            1 => Cell::Marked(Mark::X),
            _ => Cell::Marked(Mark::O),
        };
        n /= 3;
    }
    Board::from(cells)
}

fn line_owner(board: &Board, line: [Position; 3]) -> Option<Mark> {
    match line.map(|pos| board.get(pos)) {
        [Cell::Marked(a), Cell::Marked(b), Cell::Marked(c)] if a == b && b == c => Some(a),
        _ => None,
    }
}

#[test]
fn test_winner_matches_first_complete_line_on_all_boards() {
    for code in 0..3u32.pow(9) {
        let board = board_from_code(code);
        let expected = LINES.iter().find_map(|line| line_owner(&board, *line));
        assert_eq!(detect_winner(&board), expected, "board:\n{}", board.display());
    }
}

#[test]
fn test_full_and_draw_agree_on_all_boards() {
    for code in 0..3u32.pow(9) {
        let board = board_from_code(code);
        let full = board.cells().iter().all(|c| *c != Cell::Empty);
        assert_eq!(is_full(&board), full);
        assert_eq!(is_draw(&board), full && detect_winner(&board).is_none());
    }
}

/// Fills `positions` with `mark`.
fn mark_all(board: &mut Board, mark: Mark, positions: [Position; 3]) {
    for pos in positions {
        board.set(pos, Cell::Marked(mark));
    }
}

#[test]
fn test_upper_row_reported_before_lower_row() {
    let mut board = Board::new();
    mark_all(
        &mut board,
        Mark::X,
        [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    );
    mark_all(
        &mut board,
        Mark::O,
        [Position::TopLeft, Position::TopCenter, Position::TopRight],
    );
    assert_eq!(detect_winner(&board), Some(Mark::O));
}

#[test]
fn test_left_column_reported_before_right_column() {
    let mut board = Board::new();
    mark_all(
        &mut board,
        Mark::O,
        [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    );
    mark_all(
        &mut board,
        Mark::X,
        [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    );
    assert_eq!(detect_winner(&board), Some(Mark::X));
}

#[test]
fn test_validate_accepts_exactly_the_empty_cells() {
    let mut board = Board::new();
    board.set(Position::TopLeft, Cell::Marked(Mark::X));
    board.set(Position::Center, Cell::Marked(Mark::O));

    let accepted: Vec<Position> = (0..9)
        .filter_map(|i| validate_move(Role::Player(Mark::X), &i.to_string(), &board, Mark::X).ok())
        .map(|mv| mv.position())
        .collect();

    assert_eq!(accepted, Position::valid_moves(&board));
    assert_eq!(accepted.len(), 7);
}

#[test]
fn test_position_index_round_trip() {
    assert_eq!(Position::from_index(0), Some(Position::TopLeft));
    assert_eq!(Position::from_index(4), Some(Position::Center));
    assert_eq!(Position::from_index(8), Some(Position::BottomRight));
    assert_eq!(Position::from_index(9), None);
    assert_eq!(Position::BottomCenter.to_index(), 7);
}
