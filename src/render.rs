use std::{
    io::{self, Write},
    mem::MaybeUninit,
    os::fd::AsRawFd,
};

use lib_2048::{Board, Line, SIZE};

const SQUARE_HEIGHT: usize = 3;
const TOP_ROW: &[u8] = "┏━━━━━━━┳━━━━━━━┳━━━━━━━┳━━━━━━━┓\n".as_bytes();
const SEPERATOR_ROW: &[u8] = "┣━━━━━━━╋━━━━━━━╋━━━━━━━╋━━━━━━━┫\n".as_bytes();
const BOTTOM_ROW: &[u8] = "┗━━━━━━━┻━━━━━━━┻━━━━━━━┻━━━━━━━┛\n".as_bytes();
const EMPTY_ROW: &[u8] = "┃       ┃       ┃       ┃       ┃\n".as_bytes();
const EMPTY_CELL: &[u8] = "┃       ".as_bytes();
const COLOUR_TABLE: [u8; 7] = [90, 33, 31, 32, 33, 36, 35];

/// Foreground colour for a tile, keyed on its exponent. Empty cells have none.
fn tile_colour(tile: u32) -> Option<u8> {
    (tile != 0).then(|| {
        let exponent = tile.trailing_zeros() as usize;

        COLOUR_TABLE[(exponent - 1) % COLOUR_TABLE.len()]
    })
}

fn draw_padding_line(out: &mut impl Write, row: Line) -> io::Result<()> {
    for tile in row {
        if let Some(colour) = tile_colour(tile) {
            write!(out, "┃\x1b[{}m       \x1b[m", colour + 10)?;
        } else {
            out.write_all(EMPTY_CELL)?;
        }
    }

    Ok(())
}

fn draw_board_row(out: &mut impl Write, row: Line) -> io::Result<()> {
    for _ in 0..((SQUARE_HEIGHT - 1) / 2) {
        draw_padding_line(out, row)?;
    }

    out.write_all(b"\x1b[E")?;

    for tile in row {
        if let Some(colour) = tile_colour(tile) {
            write!(out, "┃\x1b[7m\x1b[{colour}m{tile:^7}\x1b[m")?;
        } else {
            out.write_all(EMPTY_CELL)?;
        }
    }

    out.write_all(b"\x1b[E")?;

    for _ in 0..((SQUARE_HEIGHT - 1).div_ceil(2)) {
        draw_padding_line(out, row)?;
    }

    Ok(())
}

pub fn draw_board(out: &mut impl Write, board: Board, score: u32) -> io::Result<()> {
    write!(out, "\nScore: {score}\n")?;
    out.write_all(TOP_ROW)?;

    for i in 0..SIZE {
        if i != 0 {
            out.write_all(SEPERATOR_ROW)?;
        }

        for _ in 0..SQUARE_HEIGHT {
            out.write_all(EMPTY_ROW)?;
        }
    }

    out.write_all(BOTTOM_ROW)?;

    redraw_board(out, Board::EMPTY, board, score, score)
}

/// Redraws only the rows that differ between `old_board` and `new_board`. The cursor is
/// expected on the line below the board and is left there.
pub fn redraw_board(
    out: &mut impl Write,
    old_board: Board,
    new_board: Board,
    old_score: u32,
    new_score: u32,
) -> io::Result<()> {
    let mut current_line = if new_score != old_score {
        let target_line = SQUARE_HEIGHT * SIZE + 6;
        write!(out, "\x1b[{target_line}F\x1b[KScore: {new_score}")?;

        target_line
    } else {
        0
    };

    let changed_rows = (0..SIZE).filter(|&i| new_board.row(i) != old_board.row(i));

    for row in changed_rows {
        let final_row_to_end = (SQUARE_HEIGHT - 1).div_ceil(2) + 2;
        let between_rows = SQUARE_HEIGHT + 1;
        let target_line = final_row_to_end + between_rows * (SIZE - 1 - row) + 1;

        if target_line > current_line {
            write!(out, "\x1b[{}F", target_line - current_line)?;
        } else {
            write!(out, "\x1b[{}E", current_line - target_line)?;
        }

        draw_board_row(out, new_board.row(row))?;
        current_line = target_line - 2;
    }

    if current_line != 0 {
        write!(out, "\x1b[{current_line}E")?;
    }

    out.flush()
}

/// Puts the terminal into non-canonical, no-echo mode and returns the previous settings for
/// [`restore_terminal`].
pub fn setup_terminal(fd: &impl AsRawFd) -> io::Result<libc::termios> {
    let fd = fd.as_raw_fd();
    let mut termios = MaybeUninit::uninit();

    let original = unsafe {
        if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
            return Err(io::Error::last_os_error());
        }

        termios.assume_init()
    };

    let mut termios = original;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON);

    unsafe {
        if libc::tcsetattr(fd, libc::TCSADRAIN, &termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(original)
}

pub fn restore_terminal(fd: &impl AsRawFd, termios: &libc::termios) -> io::Result<()> {
    unsafe {
        if libc::tcsetattr(fd.as_raw_fd(), libc::TCSADRAIN, termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}
