//! Fire-and-forget validity chime.

use std::io::Write;
use std::thread;

/// Rings the terminal bell from a detached worker.
///
/// The thread is never joined and every failure is ignored; the chime has
/// no effect on program state.
pub fn play_chime() {
    thread::spawn(|| {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    });
}
