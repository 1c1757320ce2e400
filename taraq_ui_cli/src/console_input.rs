use std::io::{self, BufRead};

use tokio::sync::mpsc::{channel, Receiver};

/// Lines typed on stdin, read on a dedicated thread so the game loop never waits on the terminal.
pub fn spawn_reader() -> Receiver<String> {
    let (sender, receiver) = channel::<String>(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    receiver
}
