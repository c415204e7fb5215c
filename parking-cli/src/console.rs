//! Консольный ввод.
//!
//! stdin читается отдельным потоком и пересылается строками в канал;
//! `ConsoleInput` ждёт строку с коротким тиком, чтобы Ctrl+C (флаг shutdown)
//! останавливал цикл, не дожидаясь Enter.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, warn};
use parking_core::input::{InputSource, normalize_registration};
use parking_core::{InputError, ParkingType};

use crate::config::{INPUT_BUFFER, INPUT_TICK};

/// Поток, читающий строки из `reader`. EOF => канал закрывается.
/// Байты не в UTF-8 заменяются на U+FFFD, сессия продолжается.
pub(crate) fn spawn_line_reader<R>(reader: R) -> Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(INPUT_BUFFER);

    // поток не join-им: на stdin он может висеть до конца процесса
    thread::spawn(move || {
        for raw in reader.split(b'\n') {
            let raw = match raw {
                Ok(r) => r,
                Err(e) => {
                    warn!("stdin read error: {e}");
                    break;
                }
            };
            let mut line = match String::from_utf8(raw) {
                Ok(l) => l,
                Err(e) => {
                    warn!("stdin line is not valid UTF-8, replacing invalid bytes");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            if line.ends_with('\r') {
                line.pop();
            }
            if tx.send(line).is_err() {
                break;
            }
        }
        debug!("stdin closed");
    });

    rx
}

pub(crate) struct ConsoleInput<W: Write> {
    lines: Receiver<String>,
    out: W,
    shutdown: Arc<AtomicBool>,
}

impl<W: Write> ConsoleInput<W> {
    pub(crate) fn new(lines: Receiver<String>, out: W, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            lines,
            out,
            shutdown,
        }
    }

    /// Строка в вывод
    pub(crate) fn say(&mut self, msg: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", msg.as_ref())?;
        self.out.flush()
    }

    /// Следующая строка ввода; `Closed` на EOF или по shutdown
    pub(crate) fn read_line(&mut self) -> Result<String, InputError> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return Err(InputError::Closed);
            }
            match self.lines.recv_timeout(INPUT_TICK) {
                Ok(line) => return Ok(line),
                Err(RecvTimeoutError::Timeout) => {
                    // тик: просто проверим shutdown и продолжим
                }
                Err(RecvTimeoutError::Disconnected) => return Err(InputError::Closed),
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> InputSource for ConsoleInput<W> {
    fn read_selection(&mut self) -> Result<ParkingType, InputError> {
        self.say("Please select vehicle type from menu")?;
        self.say("1 CAR")?;
        self.say("2 BIKE")?;
        let line = self.read_line()?;
        ParkingType::from_selection(&line)
    }

    fn read_registration_number(&mut self) -> Result<String, InputError> {
        self.say("Please type the vehicle registration number and press enter key")?;
        let line = self.read_line()?;
        normalize_registration(&line)
    }
}
