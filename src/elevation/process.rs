//! Running a child process with piped I/O and a wall-clock limit.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long to wait for a child to go away when it could not be killed.
const KILL_GRACE: Duration = Duration::from_secs(1);

/// Output of a child that exited on its own.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Spawn `cmd`, feed `input` on stdin, and collect stdout/stderr.
///
/// Returns `Ok(None)` when the child did not finish within `timeout`; it
/// is killed and reaped in that case.
pub fn run_with_input(
    mut cmd: Command,
    input: Vec<u8>,
    timeout: Duration,
) -> io::Result<Option<Captured>> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Writer and readers run on their own threads so a child that fills a
    // pipe before draining stdin cannot deadlock us.
    let stdin = child.stdin.take();
    let writer = thread::spawn(move || {
        if let Some(mut stdin) = stdin {
            if let Err(err) = stdin.write_all(&input) {
                tracing::debug!(error = %err, "Child closed stdin early");
            }
        }
    });
    let stdout = spawn_reader(child.stdout.take());
    let stderr = spawn_reader(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            tracing::warn!(pid = child.id(), ?timeout, "Child timed out, killing");
            terminate(&mut child);
            // Reader threads are left detached: a grandchild may still hold
            // the pipes open.
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    };

    let _ = writer.join();
    Ok(Some(Captured {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    }))
}

/// Kill and reap `child` without blocking past [`KILL_GRACE`].
///
/// Returns whether the child is gone. A helper that already handed off to a
/// root process may refuse the signal (EPERM); that child is logged and
/// left running rather than waited on forever.
fn terminate(child: &mut Child) -> bool {
    let pid = child.id();
    match child.kill() {
        Ok(()) => match child.wait() {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(pid, error = %err, "Could not reap killed child");
                false
            }
        },
        Err(err) => {
            tracing::warn!(pid, error = %err, "Could not kill timed-out child");
            let deadline = Instant::now() + KILL_GRACE;
            while Instant::now() < deadline {
                match child.try_wait() {
                    Ok(Some(_)) => return true,
                    Ok(None) => thread::sleep(POLL_INTERVAL),
                    Err(err) => {
                        tracing::warn!(pid, error = %err, "Could not poll timed-out child");
                        return false;
                    }
                }
            }
            tracing::warn!(pid, "Timed-out child is still running, abandoning it");
            false
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}
