/*!

A scoped timer. Starting a `Timer` gives back a `TimerGuard`; when the guard goes out of scope the elapsed
time is written to the timer's sink (standard output unless told otherwise):

```text
[optional label]
Elapsed time: 1.23 seconds
```

The report is written from `Drop`, so it happens however the span ends: falling off the end, an early
`return`, an error bubbling up through `?`, or a panic unwinding. The guard never touches what is in
flight. Errors and panics reach the caller exactly as they would without the timer.

```
use riiid_util::Timer;

{
  let _timer = Timer::labeled("load train.csv").start();
  // Work to be timed.
}
```

A `Timer` is idle until `start` consumes it, and a guard is finished once dropped, so a timer can measure
only one span. Nest spans by nesting separate timers.

*/

use std::{
  io::{self, stdout, Stdout, Write},
  time::{Duration, Instant}
};

use crate::logging::log_at_level;

/// Verbosity at which a timer announces that its span has begun.
const TIMER_LOG_LEVEL: i32 = 3;


/// An idle timer: a label and a sink, not yet measuring anything.
#[derive(Debug)]
pub struct Timer<W: Write = Stdout> {
  label: Option<String>,
  sink : W,
}

impl Timer<Stdout> {
  /// An unlabeled timer reporting to standard output.
  pub fn new() -> Self {
    Timer {
      label: None,
      sink : stdout()
    }
  }

  pub fn labeled(label: impl Into<String>) -> Self {
    Timer::with_label(Some(label))
  }

  /// An absent or empty label both mean "no label line".
  pub fn with_label<S: Into<String>>(label: Option<S>) -> Self {
    Timer {
      label: label.map(Into::into).filter(|label| !label.is_empty()),
      sink : stdout()
    }
  }
}

impl Default for Timer<Stdout> {
  fn default() -> Self {
    Timer::new()
  }
}

impl<W: Write> Timer<W> {
  /// Report to `sink` instead.
  pub fn with_sink<V: Write>(self, sink: V) -> Timer<V> {
    Timer {
      label: self.label,
      sink
    }
  }

  pub fn label(&self) -> Option<&str> {
    self.label.as_deref()
  }

  /// Records the start instant. The span lasts until the returned guard is dropped.
  pub fn start(self) -> TimerGuard<W> {
    log_at_level(
      TIMER_LOG_LEVEL,
      format!("Timer started: {}", self.label.as_deref().unwrap_or("<unlabeled>")).as_str()
    );

    TimerGuard {
      label: self.label,
      sink : self.sink,
      start: Instant::now(),
    }
  }
}


/// An active timer. Dropping it ends the span and writes the report.
#[must_use = "the span ends, and is reported, as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TimerGuard<W: Write = Stdout> {
  label: Option<String>,
  sink : W,
  start: Instant,
}

impl<W: Write> TimerGuard<W> {
  pub fn label(&self) -> Option<&str> {
    self.label.as_deref()
  }
}

impl<W: Write> Drop for TimerGuard<W> {
  fn drop(&mut self) {
    // `Instant` is monotonic, so this is never negative.
    let elapsed = self.start.elapsed();
    // Nowhere to send a write error from here, and we may already be unwinding.
    let _ = write_report(&mut self.sink, self.label.as_deref(), elapsed);
  }
}


/// Writes the `[label]` line (when there is a non-empty label) followed by the elapsed time in seconds to
/// two decimal places.
pub fn write_report<W: Write + ?Sized>(sink: &mut W, label: Option<&str>, elapsed: Duration) -> io::Result<()> {
  if let Some(label) = label.filter(|label| !label.is_empty()) {
    writeln!(sink, "[{}]", label)?;
  }
  writeln!(sink, "Elapsed time: {:.2} seconds", elapsed.as_secs_f64())?;
  sink.flush()
}

/// Runs `f` inside a timer span reporting to standard output and hands back whatever `f` returns.
pub fn time<T, F: FnOnce() -> T>(label: Option<&str>, f: F) -> T {
  let _timer = Timer::with_label(label).start();
  f()
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::{
    num::ParseIntError,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{Arc, Mutex},
    thread::sleep
  };

  #[derive(Clone, Default)]
  struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

  impl SharedBuffer {
    fn contents(&self) -> String {
      String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
  }

  impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  /// Pulls the seconds out of an `Elapsed time: …` line, checking there are exactly two decimals.
  fn reported_seconds(line: &str) -> f64 {
    let seconds = line
      .strip_prefix("Elapsed time: ")
      .and_then(|rest| rest.strip_suffix(" seconds"))
      .unwrap_or_else(|| panic!("not an elapsed time line: {:?}", line));
    let (_, decimals) = seconds.split_once('.').unwrap();
    assert_eq!(decimals.len(), 2, "{:?}", line);
    seconds.parse().unwrap()
  }

  fn lines(buffer: &[u8]) -> Vec<String> {
    String::from_utf8(buffer.to_vec()).unwrap().lines().map(String::from).collect()
  }

  #[test]
  fn report_format() {
    let mut buffer = Vec::new();
    write_report(&mut buffer, Some("X"), Duration::from_millis(1234)).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "[X]\nElapsed time: 1.23 seconds\n");

    let mut buffer = Vec::new();
    write_report(&mut buffer, None, Duration::from_millis(7)).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "Elapsed time: 0.01 seconds\n");

    let mut buffer = Vec::new();
    write_report(&mut buffer, Some(""), Duration::ZERO).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "Elapsed time: 0.00 seconds\n");
  }

  #[test]
  fn labeled_span() {
    let mut buffer = Vec::new();
    {
      let _timer = Timer::labeled("X").with_sink(&mut buffer).start();
      sleep(Duration::from_millis(200));
    }

    let lines = lines(&buffer);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "[X]");
    let seconds = reported_seconds(&lines[1]);
    assert!(seconds >= 0.19 && seconds <= 0.25, "reported {}", seconds);
  }

  #[test]
  fn unlabeled_empty_span() {
    let mut buffer = Vec::new();
    drop(Timer::new().with_sink(&mut buffer).start());

    let lines = lines(&buffer);
    assert_eq!(lines.len(), 1);
    let seconds = reported_seconds(&lines[0]);
    assert!(seconds >= 0.0);
    assert!(seconds < 0.05, "reported {}", seconds);
  }

  #[test]
  fn empty_label_is_no_label() {
    assert_eq!(Timer::labeled("").label(), None);
    assert_eq!(Timer::with_label(None::<String>).label(), None);
    assert_eq!(Timer::with_label(Some("load")).label(), Some("load"));

    let mut buffer = Vec::new();
    drop(Timer::labeled("").with_sink(&mut buffer).start());
    assert_eq!(lines(&buffer).len(), 1);
  }

  fn parse_both(sink: &mut Vec<u8>) -> Result<u32, ParseIntError> {
    let _timer = Timer::labeled("parse").with_sink(sink).start();
    let n: u32 = "12".parse()?;
    let m: u32 = "twelve".parse()?;
    Ok(n + m)
  }

  #[test]
  fn error_passes_through() {
    let mut buffer = Vec::new();
    let result = parse_both(&mut buffer);

    assert_eq!(result, Err("twelve".parse::<u32>().unwrap_err()));
    let lines = lines(&buffer);
    assert_eq!(lines[0], "[parse]");
    assert!(reported_seconds(&lines[1]) >= 0.0);
  }

  #[test]
  fn panic_still_reports() {
    let buffer = SharedBuffer::default();
    let sink = buffer.clone();

    let outcome = catch_unwind(AssertUnwindSafe(move || {
      let _timer = Timer::labeled("boom").with_sink(sink).start();
      sleep(Duration::from_millis(50));
      panic!("kaput");
    }));

    let payload = outcome.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"kaput"));

    let contents = buffer.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "[boom]");
    assert!(reported_seconds(lines[1]) >= 0.04);
  }

  #[test]
  fn nested_spans_are_independent() {
    let mut outer_buffer = Vec::new();
    let mut inner_buffer = Vec::new();
    {
      let _outer = Timer::labeled("outer").with_sink(&mut outer_buffer).start();
      {
        let _inner = Timer::labeled("inner").with_sink(&mut inner_buffer).start();
        sleep(Duration::from_millis(20));
      }
      sleep(Duration::from_millis(20));
    }

    let outer = lines(&outer_buffer);
    let inner = lines(&inner_buffer);
    assert_eq!(outer[0], "[outer]");
    assert_eq!(inner[0], "[inner]");
    assert!(reported_seconds(&outer[1]) >= reported_seconds(&inner[1]));
  }

  #[test]
  fn time_returns_closure_value() {
    assert_eq!(time(None, || 6 * 7), 42);
    assert_eq!(time(Some("fail"), || Err::<(), &str>("bad")), Err("bad"));
  }

  #[test]
  fn guard_keeps_label() {
    let guard = Timer::labeled("kept").with_sink(io::sink()).start();
    assert_eq!(guard.label(), Some("kept"));
  }
}
