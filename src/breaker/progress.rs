use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Final report of one breaking run.
#[derive(Debug, Clone)]
pub struct BreakSummary {
    pub generations: usize,
    pub elapsed: Duration,
    pub best_fitness: f64,
    pub best_key: String,
}

impl BreakSummary {
    pub fn avg_ms_per_generation(&self) -> f64 {
        if self.generations == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() * 1000.0 / self.generations as f64
    }
}

/// Receives the ordered progress stream of a breaking run.
///
/// `on_generation` fires once per round with the best fitness known so
/// far; `on_finish` fires once, after the last round. Implementations
/// must be callable from the control thread only, but `Send + Sync` keeps
/// them shareable with the host that owns the run.
pub trait ProgressSink: Send + Sync {
    fn on_generation(&self, generation: usize, best_fitness: f64);
    fn on_finish(&self, summary: &BreakSummary);
}

/// Renders the progress stream as text lines into any writer.
pub struct WriteSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ProgressSink for WriteSink<W> {
    fn on_generation(&self, generation: usize, best_fitness: f64) {
        if let Ok(mut w) = self.writer.lock() {
            let _ = writeln!(w, "[Gen {:4}] {}", generation, best_fitness);
        }
    }

    fn on_finish(&self, summary: &BreakSummary) {
        if let Ok(mut w) = self.writer.lock() {
            let _ = writeln!(w);
            let _ = writeln!(w, "[Total generations]   {}", summary.generations);
            let _ = writeln!(
                w,
                "[Total time(sec)]     {}",
                summary.elapsed.as_secs_f64()
            );
            let _ = writeln!(
                w,
                "[Average ms/gen]      {}",
                summary.avg_ms_per_generation()
            );
            let _ = writeln!(w, "[Best fitness]        {}", summary.best_fitness);
            let _ = writeln!(w, "[Best key]            {}", summary.best_key);
            let _ = writeln!(w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_sink_line_format() {
        let sink = WriteSink::new(Vec::new());
        sink.on_generation(1, 512.25);
        sink.on_generation(12, 300.5);
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "[Gen    1] 512.25\n[Gen   12] 300.5\n");
    }

    #[test]
    fn test_write_sink_summary_block() {
        let sink = WriteSink::new(Vec::new());
        sink.on_finish(&BreakSummary {
            generations: 4,
            elapsed: Duration::from_millis(200),
            best_fitness: 123.5,
            best_key: "CAB".into(),
        });
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.contains("[Total generations]   4"));
        assert!(out.contains("[Average ms/gen]      50"));
        assert!(out.contains("[Best key]            CAB"));
    }
}
