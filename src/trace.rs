use chrono::NaiveDateTime;

pub trait QueueObserver {
    fn optimization_triggered(&mut self, _at: NaiveDateTime, _queue_len: usize) {}

    fn pass_started(&mut self, _pass: u32, _queue_len: usize) {}

    fn customer_moved(&mut self, _customer_id: u64, _from: usize, _to: usize) {}

    fn pass_finished(&mut self, _pass: u32, _moved: bool) {}
}

pub struct NoopObserver;

impl QueueObserver for NoopObserver {}

pub struct StderrObserver;

impl QueueObserver for StderrObserver {
    fn optimization_triggered(&mut self, at: NaiveDateTime, queue_len: usize) {
        eprintln!("optimize at {} (queue: {})", at.format("%H:%M"), queue_len);
    }

    fn pass_started(&mut self, pass: u32, queue_len: usize) {
        eprintln!("pass {} started (queue: {})", pass, queue_len);
    }

    fn customer_moved(&mut self, customer_id: u64, from: usize, to: usize) {
        eprintln!(
            "customer {} moved {} -> {} ({} skipped)",
            customer_id,
            from,
            to,
            from - to
        );
    }

    fn pass_finished(&mut self, pass: u32, moved: bool) {
        if !moved {
            eprintln!("pass {} made no move, queue stable", pass);
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    #[derive(Debug, PartialEq)]
    pub enum TraceEvent {
        Triggered { queue_len: usize },
        PassStarted { pass: u32 },
        Moved { customer_id: u64, from: usize, to: usize },
        PassFinished { pass: u32, moved: bool },
    }

    #[derive(Default)]
    pub struct RecordingObserver {
        pub events: Vec<TraceEvent>,
    }

    impl QueueObserver for RecordingObserver {
        fn optimization_triggered(&mut self, _at: NaiveDateTime, queue_len: usize) {
            self.events.push(TraceEvent::Triggered { queue_len });
        }

        fn pass_started(&mut self, pass: u32, _queue_len: usize) {
            self.events.push(TraceEvent::PassStarted { pass });
        }

        fn customer_moved(&mut self, customer_id: u64, from: usize, to: usize) {
            self.events.push(TraceEvent::Moved {
                customer_id,
                from,
                to,
            });
        }

        fn pass_finished(&mut self, pass: u32, moved: bool) {
            self.events.push(TraceEvent::PassFinished { pass, moved });
        }
    }
}
