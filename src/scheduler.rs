//! Periodic scheduler and single-threaded event loop
//!
//! Every timer in the game (the 16ms loop, animation cadences, joystick
//! sampling, delayed navigation) is registered here and delivered as a typed
//! event on one thread. Input collaborators on other threads post through an
//! `EventSender`; nothing mutates game state outside `run_until`.
//!
//! Time is a virtual millisecond clock advanced by the caller, which keeps
//! runs reproducible and lets tests step the loop precisely.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};

/// Handle to a registered timer, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Abstract periodic scheduler
pub trait Scheduler<E> {
    /// Current time in milliseconds
    fn now_ms(&self) -> u64;

    /// Deliver `event` once, `delay_ms` from now
    fn schedule_once(&mut self, delay_ms: u64, event: E) -> TimerHandle;

    /// Deliver `event` every `interval_ms`, first delivery one interval from now
    fn schedule_repeating(&mut self, interval_ms: u64, event: E) -> TimerHandle;

    /// Remove a timer. Returns false if it already fired (one-shot) or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

struct Timer<E> {
    event: E,
    interval_ms: Option<u64>,
}

/// Thread-safe handle for posting events onto an `EventLoop`
pub struct EventSender<E> {
    tx: Sender<E>,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> EventSender<E> {
    /// Queue an event for the next dispatch. Returns false once the loop is gone.
    pub fn post(&self, event: E) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Single-threaded executor with a virtual clock
pub struct EventLoop<E> {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    /// (due, registration sequence, timer id); the sequence keeps equal deadlines FIFO
    queue: BinaryHeap<Reverse<(u64, u64, u64)>>,
    timers: HashMap<u64, Timer<E>>,
    posted: VecDeque<E>,
    inbox: Receiver<E>,
    outbox: Sender<E>,
}

impl<E: Clone> EventLoop<E> {
    pub fn new() -> Self {
        let (outbox, inbox) = mpsc::channel();
        Self {
            now_ms: 0,
            next_id: 1,
            next_seq: 0,
            queue: BinaryHeap::new(),
            timers: HashMap::new(),
            posted: VecDeque::new(),
            inbox,
            outbox,
        }
    }

    /// Handle for collaborators that live outside the loop
    pub fn sender(&self) -> EventSender<E> {
        EventSender {
            tx: self.outbox.clone(),
        }
    }

    /// Queue an event from the loop's own thread
    pub fn post(&mut self, event: E) {
        self.posted.push_back(event);
    }

    /// Number of live timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Dispatch everything due up to and including `deadline`, then set the clock to it
    ///
    /// Posted events are delivered before timers and at the current time.
    /// Returns the number of events dispatched.
    pub fn run_until(&mut self, deadline: u64, mut dispatch: impl FnMut(&mut Self, E)) -> usize {
        let mut dispatched = 0;
        while let Some(event) = self.pop_due(deadline) {
            dispatch(self, event);
            dispatched += 1;
        }
        self.now_ms = self.now_ms.max(deadline);
        dispatched
    }

    /// Advance the clock by `duration_ms`, dispatching along the way
    pub fn run_for(&mut self, duration_ms: u64, dispatch: impl FnMut(&mut Self, E)) -> usize {
        let deadline = self.now_ms + duration_ms;
        self.run_until(deadline, dispatch)
    }

    fn collect_posted(&mut self) {
        while let Ok(event) = self.inbox.try_recv() {
            self.posted.push_back(event);
        }
    }

    fn pop_due(&mut self, deadline: u64) -> Option<E> {
        self.collect_posted();
        if let Some(event) = self.posted.pop_front() {
            return Some(event);
        }

        while let Some(&Reverse((due, _, id))) = self.queue.peek() {
            if due > deadline {
                return None;
            }
            self.queue.pop();

            // Cancelled timers leave stale heap entries behind
            let Some(timer) = self.timers.get(&id) else {
                continue;
            };
            let event = timer.event.clone();
            let interval = timer.interval_ms;

            self.now_ms = self.now_ms.max(due);
            match interval {
                Some(interval) => self.push(due + interval, id),
                None => {
                    self.timers.remove(&id);
                }
            }
            return Some(event);
        }
        None
    }

    fn push(&mut self, due: u64, id: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse((due, seq, id)));
    }

    fn register(&mut self, delay_ms: u64, event: E, interval_ms: Option<u64>) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.insert(id, Timer { event, interval_ms });
        self.push(self.now_ms + delay_ms, id);
        TimerHandle(id)
    }
}

impl<E: Clone> Default for EventLoop<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Scheduler<E> for EventLoop<E> {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule_once(&mut self, delay_ms: u64, event: E) -> TimerHandle {
        self.register(delay_ms, event, None)
    }

    fn schedule_repeating(&mut self, interval_ms: u64, event: E) -> TimerHandle {
        // A zero interval would spin forever inside one deadline
        let interval_ms = interval_ms.max(1);
        self.register(interval_ms, event, Some(interval_ms))
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle.0).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(lp: &mut EventLoop<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut seen = Vec::new();
        lp.run_until(until, |lp, ev| seen.push((lp.now_ms(), ev)));
        seen
    }

    #[test]
    fn test_once_fires_at_deadline() {
        let mut lp = EventLoop::new();
        lp.schedule_once(50, "a");
        assert!(collect(&mut lp, 49).is_empty());
        assert_eq!(collect(&mut lp, 50), vec![(50, "a")]);
        assert_eq!(lp.pending_timers(), 0);
        assert_eq!(lp.now_ms(), 50);
    }

    #[test]
    fn test_repeating_fires_every_interval() {
        let mut lp = EventLoop::new();
        lp.schedule_repeating(16, "tick");
        let seen = collect(&mut lp, 64);
        assert_eq!(
            seen,
            vec![(16, "tick"), (32, "tick"), (48, "tick"), (64, "tick")]
        );
        assert_eq!(lp.pending_timers(), 1);
    }

    #[test]
    fn test_equal_deadlines_are_fifo() {
        let mut lp = EventLoop::new();
        lp.schedule_once(10, "first");
        lp.schedule_once(10, "second");
        lp.schedule_once(5, "early");
        let order: Vec<_> = collect(&mut lp, 10).into_iter().map(|(_, e)| e).collect();
        assert_eq!(order, vec!["early", "first", "second"]);
    }

    #[test]
    fn test_cancel_prevents_dispatch() {
        let mut lp = EventLoop::new();
        let h = lp.schedule_repeating(10, "anim");
        lp.schedule_once(25, "other");
        assert_eq!(collect(&mut lp, 10).len(), 1);

        assert!(lp.cancel(h));
        assert!(!lp.cancel(h));
        assert_eq!(collect(&mut lp, 100), vec![(25, "other")]);
    }

    #[test]
    fn test_cancel_from_dispatch() {
        // A handler that replaces its own repeating timer must never see two live timers
        let mut lp: EventLoop<u32> = EventLoop::new();
        let mut handle = Some(lp.schedule_repeating(10, 0));
        let mut fired = Vec::new();
        lp.run_until(100, |lp, generation| {
            fired.push((lp.now_ms(), generation));
            if generation < 3 {
                if let Some(h) = handle.take() {
                    lp.cancel(h);
                }
                handle = Some(lp.schedule_repeating(10, generation + 1));
            }
            assert_eq!(lp.pending_timers(), 1);
        });
        assert_eq!(fired[..4], [(10, 0), (20, 1), (30, 2), (40, 3)]);
    }

    #[test]
    fn test_posted_events_come_first() {
        let mut lp = EventLoop::new();
        lp.schedule_once(0, "timer");
        lp.post("input");
        let order: Vec<_> = collect(&mut lp, 0).into_iter().map(|(_, e)| e).collect();
        assert_eq!(order, vec!["input", "timer"]);
    }

    #[test]
    fn test_sender_from_another_thread() {
        let mut lp: EventLoop<u32> = EventLoop::new();
        let sender = lp.sender();
        let worker = std::thread::spawn(move || {
            for i in 0..3 {
                assert!(sender.post(i));
            }
        });
        worker.join().unwrap();

        let mut seen = Vec::new();
        lp.run_for(0, |_, ev| seen.push(ev));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_run_for_advances_clock() {
        let mut lp: EventLoop<()> = EventLoop::new();
        lp.run_for(40, |_, _| {});
        lp.run_for(2, |_, _| {});
        assert_eq!(lp.now_ms(), 42);
    }
}
