#![allow(dead_code)]

pub mod mock_server;

use vidl_core::download::ProgressSink;

/// Progress events in the order they were reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Item(usize, usize, String),
    Start(Option<u64>),
    Advance(u64),
    Finish(bool),
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn advanced(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                Event::Advance(n) => *n,
                _ => 0,
            })
            .sum()
    }

    pub fn largest_chunk(&self) -> u64 {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Advance(n) => Some(*n),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    pub fn starts(&self) -> Vec<Option<u64>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Start(total) => Some(*total),
                _ => None,
            })
            .collect()
    }

    pub fn finishes(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Finish(ok) => Some(*ok),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for Recorder {
    fn item(&mut self, index: usize, total: usize, url: &str) {
        self.events.push(Event::Item(index, total, url.to_string()));
    }

    fn start(&mut self, _label: &str, total: Option<u64>) {
        self.events.push(Event::Start(total));
    }

    fn advance(&mut self, bytes: u64) {
        self.events.push(Event::Advance(bytes));
    }

    fn finish(&mut self, ok: bool) {
        self.events.push(Event::Finish(ok));
    }
}
