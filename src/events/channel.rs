//! Crossbeam-backed plumbing between the pipeline and whoever renders it.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Pipeline side of the channel. Clones go to the rayon loaders.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Fire and forget: with no receiver left the event is dropped, so a
    /// run never fails because nobody is watching it.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Display side of the channel
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Events until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

pub struct EventChannel;

impl EventChannel {
    /// Unbounded, so a slow progress bar never stalls frame loading
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// Sender for runs nobody observes
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{LoadEvent, LoadProgress, PipelineEvent};
    use rayon::prelude::*;
    use std::path::PathBuf;

    #[test]
    fn loader_threads_share_one_sender() {
        let (sender, receiver) = EventChannel::new();
        let frames: Vec<PathBuf> = (0..8)
            .map(|i| PathBuf::from(format!("/cam/c10-{i}.png")))
            .collect();

        frames.par_iter().enumerate().for_each(|(i, path)| {
            sender.send(Event::Load(LoadEvent::Progress(LoadProgress {
                completed: i + 1,
                total: frames.len(),
                current_path: path.clone(),
            })));
        });
        drop(sender);

        let mut seen: Vec<PathBuf> = receiver
            .iter()
            .filter_map(|event| match event {
                Event::Load(LoadEvent::Progress(p)) => Some(p.current_path),
                _ => None,
            })
            .collect();
        seen.sort();
        let mut expected = frames.clone();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn receiver_ends_when_senders_are_gone() {
        let (sender, receiver) = EventChannel::new();
        sender.send(Event::Pipeline(PipelineEvent::Started));
        drop(sender);

        let mut events = receiver.iter();
        assert!(matches!(
            events.next(),
            Some(Event::Pipeline(PipelineEvent::Started))
        ));
        assert!(events.next().is_none());
    }

    #[test]
    fn null_sender_swallows_events() {
        null_sender().send(Event::Pipeline(PipelineEvent::Started));
    }
}
