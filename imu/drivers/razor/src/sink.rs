use crate::error::RazorError;
use crate::frame::Frame;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Creates the unbounded queue between the decoder and its consumers.
pub fn frame_channel() -> (FrameSink, FrameQueue) {
    let (tx, rx) = unbounded();
    (FrameSink { tx }, FrameQueue { rx })
}

/// Producer side. Pushing never blocks.
#[derive(Clone)]
pub struct FrameSink {
    tx: Sender<Frame>,
}

impl FrameSink {
    pub fn push(&self, frame: Frame) -> Result<(), RazorError> {
        self.tx.send(frame).map_err(|_| RazorError::SinkClosed)
    }
}

/// Consumer side. Frames come out in `sequence_index` order.
#[derive(Clone)]
pub struct FrameQueue {
    rx: Receiver<Frame>,
}

impl FrameQueue {
    /// Blocks until a frame arrives. Fails with `SinkClosed` once every
    /// producer is gone and the queue is drained.
    pub fn pop(&self) -> Result<Frame, RazorError> {
        self.rx.recv().map_err(|_| RazorError::SinkClosed)
    }

    pub fn pop_timeout(&self, timeout: Duration) -> Result<Frame, RazorError> {
        match self.rx.recv_timeout(timeout) {
            Ok(frame) => Ok(frame),
            Err(RecvTimeoutError::Timeout) => Err(RazorError::SinkEmpty),
            Err(RecvTimeoutError::Disconnected) => Err(RazorError::SinkClosed),
        }
    }

    pub fn try_pop(&self) -> Result<Option<Frame>, RazorError> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RazorError::SinkClosed),
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::BODY_LEN;
    use chrono::Local;

    fn frame(sequence_index: u64) -> Frame {
        Frame::decode(&[0u8; BODY_LEN], sequence_index, Local::now())
    }

    #[test]
    fn fifo_order() {
        let (sink, queue) = frame_channel();
        for i in 0..5 {
            sink.push(frame(i)).unwrap();
        }
        assert_eq!(queue.len(), 5);
        for i in 0..5 {
            assert_eq!(queue.pop().unwrap().sequence_index, i);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn push_does_not_wait_for_consumer() {
        let (sink, queue) = frame_channel();
        for i in 0..10_000 {
            sink.push(frame(i)).unwrap();
        }
        assert_eq!(queue.len(), 10_000);
    }

    #[test]
    fn empty_and_closed() {
        let (sink, queue) = frame_channel();
        assert!(matches!(queue.try_pop(), Ok(None)));
        assert!(matches!(
            queue.pop_timeout(Duration::from_millis(5)),
            Err(RazorError::SinkEmpty)
        ));

        sink.push(frame(0)).unwrap();
        drop(sink);
        assert_eq!(queue.pop().unwrap().sequence_index, 0);
        assert!(matches!(queue.pop(), Err(RazorError::SinkClosed)));
        assert!(matches!(queue.try_pop(), Err(RazorError::SinkClosed)));
    }

    #[test]
    fn push_fails_without_consumers() {
        let (sink, queue) = frame_channel();
        drop(queue);
        assert!(matches!(sink.push(frame(0)), Err(RazorError::SinkClosed)));
    }
}
