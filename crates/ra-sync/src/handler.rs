use crate::Envelope;

/// Receives delivered envelopes, one call per delivery, in delivery order.
///
/// Implementations must tolerate the same message arriving zero, one, or
/// many times.
pub trait MessageHandler {
    fn on_message(&mut self, envelope: &Envelope);
}

impl<F> MessageHandler for F
where
    F: FnMut(&Envelope),
{
    fn on_message(&mut self, envelope: &Envelope) {
        self(envelope)
    }
}
