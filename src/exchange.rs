//! # Exchange
//! Pairs requests handed to a worker task with the replies that come back.
//!
//! The tick loop gives up on a reply after a timeout, but the worker still answers eventually.
//! Every request carries a [`Ticket`] and the worker copies it onto its reply, so a late reply is
//! recognised and dropped instead of answering the next request.

/// Number of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticket(u32);

/// Hands out tickets in order
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    /// Number of the next ticket
    next: u32,
}

impl Sequence {
    /// A sequence starting at ticket zero
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Take the next ticket
    pub const fn issue(&mut self) -> Ticket {
        let ticket = Ticket(self.next);
        self.next = self.next.wrapping_add(1);
        ticket
    }
}

/// A request or reply with the ticket of its request
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tagged<T> {
    /// Request the value belongs to
    pub ticket: Ticket,
    /// Payload
    pub value: T,
}

impl<T> Tagged<T> {
    /// Tag `value` with `ticket`
    pub const fn new(ticket: Ticket, value: T) -> Self {
        Self { ticket, value }
    }

    /// Tag an answer to this request
    pub const fn answer<U>(&self, value: U) -> Tagged<U> {
        Tagged::new(self.ticket, value)
    }

    /// The payload, when this is the reply to `ticket`
    pub fn claim(self, ticket: Ticket) -> Option<T> {
        (self.ticket == ticket).then_some(self.value)
    }
}
