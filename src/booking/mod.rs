//! Slot-booking negotiation: wire types, backend seam, and the
//! click → propose → accept/decline → submit state machine.

pub mod negotiator;
pub mod protocol;
