//! Public library API for encoding and decoding AMQP 1.0 typed values.

/// Value trees, array sizing, the cursor builder, the wire decoder and the described-type registry.
pub mod amqp;
