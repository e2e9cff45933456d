//! Padding orchestrator: the single `pad` + final `absorb` of a digest.

use log::debug;

use crate::digest::DigestView;
use crate::engine::Engine;
use crate::error::Result;
use crate::primitive::CompressionPrimitive;

/// Pads the `terminal_len` bytes staged at the input offset, absorbs the
/// padded block(s) and returns the digest from the header region.
pub(crate) fn finalize<P: CompressionPrimitive>(
    engine: &mut Engine<P>,
    terminal_len: usize,
) -> Result<DigestView<'_>> {
    let padded = engine.pad(terminal_len)?;
    engine.absorb(padded)?;
    debug!(
        "finalized: {} terminal bytes padded to {}",
        terminal_len, padded
    );
    engine.digest_view()
}
