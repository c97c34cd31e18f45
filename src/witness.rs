use crate::fingerprint::Fingerprint;

/// Witnesses data and recalls whether it was seen recently.
///
/// Witnessing both queries and admits: the answer reflects the state before
/// the call, and the data is remembered afterwards either way.
pub trait Witness {
    /// Witness a fingerprint the caller already holds. Returns `true` if it
    /// was (possibly, for probabilistic memories) seen within the window.
    fn witness_digest(&self, fingerprint: &Fingerprint) -> bool;

    /// Fingerprint `data`, then [`Witness::witness_digest`].
    fn witness(&self, data: &[u8]) -> bool {
        self.witness_digest(&Fingerprint::of(data))
    }
}

/// Read-only lookups and statistics shared by both memories.
pub trait WitnessStats {
    /// Membership check that does not admit the fingerprint.
    fn contains_digest(&self, fingerprint: &Fingerprint) -> bool;

    fn contains(&self, data: &[u8]) -> bool {
        self.contains_digest(&Fingerprint::of(data))
    }

    /// Window size the memory was built for.
    fn capacity(&self) -> usize;

    /// Total number of witness calls since construction.
    fn admissions(&self) -> u64;

    /// Approximate heap bytes held by the window state.
    fn memory_bytes(&self) -> usize;
}

impl<W: Witness + ?Sized> Witness for std::sync::Arc<W> {
    fn witness_digest(&self, fingerprint: &Fingerprint) -> bool {
        (**self).witness_digest(fingerprint)
    }
}

impl<W: Witness + ?Sized> Witness for &W {
    fn witness_digest(&self, fingerprint: &Fingerprint) -> bool {
        (**self).witness_digest(fingerprint)
    }
}
