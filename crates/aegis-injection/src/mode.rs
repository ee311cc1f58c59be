/// The trust context a piece of content arrives under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrustMode {
    /// Direct human-principal input. Trusted for the scope of this core.
    PrincipalFull,
    /// Content attributed to the principal but not independently verified.
    PrincipalVerify,
    /// Web fetches, other-agent outputs, reads from untrusted paths.
    External,
    /// A write to a memory path. `protected` distinguishes learning
    /// corpora / synthesis / harvested-content paths (which can block)
    /// from the core's own security/state logs (warn-only, never block).
    MemoryWrite { protected: bool },
}
