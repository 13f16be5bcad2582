/// Boolean status flags a license update may target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseFlag {
    Paused,
    Revoked,
    Expired,
}

/// A validated license mutation. Toggle-vs-set intent is explicit here;
/// an absent value in the request never silently becomes a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseUpdateOp {
    Set(LicenseFlag, bool),
    Toggle(LicenseFlag),
    ResetHwid,
}
