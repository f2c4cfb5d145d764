// SPDX-License-Identifier: MIT

use alloc::{string::String, vec::Vec};
use core::fmt;

use bitflags::bitflags;

/// Severity of a non-fatal finding. Inconsistencies are returned as errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub sev: Severity,
    pub code: &'static str,
    pub msg: String,
}
impl Finding {
    pub fn info(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Info,
            code,
            msg: msg.into(),
        }
    }
    pub fn warn(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Warn,
            code,
            msg: msg.into(),
        }
    }
}

/// Outcome of a run that found no inconsistency.
///
/// Inconsistencies are returned as errors, so a report only ever holds
/// informational and warning findings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub findings: Vec<Finding>,
    /// Phases that ran to completion.
    pub completed: VerifyPhases,
}

impl VerifyReport {
    pub fn push(&mut self, f: Finding) {
        self.findings.push(f)
    }

    pub fn count(&self, s: Severity) -> usize {
        self.findings.iter().filter(|f| f.sev == s).count()
    }

    pub fn find(&self, code: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.code == code)
    }

    /// True when every phase ran.
    pub fn is_complete(&self) -> bool {
        self.completed.contains(VerifyPhases::ALL)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for it in &self.findings {
            let tag = match it.sev {
                Severity::Info => "INFO",
                Severity::Warn => "WARN",
            };
            writeln!(f, "{tag}: {:<14} {}", it.code, it.msg)?;
        }
        Ok(())
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct VerifyPhases: u32 {
        const SEED     = 1 << 0;
        const WALK     = 1 << 1;
        const BITMAP   = 1 << 2;
        const RESIDUAL = 1 << 3;
        const ALL      = Self::SEED.bits()
            | Self::WALK.bits()
            | Self::BITMAP.bits()
            | Self::RESIDUAL.bits();
    }
}

impl VerifyPhases {
    /// Phases that must have completed before `self` may run.
    pub fn prerequisites(self) -> VerifyPhases {
        if self.contains(VerifyPhases::RESIDUAL) {
            VerifyPhases::SEED | VerifyPhases::WALK | VerifyPhases::BITMAP
        } else if self.contains(VerifyPhases::BITMAP) {
            VerifyPhases::SEED | VerifyPhases::WALK
        } else if self.contains(VerifyPhases::WALK) {
            VerifyPhases::SEED
        } else {
            VerifyPhases::empty()
        }
    }
}

/// Generic options that the FS can encapsulate/extend.
pub trait VerifierOptionsLike {
    fn phases(&self) -> VerifyPhases {
        VerifyPhases::ALL
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_prerequisites_chain() {
        assert!(VerifyPhases::SEED.prerequisites().is_empty());
        assert_eq!(VerifyPhases::WALK.prerequisites(), VerifyPhases::SEED);
        assert!(
            VerifyPhases::RESIDUAL
                .prerequisites()
                .contains(VerifyPhases::BITMAP | VerifyPhases::WALK)
        );
    }

    #[test]
    fn test_report_display_and_lookup() {
        let mut rep = VerifyReport::default();
        rep.push(Finding::info("LAYOUT", "data [59, 1059)"));
        rep.push(Finding::warn("INODE.TOTAL", "nothing"));
        assert_eq!(rep.count(Severity::Info), 1);
        assert_eq!(rep.find("LAYOUT").map(|f| f.msg.as_str()), Some("data [59, 1059)"));
        assert!(rep.to_string().starts_with("INFO: LAYOUT"));
        assert!(!rep.is_complete());
        rep.completed = VerifyPhases::ALL;
        assert!(rep.is_complete());
    }
}
