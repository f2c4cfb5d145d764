// SPDX-License-Identifier: MIT

mod stats;
mod types;

pub use stats::WalkerStats;
pub use types::{Finding, Severity, VerifierOptionsLike, VerifyPhases, VerifyReport};

pub use crate::core::errors::{FsCheckerError, FsCheckerResult};

/// Trait for verifying the integrity of a filesystem.
///
/// Phases run in a fixed order and each one must see the complete result
/// of the previous one: seeding the reference counters, walking every
/// inode, validating the allocation bitmap, then inspecting what is left
/// in the counters. The first inconsistency aborts the run.
pub trait FsChecker {
    type Options: VerifierOptionsLike + Default;

    fn check_with(&mut self, opt: &Self::Options) -> FsCheckerResult<VerifyReport> {
        let mut rep = VerifyReport::default();
        self.run_phase(opt, &mut rep, VerifyPhases::SEED, Self::check_seed)?;
        self.run_phase(opt, &mut rep, VerifyPhases::WALK, Self::check_walk)?;
        self.run_phase(opt, &mut rep, VerifyPhases::BITMAP, Self::check_bitmap)?;
        self.run_phase(opt, &mut rep, VerifyPhases::RESIDUAL, Self::check_residual)?;
        Ok(rep)
    }

    fn check_all(&mut self) -> FsCheckerResult<VerifyReport> {
        self.check_with(&Self::Options::default())
    }

    fn check_seed(&mut self, _opt: &Self::Options, _rep: &mut VerifyReport) -> FsCheckerResult {
        Ok(())
    }
    fn check_walk(&mut self, _opt: &Self::Options, _rep: &mut VerifyReport) -> FsCheckerResult {
        Ok(())
    }
    fn check_bitmap(&mut self, _opt: &Self::Options, _rep: &mut VerifyReport) -> FsCheckerResult {
        Ok(())
    }
    fn check_residual(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult {
        Ok(())
    }

    fn run_phase<F>(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
        phase: VerifyPhases,
        f: F,
    ) -> FsCheckerResult
    where
        F: Fn(&mut Self, &Self::Options, &mut VerifyReport) -> FsCheckerResult,
    {
        if !opt.phases().contains(phase) {
            return Ok(());
        }
        // A later phase reads counters an earlier one produced.
        if !rep.completed.contains(phase.prerequisites()) {
            return Err(FsCheckerError::Invalid("phase run before its prerequisites"));
        }
        f(self, opt, rep)?;
        rep.completed.insert(phase);
        Ok(())
    }
}
