//! Report fingerprints.
//!
//! FNV-1a over the bit patterns of every reported value. Two scans of
//! the same geometry and configuration produce the same fingerprint;
//! the hash is for equality checks only and is not cryptographic.

use fastrack_core::{ParameterResolution, ResolutionQuantity};
use fastrack_engine::{ReportMode, ResolutionResult, SampleOutcome, ScanReport};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_f64(hash: u64, v: f64) -> u64 {
    fnv1a_u64(hash, v.to_bits())
}

fn fnv1a_resolution(mut hash: u64, r: &ParameterResolution) -> u64 {
    for q in ResolutionQuantity::ALL {
        hash = fnv1a_f64(hash, r.get(q));
    }
    hash
}

fn fnv1a_result(mut hash: u64, r: &ResolutionResult) -> u64 {
    hash = fnv1a_f64(hash, r.pt);
    hash = fnv1a_f64(hash, r.rapidity);
    hash = fnv1a_resolution(hash, &r.nominal);
    match &r.expected {
        Some(e) => {
            hash = fnv1a_byte(hash, 1);
            hash = fnv1a_resolution(hash, e);
        }
        None => hash = fnv1a_byte(hash, 0),
    }
    for p in [
        r.reconstruction_probability,
        r.good_probability,
        r.fake_probability,
        r.unfit_probability,
        r.material,
    ] {
        hash = fnv1a_f64(hash, p);
    }
    fnv1a_u64(hash, r.reached_layers as u64)
}

/// Fingerprint of a single outcome, seeded with `hash`.
pub(crate) fn fnv1a_outcome(hash: u64, outcome: &SampleOutcome) -> u64 {
    match outcome {
        Ok(r) => fnv1a_result(fnv1a_byte(hash, 0), r),
        Err(f) => {
            let mut hash = fnv1a_byte(hash, 1);
            hash = fnv1a_f64(hash, f.pt);
            hash = fnv1a_f64(hash, f.rapidity);
            for b in f.error.to_string().bytes() {
                hash = fnv1a_byte(hash, b);
            }
            hash
        }
    }
}

/// Fingerprint of every outcome of `mode` in scan order.
///
/// The sample index is folded in at each entry so reordering changes
/// the hash. Returns `FNV_OFFSET` when the mode has no outcomes.
pub fn report_hash(scan: &ScanReport, mode: ReportMode) -> u64 {
    let mut hash = FNV_OFFSET;
    for entry in scan.entries() {
        if let Some(outcome) = entry.outcome(mode) {
            hash = fnv1a_u64(hash, entry.index.0 as u64);
            hash = fnv1a_outcome(hash, outcome);
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use fastrack_core::{FitError, SampleIndex};
    use fastrack_engine::SampleFailure;

    use super::*;

    fn result(pt: f64) -> ResolutionResult {
        ResolutionResult {
            index: SampleIndex(0),
            pt,
            rapidity: 0.0,
            nominal: ParameterResolution::ZERO,
            expected: None,
            reconstruction_probability: 1.0,
            good_probability: 1.0,
            fake_probability: 0.0,
            unfit_probability: 0.0,
            reached_layers: 3,
            material: 0.0,
        }
    }

    #[test]
    fn same_outcome_same_hash() {
        let a = fnv1a_outcome(FNV_OFFSET, &Ok(result(1.0)));
        let b = fnv1a_outcome(FNV_OFFSET, &Ok(result(1.0)));
        assert_eq!(a, b);
    }

    #[test]
    fn changed_value_changes_hash() {
        let a = fnv1a_outcome(FNV_OFFSET, &Ok(result(1.0)));
        let b = fnv1a_outcome(FNV_OFFSET, &Ok(result(1.0 + f64::EPSILON)));
        assert_ne!(a, b);
    }

    #[test]
    fn expected_presence_is_hashed() {
        let mut with = result(1.0);
        with.expected = Some(ParameterResolution::ZERO);
        assert_ne!(
            fnv1a_outcome(FNV_OFFSET, &Ok(with)),
            fnv1a_outcome(FNV_OFFSET, &Ok(result(1.0)))
        );
    }

    #[test]
    fn failure_differs_from_success() {
        let failure = SampleFailure {
            index: SampleIndex(0),
            pt: 1.0,
            rapidity: 0.0,
            error: FitError::Unconstrained { measurements: 1 },
        };
        assert_ne!(
            fnv1a_outcome(FNV_OFFSET, &Err(failure)),
            fnv1a_outcome(FNV_OFFSET, &Ok(result(1.0)))
        );
    }
}
