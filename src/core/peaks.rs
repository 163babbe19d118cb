//! Dominant-bin extraction from a single-sided power spectrum.

/// A ranked spectral peak: original bin index plus its raw power.
#[derive(Clone, Copy, Debug)]
pub struct PeakBin {
    pub bin: usize,
    pub power: f64,
}

/// Find the dominant non-DC bins of `power` (length `n/2 + 1`, DC at index 0).
///
/// A bin `i` is a local maximum when `power[i-1] < power[i] > power[i+1]`;
/// the scan covers interior bins only, so DC and Nyquist never qualify.
/// When no local maximum exists (monotone spectra, plateaus) the fallback is
/// simply the `max_peaks` highest-power non-DC bins.
///
/// Result order: descending power, ties broken by ascending bin index.
pub fn extract_peaks(power: &[f64], max_peaks: usize) -> Vec<PeakBin> {
    if power.len() < 2 || max_peaks == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<PeakBin> = Vec::new();
    if power.len() >= 3 {
        for i in 1..power.len() - 1 {
            if power[i - 1] < power[i] && power[i] > power[i + 1] {
                candidates.push(PeakBin {
                    bin: i,
                    power: power[i],
                });
            }
        }
    }

    if candidates.is_empty() {
        // Fallback: every non-DC bin, ranked by raw power.
        candidates = power
            .iter()
            .enumerate()
            .skip(1)
            .map(|(bin, &p)| PeakBin { bin, power: p })
            .collect();
    }

    candidates.sort_by(|a, b| b.power.total_cmp(&a.power).then(a.bin.cmp(&b.bin)));
    candidates.truncate(max_peaks);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_interior_maximum() {
        let power = [0.0, 1.0, 5.0, 2.0, 0.5];
        let peaks = extract_peaks(&power, 8);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].bin, 2);
        assert_eq!(peaks[0].power, 5.0);
    }

    #[test]
    fn ranked_by_descending_power() {
        let power = [0.0, 1.0, 0.2, 3.0, 0.1, 2.0, 0.0];
        let peaks = extract_peaks(&power, 8);
        let bins: Vec<usize> = peaks.iter().map(|p| p.bin).collect();
        assert_eq!(bins, vec![3, 5, 1]);
    }

    #[test]
    fn ties_break_by_ascending_bin() {
        let power = [0.0, 2.0, 0.5, 2.0, 0.5, 2.0, 0.0];
        let peaks = extract_peaks(&power, 8);
        let bins: Vec<usize> = peaks.iter().map(|p| p.bin).collect();
        assert_eq!(bins, vec![1, 3, 5]);
    }

    #[test]
    fn truncates_to_max_peaks() {
        let power = [0.0, 5.0, 0.1, 4.0, 0.1, 3.0, 0.1, 2.0, 0.0];
        let peaks = extract_peaks(&power, 2);
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].bin, 1);
        assert_eq!(peaks[1].bin, 3);
    }

    #[test]
    fn monotone_spectrum_falls_back_to_highest_bins() {
        // Strictly increasing: no interior local max, so the fallback ranks
        // raw non-DC bins.
        let power = [0.0, 1.0, 2.0, 3.0, 4.0];
        let peaks = extract_peaks(&power, 3);
        let bins: Vec<usize> = peaks.iter().map(|p| p.bin).collect();
        assert_eq!(bins, vec![4, 3, 2]);
    }

    #[test]
    fn all_zero_spectrum_fallback_is_deterministic() {
        let power = [0.0; 6];
        let peaks = extract_peaks(&power, 3);
        let bins: Vec<usize> = peaks.iter().map(|p| p.bin).collect();
        assert_eq!(bins, vec![1, 2, 3]);
    }

    #[test]
    fn dc_never_selected() {
        let power = [100.0, 1.0, 0.5, 0.2];
        let peaks = extract_peaks(&power, 8);
        assert!(peaks.iter().all(|p| p.bin != 0));
    }

    #[test]
    fn degenerate_inputs() {
        assert!(extract_peaks(&[], 4).is_empty());
        assert!(extract_peaks(&[1.0], 4).is_empty());
        assert!(extract_peaks(&[1.0, 2.0, 3.0], 0).is_empty());
    }
}
