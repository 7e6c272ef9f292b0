//! Response-time distribution.

use serde::Serialize;

use crate::derived::DerivedTable;
use crate::AnalyticsError;

/// Upper bound on the number of histogram bins.
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower edge, minutes.
    pub lower: f64,
    /// Exclusive upper edge, minutes; the last bin also holds its upper edge.
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseHistogram {
    pub bin_width_minutes: f64,
    pub bins: Vec<HistogramBin>,
}

impl ResponseHistogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Bucket the gaps between consecutive records into `bins` equal-width bins
/// spanning zero to the longest gap, in minutes.
///
/// Gaps that run backwards in time (out-of-order exports) are left out.
pub fn response_time_histogram(
    table: &DerivedTable,
    bins: usize,
) -> Result<ResponseHistogram, AnalyticsError> {
    if bins == 0 {
        return Err(AnalyticsError::InvalidBinCount);
    }
    if bins > MAX_HISTOGRAM_BINS {
        return Err(AnalyticsError::TooManyBins {
            requested: bins,
            max: MAX_HISTOGRAM_BINS,
        });
    }

    let mut gaps = Vec::with_capacity(table.len());
    let mut backwards = 0usize;
    for secs in table.rows().iter().filter_map(|row| row.response_time_secs) {
        if secs < 0 {
            backwards += 1;
        } else {
            gaps.push(secs as f64 / 60.0);
        }
    }
    if backwards > 0 {
        tracing::debug!(backwards, "negative response gaps left out of histogram");
    }

    if gaps.is_empty() {
        return Ok(ResponseHistogram {
            bin_width_minutes: 0.0,
            bins: Vec::new(),
        });
    }

    let span = gaps.iter().copied().fold(0.0_f64, f64::max).max(1.0);
    let width = span / bins as f64;

    let mut counts = vec![0usize; bins];
    for gap in &gaps {
        let idx = ((gap / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(ResponseHistogram {
        bin_width_minutes: width,
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: i as f64 * width,
                upper: (i + 1) as f64 * width,
                count,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalyticsConfig;
    use chatlens_parser::parse_chat_log;

    fn table(input: &str) -> DerivedTable {
        DerivedTable::compute(&parse_chat_log(input).unwrap(), &AnalyticsConfig::default())
    }

    #[test]
    fn test_zero_bins_rejected() {
        let t = table("[1/2/24, 3:04:05 PM] Al: hi");
        assert_eq!(
            response_time_histogram(&t, 0),
            Err(AnalyticsError::InvalidBinCount)
        );
    }

    #[test]
    fn test_oversized_bin_count_rejected() {
        let t = table(
            "[1/2/24, 3:00:00 PM] Al: a\n\
             [1/2/24, 3:01:00 PM] Bo: b",
        );
        assert_eq!(
            response_time_histogram(&t, usize::MAX),
            Err(AnalyticsError::TooManyBins {
                requested: usize::MAX,
                max: MAX_HISTOGRAM_BINS
            })
        );
        let hist = response_time_histogram(&t, MAX_HISTOGRAM_BINS).unwrap();
        assert_eq!(hist.bins.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn test_single_record_has_no_gaps() {
        let t = table("[1/2/24, 3:04:05 PM] Al: hi");
        let hist = response_time_histogram(&t, 30).unwrap();
        assert!(hist.is_empty());
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_gaps_are_binned() {
        // gaps: 1 min, 9 min, 10 min
        let t = table(
            "[1/2/24, 3:00:00 PM] Al: a\n\
             [1/2/24, 3:01:00 PM] Bo: b\n\
             [1/2/24, 3:10:00 PM] Al: c\n\
             [1/2/24, 3:20:00 PM] Bo: d",
        );
        let hist = response_time_histogram(&t, 5).unwrap();
        assert_eq!(hist.bins.len(), 5);
        assert!((hist.bin_width_minutes - 2.0).abs() < 1e-9);
        let counts: Vec<_> = hist.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 2]);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_backwards_gaps_skipped() {
        let t = table(
            "[1/2/24, 3:10:00 PM] Al: a\n\
             [1/2/24, 3:00:00 PM] Bo: b\n\
             [1/2/24, 3:00:30 PM] Al: c",
        );
        let hist = response_time_histogram(&t, 3).unwrap();
        assert_eq!(hist.total(), 1);
        // span is clamped to one minute
        assert!((hist.bin_width_minutes - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(hist.bins[1].count, 1);
    }
}
