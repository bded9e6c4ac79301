//! Per-hop RTT statistics shared by the traceroute and MTR parsers.

use common::HopStats;

/// Summarizes a hop's received RTT samples against the number of probes
/// that were actually sent for that hop.
pub fn summarize(rtt: &[f64], sent: u32) -> HopStats {
    let count = rtt.len() as u32;
    let loss = if sent == 0 {
        0.0
    } else {
        (1.0 - count as f64 / sent as f64).max(0.0) * 100.0
    };

    if rtt.is_empty() {
        return HopStats {
            min: None,
            avg: None,
            max: None,
            st_dev: None,
            j_avg: None,
            loss,
            count,
        };
    }

    let min = rtt.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = rtt.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = rtt.iter().sum::<f64>() / count as f64;
    let variance = rtt.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / count as f64;
    let st_dev = variance.sqrt();
    let j_avg = if count > 1 {
        let diffs: Vec<f64> = rtt.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        Some(diffs.iter().sum::<f64>() / diffs.len() as f64)
    } else {
        Some(0.0)
    };

    HopStats {
        min: Some(min),
        avg: Some(avg),
        max: Some(max),
        st_dev: Some(st_dev),
        j_avg,
        loss,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_full_loss_when_nothing_came_back() {
        let stats = summarize(&[], 3);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.loss, 100.0);
        assert!(stats.min.is_none());
    }

    #[test]
    fn computes_min_avg_max_for_a_clean_hop() {
        let stats = summarize(&[1.0, 2.0, 3.0], 3);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.loss, 0.0);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(3.0));
        assert_eq!(stats.avg, Some(2.0));
    }

    #[test]
    fn partial_loss_is_a_fraction_of_sent_probes() {
        let stats = summarize(&[1.0, 2.0], 4);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.loss, 50.0);
    }
}
