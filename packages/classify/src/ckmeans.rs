//! Optimal one-dimensional k-means (ckmeans).
//!
//! Dynamic program over sorted values: `cost[m][i]` is the smallest total
//! within-cluster sum of squared deviations achievable when
//! `sorted[..=i]` is split into `m + 1` contiguous clusters. Sums are
//! taken relative to the median to keep the prefix sums well conditioned.

/// Groups `sorted` (ascending, finite) into at most `k` contiguous clusters
/// minimizing within-cluster variance.
///
/// The number of clusters is capped at the number of distinct values, so
/// every returned cluster is non-empty. Returns no clusters for empty
/// input or `k == 0`. Deterministic: ties prefer the later split.
#[must_use]
pub fn ckmeans(sorted: &[f64], k: usize) -> Vec<Vec<f64>> {
    let n = sorted.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }

    let k = k.min(distinct_count(sorted));
    if k == 1 {
        return vec![sorted.to_vec()];
    }

    let shift = sorted[n / 2];
    let mut sum = vec![0.0; n + 1];
    let mut sum_sq = vec![0.0; n + 1];
    for (i, &x) in sorted.iter().enumerate() {
        let d = x - shift;
        sum[i + 1] = sum[i] + d;
        sum_sq[i + 1] = sum_sq[i] + d * d;
    }

    // Sum of squared deviations of sorted[j..=i].
    let ssq = |j: usize, i: usize| -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let count = (i - j + 1) as f64;
        let s = sum[i + 1] - sum[j];
        let s2 = sum_sq[i + 1] - sum_sq[j];
        (s2 - s * s / count).max(0.0)
    };

    let mut cost = vec![vec![0.0; n]; k];
    let mut split = vec![vec![0usize; n]; k];

    for i in 0..n {
        cost[0][i] = ssq(0, i);
    }

    for m in 1..k {
        for i in m..n {
            let mut best = f64::INFINITY;
            let mut best_j = m;
            for j in m..=i {
                let candidate = cost[m - 1][j - 1] + ssq(j, i);
                if candidate <= best {
                    best = candidate;
                    best_j = j;
                }
            }
            cost[m][i] = best;
            split[m][i] = best_j;
        }
    }

    let mut clusters = Vec::with_capacity(k);
    let mut right = n - 1;
    for m in (0..k).rev() {
        let left = if m == 0 { 0 } else { split[m][right] };
        clusters.push(sorted[left..=right].to_vec());
        if m > 0 {
            right = left - 1;
        }
    }
    clusters.reverse();
    clusters
}

fn distinct_count(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|pair| pair[0] != pair[1]).count()
}
