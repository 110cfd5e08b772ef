use crate::stats;

/// Outcome of the pair pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRuns {
    /// The slice now consists of sorted blocks of 2 elements, the last one possibly of length 1.
    /// A merge is still required.
    Pairs,
    /// The whole slice was strictly descending and has been reversed. It is fully sorted.
    Reversed,
}

/// Turns `v` into sorted blocks of 2 elements, detecting and reversing descending runs.
///
/// So `6 5 4 3 2 1` becomes `1 2 3 4 5 6` rather than `5 6 3 4 1 2`. Only strictly descending runs
/// are reversed, equal elements keep their relative order.
pub(crate) fn normalize_pairs<T, F>(v: &mut [T], is_less: &mut F) -> PairRuns
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < 2 {
        return PairRuns::Pairs;
    }

    let mut i = 0;

    while i + 1 < len {
        if !is_less(&v[i + 1], &v[i]) {
            i += 2;
            continue;
        }

        let start = i;
        i += 2;

        loop {
            if i + 1 >= len {
                // The run reached the end. With an odd length the last element is alone at `i`.
                if start == 0 && (len % 2 == 0 || is_less(&v[i], &v[i - 1])) {
                    reverse(v);
                    stats::record(|c| c.full_reversals += 1);

                    return PairRuns::Reversed;
                }
                break;
            }

            if is_less(&v[i + 1], &v[i]) {
                if is_less(&v[i], &v[i - 1]) {
                    i += 2;
                    continue;
                }

                v.swap(i, i + 1);
                stats::record(|c| c.swaps += 1);
            }
            break;
        }

        reverse(&mut v[start..i]);
        stats::record(|c| c.run_reversals += 1);

        i += 2;
    }

    PairRuns::Pairs
}

#[inline]
fn reverse<T>(run: &mut [T]) {
    stats::record(|c| c.swaps += (run.len() / 2) as u64);
    run.reverse();
}
