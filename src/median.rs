/// Returns the median of `a`, `b` and `c`.
#[inline]
pub(crate) fn median_of_three<T, F>(a: T, b: T, c: T, is_less: &mut F) -> T
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    if is_less(&b, &a) {
        if !is_less(&c, &a) {
            return a;
        }
        // Both below a, the larger of b and c.
        if is_less(&c, &b) {
            return b;
        }
        return c;
    }

    if is_less(&c, &b) {
        // Both at most b, the larger of a and c.
        if is_less(&c, &a) {
            return a;
        }
        return c;
    }

    b
}

/// Samples the pivot of `v` at 1/4, 1/2 and 3/4 of its length.
#[inline]
pub(crate) fn sample_pivot<T, F>(v: &[T], is_less: &mut F) -> T
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(len > 0);

    median_of_three(v[len / 4], v[len / 2], v[len * 3 / 4], is_less)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn median(a: i32, b: i32, c: i32) -> i32 {
        median_of_three(a, b, c, &mut |x: &i32, y: &i32| x < y)
    }

    #[test]
    fn all_orders() {
        for [a, b, c] in [
            [1, 2, 3],
            [1, 3, 2],
            [2, 1, 3],
            [2, 3, 1],
            [3, 1, 2],
            [3, 2, 1],
        ] {
            assert_eq!(median(a, b, c), 2, "{a} {b} {c}");
        }
    }

    #[test]
    fn duplicates() {
        assert_eq!(median(4, 4, 1), 4);
        assert_eq!(median(1, 4, 4), 4);
        assert_eq!(median(4, 1, 4), 4);
        assert_eq!(median(7, 7, 7), 7);
    }

    #[test]
    fn sample_positions() {
        // len 8 samples indices 2, 4 and 6.
        let v = [0, 0, 30, 0, 10, 0, 20, 0];
        assert_eq!(sample_pivot(&v, &mut |a: &i32, b: &i32| a < b), 20);
    }

    #[test]
    fn short_ranges_stay_in_bounds() {
        let mut is_less = |a: &i32, b: &i32| a < b;

        assert_eq!(sample_pivot(&[5], &mut is_less), 5);
        assert_eq!(sample_pivot(&[5, 1], &mut is_less), 1);
        assert_eq!(sample_pivot(&[5, 1, 3], &mut is_less), 3);
    }

    #[test]
    fn organ_pipe_avoids_extremes() {
        let v: Vec<i32> = (0..50).chain((0..50).rev()).collect();
        let pivot = sample_pivot(&v, &mut |a: &i32, b: &i32| a < b);

        assert!(pivot > 0 && pivot < 49);
    }
}
