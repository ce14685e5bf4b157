//! Component-wise helpers over per-resource unit vectors.
//!
//! All vectors handled by the engine have exactly `m` components; length
//! checks happen once at the load boundary, not here.

/// True iff `a[j] <= b[j]` for every component
pub(crate) fn leq(a: &[u32], b: &[u32]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y)
}

/// True iff every component is zero
pub(crate) fn is_zero(v: &[u32]) -> bool {
    v.iter().all(|&x| x == 0)
}

/// `dst[j] += src[j]` for every component
pub(crate) fn add_assign(dst: &mut [u32], src: &[u32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}

/// `dst[j] -= src[j]` for every component; caller guarantees `src <= dst`
pub(crate) fn sub_assign(dst: &mut [u32], src: &[u32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d -= s;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leq() {
        assert!(leq(&[1, 2], &[1, 3]));
        assert!(leq(&[0, 0], &[0, 0]));
        assert!(!leq(&[2, 0], &[1, 9]));
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(&[]));
        assert!(is_zero(&[0, 0, 0]));
        assert!(!is_zero(&[0, 1]));
    }

    #[test]
    fn test_add_sub_round_trip() {
        let mut v = vec![3, 5, 7];
        add_assign(&mut v, &[1, 0, 2]);
        assert_eq!(v, vec![4, 5, 9]);
        sub_assign(&mut v, &[1, 0, 2]);
        assert_eq!(v, vec![3, 5, 7]);
    }
}
